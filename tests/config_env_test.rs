//! Environment overrides live in their own test binary: they mutate
//! process-wide state that other config tests read.

use std::env;

use composite_tree::config::Settings;

#[test]
fn given_env_vars_when_load_then_env_wins_over_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("local.toml");
    std::fs::write(&path, "result_prefix = \"File\"\n").unwrap();
    env::set_var("COMPOSITE_RESULT_PREFIX", "Env");
    env::set_var("COMPOSITE_LABELS__LEAF", "Hoja");

    let settings = Settings::load_from(None, Some(path.as_path()));

    env::remove_var("COMPOSITE_RESULT_PREFIX");
    env::remove_var("COMPOSITE_LABELS__LEAF");
    let settings = settings.expect("load settings");
    assert_eq!(settings.result_prefix, "Env");
    assert_eq!(settings.labels.leaf, "Hoja");
    assert_eq!(settings.labels.branch, "Branch");
}

//! Client code: works against untyped component handles only.

use std::io::Write;

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{ComponentArena, NodeId};

/// Caller that manipulates a component tree without knowing whether a
/// handle points at a leaf or a composite. Results are reported to `out`
/// as `<result_prefix>: <text>`.
pub struct Client<'s, W: Write> {
    settings: &'s Settings,
    out: W,
}

impl<'s, W: Write> Client<'s, W> {
    pub fn new(settings: &'s Settings, out: W) -> Self {
        Self { settings, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write a line of narration verbatim.
    pub fn narrate(&mut self, line: &str) -> ApplicationResult<()> {
        writeln!(self.out, "{}", line).with_context("write narration")
    }

    /// Report the text of `component`, followed by a blank line.
    #[instrument(level = "debug", skip(self, arena))]
    pub fn code_client_simple(
        &mut self,
        arena: &ComponentArena,
        component: NodeId,
    ) -> ApplicationResult<String> {
        let result = arena.render(component, &self.settings.labels)?;
        writeln!(self.out, "{}: {}\n", self.settings.result_prefix, result)
            .with_context("write result")?;
        Ok(result)
    }

    /// Attach `component2` to `component1` if the latter can hold children,
    /// then report the text of `component1`.
    #[instrument(level = "debug", skip(self, arena))]
    pub fn code_client_managing(
        &mut self,
        arena: &mut ComponentArena,
        component1: NodeId,
        component2: NodeId,
    ) -> ApplicationResult<String> {
        match arena.as_composite(component1) {
            Some(composite) => arena.add(composite, component2)?,
            None => debug!("{} cannot hold children, reporting as is", component1),
        }
        let result = arena.render(component1, &self.settings.labels)?;
        writeln!(self.out, "{}: {}", self.settings.result_prefix, result)
            .with_context("write result")?;
        Ok(result)
    }
}

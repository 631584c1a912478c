//! Application layer: client code and the demonstration
//!
//! This layer drives the domain through untyped component handles and
//! reports results to an output sink.

pub mod client;
pub mod demo;
pub mod error;
pub mod error_ext;

pub use client::Client;
pub use demo::run_demo;
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;

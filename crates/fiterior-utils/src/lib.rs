//! Foundation utilities shared by every fiterior crate.
//!
//! - [`error`]: error taxonomy with user-facing rendering
//! - [`exit_codes`]: stable CLI exit codes
//! - [`logging`]: tracing subscriber setup and span helpers
//! - [`types`]: small shared enums (config sources, output formats)

pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod types;

pub use error::{FiteriorError, UserFriendlyError};
pub use exit_codes::ExitCode;

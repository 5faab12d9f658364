//! fiterior: restyle a room photo with an AI theme.
//!
//! The workspace is split into focused crates; this crate ties them together:
//!
//! - [`TransformSession`] validates a request against the catalogs, runs a
//!   [`TransformJob`] over the HTTP client and returns a [`ResultSummary`]
//! - [`cli`] is the `fiterior` command-line front end
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fiterior::{Config, TransformRequest, TransformSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::builder()
//!         .endpoint("https://api.example.com/transform")
//!         .build()?;
//!     let session = TransformSession::from_config(&config)?;
//!     let summary = session
//!         .run(
//!             TransformRequest::new("file://living-room.jpg", "industrial", "claude"),
//!             |_| {},
//!         )
//!         .await?;
//!     println!("before: {}", summary.original_image);
//!     println!("after:  {}", summary.result_url);
//!     Ok(())
//! }
//! ```

pub mod cli;
mod result;
mod session;

pub use result::ResultSummary;
pub use session::{SessionEvent, TransformSession, validate_request};

pub use fiterior_catalog::{
    LOADING_STEPS, LoadingStep, MODELS, Model, ModelId, StepTimeline, THEMES, Theme, ThemeId,
    find_model, find_theme,
};
pub use fiterior_client::{
    ClientSettings, FallbackReason, TransformBackend, TransformClient, TransformOutcome,
    TransformRequest, TransformResponse,
};
pub use fiterior_config::{CliArgs, Config, ConfigBuilder, ConfigSource, OutputFormat};
pub use fiterior_orchestrator::{CompletionCallback, JobPhase, JobState, JobTiming, TransformJob};
pub use fiterior_utils::error::{
    CONVERSION_FAILED_MESSAGE, ConfigError, FiteriorError, TransformError, UserFriendlyError,
    ValidationError,
};
pub use fiterior_utils::exit_codes::ExitCode;

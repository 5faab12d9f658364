//! Static catalogs for fiterior.
//!
//! Everything here is immutable, process-wide data:
//! - [`themes`]: the closed set of interior style themes
//! - [`models`]: the closed set of AI models a job can run on
//! - [`steps`]: the progress timeline shown while a job runs
//!
//! Lookups never allocate and return `'static` references.

pub mod models;
pub mod steps;
pub mod themes;

pub use models::{MODELS, Model, ModelId, find_model};
pub use steps::{LOADING_STEPS, LoadingStep, STATUS_INTERVAL, StepTimeline};
pub use themes::{THEMES, Theme, ThemeId, find_theme};

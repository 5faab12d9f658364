use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use fiterior_utils::types::{ConfigSource, OutputFormat};

/// Default transform endpoint; replace with a real backend in `.fiterior/config.toml`
pub const DEFAULT_ENDPOINT: &str = "https://example.com/api/transform";

/// Default hard timeout for the transform request in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Default latency added before a fallback response resolves, in milliseconds
pub const DEFAULT_FALLBACK_DELAY_MS: u64 = 1_600;

/// Default delay between progress steps in milliseconds
pub const DEFAULT_STEP_INTERVAL_MS: u64 = 1_400;

/// Default pause before the completion callback in milliseconds
pub const DEFAULT_GRACE_DELAY_MS: u64 = 600;

/// Environment variable overriding the transform endpoint
pub const ENDPOINT_ENV_VAR: &str = "FITERIOR_ENDPOINT";

/// `[transform]` section: how the backend is reached
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransformSettings {
    pub endpoint: Option<String>,
    pub timeout_ms: Option<u64>,
    pub fallback_delay_ms: Option<u64>,
}

/// `[progress]` section: pacing of the simulated progress timeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProgressSettings {
    pub step_interval_ms: Option<u64>,
    pub grace_delay_ms: Option<u64>,
}

/// `[defaults]` section: values used when the CLI does not supply them
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    pub theme: Option<String>,
    pub model: Option<String>,
    pub verbose: Option<bool>,
    pub output_format: Option<OutputFormat>,
}

/// Configuration for fiterior operations.
///
/// `Config` provides hierarchical configuration with discovery and precedence:
/// CLI arguments > `FITERIOR_ENDPOINT` > config file > built-in defaults.
///
/// # Discovery
///
/// Use [`Config::discover()`] for CLI-like behavior that searches for
/// `.fiterior/config.toml` upward from the current directory.
///
/// # Programmatic Configuration
///
/// Use [`Config::builder()`] when the environment and filesystem must not
/// influence the result.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub transform: TransformSettings,
    pub progress: ProgressSettings,
    pub defaults: Defaults,
    /// Where each effective value came from, keyed by setting name
    pub source_attribution: HashMap<String, ConfigSource>,
}

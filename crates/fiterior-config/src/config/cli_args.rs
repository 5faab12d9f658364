use std::path::PathBuf;

use fiterior_utils::types::OutputFormat;

/// Values supplied on the command line, highest in the precedence order.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Explicit config file path (skips discovery)
    pub config_path: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub timeout_ms: Option<u64>,
    pub verbose: Option<bool>,
    pub output_format: Option<OutputFormat>,
    pub theme: Option<String>,
    pub model: Option<String>,
}

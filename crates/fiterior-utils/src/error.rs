use std::fmt;
use thiserror::Error;

/// Message surfaced to the user whenever a transform attempt fails unexpectedly.
///
/// Failure detail is logged, never shown; the job state only ever carries this text.
pub const CONVERSION_FAILED_MESSAGE: &str =
    "Something went wrong during conversion. Please try again.";

/// Library-level error type with user-friendly reporting.
///
/// `FiteriorError` is returned by the session façade and the CLI glue. It provides:
/// - Detailed error information for programmatic handling
/// - User-friendly messages with context and suggestions
/// - Mapping to CLI exit codes for consistent error reporting
///
/// # Exit Code Mapping
///
/// | Exit Code | Error Type |
/// |-----------|------------|
/// | 2 | Configuration errors |
/// | 3 | Request validation errors |
/// | 70 | Transform failures |
/// | 1 | Other errors |
///
/// # Example
///
/// ```rust
/// use fiterior_utils::error::{FiteriorError, ValidationError};
/// use fiterior_utils::exit_codes::ExitCode;
///
/// let err = FiteriorError::from(ValidationError::UnknownTheme { id: "baroque".into() });
/// assert_eq!(err.to_exit_code(), ExitCode::VALIDATION);
/// assert!(err.display_for_user().contains("baroque"));
/// ```
#[derive(Error, Debug)]
pub enum FiteriorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for providing user-friendly error reporting with context and suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Transform,
    FileSystem,
    Validation,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Transform => write!(f, "Transform"),
            Self::FileSystem => write!(f, "File System"),
            Self::Validation => write!(f, "Validation"),
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },

    #[error("Configuration discovery failed: {reason}")]
    DiscoveryFailed { reason: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(reason) => {
                format!("Configuration file has invalid format: {reason}")
            }
            Self::InvalidValue { key, value } => {
                format!("Configuration '{key}' has invalid value: {value}")
            }
            Self::NotFound { path } => {
                format!("Configuration file not found: {path}")
            }
            Self::DiscoveryFailed { reason } => {
                format!("Failed to discover configuration: {reason}")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile(_) => Some(
                "Configuration files must be valid TOML with optional [transform], [progress] and [defaults] sections."
                    .to_string(),
            ),
            Self::InvalidValue { key, value: _ } => Some(format!(
                "The '{key}' configuration option has specific format requirements."
            )),
            Self::NotFound { path: _ } => Some(
                "fiterior searches for .fiterior/config.toml starting from the current directory upward."
                    .to_string(),
            ),
            Self::DiscoveryFailed { reason: _ } => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec![
                "Check the TOML syntax using a TOML validator".to_string(),
                "Compare with the example configuration in the README".to_string(),
            ],
            Self::InvalidValue { key, value: _ } => match key.as_str() {
                "endpoint" => vec![
                    "Use an absolute http:// or https:// URL".to_string(),
                    "Example: --endpoint https://api.example.com/transform".to_string(),
                ],
                "theme" => vec!["Run 'fiterior themes' to list valid theme ids".to_string()],
                "model" => vec!["Run 'fiterior models' to list valid model ids".to_string()],
                _ => vec![
                    "Check the documentation for valid values for this option".to_string(),
                    "Remove the option to use the default value".to_string(),
                ],
            },
            Self::NotFound { path: _ } => vec![
                "Create .fiterior/config.toml in your project root".to_string(),
                "Use CLI flags instead of a configuration file".to_string(),
            ],
            Self::DiscoveryFailed { reason: _ } => vec![
                "Check read permissions on the current directory and its parents".to_string(),
                "Use --config <path> to specify the configuration file explicitly".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

/// Errors escaping the transform pipeline.
///
/// Network failures never show up here: the client absorbs them into a
/// fallback response. What remains are broken contracts and exhausted jobs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The backend answered 2xx with a body that is not a transform response
    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Every attempt of a job ended in the failure state
    #[error("Transform failed after {attempts} attempt(s)")]
    JobFailed { attempts: u32 },

    /// The job was torn down before it produced a result
    #[error("Transform job was cancelled before completion")]
    Cancelled,
}

impl UserFriendlyError for TransformError {
    fn user_message(&self) -> String {
        match self {
            Self::MalformedResponse { .. } | Self::JobFailed { .. } => {
                CONVERSION_FAILED_MESSAGE.to_string()
            }
            Self::ClientBuild(reason) => format!("Could not prepare the network client: {reason}"),
            Self::Cancelled => "The conversion was cancelled.".to_string(),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::MalformedResponse { endpoint, reason } => Some(format!(
                "The transform endpoint {endpoint} returned an unreadable body ({reason})."
            )),
            Self::JobFailed { attempts } => Some(format!(
                "The job was attempted {attempts} time(s) with the same photo, theme and model."
            )),
            Self::ClientBuild(_) | Self::Cancelled => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MalformedResponse { .. } => vec![
                "Check that the endpoint speaks the {jobId, resultUrl} JSON contract".to_string(),
                "Retry with --retries to re-run the job automatically".to_string(),
            ],
            Self::JobFailed { .. } => vec![
                "Run the command again to start a fresh job".to_string(),
                "Use --verbose to see the underlying cause".to_string(),
            ],
            Self::ClientBuild(_) => {
                vec!["Check the TLS configuration of this machine".to_string()]
            }
            Self::Cancelled => Vec::new(),
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Transform
    }
}

/// Errors raised before a job is activated, while checking the request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Request is missing required field(s): {}", .missing.join(", "))]
    IncompleteRequest { missing: Vec<&'static str> },

    #[error("Unknown theme id '{id}'")]
    UnknownTheme { id: String },

    #[error("Unknown model id '{id}'")]
    UnknownModel { id: String },
}

impl UserFriendlyError for ValidationError {
    fn user_message(&self) -> String {
        match self {
            Self::IncompleteRequest { missing } => {
                format!("A photo, a theme and a model are required (missing: {})", missing.join(", "))
            }
            Self::UnknownTheme { id } => format!("Theme '{id}' does not exist"),
            Self::UnknownModel { id } => format!("Model '{id}' does not exist"),
        }
    }

    fn context(&self) -> Option<String> {
        None
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::IncompleteRequest { .. } => vec![
                "Pass --image, --theme and --model, or set defaults in .fiterior/config.toml"
                    .to_string(),
            ],
            Self::UnknownTheme { .. } => {
                vec!["Run 'fiterior themes' to list valid theme ids".to_string()]
            }
            Self::UnknownModel { .. } => {
                vec!["Run 'fiterior models' to list valid model ids".to_string()]
            }
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Validation
    }
}

impl UserFriendlyError for FiteriorError {
    fn user_message(&self) -> String {
        match self {
            Self::Config(e) => e.user_message(),
            Self::Transform(e) => e.user_message(),
            Self::Validation(e) => e.user_message(),
            Self::Io(e) => format!("File system operation failed: {e}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Config(e) => e.context(),
            Self::Transform(e) => e.context(),
            Self::Validation(e) => e.context(),
            Self::Io(_) => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(e) => e.suggestions(),
            Self::Transform(e) => e.suggestions(),
            Self::Validation(e) => e.suggestions(),
            Self::Io(_) => vec!["Check file permissions and available disk space".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(e) => e.category(),
            Self::Transform(e) => e.category(),
            Self::Validation(e) => e.category(),
            Self::Io(_) => ErrorCategory::FileSystem,
        }
    }
}

impl FiteriorError {
    /// Get a user-friendly error message with context and actionable suggestions
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Error: {}\n", self.user_message()));

        if let Some(ctx) = self.context() {
            output.push_str(&format!("\nContext: {ctx}\n"));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        output
    }

    /// Map this error to the appropriate CLI exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> crate::exit_codes::ExitCode {
        use crate::exit_codes::ExitCode;

        match self {
            Self::Config(_) => ExitCode::CLI_ARGS,
            Self::Validation(_) => ExitCode::VALIDATION,
            Self::Transform(TransformError::ClientBuild(_)) => ExitCode::INTERNAL,
            Self::Transform(_) => ExitCode::TRANSFORM_FAILED,
            Self::Io(_) => ExitCode::INTERNAL,
        }
    }
}

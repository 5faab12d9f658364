//! Configuration model and its discovery, building and validation.

mod builder;
mod cli_args;
mod discovery;
mod model;
mod sources;
mod validation;

pub use builder::ConfigBuilder;
pub use cli_args::CliArgs;
pub use fiterior_utils::types::{ConfigSource, OutputFormat};
pub use model::*;

use std::time::Duration;

impl Config {
    /// Transform endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.transform.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Hard timeout applied to the transform request.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.transform.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS))
    }

    /// Artificial latency added before a fallback response resolves.
    #[must_use]
    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(
            self.transform
                .fallback_delay_ms
                .unwrap_or(DEFAULT_FALLBACK_DELAY_MS),
        )
    }

    /// Delay between two progress steps.
    #[must_use]
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(
            self.progress
                .step_interval_ms
                .unwrap_or(DEFAULT_STEP_INTERVAL_MS),
        )
    }

    /// Pause between the final step and the completion callback.
    #[must_use]
    pub fn grace_delay(&self) -> Duration {
        Duration::from_millis(self.progress.grace_delay_ms.unwrap_or(DEFAULT_GRACE_DELAY_MS))
    }

    #[must_use]
    pub fn verbose(&self) -> bool {
        self.defaults.verbose.unwrap_or(false)
    }

    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        self.defaults.output_format.unwrap_or_default()
    }

    /// Where the effective value of `key` came from.
    #[must_use]
    pub fn source_of(&self, key: &str) -> ConfigSource {
        self.source_attribution
            .get(key)
            .copied()
            .unwrap_or(ConfigSource::Default)
    }

    /// Configuration with built-in defaults only, for tests.
    #[cfg(any(test, feature = "test-utils"))]
    #[must_use]
    pub fn minimal_for_testing() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = Config::minimal_for_testing();
        assert_eq!(config.endpoint(), "https://example.com/api/transform");
        assert_eq!(config.request_timeout(), Duration::from_millis(15_000));
        assert_eq!(config.fallback_delay(), Duration::from_millis(1_600));
        assert_eq!(config.step_interval(), Duration::from_millis(1_400));
        assert_eq!(config.grace_delay(), Duration::from_millis(600));
        assert!(!config.verbose());
        assert_eq!(config.output_format(), OutputFormat::Text);
        assert_eq!(config.source_of("endpoint"), ConfigSource::Default);
    }
}

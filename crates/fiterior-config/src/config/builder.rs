use std::collections::HashMap;
use std::time::Duration;

use fiterior_utils::error::ConfigError;

use super::{
    Config, ConfigSource, Defaults, OutputFormat, ProgressSettings, TransformSettings,
};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// Neither the environment nor config files are consulted, which keeps the
    /// result deterministic for embedding and tests.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fiterior_config::Config;
    /// use std::time::Duration;
    ///
    /// let config = Config::builder()
    ///     .endpoint("http://127.0.0.1:8080/transform")
    ///     .timeout(Duration::from_secs(5))
    ///     .theme("nordic")
    ///     .build()
    ///     .expect("valid config");
    /// assert_eq!(config.request_timeout(), Duration::from_secs(5));
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for programmatic configuration.
///
/// All values set via the builder are attributed to
/// [`ConfigSource::Programmatic`]; everything else keeps its default.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
    fallback_delay: Option<Duration>,
    step_interval: Option<Duration>,
    grace_delay: Option<Duration>,
    theme: Option<String>,
    model: Option<String>,
    verbose: Option<bool>,
    output_format: Option<OutputFormat>,
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Hard timeout on the transform request.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn fallback_delay(mut self, delay: Duration) -> Self {
        self.fallback_delay = Some(delay);
        self
    }

    #[must_use]
    pub fn step_interval(mut self, interval: Duration) -> Self {
        self.step_interval = Some(interval);
        self
    }

    #[must_use]
    pub fn grace_delay(mut self, delay: Duration) -> Self {
        self.grace_delay = Some(delay);
        self
    }

    #[must_use]
    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    #[must_use]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when a value is out of range or a
    /// theme/model id is not in the catalog.
    pub fn build(self) -> Result<Config, ConfigError> {
        let mut source_attribution = HashMap::new();
        let mut mark = |key: &str, set: bool| {
            if set {
                source_attribution.insert(key.to_string(), ConfigSource::Programmatic);
            }
        };

        mark("endpoint", self.endpoint.is_some());
        mark("timeout_ms", self.timeout.is_some());
        mark("fallback_delay_ms", self.fallback_delay.is_some());
        mark("step_interval_ms", self.step_interval.is_some());
        mark("grace_delay_ms", self.grace_delay.is_some());
        mark("theme", self.theme.is_some());
        mark("model", self.model.is_some());
        mark("verbose", self.verbose.is_some());
        mark("output_format", self.output_format.is_some());

        let config = Config {
            transform: TransformSettings {
                endpoint: self.endpoint,
                timeout_ms: self.timeout.map(millis),
                fallback_delay_ms: self.fallback_delay.map(millis),
            },
            progress: ProgressSettings {
                step_interval_ms: self.step_interval.map(millis),
                grace_delay_ms: self.grace_delay.map(millis),
            },
            defaults: Defaults {
                theme: self.theme,
                model: self.model,
                verbose: self.verbose,
                output_format: self.output_format,
            },
            source_attribution,
        };

        config.validate()?;
        Ok(config)
    }
}

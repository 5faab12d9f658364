use fiterior_catalog::{find_model, find_theme};
use fiterior_utils::error::ConfigError;

use super::Config;

/// Upper bound for the request timeout (5 minutes)
const MAX_TIMEOUT_MS: u64 = 300_000;

/// Upper bound for any artificial delay (1 minute)
const MAX_DELAY_MS: u64 = 60_000;

fn invalid(key: &str, value: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.into(),
    }
}

/// Accept absolute `http`/`https` URLs with a non-empty host.
fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
            !host.is_empty() && !host.contains(char::is_whitespace)
        }
        None => false,
    }
}

impl Config {
    /// Validate configuration values
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if let Some(endpoint) = &self.transform.endpoint
            && !is_http_url(endpoint)
        {
            return Err(invalid(
                "endpoint",
                format!("'{endpoint}' is not an http(s) URL"),
            ));
        }

        if let Some(timeout_ms) = self.transform.timeout_ms {
            if timeout_ms == 0 {
                return Err(invalid("timeout_ms", "must be greater than 0"));
            }
            if timeout_ms > MAX_TIMEOUT_MS {
                return Err(invalid(
                    "timeout_ms",
                    format!("exceeds maximum limit of {MAX_TIMEOUT_MS} ms"),
                ));
            }
        }

        if let Some(delay) = self.transform.fallback_delay_ms
            && delay > MAX_DELAY_MS
        {
            return Err(invalid(
                "fallback_delay_ms",
                format!("exceeds maximum limit of {MAX_DELAY_MS} ms"),
            ));
        }

        if let Some(interval) = self.progress.step_interval_ms {
            if interval == 0 {
                return Err(invalid("step_interval_ms", "must be greater than 0"));
            }
            if interval > MAX_DELAY_MS {
                return Err(invalid(
                    "step_interval_ms",
                    format!("exceeds maximum limit of {MAX_DELAY_MS} ms"),
                ));
            }
        }

        if let Some(grace) = self.progress.grace_delay_ms
            && grace > MAX_DELAY_MS
        {
            return Err(invalid(
                "grace_delay_ms",
                format!("exceeds maximum limit of {MAX_DELAY_MS} ms"),
            ));
        }

        if let Some(theme) = &self.defaults.theme
            && find_theme(theme).is_none()
        {
            return Err(invalid("theme", format!("unknown theme id '{theme}'")));
        }

        if let Some(model) = &self.defaults.model
            && find_model(model).is_none()
        {
            return Err(invalid("model", format!("unknown model id '{model}'")));
        }

        Ok(())
    }
}

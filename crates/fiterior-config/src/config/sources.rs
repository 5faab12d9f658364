use std::collections::BTreeMap;

use super::Config;

impl Config {
    /// Get effective configuration as key-value pairs with source attribution
    ///
    /// Keys are sorted so the `config` command prints a stable listing. Unset
    /// optional values (default theme/model) are omitted.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let mut config = BTreeMap::new();

        let mut add = |key: &str, value: String| {
            let source = self.source_of(key).as_str().to_string();
            config.insert(key.to_string(), (value, source));
        };

        add("endpoint", self.endpoint().to_string());
        add("timeout_ms", self.request_timeout().as_millis().to_string());
        add("fallback_delay_ms", self.fallback_delay().as_millis().to_string());
        add("step_interval_ms", self.step_interval().as_millis().to_string());
        add("grace_delay_ms", self.grace_delay().as_millis().to_string());
        add("verbose", self.verbose().to_string());
        add("output_format", self.output_format().to_string());

        if let Some(theme) = &self.defaults.theme {
            add("theme", theme.clone());
        }
        if let Some(model) = &self.defaults.model {
            add("model", model.clone());
        }

        config
    }
}

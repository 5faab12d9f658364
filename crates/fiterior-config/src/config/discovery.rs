use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

use fiterior_utils::error::ConfigError;

use super::{
    CliArgs, Config, ConfigSource, Defaults, ENDPOINT_ENV_VAR, ProgressSettings,
    TransformSettings,
};

/// Directory holding the project config file
const CONFIG_DIR: &str = ".fiterior";

/// Config file name inside [`CONFIG_DIR`]
const CONFIG_FILE: &str = "config.toml";

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    transform: Option<TransformSettings>,
    progress: Option<ProgressSettings>,
    defaults: Option<Defaults>,
}

/// Overwrite `slot` with `value` when present, recording where it came from.
fn apply<T>(
    slot: &mut Option<T>,
    value: Option<T>,
    key: &str,
    source: ConfigSource,
    attribution: &mut HashMap<String, ConfigSource>,
) {
    if let Some(value) = value {
        *slot = Some(value);
        attribution.insert(key.to_string(), source);
    }
}

impl Config {
    /// Discover and load configuration with precedence: CLI > env > file > defaults
    ///
    /// Uses the current working directory for config file discovery when no
    /// explicit path is provided in `cli_args`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the working directory is unavailable, the
    /// config file cannot be read or parsed, or a value fails validation.
    pub fn discover(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let start_dir = env::current_dir().map_err(|e| ConfigError::DiscoveryFailed {
            reason: format!("Failed to get current directory: {e}"),
        })?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory
    ///
    /// This is the path-driven variant used by tests to avoid depending on the
    /// process working directory.
    ///
    /// # Errors
    ///
    /// See [`Config::discover`].
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        let config_path = match &cli_args.config_path {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(ConfigError::NotFound {
                        path: explicit.display().to_string(),
                    });
                }
                Some(explicit.clone())
            }
            None => Self::discover_config_file_from(start_dir),
        };

        if let Some(path) = &config_path {
            let file_config = Self::load_config_file(path)
                .map_err(|e| ConfigError::InvalidFile(format!("{e:#}")))?;
            debug!(path = %path.display(), "Loaded configuration file");
            config.apply_file(file_config);
        }

        // Environment overrides the file, CLI overrides everything.
        if let Ok(endpoint) = env::var(ENDPOINT_ENV_VAR)
            && !endpoint.is_empty()
        {
            apply(
                &mut config.transform.endpoint,
                Some(endpoint),
                "endpoint",
                ConfigSource::Env,
                &mut config.source_attribution,
            );
        }

        config.apply_cli(cli_args);
        config.validate()?;

        Ok(config)
    }

    fn apply_file(&mut self, file: TomlConfig) {
        let src = ConfigSource::Config;
        let attribution = &mut self.source_attribution;

        if let Some(transform) = file.transform {
            apply(&mut self.transform.endpoint, transform.endpoint, "endpoint", src, attribution);
            apply(&mut self.transform.timeout_ms, transform.timeout_ms, "timeout_ms", src, attribution);
            apply(
                &mut self.transform.fallback_delay_ms,
                transform.fallback_delay_ms,
                "fallback_delay_ms",
                src,
                attribution,
            );
        }

        if let Some(progress) = file.progress {
            apply(
                &mut self.progress.step_interval_ms,
                progress.step_interval_ms,
                "step_interval_ms",
                src,
                attribution,
            );
            apply(
                &mut self.progress.grace_delay_ms,
                progress.grace_delay_ms,
                "grace_delay_ms",
                src,
                attribution,
            );
        }

        if let Some(defaults) = file.defaults {
            apply(&mut self.defaults.theme, defaults.theme, "theme", src, attribution);
            apply(&mut self.defaults.model, defaults.model, "model", src, attribution);
            apply(&mut self.defaults.verbose, defaults.verbose, "verbose", src, attribution);
            apply(
                &mut self.defaults.output_format,
                defaults.output_format,
                "output_format",
                src,
                attribution,
            );
        }
    }

    fn apply_cli(&mut self, cli: &CliArgs) {
        let src = ConfigSource::Cli;
        let attribution = &mut self.source_attribution;

        apply(&mut self.transform.endpoint, cli.endpoint.clone(), "endpoint", src, attribution);
        apply(&mut self.transform.timeout_ms, cli.timeout_ms, "timeout_ms", src, attribution);
        apply(&mut self.defaults.theme, cli.theme.clone(), "theme", src, attribution);
        apply(&mut self.defaults.model, cli.model.clone(), "model", src, attribution);
        apply(&mut self.defaults.output_format, cli.output_format, "output_format", src, attribution);
        // `--verbose` is a switch: absent means "not requested", not "false".
        if cli.verbose == Some(true) {
            apply(&mut self.defaults.verbose, Some(true), "verbose", src, attribution);
        }
    }

    /// Discover config file by searching upward from a given directory
    ///
    /// Walks up the directory tree looking for `.fiterior/config.toml`, stopping
    /// at repository root markers (.git, .hg, .svn) or the filesystem root.
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        let mut current_dir = Some(start_dir);

        while let Some(dir) = current_dir {
            let config_path = dir.join(CONFIG_DIR).join(CONFIG_FILE);
            if config_path.is_file() {
                return Some(config_path);
            }

            if dir.join(".git").exists() || dir.join(".hg").exists() || dir.join(".svn").exists()
            {
                break;
            }

            current_dir = dir.parent();
        }

        None
    }

    /// Load configuration from a TOML file
    fn load_config_file(path: &Path) -> Result<TomlConfig> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config file: {}", path.display())),
            // Missing config file is OK - defaults apply
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TomlConfig::default()),
            Err(e) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            )),
        }
    }
}

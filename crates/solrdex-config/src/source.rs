//! Configuration source loading and composition

use crate::validation::Validate;
use crate::{ApplicationConfig, ConfigResult};
use std::path::{Path, PathBuf};

/// Trait for loading configuration from different sources
pub trait ConfigurationSource {
    /// Produce a new configuration from this source layered over `base`
    ///
    /// # Errors
    /// Returns configuration loading errors
    fn apply(&self, base: ApplicationConfig) -> ConfigResult<ApplicationConfig>;

    /// Get the name of this configuration source
    fn name(&self) -> &str;

    /// Get the priority of this source (higher number = higher priority)
    fn priority(&self) -> u8;

    /// Whether a failure of this source aborts loading
    fn required(&self) -> bool {
        true
    }
}

/// Overlay `SOLRDEX_*` environment variables
pub struct EnvironmentSource;

impl ConfigurationSource for EnvironmentSource {
    fn apply(&self, base: ApplicationConfig) -> ConfigResult<ApplicationConfig> {
        Ok(base.with_env_overrides())
    }

    fn name(&self) -> &'static str {
        "environment"
    }

    fn priority(&self) -> u8 {
        100 // Environment variables override everything
    }
}

/// Load configuration from a TOML file
///
/// Missing keys fall back to the built-in defaults, so a file may contain
/// only the `[solr]` table.
pub struct TomlFileSource {
    path: PathBuf,
    required: bool,
}

impl TomlFileSource {
    /// A file that must exist and parse
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required: true,
        }
    }

    /// A file that is skipped with a warning when unreadable
    pub fn optional<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required: false,
        }
    }
}

impl ConfigurationSource for TomlFileSource {
    fn apply(&self, _base: ApplicationConfig) -> ConfigResult<ApplicationConfig> {
        let content = std::fs::read_to_string(&self.path)?;
        let config: ApplicationConfig = toml::from_str(&content)?;
        Ok(config)
    }

    fn name(&self) -> &'static str {
        "toml_file"
    }

    fn priority(&self) -> u8 {
        50 // Below env vars, above defaults
    }

    fn required(&self) -> bool {
        self.required
    }
}

/// Type alias for configuration sources
type ConfigSources = Vec<Box<dyn ConfigurationSource>>;

/// Configuration loader that combines multiple sources
pub struct ConfigurationLoader {
    sources: ConfigSources,
}

impl ConfigurationLoader {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    #[must_use]
    pub fn add_source(mut self, source: Box<dyn ConfigurationSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Load configuration from all sources with priority ordering
    ///
    /// # Errors
    /// Returns loading errors of required sources and validation errors
    pub fn load(&self) -> ConfigResult<ApplicationConfig> {
        let mut config = ApplicationConfig::default();

        // Lowest priority first, so higher priorities layer on top
        let mut sorted_sources = self.sources.iter().collect::<Vec<_>>();
        sorted_sources.sort_by_key(|source| source.priority());

        for source in sorted_sources {
            match source.apply(config.clone()) {
                Ok(layered) => {
                    tracing::debug!("Loaded configuration from source: {}", source.name());
                    config = layered;
                }
                Err(e) if source.required() => return Err(e),
                Err(e) => {
                    tracing::warn!("Failed to load from source {}: {e}", source.name());
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigurationLoader {
    fn default() -> Self {
        Self::new()
    }
}

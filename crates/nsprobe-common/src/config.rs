//! ---
//! nsp_section: "01-core-functionality"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Shared primitives and utilities for the probe harness."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use tracing::debug;

use crate::logging::LogFormat;

/// Namespace URI of XHTML elements.
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

fn default_tag_name() -> String {
    "html".to_owned()
}

fn default_namespace_uri() -> Option<String> {
    Some(XHTML_NAMESPACE.to_owned())
}

fn default_content_type() -> String {
    "application/xhtml+xml".to_owned()
}

fn default_setup_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_pool_worker_threads() -> usize {
    2
}

fn default_primary_ui_name() -> String {
    "nsprobe-primary-ui".to_owned()
}

fn default_secondary_ui_name() -> String {
    "nsprobe-secondary-ui".to_owned()
}

fn default_pool_name() -> String {
    "nsprobe-pool".to_owned()
}

fn default_expected_count() -> usize {
    1
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::StructuredJson
}

/// Primary configuration object for a harness run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub document: DocumentConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub expectation: ExpectationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata describing where a [`HarnessConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedHarnessConfig {
    pub config: HarnessConfig,
    pub source: PathBuf,
}

impl HarnessConfig {
    pub const ENV_CONFIG_PATH: &'static str = "NSPROBE_CONFIG";

    /// Load configuration from disk, respecting the `NSPROBE_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration from disk together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedHarnessConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedHarnessConfig {
                    config,
                    source: path,
                });
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(&path)?;
                return Ok(LoadedHarnessConfig {
                    config,
                    source: path,
                });
            }
        }

        Err(anyhow!(
            "no configuration files found. inspected: {}",
            candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<HarnessConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.document.validate()?;
        self.timeouts.validate()?;
        self.executor.validate()?;
        Ok(())
    }
}

impl std::str::FromStr for HarnessConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: HarnessConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Which document is loaded and which element the probe looks for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Markup file to load; the built-in XHTML test page is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default = "default_tag_name")]
    pub tag_name: String,
    #[serde(default = "default_namespace_uri")]
    pub namespace_uri: Option<String>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            path: None,
            content_type: default_content_type(),
            tag_name: default_tag_name(),
            namespace_uri: default_namespace_uri(),
        }
    }
}

impl DocumentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tag_name.trim().is_empty() {
            return Err(anyhow!("document.tag_name must not be empty"));
        }
        if self.content_type.trim().is_empty() {
            return Err(anyhow!("document.content_type must not be empty"));
        }
        if let Some(path) = &self.path {
            if !path.is_file() {
                return Err(anyhow!(
                    "document.path {} does not exist or is not a file",
                    path.display()
                ));
            }
        }
        Ok(())
    }
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Upper bound for the shared document to reach the loaded state.
    #[serde(default = "default_setup_timeout", rename = "setup_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub setup: Duration,
    /// Upper bound for a single probe; unbounded when unset.
    #[serde(default, rename = "probe_ms")]
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    pub probe: Option<Duration>,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            setup: default_setup_timeout(),
            probe: None,
        }
    }
}

impl TimeoutConfig {
    pub fn validate(&self) -> Result<()> {
        if self.setup.is_zero() {
            return Err(anyhow!("timeouts.setup_ms must be greater than zero"));
        }
        if matches!(self.probe, Some(probe) if probe.is_zero()) {
            return Err(anyhow!("timeouts.probe_ms must be greater than zero when set"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    #[serde(default = "default_pool_worker_threads")]
    pub pool_worker_threads: usize,
    #[serde(default = "default_pool_name")]
    pub pool_name: String,
    #[serde(default = "default_primary_ui_name")]
    pub primary_ui_name: String,
    #[serde(default = "default_secondary_ui_name")]
    pub secondary_ui_name: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            pool_worker_threads: default_pool_worker_threads(),
            pool_name: default_pool_name(),
            primary_ui_name: default_primary_ui_name(),
            secondary_ui_name: default_secondary_ui_name(),
        }
    }
}

impl ExecutorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.pool_worker_threads == 0 {
            return Err(anyhow!("executor.pool_worker_threads must be at least 1"));
        }
        if self.primary_ui_name == self.secondary_ui_name {
            return Err(anyhow!(
                "executor.primary_ui_name and executor.secondary_ui_name must differ"
            ));
        }
        Ok(())
    }
}

/// Counts every scenario is expected to observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectationConfig {
    #[serde(default = "default_expected_count")]
    pub plain: usize,
    #[serde(default = "default_expected_count")]
    pub namespaced: usize,
}

impl Default for ExpectationConfig {
    fn default() -> Self {
        Self {
            plain: default_expected_count(),
            namespaced: default_expected_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
        }
    }
}

//! Configuration types for MCV MCP Server.
//!
//! Configuration is optional: every section has defaults, and a YAML file can
//! be supplied through `MCV_CONFIG`. The session cookie is never part of the
//! file; see [`crate::SessionContext`].

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::{Error, Result};

/// Environment variable naming an optional YAML configuration file.
pub const CONFIG_PATH_ENV: &str = "MCV_CONFIG";

/// Environment variable overriding `portal.base_url`.
pub const BASE_URL_ENV: &str = "MCV_BASE_URL";

/// Upper bound accepted for assignment listing limits.
pub const MAX_ASSIGNMENT_LIMIT: u32 = 500;

/// Server configuration loaded from YAML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Server settings
    pub server: ServerSettings,
    /// Remote portal settings
    pub portal: PortalSettings,
    /// Assignment listing settings
    pub assignments: AssignmentSettings,
}

impl ServerConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ServerConfig =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` to resolve environment variables.
    ///
    /// Reads the file named by [`CONFIG_PATH_ENV`] if set, then applies
    /// [`BASE_URL_ENV`] on top.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_PATH_ENV).filter(|p| !p.trim().is_empty()) {
            Some(path) => Self::from_file(path.trim())?,
            None => Self::default(),
        };

        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            config.portal.base_url = base_url.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        self.portal.validate()?;

        let limit = self.assignments.default_limit;
        if limit == 0 || limit > MAX_ASSIGNMENT_LIMIT {
            return Err(Error::Config(format!(
                "assignments.default_limit must be between 1 and {MAX_ASSIGNMENT_LIMIT}, got {limit}"
            )));
        }

        Ok(())
    }
}

/// Server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    /// Name advertised to MCP clients
    pub name: String,
    /// Log level (trace, debug, info, warn, error), used when RUST_LOG is unset
    pub log_level: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            name: "mcv-mcp".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Remote portal settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PortalSettings {
    /// Base URL of the portal
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.mycourseville.com".to_string(),
            timeout_secs: 30,
            user_agent: concat!("mcv-mcp/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl PortalSettings {
    /// Parse the base URL.
    pub fn base_url(&self) -> Result<url::Url> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("invalid portal.base_url '{}': {e}", self.base_url)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::Config(format!(
                "portal.base_url must use http or https, got '{other}'"
            ))),
        }
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.timeout_secs == 0 {
            return Err(Error::Config("portal.timeout_secs must be > 0".to_string()));
        }
        Ok(())
    }
}

/// How `mcv_get_assignments` gathers assignments across courses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentSource {
    /// The portal's global "load more assignments" endpoint
    #[default]
    Combined,
    /// One course assignment listing per enrolled course of the current term
    PerCourse,
}

/// Assignment listing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssignmentSettings {
    /// Aggregation strategy
    pub source: AssignmentSource,
    /// Limit applied when the caller does not pass one
    pub default_limit: u32,
}

impl Default for AssignmentSettings {
    fn default() -> Self {
        Self {
            source: AssignmentSource::Combined,
            default_limit: 50,
        }
    }
}

//! Provider configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use fortiform_common::{Error, Result};

use crate::mapper::MapContext;

/// Highest retry count accepted for API calls
pub const MAX_RETRIES: u32 = 10;

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// FortiGate management address
    pub hostname: Option<String>,

    /// REST API token
    pub token: Option<String>,

    /// Skip TLS certificate verification
    pub insecure: bool,

    /// Virtual domain to operate in
    pub vdom: Option<String>,

    /// Retry count handed to the client for every call
    pub retries: u32,

    /// Refresh block fields even when the configuration does not declare them
    pub import_table: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            hostname: None,
            token: None,
            insecure: false,
            vdom: None,
            retries: 1,
            import_table: false,
        }
    }
}

impl ProviderConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Overlay `FORTIOS_*` environment variables
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Overlay variables from an arbitrary lookup
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("FORTIOS_ACCESS_HOSTNAME") {
            self.hostname = Some(v);
        }
        if let Some(v) = lookup("FORTIOS_ACCESS_TOKEN") {
            self.token = Some(v);
        }
        if let Some(v) = lookup("FORTIOS_INSECURE").and_then(|v| parse_flag(&v)) {
            self.insecure = v;
        }
        if let Some(v) = lookup("FORTIOS_VDOM") {
            self.vdom = Some(v);
        }
        if let Some(v) = lookup("FORTIOS_IMPORT_TABLE").and_then(|v| parse_flag(&v)) {
            self.import_table = v;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let has_host = self.hostname.as_deref().is_some_and(|h| !h.is_empty());
        let has_token = self.token.as_deref().is_some_and(|t| !t.is_empty());
        if has_host && !has_token {
            return Err(Error::Config("token is required when hostname is set".to_string()));
        }
        if self.retries > MAX_RETRIES {
            return Err(Error::Config(format!(
                "retries must be at most {}, got {}",
                MAX_RETRIES, self.retries
            )));
        }
        Ok(())
    }

    pub fn map_context(&self) -> MapContext {
        MapContext {
            import_table: self.import_table,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "enable" => Some(true),
        "0" | "false" | "no" | "disable" => Some(false),
        _ => None,
    }
}

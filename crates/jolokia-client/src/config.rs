//! Client configuration.
//!
//! A [`ClientConfig`] can be built in code or loaded from TOML:
//!
//! ```toml
//! service-url = "http://gateway:8778/jolokia"
//! style = "post"
//! timeout-ms = 10000
//!
//! [target]
//! host = "10.0.0.5:9999"
//! user = "monitor"
//! password = "secret"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::request::RequestStyle;

/// Remote JMX endpoint reached through a proxying agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// `host:port` of the remote RMI connector.
    pub host: String,
    /// JMX user name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// JMX password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// HTTP basic credentials for the agent itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub user: String,
    #[serde(default)]
    pub password: String,
}

/// Settings a client is built from. Immutable once the client exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfig {
    /// Service URL. The GET style appends `/jolokia/...` to it; the POST
    /// style posts to it directly, so it usually ends in the agent path.
    pub service_url: String,

    /// Request style.
    #[serde(default)]
    pub style: RequestStyle,

    /// Per-request timeout in milliseconds; transport default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Proxy target; `None` works on the agent's own MBean server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetConfig>,

    /// Agent credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
}

impl ClientConfig {
    /// GET-style configuration for `service_url`.
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            style: RequestStyle::Get,
            timeout_ms: None,
            target: None,
            credentials: None,
        }
    }

    /// `http://<host>:<port>` plus an optional agent path segment.
    pub fn service_url_for(host: &str, port: u16, service: Option<&str>) -> String {
        match service.map(|s| s.trim_matches('/')).filter(|s| !s.is_empty()) {
            Some(service) => format!("http://{}:{}/{}", host, port, service),
            None => format!("http://{}:{}", host, port),
        }
    }

    /// Switch request style.
    pub fn with_style(mut self, style: RequestStyle) -> Self {
        self.style = style;
        self
    }

    /// Proxy every request to `target`. Only the POST style can carry a target.
    pub fn with_target(mut self, target: TargetConfig) -> Self {
        self.target = Some(target);
        self
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| Error::Config(format!("invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Check the settings are consistent.
    pub fn validate(&self) -> Result<()> {
        if self.service_url.trim().is_empty() {
            return Err(Error::Config("service-url is required".to_string()));
        }
        url::Url::parse(&self.service_url)?;
        if self.timeout_ms == Some(0) {
            return Err(Error::Config("timeout-ms must be greater than zero".to_string()));
        }
        if let Some(target) = &self.target {
            if self.style == RequestStyle::Get {
                return Err(Error::Config(
                    "a proxy target requires the post request style".to_string(),
                ));
            }
            if target.host.trim().is_empty() {
                return Err(Error::Config("target host is empty".to_string()));
            }
        }
        Ok(())
    }
}

//! Wire types for the Jolokia protocol.
//!
//! These mirror the JSON shapes a Jolokia agent accepts and returns.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tree-shaped response value, as returned by LIST and multi-attribute READ.
pub type Tree = serde_json::Map<String, serde_json::Value>;

// ─────────────────────────────────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────────────────────────────────

/// Status value an agent reports for a successful request.
pub const STATUS_OK: u16 = 200;

/// Response envelope wrapping every Jolokia result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Status of the request; 200 on success.
    pub status: u16,
    /// Agent timestamp (seconds since the epoch).
    #[serde(default)]
    pub timestamp: u64,
    /// The request as the agent understood it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<serde_json::Value>,
    /// Result value; undefined unless `status` is 200.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<T>,
    /// Error message when `status` is not 200.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Java exception class behind `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl<T> Envelope<T> {
    /// Whether the agent reported success.
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

/// Jolokia operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestType {
    /// Walk the MBean meta-data tree.
    List,
    /// Read one or all attributes of a bean.
    Read,
    /// Invoke a bean operation.
    Exec,
}

impl RequestType {
    /// Path segment used by the GET protocol.
    pub fn as_path(&self) -> &'static str {
        match self {
            RequestType::List => "list",
            RequestType::Read => "read",
            RequestType::Exec => "exec",
        }
    }
}

/// Remote JMX endpoint a proxying agent forwards to.
///
/// All fields empty means the agent works on its own MBean server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// JMX service URL.
    pub url: String,
    /// JMX password.
    pub password: String,
    /// JMX user name.
    pub user: String,
}

/// JSON body of a POST request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JolokiaRequest {
    /// Operation type.
    #[serde(rename = "type")]
    pub request_type: RequestType,
    /// Full MBean name (`domain:key=value`), empty for LIST.
    pub mbean: String,
    /// Path into the result tree (LIST uses it to select domain/bean).
    pub path: String,
    /// Attribute to read; all attributes when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Operation to invoke.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    /// Positional operation arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
    /// Proxy target.
    pub target: Target,
}

// ─────────────────────────────────────────────────────────────────────────────
// Bean selectors
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered property selectors identifying a bean within a domain.
///
/// Selectors are opaque: they are never parsed or reordered, only joined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BeanSelector(Vec<String>);

impl BeanSelector {
    /// Build a selector from parts, keeping their order.
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// The individual selectors.
    pub fn parts(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Selectors joined with `:`.
    pub fn joined(&self) -> String {
        self.0.join(":")
    }

    /// Full MBean name: the domain followed by each selector prefixed with `:`.
    pub fn mbean_name(&self, domain: &str) -> String {
        let mut name = domain.to_string();
        for part in &self.0 {
            name.push(':');
            name.push_str(part);
        }
        name
    }
}

impl fmt::Display for BeanSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

impl From<&str> for BeanSelector {
    fn from(s: &str) -> Self {
        Self(vec![s.to_string()])
    }
}

impl From<String> for BeanSelector {
    fn from(s: String) -> Self {
        Self(vec![s])
    }
}

impl From<&String> for BeanSelector {
    fn from(s: &String) -> Self {
        Self(vec![s.clone()])
    }
}

impl From<Vec<String>> for BeanSelector {
    fn from(parts: Vec<String>) -> Self {
        Self(parts)
    }
}

impl From<&[&str]> for BeanSelector {
    fn from(parts: &[&str]) -> Self {
        Self::new(parts.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for BeanSelector {
    fn from(parts: [&str; N]) -> Self {
        Self::new(parts)
    }
}

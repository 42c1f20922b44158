//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::config::{ClientConfig, Credentials, TargetConfig};
use crate::error::{Error, Result};
use crate::request::{target_for, Query, RequestStyle};
use crate::response::{decode_scalar, decode_tree, sorted_keys, sub_tree, ATTR_KEY, OP_KEY};
use crate::transport::Transport;
use crate::types::{BeanSelector, Target, Tree};

/// Jolokia agent client.
///
/// Cheap to clone; clones share one HTTP client and the same immutable
/// configuration, so a client can be used from many tasks at once.
///
/// # Example
///
/// ```no_run
/// use jolokia_client::JolokiaClient;
///
/// # async fn example() -> jolokia_client::Result<()> {
/// let client = JolokiaClient::builder()
///     .service_url("http://localhost:7025")
///     .build()?;
///
/// for domain in client.list_domains().await? {
///     println!("{}", domain);
/// }
/// let peak = client
///     .get_attr("java.lang", "type=Threading", "PeakThreadCount")
///     .await?;
/// println!("peak threads: {}", peak);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct JolokiaClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
struct ClientInner {
    transport: Transport,
    config: ClientConfig,
    /// Wire form of `config.target`, computed once.
    target: Target,
}

impl JolokiaClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client from a complete configuration.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let timeout = config.timeout_ms.map(Duration::from_millis);
        let transport = Transport::new(timeout, config.credentials.clone())?;
        let target = target_for(config.target.as_ref());
        Ok(Self {
            inner: Arc::new(ClientInner {
                transport,
                config,
                target,
            }),
        })
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The request style in use.
    pub fn style(&self) -> RequestStyle {
        self.inner.config.style
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Listing
    // ─────────────────────────────────────────────────────────────────────────

    /// All domain names, sorted.
    pub async fn list_domains(&self) -> Result<Vec<String>> {
        let query = Query::ListDomains;
        self.tree("list_domains", &query)
            .await
            .map(|tree| sorted_keys(&tree))
    }

    /// Bean selectors of `domain`, sorted.
    pub async fn list_beans(&self, domain: &str) -> Result<Vec<String>> {
        let query = Query::ListBeans { domain };
        self.tree("list_beans", &query)
            .await
            .map(|tree| sorted_keys(&tree))
    }

    /// Attribute names of a bean, sorted.
    pub async fn list_properties(
        &self,
        domain: &str,
        bean: impl Into<BeanSelector>,
    ) -> Result<Vec<String>> {
        self.describe_keys("list_properties", domain, &bean.into(), ATTR_KEY)
            .await
    }

    /// Operation names of a bean, sorted.
    pub async fn list_operations(
        &self,
        domain: &str,
        bean: impl Into<BeanSelector>,
    ) -> Result<Vec<String>> {
        self.describe_keys("list_operations", domain, &bean.into(), OP_KEY)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reading and executing
    // ─────────────────────────────────────────────────────────────────────────

    /// Value of one attribute.
    pub async fn get_attr(
        &self,
        domain: &str,
        bean: impl Into<BeanSelector>,
        attribute: &str,
    ) -> Result<Value> {
        let bean = bean.into();
        let query = Query::Read {
            domain,
            bean: &bean,
            attribute: Some(attribute),
        };
        self.scalar("get_attr", &query).await
    }

    /// Every attribute of a bean, keyed by attribute name.
    pub async fn read_attributes(
        &self,
        domain: &str,
        bean: impl Into<BeanSelector>,
    ) -> Result<Tree> {
        let bean = bean.into();
        let query = Query::Read {
            domain,
            bean: &bean,
            attribute: None,
        };
        self.tree("read_attributes", &query).await
    }

    /// Invoke an operation with positional arguments and return its result.
    pub async fn exec_op<S: AsRef<str>>(
        &self,
        domain: &str,
        bean: impl Into<BeanSelector>,
        operation: &str,
        arguments: &[S],
    ) -> Result<Value> {
        let bean = bean.into();
        let arguments: Vec<String> = arguments.iter().map(|a| a.as_ref().to_string()).collect();
        let query = Query::Exec {
            domain,
            bean: &bean,
            operation,
            arguments: &arguments,
        };
        self.scalar("exec_op", &query).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal round trips
    // ─────────────────────────────────────────────────────────────────────────

    async fn describe_keys(
        &self,
        operation: &'static str,
        domain: &str,
        bean: &BeanSelector,
        key: &str,
    ) -> Result<Vec<String>> {
        let query = Query::DescribeBean { domain, bean };
        let tree = self.tree(operation, &query).await?;
        sub_tree(&tree, key)
            .map(sorted_keys)
            .map_err(|e| e.in_operation(operation, query.subject()))
    }

    async fn tree(&self, operation: &'static str, query: &Query<'_>) -> Result<Tree> {
        self.round_trip(query)
            .await
            .and_then(|body| decode_tree(&body))
            .map_err(|e| e.in_operation(operation, query.subject()))
    }

    async fn scalar(&self, operation: &'static str, query: &Query<'_>) -> Result<Value> {
        self.round_trip(query)
            .await
            .and_then(|body| decode_scalar(&body))
            .map_err(|e| e.in_operation(operation, query.subject()))
    }

    async fn round_trip(&self, query: &Query<'_>) -> Result<Vec<u8>> {
        let inner = &self.inner;
        let request = inner
            .config
            .style
            .prepare(&inner.config.service_url, &inner.target, query);
        let response = inner.transport.send(&request).await?;
        Ok(response.body)
    }
}

/// Builder for creating a JolokiaClient.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    service_url: Option<String>,
    style: Option<RequestStyle>,
    target: Option<TargetConfig>,
    credentials: Option<Credentials>,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the agent service URL.
    pub fn service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = Some(url.into());
        self
    }

    /// Set the request style. Defaults to GET, or POST once a target is set.
    pub fn style(mut self, style: RequestStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Proxy requests to the JMX agent at `host` (`host:port`).
    pub fn target(mut self, host: impl Into<String>) -> Self {
        self.target.get_or_insert_with(TargetConfig::default).host = host.into();
        self
    }

    /// Set the JMX credentials of the proxy target.
    pub fn target_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        let target = self.target.get_or_insert_with(TargetConfig::default);
        target.user = Some(user.into());
        target.password = Some(password.into());
        self
    }

    /// Set HTTP basic credentials for the agent itself.
    pub fn credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            user: user.into(),
            password: password.into(),
        });
        self
    }

    /// Set the request timeout. Kept at millisecond precision; must be at
    /// least one millisecond.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<JolokiaClient> {
        let service_url = self
            .service_url
            .ok_or_else(|| Error::Config("service_url is required".to_string()))?;

        let style = self.style.unwrap_or(if self.target.is_some() {
            RequestStyle::Post
        } else {
            RequestStyle::Get
        });

        let config = ClientConfig {
            service_url,
            style,
            timeout_ms: self
                .timeout
                .map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX)),
            target: self.target,
            credentials: self.credentials,
        };
        JolokiaClient::from_config(config)
    }
}

//! Client for the Jolokia HTTP/JSON bridge to JMX.
//!
//! Jolokia exposes the MBeans of a JVM over plain HTTP. This crate maps typed
//! calls onto the two request styles agents understand and decodes the JSON
//! envelope that comes back.
//!
//! # Example
//!
//! ```no_run
//! use jolokia_client::{JolokiaClient, Result};
//!
//! # async fn example() -> Result<()> {
//! // Talk to an agent directly, GET style
//! let client = JolokiaClient::builder()
//!     .service_url("http://localhost:7025")
//!     .build()?;
//!
//! for bean in client.list_beans("java.lang").await? {
//!     for attr in client.list_properties("java.lang", bean.as_str()).await? {
//!         let value = client.get_attr("java.lang", bean.as_str(), &attr).await?;
//!         println!("java.lang,{},{} = {}", bean, attr, value);
//!     }
//! }
//!
//! // Go through a proxy agent to a remote JMX connector, POST style
//! let proxy = JolokiaClient::builder()
//!     .service_url("http://gateway:8778/jolokia")
//!     .target("10.0.0.5:9999")
//!     .target_credentials("monitor", "secret")
//!     .build()?;
//! let uptime = proxy.get_attr("java.lang", "type=Runtime", "Uptime").await?;
//! println!("uptime: {}", uptime);
//! # Ok(())
//! # }
//! ```
//!
//! # Request styles
//!
//! - **GET**: everything in the path, `<service>/jolokia/<type>/...`
//! - **POST**: a JSON body sent to the agent URL; the only style that can
//!   carry a proxy target
//!
//! Both styles share the same envelope decoding, so every call behaves the
//! same whichever style a client is configured with.

pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;

pub use client::{ClientBuilder, JolokiaClient};
pub use config::{ClientConfig, Credentials, TargetConfig};
pub use error::{Error, Result};
pub use request::RequestStyle;
pub use types::*;

//! Request construction for both Jolokia request styles.
//!
//! Everything here is pure: a [`Query`] plus the client's fixed settings turn
//! into a [`PreparedRequest`] without touching the network.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::config::TargetConfig;
use crate::types::{BeanSelector, JolokiaRequest, RequestType, Target};

/// Path prefix of the GET protocol, relative to the service URL.
pub const GET_PREFIX: &str = "/jolokia";

/// LIST depth returning only the immediate children (domains or beans).
pub const DEPTH_NAMES: u32 = 1;

/// LIST depth reaching a bean's `attr` and `op` sub-trees.
pub const DEPTH_DETAIL: u32 = 2;

/// How requests are put on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStyle {
    /// Everything encoded in the GET path under `<service>/jolokia/...`.
    #[default]
    Get,
    /// JSON body POSTed to the agent URL; supports proxy targets.
    Post,
}

/// One facade call, independent of how it is encoded.
#[derive(Debug, Clone, Copy)]
pub enum Query<'a> {
    /// All domain names.
    ListDomains,
    /// All bean selectors of a domain.
    ListBeans { domain: &'a str },
    /// Meta-data (`attr`, `op`) of one bean.
    DescribeBean {
        domain: &'a str,
        bean: &'a BeanSelector,
    },
    /// One attribute, or every attribute when `attribute` is `None`.
    Read {
        domain: &'a str,
        bean: &'a BeanSelector,
        attribute: Option<&'a str>,
    },
    /// Operation invocation with positional arguments.
    Exec {
        domain: &'a str,
        bean: &'a BeanSelector,
        operation: &'a str,
        arguments: &'a [String],
    },
}

impl Query<'_> {
    pub fn request_type(&self) -> RequestType {
        match self {
            Query::ListDomains | Query::ListBeans { .. } | Query::DescribeBean { .. } => {
                RequestType::List
            }
            Query::Read { .. } => RequestType::Read,
            Query::Exec { .. } => RequestType::Exec,
        }
    }

    /// `maxDepth` sent with LIST queries.
    pub fn max_depth(&self) -> Option<u32> {
        match self {
            Query::ListDomains | Query::ListBeans { .. } => Some(DEPTH_NAMES),
            Query::DescribeBean { .. } => Some(DEPTH_DETAIL),
            Query::Read { .. } | Query::Exec { .. } => None,
        }
    }

    /// Human-readable name of what the query is about, for error context.
    pub fn subject(&self) -> String {
        match self {
            Query::ListDomains => "<all domains>".to_string(),
            Query::ListBeans { domain } => (*domain).to_string(),
            Query::DescribeBean { domain, bean } => format!("{}/{}", domain, bean),
            Query::Read {
                domain,
                bean,
                attribute: Some(attribute),
            } => format!("{}/{}", bean.mbean_name(domain), attribute),
            Query::Read { domain, bean, .. } => bean.mbean_name(domain),
            Query::Exec {
                domain,
                bean,
                operation,
                ..
            } => format!("{}/{}", bean.mbean_name(domain), operation),
        }
    }
}

/// A request ready for the transport.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<JolokiaRequest>,
}

impl RequestStyle {
    /// Encode `query` against `base` (the configured service URL).
    pub fn prepare(self, base: &str, target: &Target, query: &Query<'_>) -> PreparedRequest {
        let base = base.trim_end_matches('/');
        match self {
            RequestStyle::Get => PreparedRequest {
                method: Method::GET,
                url: format!("{}{}", base, get_path(query)),
                body: None,
            },
            RequestStyle::Post => {
                let url = match query.max_depth() {
                    Some(depth) => format!("{}/?maxDepth={}", base, depth),
                    None => base.to_string(),
                };
                PreparedRequest {
                    method: Method::POST,
                    url,
                    body: Some(post_body(query, target.clone())),
                }
            }
        }
    }
}

/// Path and query string of a GET request, starting at `/jolokia`.
///
/// Components are concatenated as given; arguments containing `/` are the
/// caller's problem.
pub fn get_path(query: &Query<'_>) -> String {
    let kind = query.request_type().as_path();
    let mut path = match query {
        Query::ListDomains => format!("{}/{}", GET_PREFIX, kind),
        Query::ListBeans { domain } => format!("{}/{}/{}", GET_PREFIX, kind, domain),
        Query::DescribeBean { domain, bean } => {
            format!("{}/{}/{}/{}", GET_PREFIX, kind, domain, bean.joined())
        }
        Query::Read {
            domain,
            bean,
            attribute,
        } => {
            let mut path = format!("{}/{}/{}", GET_PREFIX, kind, bean.mbean_name(domain));
            if let Some(attribute) = attribute {
                path.push('/');
                path.push_str(attribute);
            }
            path
        }
        Query::Exec {
            domain,
            bean,
            operation,
            arguments,
        } => {
            let mut path = format!(
                "{}/{}/{}/{}",
                GET_PREFIX,
                kind,
                bean.mbean_name(domain),
                operation
            );
            for arg in arguments.iter() {
                path.push('/');
                path.push_str(arg);
            }
            path
        }
    };
    if let Some(depth) = query.max_depth() {
        path.push_str(&format!("?maxDepth={}", depth));
    }
    path
}

/// JSON body of a POST request.
pub fn post_body(query: &Query<'_>, target: Target) -> JolokiaRequest {
    let mut request = JolokiaRequest {
        request_type: query.request_type(),
        mbean: String::new(),
        path: String::new(),
        attribute: None,
        operation: None,
        arguments: Vec::new(),
        target,
    };
    match *query {
        Query::ListDomains => {}
        Query::ListBeans { domain } => request.path = domain.to_string(),
        Query::DescribeBean { domain, bean } => {
            request.path = format!("{}/{}", domain, bean.joined());
        }
        Query::Read {
            domain,
            bean,
            attribute,
        } => {
            request.mbean = bean.mbean_name(domain);
            request.attribute = attribute.map(str::to_string);
        }
        Query::Exec {
            domain,
            bean,
            operation,
            arguments,
        } => {
            request.mbean = bean.mbean_name(domain);
            request.operation = Some(operation.to_string());
            request.arguments = arguments.to_vec();
        }
    }
    request
}

/// JMX service URL of an RMI connector at `host:port`; empty for an empty host.
pub fn jmx_service_url(host: &str) -> String {
    if host.is_empty() {
        return String::new();
    }
    format!("service:jmx:rmi:///jndi/rmi://{}/jmxrmi", host)
}

/// Wire target for an optional proxy configuration.
pub fn target_for(config: Option<&TargetConfig>) -> Target {
    match config {
        Some(config) => Target {
            url: jmx_service_url(&config.host),
            user: config.user.clone().unwrap_or_default(),
            password: config.password.clone().unwrap_or_default(),
        },
        None => Target::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "http://localhost:7025";

    fn threading() -> BeanSelector {
        BeanSelector::from("type=Threading")
    }

    #[test]
    fn test_get_list_urls_carry_depth() {
        let bean = BeanSelector::from("type=Memory");
        let target = Target::default();

        let domains = RequestStyle::Get.prepare(BASE, &target, &Query::ListDomains);
        assert_eq!(domains.method, Method::GET);
        assert_eq!(domains.url, "http://localhost:7025/jolokia/list?maxDepth=1");
        assert!(domains.body.is_none());

        let beans = RequestStyle::Get.prepare(BASE, &target, &Query::ListBeans { domain: "java.lang" });
        assert_eq!(beans.url, "http://localhost:7025/jolokia/list/java.lang?maxDepth=1");

        let detail = RequestStyle::Get.prepare(
            BASE,
            &target,
            &Query::DescribeBean {
                domain: "java.lang",
                bean: &bean,
            },
        );
        assert_eq!(
            detail.url,
            "http://localhost:7025/jolokia/list/java.lang/type=Memory?maxDepth=2"
        );
    }

    #[test]
    fn test_get_read_path() {
        let bean = threading();
        let path = get_path(&Query::Read {
            domain: "java.lang",
            bean: &bean,
            attribute: Some("PeakThreadCount"),
        });
        assert_eq!(path, "/jolokia/read/java.lang:type=Threading/PeakThreadCount");

        let all = get_path(&Query::Read {
            domain: "java.lang",
            bean: &bean,
            attribute: None,
        });
        assert_eq!(all, "/jolokia/read/java.lang:type=Threading");
    }

    #[test]
    fn test_get_exec_path_keeps_argument_order() {
        let bean = BeanSelector::from("type=Rules");
        let args = vec!["1".to_string(), "2".to_string()];
        let path = get_path(&Query::Exec {
            domain: "com.example",
            bean: &bean,
            operation: "getRule",
            arguments: &args,
        });
        assert_eq!(path, "/jolokia/exec/com.example:type=Rules/getRule/1/2");
    }

    #[test]
    fn test_trailing_slash_on_base_is_dropped() {
        let req = RequestStyle::Get.prepare(
            "http://localhost:7025/",
            &Target::default(),
            &Query::ListDomains,
        );
        assert_eq!(req.url, "http://localhost:7025/jolokia/list?maxDepth=1");
    }

    #[test]
    fn test_jmx_service_url() {
        assert_eq!(
            jmx_service_url("10.0.0.5:9999"),
            "service:jmx:rmi:///jndi/rmi://10.0.0.5:9999/jmxrmi"
        );
        assert_eq!(jmx_service_url(""), "");
    }

    #[test]
    fn test_target_for_proxy_config() {
        let config = TargetConfig {
            host: "10.0.0.5:9999".to_string(),
            user: Some("monitor".to_string()),
            password: Some("s3cret".to_string()),
        };
        let target = target_for(Some(&config));
        assert_eq!(target.url, "service:jmx:rmi:///jndi/rmi://10.0.0.5:9999/jmxrmi");
        assert_eq!(target.user, "monitor");
        assert_eq!(target.password, "s3cret");

        assert_eq!(target_for(None), Target::default());
    }

    #[test]
    fn test_post_list_domains_body() {
        let req = RequestStyle::Post.prepare(
            "http://agent:8778/jolokia",
            &Target::default(),
            &Query::ListDomains,
        );
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.url, "http://agent:8778/jolokia/?maxDepth=1");
        assert_eq!(
            serde_json::to_value(req.body.unwrap()).unwrap(),
            json!({
                "type": "LIST",
                "mbean": "",
                "path": "",
                "target": {"url": "", "user": "", "password": ""}
            })
        );
    }

    #[test]
    fn test_post_read_body_with_attribute_and_target() {
        let bean = BeanSelector::from(["type=GarbageCollector", "name=PS Scavenge"]);
        let target = target_for(Some(&TargetConfig {
            host: "10.0.0.5:9999".to_string(),
            user: None,
            password: None,
        }));
        let req = RequestStyle::Post.prepare(
            "http://agent:8778/jolokia",
            &target,
            &Query::Read {
                domain: "java.lang",
                bean: &bean,
                attribute: Some("CollectionCount"),
            },
        );
        assert_eq!(req.url, "http://agent:8778/jolokia");
        assert_eq!(
            serde_json::to_value(req.body.unwrap()).unwrap(),
            json!({
                "type": "READ",
                "mbean": "java.lang:type=GarbageCollector:name=PS Scavenge",
                "path": "",
                "attribute": "CollectionCount",
                "target": {
                    "url": "service:jmx:rmi:///jndi/rmi://10.0.0.5:9999/jmxrmi",
                    "user": "",
                    "password": ""
                }
            })
        );
    }

    #[test]
    fn test_post_read_without_attribute_omits_key() {
        let bean = threading();
        let body = post_body(
            &Query::Read {
                domain: "java.lang",
                bean: &bean,
                attribute: None,
            },
            Target::default(),
        );
        let value = serde_json::to_value(body).unwrap();
        assert!(value.get("attribute").is_none());
        assert_eq!(value["mbean"], "java.lang:type=Threading");
    }

    #[test]
    fn test_post_describe_and_exec_bodies() {
        let bean = threading();
        let detail = post_body(
            &Query::DescribeBean {
                domain: "java.lang",
                bean: &bean,
            },
            Target::default(),
        );
        assert_eq!(detail.request_type, RequestType::List);
        assert_eq!(detail.path, "java.lang/type=Threading");

        let args = vec!["42".to_string()];
        let exec = post_body(
            &Query::Exec {
                domain: "java.lang",
                bean: &bean,
                operation: "getThreadCpuTime",
                arguments: &args,
            },
            Target::default(),
        );
        let value = serde_json::to_value(exec).unwrap();
        assert_eq!(value["type"], "EXEC");
        assert_eq!(value["operation"], "getThreadCpuTime");
        assert_eq!(value["arguments"], json!(["42"]));
    }

    #[test]
    fn test_query_subjects() {
        let bean = threading();
        assert_eq!(
            Query::Read {
                domain: "java.lang",
                bean: &bean,
                attribute: Some("PeakThreadCount"),
            }
            .subject(),
            "java.lang:type=Threading/PeakThreadCount"
        );
        assert_eq!(Query::ListBeans { domain: "java.lang" }.subject(), "java.lang");
    }
}

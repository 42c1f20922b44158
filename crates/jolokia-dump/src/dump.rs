//! Walk an agent's MBean tree and print every attribute value.

use std::io::Write;

use jolokia_client::JolokiaClient;
use serde::Serialize;
use serde_json::Value;

/// How values are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `domain,bean,attribute = value`
    Text,
    /// One JSON object per line.
    Json,
}

/// Counters reported once the walk is done.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DumpStats {
    pub domains: usize,
    pub beans: usize,
    pub values: usize,
    /// Beans or attributes that failed and were left out.
    pub skipped: usize,
}

/// Why a dump stopped early.
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("Unable to get domains: {0}")]
    Domains(#[source] jolokia_client::Error),

    #[error("Unable to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl DumpError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            DumpError::Domains(_) => EXIT_NO_DOMAINS,
            DumpError::Output(_) => EXIT_OUTPUT,
        }
    }
}

/// Exit code when the domain list cannot be fetched.
pub const EXIT_NO_DOMAINS: u8 = 2;

/// Exit code when stdout cannot be written.
pub const EXIT_OUTPUT: u8 = 3;

#[derive(Serialize)]
struct Line<'a> {
    domain: &'a str,
    bean: &'a str,
    property: &'a str,
    value: &'a Value,
}

/// Dump everything reachable through `client` into `out`.
///
/// Only a failure to list the domains or to write `out` is fatal; a bean or
/// attribute that cannot be read is logged and skipped.
pub async fn run<W: Write>(
    client: &JolokiaClient,
    format: OutputFormat,
    out: &mut W,
) -> Result<DumpStats, DumpError> {
    let domains = client.list_domains().await.map_err(DumpError::Domains)?;
    let mut stats = DumpStats {
        domains: domains.len(),
        ..Default::default()
    };

    for domain in &domains {
        let beans = match client.list_beans(domain).await {
            Ok(beans) => beans,
            Err(e) => {
                tracing::warn!(domain = %domain, error = %e, "Unable to get beans");
                stats.skipped += 1;
                continue;
            }
        };

        for bean in &beans {
            stats.beans += 1;
            let props = match client.list_properties(domain, bean).await {
                Ok(props) => props,
                Err(e) => {
                    tracing::warn!(domain = %domain, bean = %bean, error = %e, "Unable to get properties");
                    stats.skipped += 1;
                    continue;
                }
            };

            for prop in &props {
                match client.get_attr(domain, bean, prop).await {
                    Ok(value) => {
                        write_value(out, format, domain, bean, prop, &value)?;
                        stats.values += 1;
                    }
                    Err(e) => {
                        tracing::warn!(
                            domain = %domain,
                            bean = %bean,
                            property = %prop,
                            error = %e,
                            "Unable to get value"
                        );
                        stats.skipped += 1;
                    }
                }
            }
        }
    }

    out.flush()?;
    Ok(stats)
}

fn write_value<W: Write>(
    out: &mut W,
    format: OutputFormat,
    domain: &str,
    bean: &str,
    property: &str,
    value: &Value,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Text => writeln!(
            out,
            "{},{},{} = {}",
            domain,
            bean,
            property,
            display_value(value)
        ),
        OutputFormat::Json => {
            let line = Line {
                domain,
                bean,
                property,
                value,
            };
            serde_json::to_writer(&mut *out, &line)?;
            writeln!(out)
        }
    }
}

/// Strings print bare; everything else prints as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

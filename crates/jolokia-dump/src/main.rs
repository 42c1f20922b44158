//! jolokia-dump - print every readable MBean attribute of a Jolokia agent.
//!
//! Walks domains → beans → attributes and prints one
//! `domain,bean,attribute = value` line per readable attribute.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use jolokia_client::{ClientConfig, Credentials, JolokiaClient, RequestStyle, TargetConfig};

mod dump;

use dump::OutputFormat;

/// Exit code for invalid settings.
const EXIT_CONFIG: u8 = 1;

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Dump every readable MBean attribute of a Jolokia agent
#[derive(Parser, Debug)]
#[command(name = "jolokia-dump")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Agent host
    #[arg(required_unless_present = "config")]
    pub host: Option<String>,

    /// Agent port
    #[arg(required_unless_present = "config")]
    pub port: Option<u16>,

    /// Agent path, used by the post style (http://<host>:<port>/<service>)
    #[arg(default_value = "jolokia")]
    pub service: String,

    /// Remote JMX host to proxy to (implies --style post)
    #[arg(long, requires = "target_port")]
    pub target_host: Option<String>,

    /// Remote JMX port to proxy to
    #[arg(long, requires = "target_host")]
    pub target_port: Option<u16>,

    /// Remote JMX user
    #[arg(long, env = "JOLOKIA_TARGET_USER")]
    pub target_user: Option<String>,

    /// Remote JMX password
    #[arg(long, env = "JOLOKIA_TARGET_PASSWORD", hide_env_values = true)]
    pub target_password: Option<String>,

    /// Agent user (HTTP basic auth)
    #[arg(long, env = "JOLOKIA_USER")]
    pub user: Option<String>,

    /// Agent password (HTTP basic auth)
    #[arg(long, env = "JOLOKIA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Request style
    #[arg(long, value_enum)]
    pub style: Option<StyleArg>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Load client settings from a TOML file instead of the arguments
    #[arg(long, conflicts_with_all = ["host", "port"])]
    pub config: Option<PathBuf>,

    /// Output one JSON object per value
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Request style argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StyleArg {
    /// GET requests under <host>:<port>/jolokia
    Get,
    /// JSON POST requests to <host>:<port>/<service>
    Post,
}

impl From<StyleArg> for RequestStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Get => RequestStyle::Get,
            StyleArg::Post => RequestStyle::Post,
        }
    }
}

impl Cli {
    /// Client settings described by the arguments.
    fn client_config(&self) -> Result<ClientConfig> {
        if let Some(path) = &self.config {
            return ClientConfig::load(path)
                .with_context(|| format!("loading {}", path.display()));
        }

        let host = self.host.as_deref().context("host is required")?;
        let port = self.port.context("port is required")?;

        let target = match (&self.target_host, self.target_port) {
            (Some(target_host), Some(target_port)) => Some(TargetConfig {
                host: format!("{}:{}", target_host, target_port),
                user: self.target_user.clone(),
                password: self.target_password.clone(),
            }),
            _ => None,
        };

        let style = match (self.style, &target) {
            (Some(style), _) => style.into(),
            (None, Some(_)) => RequestStyle::Post,
            (None, None) => RequestStyle::Get,
        };

        let service_url = match style {
            RequestStyle::Get => ClientConfig::service_url_for(host, port, None),
            RequestStyle::Post => ClientConfig::service_url_for(host, port, Some(&self.service)),
        };

        let mut config = ClientConfig::new(service_url).with_style(style);
        config.target = target;
        config.timeout_ms = self.timeout.map(|secs| secs.saturating_mul(1000));
        config.credentials = self.user.as_ref().map(|user| Credentials {
            user: user.clone(),
            password: self.password.clone().unwrap_or_default(),
        });
        Ok(config)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the dump.
    let filter = if cli.verbose {
        "jolokia_dump=debug,jolokia_client=debug,warn"
    } else {
        "jolokia_dump=info,jolokia_client=error,warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(cli.verbose)
        .init();

    let client = match cli
        .client_config()
        .and_then(|config| JolokiaClient::from_config(config).map_err(Into::into))
    {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Invalid settings: {:#}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match dump::run(&client, format, &mut out).await {
        Ok(stats) => {
            tracing::info!(
                domains = stats.domains,
                beans = stats.beans,
                values = stats.values,
                skipped = stats.skipped,
                "Dump complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

// src/config.rs

use std::time::Duration;

use clap::Parser;
use url::Url;

/// Terminal dashboard for the SSL test portal scanning service
#[derive(Parser, Debug)]
#[command(name = "ssl-portal-tui", version, about = "Drive and review TLS/SSL scans from the terminal")]
pub struct Args {
    /// Base URL of the scanning service REST API
    #[arg(long = "api-url", env = "SSL_PORTAL_API_URL", default_value = "http://localhost:8000/api")]
    pub api_url: Url,

    /// Status polling interval in milliseconds
    #[arg(
        long = "poll-interval",
        value_name = "MS",
        env = "SSL_PORTAL_POLL_INTERVAL_MS",
        default_value_t = 2000,
        value_parser = clap::value_parser!(u64).range(100..)
    )]
    pub poll_interval_ms: u64,

    /// HTTP request timeout in seconds
    #[arg(long = "timeout", value_name = "SECS", env = "SSL_PORTAL_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Pre-fill the host field
    #[arg(long = "host", value_name = "HOST")]
    pub host: Option<String>,

    /// Pre-fill the port field
    #[arg(short = 'p', long = "port", value_name = "PORT", default_value_t = 443)]
    pub port: u16,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub initial_host: String,
    pub initial_port: u16,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            api_url: args.api_url,
            poll_interval: Duration::from_millis(args.poll_interval_ms),
            request_timeout: Duration::from_secs(args.timeout_secs.max(1)),
            initial_host: args.host.unwrap_or_default(),
            initial_port: args.port,
        }
    }
}

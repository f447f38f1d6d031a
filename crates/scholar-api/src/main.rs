//! Scholar API - Entry Point

use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use scholar_api::config::{Config, server};
use scholar_api::{GoogleScholarClient, ScholarServer};

#[derive(Parser, Debug)]
#[command(name = "scholar-api")]
#[command(about = "HTTP endpoint returning the top Google Scholar papers for a research field")]
#[command(version)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = server::DEFAULT_HOST, env = "HOST")]
    host: IpAddr,

    /// HTTP server port
    #[arg(long, default_value_t = server::DEFAULT_PORT, env = "PORT")]
    port: u16,

    /// Google Scholar base URL (override for proxies or mock servers)
    #[arg(long, env = "SCHOLAR_BASE_URL")]
    scholar_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let mut config = Config::from_env()?;
    if let Some(url) = cli.scholar_url {
        config.scholar_url = url.trim_end_matches('/').to_string();
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        scholar_url = %config.scholar_url,
        "Starting Scholar API server"
    );

    let client = GoogleScholarClient::new(config)?;
    let app = ScholarServer::with_client(client);

    app.run_http(SocketAddr::new(cli.host, cli.port)).await
}

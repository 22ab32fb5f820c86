use clap::Parser;
use gridpay::config::{DEFAULT_BIAS_WINDOW, DEFAULT_HOST, DEFAULT_PORT, ServerConfig};
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "GRIDPAY_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port to listen on
    #[arg(long, env = "GRIDPAY_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
        bias_window: DEFAULT_BIAS_WINDOW,
    };

    gridpay::start_server(config).await.into_diagnostic()?;

    Ok(())
}

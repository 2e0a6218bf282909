use anyhow::Result;
use clap::Parser;
use market_analyzer::cli::{handle_command, Cli};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging first
    Registry::default()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or(EnvFilter::new("market_analyzer=info,rocket::server=off")),
        )
        .init();

    let cli = Cli::parse();
    handle_command(cli).await
}

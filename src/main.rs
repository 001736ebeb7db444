//! market-scout - Interactive Entry Point
//!
//! Reads one business idea from stdin, researches it, prints the
//! completed questionnaire.

use market_scout::{agent::Agent, config::Config, driver};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Credentials and runtime settings may live in a .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "market_scout=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration: model={}", config.model);

    let agent = Agent::new(config);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    driver::run(&agent, &mut stdin.lock(), &mut stdout.lock()).await
}

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use social_topics::build_controller;
use social_topics::config::Config;
use social_topics::session::Session;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays the interactive surface
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();
    let controller = build_controller(&config)?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut session = Session::new(controller, stdin);
    session.run().await?;

    tracing::info!("main: Session closed");
    Ok(())
}

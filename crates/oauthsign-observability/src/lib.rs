use eyre::Context;
use std::env;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    Layer, Registry,
    filter::{LevelFilter, Targets},
    layer::SubscriberExt,
};

/// Environment variable the log filter is read from
pub const FILTER_ENV: &str = "RUST_LOG";

fn targets(filter: Option<&str>) -> Targets {
    filter
        .ok_or_else(|| eyre::eyre!("No filter set"))
        .and_then(|targets| targets.parse().context("Failed to parse RUST_LOG value"))
        .unwrap_or_else(|_| Targets::default().with_default(LevelFilter::INFO))
}

/// Install the global tracing subscriber
///
/// Logs are written to stderr so they don't mix with the output of the CLI
pub fn initialise() -> eyre::Result<()> {
    let env_filter = targets(env::var(FILTER_ENV).ok().as_deref());

    let subscriber = Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(env_filter),
        )
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(subscriber)
        .context("Couldn't install the global tracing subscriber")?;

    Ok(())
}

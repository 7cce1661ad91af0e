use anyhow::{Context, Result};
use delivered_export::app::App;
use delivered_export::client::{S3Storage, SnsNotifier};
use delivered_export::clock::SystemClock;
use delivered_export::conf::{aws_service_config, Settings};
use delivered_export::trigger::Locator;
use std::env::var;
use std::sync::Arc;

/// Export the delivered records of a single object, given as `BUCKET`
/// and `KEY`, exactly as if it had just been created.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
    let settings = Settings::from_env()?;
    let config = aws_service_config().await;
    let app = App::new(
        settings,
        Arc::new(S3Storage::new(&config)),
        Arc::new(SnsNotifier::new(&config)),
        Arc::new(SystemClock),
    );

    let locator = Locator {
        bucket: var("BUCKET").context("BUCKET is required")?,
        key: var("KEY").context("KEY is required")?,
    };
    let response = app.handle(locator.to_event()).await;
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

use anyhow::{anyhow, Result};
use delivered_export::app::{App, Response};
use delivered_export::client::{S3Storage, SnsNotifier};
use delivered_export::clock::SystemClock;
use delivered_export::conf::{aws_service_config, Settings};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;

/// Run an AWS Lambda function that listens to S3 object creation
/// events, exports the delivered records of each new file as CSV, and
/// notifies an SNS topic about it.
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

    let app = &app;
    run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<Response, Error>(app.handle(event.payload).await)
    }))
    .await
    .map_err(|e| anyhow!("{:?}", e))
}

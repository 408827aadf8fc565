mod event;

pub use event::{invoke, InvocationEvent, InvocationResponse};

use clap::Parser;
use notice_ai::config::{AppConfig, LogTarget};
use notice_ai::error::AppError;
use notice_ai::model::{GeminiClient, GenerativeModel};
use notice_ai::service::NoticeService;
use notice_ai::telemetry;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

#[derive(Parser, Debug)]
#[command(
    name = "Campus Notice Function",
    about = "Handle one campus notice API invocation event and print the response envelope",
    version
)]
struct Cli {
    /// Read the invocation event from this file instead of stdin
    #[arg(long)]
    event: Option<PathBuf>,
}

pub async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    config.telemetry.target = LogTarget::Stderr;
    telemetry::init(&config.telemetry)?;

    let raw = match cli.event {
        Some(path) => tokio::fs::read(path).await?,
        None => {
            let mut buffer = Vec::new();
            tokio::io::stdin().read_to_end(&mut buffer).await?;
            buffer
        }
    };
    let event: InvocationEvent = serde_json::from_slice(&raw)?;

    let model: Arc<dyn GenerativeModel> = Arc::new(GeminiClient::new(config.model.clone()));
    let service = NoticeService::new(model);
    let response = invoke(&service, &config.cors, event).await;

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(serde_json::to_string(&response)?.as_bytes())
        .await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}

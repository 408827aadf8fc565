use crate::server;
use clap::{Args, Parser, Subcommand};
use notice_ai::config::{AppConfig, LogTarget};
use notice_ai::error::AppError;
use notice_ai::model::GeminiClient;
use notice_ai::notices::{analysis_envelope, ClassifyError, NoticeClassifier, NoticeSubmission};
use notice_ai::telemetry;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "Campus Notice API",
    about = "Serve the campus notice classification API or classify a notice from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Classify a single notice with the configured model and print the result
    Classify(ClassifyArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Notice title
    #[arg(long)]
    pub(crate) title: String,
    /// Notice body text
    #[arg(long)]
    pub(crate) content: String,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Classify(args) => run_classify(args).await,
    }
}

async fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    config.telemetry.target = LogTarget::Stderr;
    telemetry::init(&config.telemetry)?;

    let submission =
        NoticeSubmission::new(args.title, args.content).ok_or(ClassifyError::Validation)?;
    let classifier = NoticeClassifier::new(Arc::new(GeminiClient::new(config.model)));
    let analysis = classifier.classify(&submission).await?;

    println!(
        "{}",
        serde_json::to_string_pretty(&analysis_envelope(&analysis))?
    );
    Ok(())
}

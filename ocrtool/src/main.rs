use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ocrtool::config::{split_language_tags, Config};
use ocrtool::ocr::{OcrProvider, Recognizer};
use ocrtool::resolver::ImageResolver;
use ocrtool::rpc::{serve, Dispatcher, ServeExit};

#[derive(Parser)]
#[command(name = "ocrtool")]
#[command(version)]
#[command(about = "OCR with bounding boxes over line-delimited JSON-RPC on stdio")]
struct Args {
    /// Default language hints joined with '+' (overrides OCR_DEFAULT_LANGUAGES)
    #[arg(long)]
    lang: Option<String>,

    /// Directory containing Tesseract traineddata files
    #[arg(long)]
    tessdata_dir: Option<String>,

    /// Timeout in seconds for downloading images from URLs
    #[arg(long)]
    fetch_timeout: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    // stdout carries the protocol; all diagnostics go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ocrtool=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .init();

    let mut config = Config::from_env();
    if let Some(lang) = args.lang.as_deref() {
        let tags = split_language_tags(lang);
        if tags.is_empty() {
            tracing::warn!("Ignoring empty --lang value");
        } else {
            config.ocr.default_languages = tags;
        }
    }
    if let Some(dir) = args.tessdata_dir {
        config.ocr.tessdata_dir = Some(dir);
    }
    if let Some(secs) = args.fetch_timeout {
        config.resolver.fetch_timeout_secs = secs;
    }

    tracing::info!(
        "Initializing OCR provider (languages: {})...",
        config.ocr.default_languages.join("+")
    );
    let ocr = OcrProvider::new(&config.ocr);
    if !ocr.is_available() {
        tracing::warn!("OCR unavailable - ocr_text requests will return empty results");
    }

    let resolver = ImageResolver::new(&config.resolver)?;
    let recognizer: Arc<dyn Recognizer> = Arc::new(ocr);
    let dispatcher = Dispatcher::new(config, resolver, recognizer);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    match serve(&dispatcher, stdin, stdout).await? {
        ServeExit::EndOfInput => tracing::info!("Input closed, exiting"),
        ServeExit::Shutdown => {
            tracing::info!("Shut down by request");
            // A pending blocking stdin read would otherwise hold up runtime teardown.
            std::process::exit(0);
        }
    }

    Ok(())
}

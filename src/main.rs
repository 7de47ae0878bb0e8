use std::io::{self, BufRead};
use std::path::PathBuf;

use eyre::Result;
use log::{error, info};

mod cli;

use clap::Parser;
use cli::{Cli, Mode, OutputFormat};
use ytsum::fetch::HttpFetcher;
use ytsum::summarize::{DEFAULT_MODEL, OpenAiBackend, SummaryMode};
use ytsum::{PipelineError, SummaryRequest, pipeline};

/// Fixed user-facing message substituted for any pipeline failure
const FALLBACK_MESSAGE: &str = "No captions found";

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytsum.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytsum")
        .join("logs")
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let cli = Cli::parse();

    // Load config file (non-fatal if missing/invalid)
    let config = ytsum::config::Config::load().unwrap_or_default();

    // CLI flags take priority over config defaults
    let mode: SummaryMode = cli
        .mode
        .or_else(|| {
            config
                .default_mode
                .as_deref()
                .and_then(|s| <Mode as clap::ValueEnum>::from_str(s, true).ok())
        })
        .unwrap_or(Mode::Concise)
        .into();
    let format = cli
        .format
        .or_else(|| {
            config
                .default_format
                .as_deref()
                .and_then(|s| <OutputFormat as clap::ValueEnum>::from_str(s, true).ok())
        })
        .unwrap_or(OutputFormat::Text);
    let model = cli
        .model
        .clone()
        .or(config.default_model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    if cli.verbose {
        let config_path = ytsum::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        eprintln!("Model: {model}");
    }

    let client = reqwest::Client::new();
    let fetcher = HttpFetcher::new(client.clone());

    // Collect URLs: from arg or stdin
    let urls = if let Some(ref url) = cli.url {
        vec![url.clone()]
    } else {
        let stdin = io::stdin();
        stdin.lock().lines().collect::<Result<Vec<_>, _>>()?
    };

    if urls.is_empty() {
        eyre::bail!("no URL or video ID provided\n\nUsage: ytsum <URL>\n       echo <URL> | ytsum");
    }

    for url_input in &urls {
        let url_input = url_input.trim();
        if url_input.is_empty() {
            continue;
        }

        let video_id = ytsum::extract_video_id(url_input).ok_or_else(|| {
            eyre::eyre!(
                "could not extract video ID from: {url_input}\n\nSupported formats:\n  https://www.youtube.com/watch?v=ID\n  https://youtu.be/ID\n  https://www.youtube.com/embed/ID\n  https://www.youtube.com/shorts/ID\n  <11-character video ID>"
            )
        })?;

        let request = SummaryRequest {
            video_url: ytsum::watch_url(&video_id),
        };

        // Credentials are read fresh for every request; a missing key fails
        // this request like any other summarization failure
        let result = match OpenAiBackend::from_env(client.clone(), &model) {
            Ok(backend) => pipeline::run(&fetcher, &backend, &request, mode, cli.metadata).await,
            Err(e) => Err(PipelineError::Summarize(e)),
        };

        match result {
            Ok(response) => {
                let rendered = match format {
                    OutputFormat::Text => ytsum::output::render_text(&response),
                    OutputFormat::Json => ytsum::output::render_json(&response),
                };

                if let Some(ref path) = cli.output {
                    std::fs::write(path, &rendered)?;
                    if cli.verbose {
                        eprintln!("Output written to: {}", path.display());
                    }
                } else {
                    println!("{rendered}");
                }
            }
            Err(e) => {
                error!("Pipeline failed for {}: {e}", request.video_url);
                if cli.verbose {
                    eprintln!("{e}");
                }
                println!("{FALLBACK_MESSAGE}");
            }
        }
    }

    Ok(())
}

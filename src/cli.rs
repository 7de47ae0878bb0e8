use clap::Parser;
use std::path::PathBuf;

use ytsum::summarize::SummaryMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    Concise,
    Structured,
}

impl From<Mode> for SummaryMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Concise => SummaryMode::Concise,
            Mode::Structured => SummaryMode::Structured,
        }
    }
}

#[derive(Parser)]
#[command(name = "ytsum", about = "YouTube caption extractor and summarizer", version)]
pub struct Cli {
    /// YouTube video URL or video ID (reads from stdin if omitted)
    pub url: Option<String>,

    /// Summary mode: concise takeaways or structured overview + key points
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Include video title, length and channel in the response
    #[arg(long)]
    pub metadata: bool,

    /// Output format: text (default), json
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// LLM model for summarization
    #[arg(long)]
    pub model: Option<String>,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show pipeline progress and error detail
    #[arg(short, long)]
    pub verbose: bool,
}

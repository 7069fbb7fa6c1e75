use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tracekeep")]
#[command(version)]
#[command(about = "Incremental Markdown archive of AI conversation history")]
pub struct Cli {
    /// Config file (defaults to <config dir>/tracekeep/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sync Claude Code session logs
    Sync {
        /// Output directory (overrides config)
        #[arg(long)]
        inbox: Option<PathBuf>,
    },

    /// Sync Gemini conversations from a Takeout export
    Gemini {
        /// Path to "My Activity.json"
        #[arg(long)]
        takeout: PathBuf,

        /// Crawled conversation index (overrides config)
        #[arg(long)]
        crawl_cache: Option<PathBuf>,

        #[arg(long)]
        inbox: Option<PathBuf>,

        /// Minutes between prompts that still belong to one conversation
        #[arg(long)]
        window: Option<i64>,
    },

    /// Summarize each day of a Takeout export with a local model
    Distill {
        #[arg(long)]
        takeout: PathBuf,

        /// First day to include (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        from: Option<String>,

        /// Last day to include (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        to: Option<String>,

        #[arg(long)]
        inbox: Option<PathBuf>,
    },

    /// Show sync state per source
    Status,

    /// Print version information
    Version,
}

fn parse_date(value: &str) -> Result<String, String> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| value.to_string())
        .map_err(|_| format!("expected YYYY-MM-DD, got '{}'", value))
}

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracekeep_core::Config;

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    init_tracing(cli.verbose || config.verbose);

    match cli.command {
        Commands::Sync { inbox } => commands::sync::run(&config, inbox.as_deref()),
        Commands::Gemini {
            takeout,
            crawl_cache,
            inbox,
            window,
        } => commands::gemini::run(
            &config,
            &takeout,
            crawl_cache.as_deref(),
            inbox.as_deref(),
            window,
        ),
        Commands::Distill {
            takeout,
            from,
            to,
            inbox,
        } => commands::distill::run(
            &config,
            &takeout,
            from.as_deref(),
            to.as_deref(),
            inbox.as_deref(),
        ),
        Commands::Status => commands::status::run(&config),
        Commands::Version => commands::version::run(),
    }
}

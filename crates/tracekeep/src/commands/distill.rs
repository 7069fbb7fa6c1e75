use std::path::Path;
use tracekeep_core::Config;
use tracekeep_distill::OllamaDistiller;
use tracekeep_sync::{sync_distillations, DateRange, DirectorySink};

pub fn run(
    config: &Config,
    takeout: &Path,
    from: Option<&str>,
    to: Option<&str>,
    inbox: Option<&Path>,
) -> anyhow::Result<()> {
    if let (Some(from), Some(to)) = (from, to) {
        anyhow::ensure!(from <= to, "--from {} is after --to {}", from, to);
    }

    let distiller = OllamaDistiller::from_config(&config.distill)?;
    let inbox = inbox.unwrap_or(config.inbox.as_path());
    let report = sync_distillations(
        takeout,
        DateRange { from, to },
        &config.distill.state_file,
        &distiller,
        DirectorySink::new(inbox),
    )?;
    println!("Distilled {} day(s) to {}", report.written, inbox.display());
    Ok(())
}

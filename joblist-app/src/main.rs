use anyhow::Result;
use clap::Parser;
use joblist_config::JoblistConfig;
use wiring::{Cli, build_extractor, build_source, load_config, start_logging};
mod wiring;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins); logging is best effort
    let cfg: JoblistConfig = load_config(&cli)?;
    start_logging(&cfg.logging);
    if !cli.extra.is_empty() {
        tracing::debug!(ignored = ?cli.extra, "joblist.extra_args");
    }

    // 2) Compile lookups and pick the page source before anything is printed
    let extractor = build_extractor(&cfg)?;
    let source = build_source(&cli, &cfg)?;

    let mut stdout = std::io::stdout().lock();
    let count = joblist_web::run(&cli.launcher, source.as_ref(), &extractor, &mut stdout).await?;
    tracing::info!(listings = count, "joblist.finished");
    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use joblist_common::observability::init_logging;
use joblist_config::{JoblistConfig, JoblistConfigLoader, LoggingConfig};
use joblist_web::{Extractor, FileSource, HttpSource, PageSource};
use std::path::PathBuf;

/// Print job listings whose heading matches a keyword as Markdown.
#[derive(Debug, Parser)]
#[command(name = "joblist", version)]
pub struct Cli {
    /// Launcher payload: a JSON object with at least `filenameFull`.
    pub launcher: String,

    /// Config file to load instead of the default locations.
    #[arg(long, env = "JOBLIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read the page from a saved HTML file instead of the network.
    #[arg(long, value_name = "PATH")]
    pub html_file: Option<PathBuf>,

    /// Further launcher arguments; accepted and ignored.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub extra: Vec<String>,
}

pub fn load_config(cli: &Cli) -> Result<JoblistConfig> {
    let loader = match &cli.config {
        Some(path) => JoblistConfigLoader::new().with_file(path),
        None => JoblistConfigLoader::new().with_default_files(),
    };
    loader.load().context("failed to load configuration")
}

/// Start logging, or say why not on `stderr` and carry on: the listings on
/// stdout do not depend on it.
pub fn start_logging(cfg: &LoggingConfig) -> Option<PathBuf> {
    match init_logging("joblist", cfg) {
        Ok(path) => Some(path),
        Err(err) => {
            eprintln!("joblist: logging disabled: {err:#}");
            None
        }
    }
}

pub fn build_extractor(cfg: &JoblistConfig) -> Result<Extractor> {
    Extractor::from_config(&cfg.extract).context("invalid extract configuration")
}

pub fn build_source(cli: &Cli, cfg: &JoblistConfig) -> Result<Box<dyn PageSource>> {
    if let Some(path) = &cli.html_file {
        return Ok(Box::new(FileSource::new(path)));
    }
    let source = HttpSource::from_config(&cfg.source).context("invalid source configuration")?;
    Ok(Box::new(source))
}

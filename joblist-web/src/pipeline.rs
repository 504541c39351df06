use std::io::Write;

use joblist_common::LauncherError;
use joblist_common::launcher::parse_launcher_arg;
use scraper::Html;
use thiserror::Error;

use crate::extract::{ExtractError, Extractor};
use crate::render;
use crate::source::{PageSource, SourceError};

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Launcher(#[from] LauncherError),
    #[error("fetching page failed: {0}")]
    Source(#[from] SourceError),
    #[error("extracting listings failed: {0}")]
    Extract(#[from] ExtractError),
    #[error("writing output failed: {0}")]
    Output(#[from] std::io::Error),
}

/// Print the report for one launcher invocation and return how many listings
/// were written.
///
/// The title line goes out before the page is fetched, so a bad launcher
/// argument fails without touching the network. Cards are resolved up front;
/// blocks are then built and printed one at a time, so a field fault leaves
/// the earlier blocks on `out`.
pub async fn run<W: Write + ?Sized>(
    launcher_arg: &str,
    source: &dyn PageSource,
    extractor: &Extractor,
    out: &mut W,
) -> Result<usize, ScrapeError> {
    let launcher = parse_launcher_arg(launcher_arg)?;
    render::write_title(out, launcher.title())?;

    tracing::info!(target: "web.pipeline", source = %source.describe(), "pipeline.fetch");
    let html = source.fetch().await?;

    let document = Html::parse_document(&html);
    let cards = extractor.cards(&document)?;
    for card in &cards {
        let listing = extractor.build_listing(*card)?;
        render::write_listing(out, &listing)?;
    }
    out.flush()?;

    tracing::info!(target: "web.pipeline", listings = cards.len(), "pipeline.done");
    Ok(cards.len())
}

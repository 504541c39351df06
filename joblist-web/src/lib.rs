//! Page acquisition and listing extraction.
//!
//! - Page sources: HTTP-backed and local-file implementations (`source`)
//! - Listing extraction on top of `scraper` (`extract`)
//! - Markdown-like rendering of listings (`render`)
//! - The fetch -> parse -> filter -> print procedure (`pipeline`)

pub mod extract;
pub mod pipeline;
pub mod render;
pub mod source;

pub use extract::{ExtractError, Extractor, Listing};
pub use pipeline::{ScrapeError, run};
pub use source::{FileSource, HttpSource, PageSource, SourceError};

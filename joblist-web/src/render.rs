//! Markdown-like rendering of the listing report.

use std::io::{self, Write};

use crate::Listing;

/// `# <title>` line that opens the report.
pub fn write_title<W: Write + ?Sized>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "# {title}")
}

/// One `### Job` block followed by a bullet per field.
pub fn write_listing<W: Write + ?Sized>(out: &mut W, listing: &Listing) -> io::Result<()> {
    writeln!(out, "### Job")?;
    writeln!(out, "- {}", listing.title)?;
    writeln!(out, "- {}", listing.organization)?;
    writeln!(out, "- {}", listing.location)?;
    writeln!(out, "- {}", listing.detail_link)
}

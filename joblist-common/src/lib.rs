//! Common types and utilities shared across joblist crates.
//!
//! This crate holds the pieces every other crate can depend on without
//! pulling in the HTTP or HTML stacks.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`launcher`]: The JSON payload handed to us by the note launcher
//! - [`LauncherError`] and [`Result`]: Errors raised while reading that payload
//!
//! # Examples
//!
//! ```rust
//! use joblist_common::launcher::parse_launcher_arg;
//!
//! let data = parse_launcher_arg(r#"{"filenameFull": "/vault/Jobs.md"}"#).unwrap();
//! assert_eq!(data.title(), "/vault/Jobs.md");
//! ```

pub mod launcher;
pub mod observability;

pub use launcher::LauncherData;

/// Errors raised while decoding the launcher argument.
#[derive(thiserror::Error, Debug)]
pub enum LauncherError {
    /// The argument is not valid JSON or lacks a required field.
    #[error("invalid launcher argument: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Convenient alias for results that use [`LauncherError`].
pub type Result<T> = std::result::Result<T, LauncherError>;

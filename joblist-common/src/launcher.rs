//! Payload passed by the note launcher as our first command-line argument.
//!
//! The launcher serialises the active note's location as a JSON object with
//! camelCase keys. Only `filenameFull` is required; everything else is kept
//! so callers can log it.

use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LauncherData {
    /// Absolute path of the active note; printed as the document title.
    pub filename_full: String,
    #[serde(default)]
    pub vault_path: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub filename_ext: Option<String>,
    #[serde(default)]
    pub filename_rel: Option<String>,
    #[serde(default)]
    pub filename_no_ext: Option<String>,
    #[serde(default)]
    pub filename_path: Option<String>,
    #[serde(default)]
    pub editor_x: Option<u32>,
    #[serde(default)]
    pub editor_y: Option<u32>,
}

impl LauncherData {
    pub fn title(&self) -> &str {
        &self.filename_full
    }
}

/// Decode the raw launcher argument.
///
/// ```
/// use joblist_common::launcher::parse_launcher_arg;
///
/// assert!(parse_launcher_arg("not json").is_err());
/// assert!(parse_launcher_arg(r#"{"filename": "a.md"}"#).is_err());
/// ```
pub fn parse_launcher_arg(raw: &str) -> Result<LauncherData> {
    let data: LauncherData = serde_json::from_str(raw)?;
    tracing::debug!(
        filename_full = %data.filename_full,
        vault_path = ?data.vault_path,
        "launcher.parsed"
    );
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LauncherError;

    #[test]
    fn reads_full_launcher_struct() {
        let raw = r#"{
            "vaultPath": "/home/me/vault",
            "filename": "Jobs.md",
            "filenameNoExt": "Jobs",
            "filenameRel": "inbox/Jobs.md",
            "filenameFull": "/home/me/vault/inbox/Jobs.md",
            "filenamePath": "/home/me/vault/inbox",
            "editorX": 4,
            "editorY": 12
        }"#;
        let data = parse_launcher_arg(raw).unwrap();
        assert_eq!(data.title(), "/home/me/vault/inbox/Jobs.md");
        assert_eq!(data.filename_no_ext.as_deref(), Some("Jobs"));
        assert_eq!(data.editor_y, Some(12));
    }

    #[test]
    fn only_filename_full_is_required() {
        let data = parse_launcher_arg(r#"{"filenameFull": "x.md"}"#).unwrap();
        assert_eq!(data.title(), "x.md");
        assert!(data.vault_path.is_none());
    }

    #[test]
    fn missing_filename_full_is_an_error() {
        let err = parse_launcher_arg(r#"{"filenameRel": "x.md"}"#).unwrap_err();
        assert!(matches!(err, LauncherError::Malformed(_)));
        assert!(err.to_string().contains("filenameFull"));
    }

    #[test]
    fn bare_json_string_is_rejected() {
        // The launcher's `filename_full` template passes a quoted path, not an object.
        assert!(parse_launcher_arg(r#""/vault/x.md""#).is_err());
    }

    #[test]
    fn non_json_is_rejected() {
        assert!(parse_launcher_arg("{filenameFull: x}").is_err());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let data = parse_launcher_arg(r#"{"filenameFull": "a", "extra": [1, 2]}"#).unwrap();
        assert_eq!(data.title(), "a");
    }
}

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::OnceLock;

use joblist_config::{LogFormat, LoggingConfig};

static INIT_PATH: OnceLock<PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LoggingConfig {
            dir: Some(std::env::temp_dir().join("joblist-tests")),
            emit_stderr: true,
            format: if std::env::var("JOBLIST_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            filter: "debug".to_string(),
        };

        joblist_common::observability::init_logging("joblist-tests", &config).unwrap_or_default()
    });
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("fixture exists")
}

//! Tracing setup for the `joblist` binary and integration tests.
//!
//! Standard output carries the rendered listings, so events go to a daily
//! rolling file under the configured directory and, with `emit_stderr`, to
//! `stderr` as well. The first successful [`init_logging`] call wins; later
//! calls hand back the path it resolved.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use joblist_config::{LogFormat, LoggingConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::Layered;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_DIR_ENV: &str = "JOBLIST_LOG_DIR";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

type Filtered = Layered<EnvFilter, Registry>;
type SinkLayer = Box<dyn Layer<Filtered> + Send + Sync>;

/// Install the global subscriber and return today's log file path.
///
/// `app_name` names the log file and the fallback directory
/// (`~/.local/share/<app_name>`); `cfg.dir` and then `JOBLIST_LOG_DIR` take
/// precedence over it. `RUST_LOG` overrides `cfg.filter`.
pub fn init_logging(app_name: &str, cfg: &LoggingConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let dir = resolve_log_dir(app_name, cfg.dir.as_deref());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory: {}", dir.display()))?;

    let file_name = format!("{app_name}.log");
    let today = Local::now().format("%Y-%m-%d");
    let full_path = dir.join(format!("{file_name}.{today}"));

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, &file_name));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.filter));
    let mut sinks: Vec<SinkLayer> = vec![sink(cfg.format, writer, false)];
    if cfg.emit_stderr {
        sinks.push(sink(cfg.format, std::io::stderr, true));
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(sinks)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let _ = LOG_GUARD.set(guard);
    let _ = LOG_PATH.set(full_path.clone());
    Ok(full_path)
}

fn sink<W>(format: LogFormat, writer: W, ansi: bool) -> SinkLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Text => fmt::layer().with_writer(writer).with_ansi(ansi).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
    }
}

fn resolve_log_dir(app_name: &str, explicit: Option<&Path>) -> PathBuf {
    let configured = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(LOG_DIR_ENV).map(PathBuf::from));
    match configured {
        Some(dir) => expand_home(&dir),
        None => home()
            .map(|h| h.join(".local").join("share").join(app_name))
            .unwrap_or_else(|| PathBuf::from(".").join(app_name)),
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), home()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

fn home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

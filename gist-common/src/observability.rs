//! Logging setup shared by the CLI and integration tests.
//!
//! [`init_logging`] installs one global `tracing` subscriber writing to a
//! daily rolling file, optionally mirrored to stderr. The first call wins;
//! later calls return the path chosen by the first.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use serde::Deserialize;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

const LOG_DIR_ENV: &str = "GIST_LOG_DIR";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Output encoding for structured logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Options for [`init_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Names the log file and the default directory.
    pub app_name: &'static str,
    /// Explicit log directory; otherwise `GIST_LOG_DIR`, then the platform
    /// data directory.
    pub log_dir: Option<PathBuf>,
    pub emit_stderr: bool,
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "gist",
            log_dir: None,
            emit_stderr: false,
            format: LogFormat::Text,
            default_filter: "info".to_string(),
        }
    }
}

/// Install the global subscriber and return today's log file path.
pub fn init_logging(config: LogConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let dir = resolve_log_dir(config.app_name, config.log_dir.as_deref());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let file_name = format!("{}.log", config.app_name);
    let path = dir.join(format!("{file_name}.{}", Local::now().format("%Y-%m-%d")));

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, &file_name));
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    tracing_subscriber::registry()
        .with(sink_layers(config.format, writer, config.emit_stderr))
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let _ = LOG_GUARD.set(guard);
    let _ = LOG_PATH.set(path.clone());
    Ok(path)
}

/// File sink first; stderr shares its encoding but keeps ANSI colours.
fn sink_layers(format: LogFormat, file: NonBlocking, stderr: bool) -> Vec<BoxedLayer> {
    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
    match format {
        LogFormat::Text => {
            layers.push(fmt::layer().with_writer(file).with_ansi(false).boxed());
            if stderr {
                layers.push(fmt::layer().with_writer(std::io::stderr).boxed());
            }
        }
        LogFormat::Json => {
            layers.push(fmt::layer().json().with_writer(file).boxed());
            if stderr {
                layers.push(fmt::layer().json().with_writer(std::io::stderr).boxed());
            }
        }
    }
    layers
}

fn resolve_log_dir(app_name: &str, explicit: Option<&Path>) -> PathBuf {
    let configured = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(LOG_DIR_ENV).map(PathBuf::from));

    match configured {
        Some(dir) => expand_home(&dir),
        None => dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(app_name),
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn explicit_dir_beats_env() {
        temp_env::with_var(LOG_DIR_ENV, Some("/var/log/from-env"), || {
            let got = resolve_log_dir("gist", Some(Path::new("/tmp/explicit")));
            assert_eq!(got, PathBuf::from("/tmp/explicit"));
        });
    }

    #[test]
    #[serial]
    fn env_dir_used_when_nothing_explicit() {
        temp_env::with_var(LOG_DIR_ENV, Some("/var/log/from-env"), || {
            assert_eq!(
                resolve_log_dir("gist", None),
                PathBuf::from("/var/log/from-env")
            );
        });
    }

    #[test]
    #[serial]
    fn default_dir_is_named_after_the_app() {
        temp_env::with_var_unset(LOG_DIR_ENV, || {
            assert!(resolve_log_dir("gist", None).ends_with("gist"));
        });
    }

    #[test]
    fn tilde_expands_to_home() {
        let got = expand_home(Path::new("~/logs"));
        match dirs::home_dir() {
            Some(home) => assert_eq!(got, home.join("logs")),
            None => assert_eq!(got, PathBuf::from("~/logs")),
        }
        assert_eq!(expand_home(Path::new("/abs/logs")), PathBuf::from("/abs/logs"));
    }

    #[test]
    fn stderr_adds_a_second_sink() {
        let (file, _guard) = tracing_appender::non_blocking(std::io::sink());
        assert_eq!(sink_layers(LogFormat::Json, file.clone(), false).len(), 1);
        assert_eq!(sink_layers(LogFormat::Text, file, true).len(), 2);
    }

    #[test]
    fn format_reads_lowercase_names() {
        let f: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(f, LogFormat::Json);
        assert!(serde_json::from_str::<LogFormat>("\"yaml\"").is_err());
    }
}

//! Tracing initialisation: full-format log file filtered by `RUST_LOG`, warnings mirrored to stderr.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

/// Installs the global tracing subscriber.
///
/// The file layer uses the complete fmt format (level, target, span close events, all fields)
/// and honours `RUST_LOG` (default `info`). The stderr layer only shows `WARN` and above so the
/// interactive chat on stdout is not drowned in pipeline logs.
/// Load `.env` (e.g. `dotenvy::dotenv()`) before calling this, otherwise `RUST_LOG` is ignored.
pub fn init_tracing(log_file_path: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(log_file_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    let file = Arc::new(file);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true)
        .with_file(false)
        .with_line_number(false)
        .with_filter(env_filter);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(LevelFilter::WARN);

    Registry::default()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_log_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("quotebot.log");
        let path_str = path.to_str().unwrap();

        // A second global init in the same test binary would fail; only the file side effects matter.
        let _ = init_tracing(path_str);

        assert!(path.exists());
    }
}

//! Tracing subscriber setup for the command line tool

use solrdex_config::TelemetryConfig;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level. Logs always go to stderr so
/// stdout stays reserved for command output; with a log directory they are
/// also written to a daily rotating file.
///
/// The returned guards must be held until exit or buffered lines are lost.
pub(crate) fn init(
    telemetry: &TelemetryConfig,
    log_dir: Option<&Path>,
) -> anyhow::Result<Vec<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&telemetry.tracing_level))
        .map_err(|e| {
            anyhow::anyhow!("Invalid tracing level '{}': {e}", telemetry.tracing_level)
        })?;

    let (stderr_writer, stderr_guard) = tracing_appender::non_blocking(std::io::stderr());
    let mut guards = vec![stderr_guard];

    let writer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_name = format!("{}.log", telemetry.service_name);
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, file_name);
            let (file_writer, file_guard) = tracing_appender::non_blocking(appender);
            guards.push(file_guard);
            BoxMakeWriter::new(file_writer.and(stderr_writer))
        }
        None => BoxMakeWriter::new(stderr_writer),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);
    let installed = if telemetry.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    Ok(guards)
}


use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// `~/.stubweave/logs`, or `./.stubweave/logs` without a home directory.
pub fn log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".stubweave")
        .join("logs")
}

/// File prefix for a component's log, qualified by the installation it runs on
/// so concurrent builds of different trees do not interleave.
///
/// `cli` on `/opt/kratos-9.5` becomes `cli-kratos-9_5`.
pub fn log_file_prefix(component: &str, installation: Option<&Path>) -> String {
    let Some(name) = installation
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy())
    else {
        return component.to_string();
    };

    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{component}-{sanitized}")
}

pub fn init_logging(component: &str, installation: Option<&Path>, to_stderr: bool) -> WorkerGuard {
    let log_dir = log_dir();
    let _ = std::fs::create_dir_all(&log_dir);

    // e.g. cli-install.2024-01-21
    let file_appender =
        tracing_appender::rolling::daily(&log_dir, log_file_prefix(component, installation));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    // Quiet runs keep the file log only
    if to_stderr {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);
        registry.with(stderr_layer).init();
    } else {
        registry.init();
    }

    guard
}

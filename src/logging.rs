use once_cell::sync::OnceCell;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Keeps the background log writer alive for the rest of the process.
static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Initialise logging. The level is `debug` when debug logging is enabled in
/// the settings and `info` otherwise. `RUST_LOG` can override the level only
/// in debug mode. When `log_file` is given, output goes to that file instead
/// of stderr.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    // Outside debug mode `info` is forced so a stray `RUST_LOG` in the user's
    // environment cannot make the overlay chatty.
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let Some(path) = log_file else {
        let _ = builder.try_init();
        return;
    };

    let file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "ink_layer.log".into());
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(|parent| parent.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    if let Err(err) = std::fs::create_dir_all(&dir) {
        eprintln!("failed to create log directory {}: {err}", dir.display());
    }

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    if builder.with_ansi(false).with_writer(writer).try_init().is_ok() {
        let _ = FILE_GUARD.set(guard);
    }
}

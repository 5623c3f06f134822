// ABOUTME: File logging for a run: timestamped tracing lines written through a non-blocking appender.
// ABOUTME: LogSession is installed only for the scope of a run and flushes when dropped.

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use tracing::Dispatch;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: our crates at debug, dependencies at warn.
const DEFAULT_FILTER: &str = "warn,haras_extract=debug,haras_sink=debug,haras_cli=debug";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// An open log file plus the subscriber writing to it.
///
/// Nothing is installed globally: callers run their work inside [`LogSession::scope`].
pub struct LogSession {
    dispatch: Dispatch,
    _guard: WorkerGuard,
}

impl LogSession {
    /// Creates (truncating) `path` and builds a subscriber that writes to it.
    pub fn to_file(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        let (writer, guard) = tracing_appender::non_blocking(file);

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let subscriber = tracing_subscriber::fmt()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false)
            .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
            .with_env_filter(filter)
            .finish();

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            _guard: guard,
        })
    }

    /// Runs `f` with this session as the active subscriber.
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

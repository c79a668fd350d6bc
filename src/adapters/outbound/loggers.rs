use crate::domains::logger::{DomainLogger, DynLogger};
use chrono::Utc;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Prints to stdout, errors to stderr.
struct ConsoleLogger;

impl DomainLogger for ConsoleLogger {
    fn info(&self, msg: &str) {
        println!("{}", msg);
    }

    fn warn(&self, msg: &str) {
        println!("WARN: {}", msg);
    }

    fn error(&self, msg: &str) {
        eprintln!("ERROR: {}", msg);
    }
}

/// Forwards run reports into the `tracing` pipeline set up by the binary.
struct TracingLogger;

impl DomainLogger for TracingLogger {
    fn info(&self, msg: &str) {
        tracing::info!(target: "geoagents::run", "{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: "geoagents::run", "{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: "geoagents::run", "{}", msg);
    }
}

/// Run file written through `fast_log`. Lines carry a UTC timestamp and the run label.
struct RunFileLogger {
    label: String,
}

impl RunFileLogger {
    fn line(&self, msg: &str) -> String {
        format!("{} [{}] {}", Utc::now().to_rfc3339(), self.label, msg)
    }
}

impl DomainLogger for RunFileLogger {
    fn info(&self, msg: &str) {
        log::info!("{}", self.line(msg));
    }

    fn warn(&self, msg: &str) {
        log::warn!("{}", self.line(msg));
    }

    fn error(&self, msg: &str) {
        log::error!("{}", self.line(msg));
    }
}

struct NoOp;

impl DomainLogger for NoOp {
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

/// Fans every message out to all of its sinks, in order.
pub struct MultiLogger {
    sinks: Vec<DynLogger>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<DynLogger>) -> Self {
        Self { sinks }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.sinks.iter().for_each(|s| s.error(msg));
    }
}

pub fn init_console_logger() -> DynLogger {
    Arc::new(ConsoleLogger)
}

pub fn init_tracing_logger() -> DynLogger {
    Arc::new(TracingLogger)
}

/// Silent logger, the default in unit tests.
pub fn init_noop_logger() -> DynLogger {
    Arc::new(NoOp)
}

/// Install the `tracing` subscriber used by the binary, filtered by `RUST_LOG`
/// (default `info`). It does not claim the `log` facade, which stays free for the
/// run file. Returns `false` if a subscriber was already installed.
pub fn init_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .is_ok()
}

/// Install `fast_log` as the `log` backend writing to `path` and return a run
/// logger labelled `label`.
pub fn init_file_logger(path: &str, label: &str) -> Result<DynLogger, String> {
    fast_log::init(
        fast_log::config::Config::new()
            .file(path)
            .level(log::LevelFilter::Info),
    )
    .map_err(|e| format!("Failed to initialize fast_log: {}", e))?;
    Ok(Arc::new(RunFileLogger { label: label.to_string() }))
}

/// Tracing output plus, when a path is given and `fast_log` can be installed, a run file.
/// Call after `init_tracing`; the two never compete for the same global logger.
pub fn init_run_logger(path: Option<&str>, label: &str) -> DynLogger {
    let tracing_sink = init_tracing_logger();
    let Some(path) = path else {
        return tracing_sink;
    };
    match init_file_logger(path, label) {
        Ok(file) => Arc::new(MultiLogger::new(vec![tracing_sink, file])),
        Err(e) => {
            tracing_sink.warn(&e);
            tracing_sink
        }
    }
}

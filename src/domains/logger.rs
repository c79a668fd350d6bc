use std::sync::Arc;

/// Run-level reporting port.
///
/// Simulations and services describe what a run did through this trait; the
/// adapters decide whether that ends up in tracing output, a run file or nowhere.
/// Reporting never fails from the caller's point of view.
pub trait DomainLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

pub type DynLogger = Arc<dyn DomainLogger>;

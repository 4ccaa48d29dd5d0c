use super::*;

use tracing::{error, warn};

/// `ErrorReporter` receives the errors raised inside a running watch.
///
/// None of these errors stop the watch by themselves.
/// The reporter decides whether they are logged, counted or escalated.
pub trait ErrorReporter: Sync + Send + 'static {
    fn report(&self, error: &Error);
}

impl<E: ErrorReporter + ?Sized> ErrorReporter for Arc<E> {
    fn report(&self, error: &Error) {
        (**self).report(error)
    }
}

/// Default reporter. Emits the error as a `tracing` event.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, e: &Error) {
        match e {
            Error::Notification { .. } => warn!("notify function failed: {e:#}"),
            _ => error!("could not fetch members: {e:#}"),
        }
    }
}

//! Warning/debug sink. The spec treats `Logger` as an external
//! collaborator; this module defines the trait boundary plus the default
//! implementations the core ships so it is runnable standalone.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;

use codemap::Span;

/// Sink for `@warn`/`@debug` output and deprecation warnings.
pub trait Logger: fmt::Debug {
    fn warn(&self, message: &str, span: Option<Span>);
    fn debug(&self, message: &str, span: Option<Span>);
}

/// Forwards to `tracing`, rendering the span into the event's fields.
#[derive(Debug, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn warn(&self, message: &str, span: Option<Span>) {
        match span {
            Some(span) => tracing::warn!(span = ?span, "{message}"),
            None => tracing::warn!("{message}"),
        }
    }

    fn debug(&self, message: &str, span: Option<Span>) {
        match span {
            Some(span) => tracing::debug!(span = ?span, "{message}"),
            None => tracing::debug!("{message}"),
        }
    }
}

/// Discards everything. Used for `quiet_deps` and in tests.
#[derive(Debug, Default)]
pub struct DeafLogger;

impl Logger for DeafLogger {
    fn warn(&self, _message: &str, _span: Option<Span>) {}
    fn debug(&self, _message: &str, _span: Option<Span>) {}
}

/// Wraps a `Logger`, deduplicating warnings by `(message, span)` so each
/// unique pair is emitted at most once (spec §5).
#[derive(Debug)]
pub struct WarningDeduplicator<L: Logger> {
    inner: L,
    seen: RefCell<HashSet<(String, Option<Span>)>>,
}

impl<L: Logger> WarningDeduplicator<L> {
    pub fn new(inner: L) -> Self {
        WarningDeduplicator {
            inner,
            seen: RefCell::new(HashSet::new()),
        }
    }
}

impl<L: Logger> Logger for WarningDeduplicator<L> {
    fn warn(&self, message: &str, span: Option<Span>) {
        let key = (message.to_owned(), span);
        if self.seen.borrow_mut().insert(key) {
            self.inner.warn(message, span);
        }
    }

    fn debug(&self, message: &str, span: Option<Span>) {
        self.inner.debug(message, span);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct CountingLogger {
        warnings: RefCell<Vec<String>>,
    }

    impl Logger for CountingLogger {
        fn warn(&self, message: &str, _span: Option<Span>) {
            self.warnings.borrow_mut().push(message.to_owned());
        }
        fn debug(&self, _message: &str, _span: Option<Span>) {}
    }

    #[test]
    fn dedups_identical_spanless_warnings() {
        let dedup = WarningDeduplicator::new(CountingLogger::default());
        dedup.warn("same message", None);
        dedup.warn("same message", None);
        dedup.warn("different message", None);
        assert_eq!(dedup.inner.warnings.borrow().len(), 2);
    }
}

//! Diagnostic sink boundary.
//!
//! The compiler reports through [`record`] only; the active sink is a
//! thread-local slot so callers (and tests) can scope an override around a
//! compilation without threading a sink parameter through every pass.

use crate::obs::Diagnostic;
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK: RefCell<Option<Rc<dyn DiagnosticSink>>> = const { RefCell::new(None) };
}

///
/// DiagnosticSink
///

pub trait DiagnosticSink {
    fn record(&self, diagnostic: &Diagnostic);
}

///
/// CollectSink
/// Accumulating sink for tests and warning surfaces.
///

#[derive(Debug, Default)]
pub struct CollectSink {
    items: RefCell<Vec<Diagnostic>>,
}

impl CollectSink {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    #[must_use]
    pub fn drain(&self) -> Vec<Diagnostic> {
        self.items.borrow_mut().drain(..).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl DiagnosticSink for CollectSink {
    fn record(&self, diagnostic: &Diagnostic) {
        self.items.borrow_mut().push(diagnostic.clone());
    }
}

/// Report one diagnostic to the active sink, if any.
pub(crate) fn record(diagnostic: Diagnostic) {
    SINK.with(|cell| {
        if let Some(sink) = cell.borrow().as_ref() {
            sink.record(&diagnostic);
        }
    });
}

/// Run a closure with a scoped diagnostic sink override.
///
/// The previous sink is restored on all exits, including unwind.
pub fn with_diagnostic_sink<T>(sink: Rc<dyn DiagnosticSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn DiagnosticSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK.with(|cell| {
                *cell.borrow_mut() = self.0.take();
            });
        }
    }

    let prev = SINK.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///

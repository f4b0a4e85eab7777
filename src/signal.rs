//! Transient banner message shared by the loader and the question form.
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Receives the request to move input focus to the question field.
pub trait FocusTarget: Send + Sync {
    fn focus_question(&self);
}

/// Focus target for contexts without an input field.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFocus;

impl FocusTarget for NoFocus {
    fn focus_question(&self) {}
}

/// Last-write-wins error message. Setting a non-empty message synchronously
/// moves focus to the question input.
pub struct ErrorSignal {
    message: Mutex<Option<String>>,
    focus: Arc<dyn FocusTarget>,
}

impl ErrorSignal {
    pub fn new(focus: Arc<dyn FocusTarget>) -> Self {
        Self {
            message: Mutex::new(None),
            focus,
        }
    }

    pub fn set(&self, message: impl Into<String>) {
        let message = message.into();
        if message.is_empty() {
            self.clear();
            return;
        }
        debug!(%message, "error signal set");
        *self.lock() = Some(message);
        // Lock released before the observer runs so it may read the signal.
        self.focus.focus_question();
    }

    pub fn clear(&self) {
        let mut guard = self.lock();
        if guard.take().is_some() {
            debug!("error signal cleared");
        }
    }

    pub fn message(&self) -> Option<String> {
        self.lock().clone()
    }

    pub fn is_set(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.message.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for ErrorSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorSignal")
            .field("message", &self.message())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingFocus(AtomicUsize);

    impl FocusTarget for CountingFocus {
        fn focus_question(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn signal() -> (ErrorSignal, Arc<CountingFocus>) {
        let focus = Arc::new(CountingFocus::default());
        (ErrorSignal::new(focus.clone()), focus)
    }

    #[test]
    fn set_moves_focus_once() {
        let (sig, focus) = signal();
        sig.set("boom");
        assert_eq!(sig.message().as_deref(), Some("boom"));
        assert_eq!(focus.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clear_on_empty_is_noop() {
        let (sig, focus) = signal();
        sig.clear();
        sig.clear();
        assert_eq!(sig.message(), None);
        assert_eq!(focus.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn clear_does_not_focus() {
        let (sig, focus) = signal();
        sig.set("boom");
        sig.clear();
        assert!(!sig.is_set());
        assert_eq!(focus.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_set_acts_as_clear() {
        let (sig, focus) = signal();
        sig.set("boom");
        sig.set("");
        assert_eq!(sig.message(), None);
        assert_eq!(focus.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn last_write_wins() {
        let (sig, _focus) = signal();
        sig.set("first");
        sig.set("second");
        assert_eq!(sig.message().as_deref(), Some("second"));
    }

    #[test]
    fn observer_can_read_signal() {
        struct Reader(Mutex<Option<Arc<ErrorSignal>>>, Mutex<Vec<Option<String>>>);
        impl FocusTarget for Reader {
            fn focus_question(&self) {
                let sig = self.0.lock().unwrap().clone();
                if let Some(sig) = sig {
                    self.1.lock().unwrap().push(sig.message());
                }
            }
        }

        let reader = Arc::new(Reader(Mutex::new(None), Mutex::new(Vec::new())));
        let sig = Arc::new(ErrorSignal::new(reader.clone()));
        *reader.0.lock().unwrap() = Some(sig.clone());
        sig.set("seen");
        assert_eq!(*reader.1.lock().unwrap(), vec![Some("seen".to_string())]);
    }
}

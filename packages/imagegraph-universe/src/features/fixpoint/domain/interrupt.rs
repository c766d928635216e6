//! Cooperative cancellation

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const DEFAULT_REASON: &str = "analysis interrupted";

/// Cloneable cancellation flag, checked by the driver between iterations
#[derive(Debug, Clone, Default)]
pub struct InterruptSignal {
    flag: Arc<AtomicBool>,
    reason: Arc<Mutex<Option<String>>>,
}

impl InterruptSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The first reason wins.
    pub fn interrupt(&self, reason: impl Into<String>) {
        let mut slot = self.reason.lock();
        if slot.is_none() {
            *slot = Some(reason.into());
        }
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_interrupted(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    pub fn reason(&self) -> String {
        self.reason
            .lock()
            .clone()
            .unwrap_or_else(|| DEFAULT_REASON.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let signal = InterruptSignal::new();
        let handle = signal.clone();
        assert!(!signal.is_interrupted());

        handle.interrupt("user pressed ctrl-c");
        handle.interrupt("second reason is ignored");

        assert!(signal.is_interrupted());
        assert_eq!(signal.reason(), "user pressed ctrl-c");
    }

    #[test]
    fn test_interrupt_from_another_thread() {
        let signal = InterruptSignal::new();
        let handle = signal.clone();
        std::thread::spawn(move || handle.interrupt("shutdown")).join().unwrap();
        assert!(signal.is_interrupted());
    }
}

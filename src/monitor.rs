use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

/// Cooperative progress and cancellation channel.
/// Polled between expensive steps, never inside the SVD.
pub trait ProgressMonitor: Sync {
    fn is_cancelled(&self) -> bool;
    fn set_status(&self, status: &str);
}

/// Never cancels, discards status text
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMonitor;

impl ProgressMonitor for NoopMonitor {
    #[inline]
    fn is_cancelled(&self) -> bool {
        false
    }

    #[inline]
    fn set_status(&self, _status: &str) {}
}

/// Cancellation flag that can be flipped from another thread.
/// Keeps the latest status text.
#[derive(Debug, Default)]
pub struct CancelFlag {
    cancelled: AtomicBool,
    status: Mutex<String>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Last status text reported by the running technique
    pub fn status(&self) -> String {
        self.status
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

impl ProgressMonitor for CancelFlag {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn set_status(&self, status: &str) {
        if let Ok(mut s) = self.status.lock() {
            s.clear();
            s.push_str(status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_flag_reports_state_and_status() {
        let flag = CancelFlag::new();
        assert!(!flag.is_cancelled());
        flag.set_status("scanning block 1");
        flag.set_status("scanning block 2");
        assert_eq!(flag.status(), "scanning block 2");
        flag.cancel();
        assert!(flag.is_cancelled());
    }
}

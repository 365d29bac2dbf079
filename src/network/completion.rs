//! Single-shot completion.

use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// A boolean outcome that is written at most once and can be waited for.
#[derive(Debug, Default)]
pub struct Completion {
    outcome: Mutex<Option<bool>>,
    ready: Condvar,
}

impl Completion {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<bool>> {
        self.outcome.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Sets the outcome if it is not set yet.
    ///
    /// Returns `true` if this call set it.
    pub fn complete(&self, value: bool) -> bool {
        let mut outcome = self.lock();
        if outcome.is_some() {
            return false;
        }
        *outcome = Some(value);
        self.ready.notify_all();
        true
    }

    pub fn is_complete(&self) -> bool {
        self.lock().is_some()
    }

    pub fn outcome(&self) -> Option<bool> {
        *self.lock()
    }

    /// Waits until the outcome is set or `timeout` elapses.
    ///
    /// Returns the outcome, or `None` on timeout. A timeout too large to
    /// express as a deadline waits for the outcome without a limit.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<bool> {
        let deadline = Instant::now().checked_add(timeout);
        let mut outcome = self.lock();
        while outcome.is_none() {
            outcome = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return None;
                    }
                    match self.ready.wait_timeout(outcome, deadline - now) {
                        Ok((guard, _)) => guard,
                        Err(poisoned) => poisoned.into_inner().0,
                    }
                }
                None => self
                    .ready
                    .wait(outcome)
                    .unwrap_or_else(|poisoned| poisoned.into_inner()),
            };
        }
        *outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_complete_once() {
        let c = Completion::new();
        assert!(!c.is_complete());
        assert!(c.complete(true));
        assert!(!c.complete(false));
        assert_eq!(c.outcome(), Some(true));
    }

    #[test]
    fn test_wait_times_out() {
        let c = Completion::new();
        let start = Instant::now();
        assert_eq!(c.wait_timeout(Duration::from_millis(50)), None);
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_wait_wakes_on_complete() {
        let c = Arc::new(Completion::new());
        let c2 = c.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            c2.complete(false);
        });
        assert_eq!(c.wait_timeout(Duration::from_secs(5)), Some(false));
        handle.join().unwrap();
    }

    #[test]
    fn test_wait_returns_immediately_when_complete() {
        let c = Completion::new();
        c.complete(true);
        assert_eq!(c.wait_timeout(Duration::ZERO), Some(true));
    }

    #[test]
    fn test_wait_with_unbounded_timeout() {
        let c = Completion::new();
        c.complete(true);
        assert_eq!(c.wait_timeout(Duration::MAX), Some(true));

        let c = Arc::new(Completion::new());
        let c2 = c.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            c2.complete(false);
        });
        assert_eq!(c.wait_timeout(Duration::MAX), Some(false));
        handle.join().unwrap();
    }
}

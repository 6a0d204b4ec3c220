use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// A single-use waitable handle. Starts closed; `open` releases every thread
/// currently blocked on it and makes any later wait return immediately.
/// A gate never closes again, the owning event installs a fresh one instead.
#[derive(Debug)]
pub(crate) struct Gate {
    opened: Mutex<bool>,
    cond: Condvar,
}

impl Gate {
    pub(crate) fn new() -> Self {
        Self {
            opened: Mutex::new(false),
            cond: Condvar::new(),
        }
    }

    /// Opens the gate, waking all current waiters. Idempotent.
    pub(crate) fn open(&self) {
        let mut opened = self.opened.lock().unwrap();
        if !*opened {
            *opened = true;
            self.cond.notify_all();
        }
    }

    /// Blocks until the gate is opened.
    pub(crate) fn wait(&self) {
        let mut opened = self.opened.lock().unwrap();
        while !*opened {
            opened = self.cond.wait(opened).unwrap();
        }
    }

    /// Blocks until the gate is opened or `timeout` expires.
    /// Returns true if the gate was opened, false if the timeout expired.
    pub(crate) fn wait_timeout(&self, timeout: Duration) -> bool {
        let opened = self.opened.lock().unwrap();
        let (opened, _result) = self
            .cond
            .wait_timeout_while(opened, timeout, |opened| !*opened)
            .unwrap();
        *opened
    }
}

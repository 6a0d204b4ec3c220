use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;

use super::gate::Gate;

/// A resettable broadcast event.
///
/// Any number of threads may block in [`wait`](Event::wait) or
/// [`wait_timeout`](Event::wait_timeout) until the event is set; a single
/// [`set`](Event::set) wakes all of them at once. Unlike a one-shot signal the
/// event can be [`clear`](Event::clear)ed and set again for a new round of
/// waiters.
///
/// There is no lock serializing the whole event. Waiters register on the
/// current gate, and a set that finds registered waiters swaps in a fresh
/// gate and opens the one it swapped out. Threads that captured the old gate
/// are woken; threads arriving later see the flag already set.
#[derive(Clone)]
pub struct Event {
    inner: Arc<EventState>,
}

struct EventState {
    signaled: AtomicBool,
    waiters: AtomicI32,
    gate: ArcSwap<Gate>,
}

impl Event {
    /// Creates a new event in the unsignaled state.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(EventState {
                signaled: AtomicBool::new(false),
                waiters: AtomicI32::new(0),
                gate: ArcSwap::from_pointee(Gate::new()),
            }),
        }
    }

    /// Returns true if the event is currently set.
    pub fn is_set(&self) -> bool {
        self.inner.signaled.load(Ordering::SeqCst)
    }

    /// Sets the event, waking every thread currently waiting on it.
    /// Safe to call redundantly and concurrently; only the call that actually
    /// flips the flag broadcasts, and only if somebody is registered.
    pub fn set(&self) {
        let state = &*self.inner;
        if state
            .signaled
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
            && state.waiters.load(Ordering::SeqCst) > 0
        {
            // The exchange hands the previous gate to exactly one caller,
            // so each gate is opened at most once.
            let previous = state.gate.swap(Arc::new(Gate::new()));
            previous.open();
        }
    }

    /// Clears the event. Does not touch the gate; future waiters simply fall
    /// through to the blocking path again.
    pub fn clear(&self) {
        self.inner.signaled.store(false, Ordering::SeqCst);
    }

    /// Blocks until the event is set. Returns immediately if it already is.
    pub fn wait(&self) {
        let state = &*self.inner;
        loop {
            if state.signaled.load(Ordering::SeqCst) {
                return;
            }
            state.waiters.fetch_add(1, Ordering::SeqCst);
            let gate = state.gate.load_full();
            // The flag may have flipped between the check above and the gate
            // capture; a set() that found no waiters never opens any gate,
            // so the flag must be re-checked before blocking.
            if state.signaled.load(Ordering::SeqCst) {
                state.waiters.fetch_sub(1, Ordering::SeqCst);
                return;
            }
            gate.wait();
            state.waiters.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// Blocks until the event is set or `timeout` elapses.
    /// Returns true if the event was observed set, false on timeout. The flag
    /// gets one final check after the deadline expires, so a set racing the
    /// timer is never reported as a timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let state = &*self.inner;
        let deadline = match Instant::now().checked_add(timeout) {
            Some(deadline) => deadline,
            // A timeout too large to represent never expires.
            None => {
                self.wait();
                return true;
            }
        };
        let mut timed_out = false;
        loop {
            if state.signaled.load(Ordering::SeqCst) {
                return true;
            }
            if timed_out {
                return false;
            }
            state.waiters.fetch_add(1, Ordering::SeqCst);
            let gate = state.gate.load_full();
            if state.signaled.load(Ordering::SeqCst) {
                state.waiters.fetch_sub(1, Ordering::SeqCst);
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                timed_out = true;
            } else if !gate.wait_timeout(remaining) && Instant::now() >= deadline {
                // The condvar may return early; only a wait that actually ran
                // past the deadline counts. An early return just re-arms with
                // the remainder on the next pass.
                timed_out = true;
            }
            state.waiters.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("signaled", &self.is_set())
            .field("waiters", &self.inner.waiters.load(Ordering::SeqCst))
            .finish()
    }
}

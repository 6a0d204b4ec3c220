// Copyright (c) 2025 Virtual Cable S.L.U.
// All rights reserved.
// Redistribution and use in source and binary forms, with or without modification,
// are permitted provided that the following conditions are met:
//    * Redistributions of source code must retain the above copyright notice,
//      this list of conditions and the following disclaimer.
//    * Redistributions in binary form must reproduce the above copyright notice,
//      this list of conditions and the following disclaimer in the documentation
//      and/or other materials provided with the distribution.
//    * Neither the name of Virtual Cable S.L.U. nor the names of its contributors
//      may be used to endorse or promote products derived from this software
//      without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
/*!
Author: Adolfo Gómez, dkmaster at dkmon dot com
*/
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Result, anyhow};

use crate::log;
use crate::sync::Event;

/// Runs a function at a regular interval on a background thread until the
/// handle is stopped or dropped.
#[derive(Debug)]
pub struct Periodic {
    stop: Event,
    handle: Option<JoinHandle<()>>,
}

impl Periodic {
    /// Spawns the worker. The first call to `f` happens one `interval` after
    /// the spawn, not immediately.
    pub fn spawn<F>(interval: Duration, mut f: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let stop = Event::new();
        let ticker_stop = stop.clone();
        crate::debug_dev!("periodic worker starting, interval {:?}", interval);
        let handle = thread::spawn(move || {
            loop {
                // The stop event doubles as the tick timer: a timeout is a
                // tick, a set is a cancellation.
                if ticker_stop.wait_timeout(interval) {
                    break;
                }
                f();
            }
            log::debug!("periodic worker stopped");
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Signals the worker and waits for it to finish.
    pub fn stop(mut self) -> Result<()> {
        self.stop.set();
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| anyhow!("periodic worker panicked")),
            None => Ok(()),
        }
    }
}

impl Drop for Periodic {
    fn drop(&mut self) {
        self.stop.set();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

// Copyright 2025 the Ergon authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Wake-up signalling between job submitters and worker threads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};

/// A binary wake event owned by a single worker thread.
///
/// `raise` is sticky: a raise while the worker is busy is observed on its
/// next `wait`, so wakeups are never lost between draining passes.
#[derive(Debug, Default)]
pub(crate) struct WakeEvent {
    raised: Mutex<bool>,
    condvar: Condvar,
}

impl WakeEvent {
    /// Raises the event, waking the owning worker if it is blocked.
    pub(crate) fn raise(&self) {
        let mut raised = self.raised.lock().unwrap();
        *raised = true;
        self.condvar.notify_one();
    }

    /// Blocks until the event is raised, then consumes it.
    pub(crate) fn wait(&self) {
        let mut raised = self.raised.lock().unwrap();
        while !*raised {
            raised = self.condvar.wait(raised).unwrap();
        }
        *raised = false;
    }
}

/// Signals shared between the manager, every job list, and every worker:
/// one wake event per worker plus the global termination flag.
#[derive(Debug)]
pub(crate) struct WorkerSignals {
    events: Vec<WakeEvent>,
    terminating: AtomicBool,
}

impl WorkerSignals {
    pub(crate) fn new(worker_threads: usize) -> Self {
        let events = (0..worker_threads).map(|_| WakeEvent::default()).collect();
        Self {
            events,
            terminating: AtomicBool::new(false),
        }
    }

    /// The private wake event of worker `thread_id`.
    pub(crate) fn event(&self, thread_id: usize) -> &WakeEvent {
        &self.events[thread_id]
    }

    /// Wakes every worker thread.
    pub(crate) fn wake_all(&self) {
        for event in &self.events {
            event.raise();
        }
    }

    /// Flags global termination. Workers exit after their current draining
    /// pass; the flag is never cleared.
    pub(crate) fn begin_termination(&self) {
        self.terminating.store(true, Ordering::SeqCst);
    }

    pub(crate) fn is_terminating(&self) -> bool {
        self.terminating.load(Ordering::SeqCst)
    }
}

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

//! The worker-thread pool and its job lists.

use std::sync::Arc;
use std::thread;

use crate::config::JobSystemConfig;
use crate::list::JobList;
use crate::signal::WorkerSignals;

/// Upper bound on worker threads a manager will spawn.
pub const MAX_WORKER_THREADS: usize = 32;

/// Upper bound on job lists a manager will own.
pub const MAX_JOB_LISTS: usize = 32;

/// Owns a fixed pool of worker threads and a fixed set of [`JobList`]s.
///
/// Workers sleep on a private wake event while idle and are woken whenever
/// any list is submitted. Each woken worker drains every list once,
/// starting at `(thread_id + offset) % list_count` so that idle workers do
/// not all pile onto list 0 and starve the later lists.
///
/// Dropping the manager (or calling [`shutdown`](Self::shutdown)) drains
/// every list, then joins the pool. A shut-down manager is terminal: lists
/// obtained from it must not be submitted to afterwards, since no worker
/// remains to drain them.
pub struct JobManager {
    lists: Vec<Arc<JobList>>,
    signals: Arc<WorkerSignals>,
    workers: Vec<thread::JoinHandle<()>>,
    worker_threads: usize,
    shut_down: bool,
}

impl JobManager {
    /// Spawns the worker pool and creates the job lists.
    ///
    /// `config.worker_threads` of `0` or above [`MAX_WORKER_THREADS`] is
    /// clamped to [`MAX_WORKER_THREADS`]; the clamp is logged because
    /// defaulting to the maximum is a policy callers should be aware of.
    ///
    /// # Panics
    ///
    /// Panics if `config.job_lists` is outside `1..=MAX_JOB_LISTS`.
    pub fn new(config: JobSystemConfig) -> Self {
        let worker_threads = if config.worker_threads == 0 || config.worker_threads > MAX_WORKER_THREADS
        {
            log::warn!(
                "worker thread count {} out of range; clamping to {MAX_WORKER_THREADS}",
                config.worker_threads
            );
            MAX_WORKER_THREADS
        } else {
            config.worker_threads
        };
        assert!(
            (1..=MAX_JOB_LISTS).contains(&config.job_lists),
            "job list count must be in 1..={MAX_JOB_LISTS}, got {}",
            config.job_lists
        );

        let signals = Arc::new(WorkerSignals::new(worker_threads));
        let lists: Vec<Arc<JobList>> = (0..config.job_lists)
            .map(|index| Arc::new(JobList::new(index, Arc::clone(&signals))))
            .collect();

        let shared_lists: Arc<[Arc<JobList>]> = lists.clone().into();
        let workers = (0..worker_threads)
            .map(|thread_id| {
                let lists = Arc::clone(&shared_lists);
                let signals = Arc::clone(&signals);
                thread::spawn(move || worker_loop(thread_id, &lists, &signals))
            })
            .collect();

        log::info!(
            "job manager started: {worker_threads} worker threads, {} job lists",
            config.job_lists
        );
        Self {
            lists,
            signals,
            workers,
            worker_threads,
            shut_down: false,
        }
    }

    /// A shared handle to one of the manager's job lists.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn job_list(&self, index: usize) -> Arc<JobList> {
        Arc::clone(&self.lists[index])
    }

    /// Number of job lists owned by this manager.
    pub fn job_lists(&self) -> usize {
        self.lists.len()
    }

    /// Number of worker threads in the pool.
    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    /// Total jobs executed across every list.
    pub fn executed_jobs(&self) -> usize {
        self.lists.iter().map(|list| list.executed_jobs()).sum()
    }

    /// Drains every list, then terminates and joins every worker thread.
    ///
    /// Idempotent; also invoked from `Drop`. After it returns the manager
    /// must not be used to schedule further work.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        log::info!("job manager shutting down");
        // Kick idle workers so outstanding batches drain before termination.
        self.signals.wake_all();
        for list in &self.lists {
            list.wait();
        }
        self.signals.begin_termination();
        self.signals.wake_all();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::error!("a worker thread panicked while shutting down");
            }
        }
        log::info!(
            "job manager stopped ({} jobs executed)",
            self.executed_jobs()
        );
    }
}

impl Drop for JobManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Per-thread worker routine.
///
/// Idle workers block on their private wake event. Once woken, a worker
/// drains every list, starting at an offset rotated by its thread id, then
/// goes back to sleep. The termination flag is honored after the current
/// draining pass, never mid-list.
fn worker_loop(thread_id: usize, lists: &[Arc<JobList>], signals: &WorkerSignals) {
    log::debug!("job worker {thread_id} running");
    loop {
        signals.event(thread_id).wait();
        if signals.is_terminating() {
            break;
        }
        for offset in 0..lists.len() {
            let list = &lists[(thread_id + offset) % lists.len()];
            list.run_submitted_jobs();
        }
        if signals.is_terminating() {
            break;
        }
    }
    log::debug!("job worker {thread_id} exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_zero_worker_threads_to_max() {
        let mut manager = JobManager::new(JobSystemConfig {
            worker_threads: 0,
            job_lists: 1,
        });
        assert_eq!(manager.worker_threads(), MAX_WORKER_THREADS);
        manager.shutdown();
    }

    #[test]
    fn clamps_oversized_worker_threads_to_max() {
        let mut manager = JobManager::new(JobSystemConfig {
            worker_threads: MAX_WORKER_THREADS + 10,
            job_lists: 1,
        });
        assert_eq!(manager.worker_threads(), MAX_WORKER_THREADS);
        manager.shutdown();
    }

    #[test]
    #[should_panic(expected = "job list count")]
    fn rejects_zero_job_lists() {
        let _ = JobManager::new(JobSystemConfig {
            worker_threads: 1,
            job_lists: 0,
        });
    }

    #[test]
    #[should_panic(expected = "job list count")]
    fn rejects_oversized_job_list_count() {
        let _ = JobManager::new(JobSystemConfig {
            worker_threads: 1,
            job_lists: MAX_JOB_LISTS + 1,
        });
    }

    #[test]
    fn shutdown_is_idempotent_and_drop_safe() {
        let mut manager = JobManager::new(JobSystemConfig {
            worker_threads: 2,
            job_lists: 2,
        });
        manager.shutdown();
        manager.shutdown();
        // Drop runs shutdown a third time; it must be a no-op.
    }
}

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

//! # Ergon Jobs
//!
//! The asynchronous job scheduling core of the engine: a fixed pool of
//! worker threads consuming work from multiple independent job lists with
//! explicit submit/wait barriers.
//!
//! Callers queue closures on a [`JobList`], publish them with
//! [`JobList::submit`] (non-blocking), and later block on
//! [`JobList::wait`] until every submitted job has run. Worker threads
//! round-robin across all lists; each job runs exactly once, on exactly one
//! worker. Within one submitted batch the execution order is unspecified.
//!
//! The [`JobManager`] owns the worker threads and the lists. There are no
//! global singletons: construct a manager, hand out
//! [`JobList`](JobList) handles via [`JobManager::job_list`], and drop (or
//! [`shutdown`](JobManager::shutdown)) the manager to join the pool.
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use ergon_jobs::{JobManager, JobSystemConfig};
//!
//! let mut manager = JobManager::new(JobSystemConfig {
//!     worker_threads: 2,
//!     job_lists: 1,
//! });
//! let list = manager.job_list(0);
//!
//! let counter = Arc::new(AtomicUsize::new(0));
//! for _ in 0..100 {
//!     let counter = Arc::clone(&counter);
//!     list.add_job(move || {
//!         counter.fetch_add(1, Ordering::Relaxed);
//!     });
//! }
//! list.submit_and_wait();
//! assert_eq!(counter.load(Ordering::Relaxed), 100);
//!
//! manager.shutdown();
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod list;
pub mod manager;

pub(crate) mod signal;

pub use config::JobSystemConfig;
pub use list::{JobList, DEFAULT_MAX_PARALLEL_JOBS};
pub use manager::{JobManager, MAX_JOB_LISTS, MAX_WORKER_THREADS};

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

//! Configuration for the job scheduling system.

use serde::{Deserialize, Serialize};

/// Configuration for a [`JobManager`](crate::JobManager).
///
/// Both counts are fixed for the manager's lifetime; there is no dynamic
/// resizing of the worker pool or the list set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSystemConfig {
    /// Number of worker threads to spawn.
    ///
    /// `0` or any value above [`MAX_WORKER_THREADS`](crate::MAX_WORKER_THREADS)
    /// is clamped to `MAX_WORKER_THREADS`. The zero-means-maximum policy is
    /// deliberate and logged when it fires.
    pub worker_threads: usize,
    /// Number of independent job lists owned by the manager.
    ///
    /// Must be in `1..=MAX_JOB_LISTS`; out-of-range values are a caller bug
    /// and panic at construction.
    pub job_lists: usize,
}

impl Default for JobSystemConfig {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            job_lists: 1,
        }
    }
}

impl JobSystemConfig {
    /// Load a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

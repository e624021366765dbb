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

// Ergon Sandbox
// Drives the job scheduler through console commands, the way the engine's
// console and key bindings would.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use ergon_console::{CommandProcessor, CommandRegistry};
use ergon_jobs::{JobManager, JobSystemConfig};

const COMMANDS_HELP: &[(&str, &str)] = &[
    ("help", "list the available commands"),
    ("echo", "print the remaining arguments"),
    ("spawn_jobs", "queue and run N counter jobs (default 16)"),
    ("stats", "print scheduler counters"),
];

fn main() -> Result<()> {
    env_logger::init();

    let mut manager = JobManager::new(JobSystemConfig {
        worker_threads: 4,
        job_lists: 2,
    });
    let frame_jobs = manager.job_list(0);
    frame_jobs.set_max_parallel_jobs(256);

    let work_done = Arc::new(AtomicUsize::new(0));
    let mut registry = CommandRegistry::new();

    registry.register("help", COMMANDS_HELP[0].1, |_| {
        for (name, description) in COMMANDS_HELP {
            log::info!("  {name:<12} {description}");
        }
    })?;

    registry.register("echo", COMMANDS_HELP[1].1, |args| {
        let line = args.args()[1..].join(" ");
        log::info!("{line}");
    })?;

    {
        let list = Arc::clone(&frame_jobs);
        let work_done = Arc::clone(&work_done);
        registry.register("spawn_jobs", COMMANDS_HELP[2].1, move |args| {
            let count: usize = args
                .arg(1)
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(16);
            for _ in 0..count {
                let work_done = Arc::clone(&work_done);
                list.add_job(move || {
                    work_done.fetch_add(1, Ordering::Relaxed);
                });
            }
            list.submit_and_wait();
            log::info!("spawn_jobs: {count} jobs completed");
        })?;
    }

    {
        let list = Arc::clone(&frame_jobs);
        let work_done = Arc::clone(&work_done);
        registry.register("stats", COMMANDS_HELP[3].1, move |_| {
            log::info!(
                "stats: {} jobs executed across {} batches, {} units of work done",
                list.executed_jobs(),
                list.submitted_batches(),
                work_done.load(Ordering::Relaxed)
            );
        })?;
    }

    // A scripted session: what a console or a startup script would feed in.
    let mut console = CommandProcessor::new();
    console.append("help\n");
    console.append("spawn_jobs 64; spawn_jobs 128 // two bursts back to back\n");
    console.append("echo \"all bursts done\"\n");
    console.append("stats");
    // Jumps the queue, so it runs first.
    console.insert("echo warming up");
    console.execute(&mut registry);

    manager.shutdown();
    Ok(())
}

// Copyright 2025 eraflo
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

//! sysinfo-based implementation of the MemoryProbe trait.

use std::sync::Mutex;
use studydash_core::performance::{MemoryMetrics, MemoryProbe};
use sysinfo::{Pid, ProcessesToUpdate, System};

/// A memory probe that reports this process's resident memory against the
/// memory available to it, using the `sysinfo` crate.
#[derive(Debug)]
pub struct SysinfoMemoryProbe {
    system: Mutex<System>,
    pid: Option<Pid>,
}

impl SysinfoMemoryProbe {
    /// Creates a new SysinfoMemoryProbe for the current process.
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                log::warn!("Cannot resolve the current process id: {e}");
                None
            }
        };
        Self {
            system: Mutex::new(System::new()),
            pid,
        }
    }
}

impl MemoryProbe for SysinfoMemoryProbe {
    fn sample(&self) -> Option<MemoryMetrics> {
        let pid = self.pid?;
        let mut system = self.system.lock().ok()?;
        system.refresh_memory();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        let process = system.process(pid)?;
        // A cgroup limit, when present, is the real ceiling.
        let limit = system
            .cgroup_limits()
            .map(|limits| limits.total_memory)
            .unwrap_or_else(|| system.total_memory());

        Some(MemoryMetrics {
            used_heap_bytes: process.memory(),
            total_heap_bytes: process.virtual_memory().min(limit),
            heap_limit_bytes: limit,
        })
    }
}

impl Default for SysinfoMemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_reports_this_process() {
        let probe = SysinfoMemoryProbe::new();
        if let Some(sample) = probe.sample() {
            assert!(sample.used_heap_bytes > 0);
            assert!(sample.heap_limit_bytes > 0);
            assert!(sample.usage_ratio().is_some());
        }
    }
}

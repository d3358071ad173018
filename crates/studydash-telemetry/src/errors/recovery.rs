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

//! Bounded automatic recovery.

use crate::sync::lock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use studydash_core::RecoveryAction;

/// Counts automatic recovery attempts per `category_code` key.
///
/// A key that reached the attempt limit stays suppressed until one of its
/// attempts succeeds.
#[derive(Debug, Default)]
pub struct RecoveryTracker {
    attempts: Mutex<HashMap<String, u32>>,
}

impl RecoveryTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the next attempt for `key`, returning its 1-based number, or
    /// `None` once `max_attempts` have been made.
    pub fn begin(&self, key: &str, max_attempts: u32) -> Option<u32> {
        let mut attempts = lock(&self.attempts);
        let count = attempts.entry(key.to_string()).or_insert(0);
        if *count >= max_attempts {
            return None;
        }
        *count += 1;
        Some(*count)
    }

    /// Forgets `key` after a successful attempt.
    pub fn succeeded(&self, key: &str) {
        lock(&self.attempts).remove(key);
    }

    /// Attempts made so far for `key`.
    pub fn attempts(&self, key: &str) -> u32 {
        lock(&self.attempts).get(key).copied().unwrap_or(0)
    }

    /// Forgets every key.
    pub fn clear(&self) {
        lock(&self.attempts).clear();
    }
}

/// Runs `action` on its own task after its delay.
///
/// The outcome only updates `tracker`; failures are logged.
pub(crate) fn spawn_attempt(tracker: Arc<RecoveryTracker>, key: String, action: RecoveryAction) {
    let runtime = match tokio::runtime::Handle::try_current() {
        Ok(runtime) => runtime,
        Err(e) => {
            log::warn!("No runtime for automatic recovery of '{key}': {e}");
            return;
        }
    };
    runtime.spawn(async move {
        if let Some(delay) = action.delay() {
            tokio::time::sleep(delay).await;
        }
        match action.execute().await {
            Ok(()) => {
                log::info!("Automatic recovery '{}' for '{key}' succeeded.", action.label);
                tracker.succeeded(&key);
            }
            Err(e) => {
                log::warn!(
                    "Automatic recovery '{}' for '{key}' failed ({} attempts so far): {e:#}",
                    action.label,
                    tracker.attempts(&key)
                );
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempts_are_capped() {
        let tracker = RecoveryTracker::new();
        assert_eq!(tracker.begin("server_HTTP_503", 2), Some(1));
        assert_eq!(tracker.begin("server_HTTP_503", 2), Some(2));
        assert_eq!(tracker.begin("server_HTTP_503", 2), None);
        assert_eq!(tracker.attempts("server_HTTP_503"), 2);
        assert_eq!(tracker.begin("network_NETWORK_ERROR", 2), Some(1));
    }

    #[test]
    fn test_success_resets_the_key() {
        let tracker = RecoveryTracker::new();
        tracker.begin("k", 1);
        assert_eq!(tracker.begin("k", 1), None);
        tracker.succeeded("k");
        assert_eq!(tracker.attempts("k"), 0);
        assert_eq!(tracker.begin("k", 1), Some(1));
    }
}

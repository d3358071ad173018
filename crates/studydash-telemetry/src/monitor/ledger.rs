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

//! Aggregates the monitor keeps for the performance analyzer.

use crate::stats::RollingWindow;
use std::collections::VecDeque;
use std::time::Instant;
use studydash_core::performance::{
    ApiMetrics, InteractionMetrics, NavigationMetrics, ResourceEntry, ResourceMetrics,
};
use studydash_core::telemetry::UserEventKind;

/// Resource entries kept for aggregation.
const MAX_RESOURCE_ENTRIES: usize = 500;

/// Running aggregates of what the monitor has seen.
#[derive(Debug)]
pub struct PerformanceLedger {
    started_at: Instant,
    navigation: Option<NavigationMetrics>,
    resources: VecDeque<ResourceEntry>,
    clicks: u64,
    scrolls: u64,
    user_events: u64,
    api_calls: u64,
    api_failures: u64,
    api_latency: RollingWindow,
}

impl PerformanceLedger {
    /// Creates an empty ledger keeping `api_window` recent API latencies.
    pub fn new(api_window: usize) -> Self {
        Self {
            started_at: Instant::now(),
            navigation: None,
            resources: VecDeque::new(),
            clicks: 0,
            scrolls: 0,
            user_events: 0,
            api_calls: 0,
            api_failures: 0,
            api_latency: RollingWindow::new(api_window),
        }
    }

    /// Stores the latest navigation timing.
    pub fn record_navigation(&mut self, navigation: NavigationMetrics) {
        self.navigation = Some(navigation);
    }

    /// Stores one resource entry.
    pub fn record_resource(&mut self, entry: ResourceEntry) {
        if self.resources.len() == MAX_RESOURCE_ENTRIES {
            self.resources.pop_front();
        }
        self.resources.push_back(entry);
    }

    /// Counts one user event.
    pub fn record_user_event(&mut self, kind: UserEventKind) {
        self.user_events += 1;
        match kind {
            UserEventKind::Click => self.clicks += 1,
            UserEventKind::Scroll => self.scrolls += 1,
            _ => {}
        }
    }

    /// Counts one API call.
    pub fn record_api_call(&mut self, name: &str, duration_ms: f64, failed: bool) {
        self.api_calls += 1;
        if failed {
            self.api_failures += 1;
        }
        self.api_latency.push(name, duration_ms);
    }

    /// Milliseconds since the ledger was created.
    pub fn session_duration_ms(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64() * 1000.0
    }

    /// The latest navigation timing, or zeros if the page never loaded.
    pub fn navigation(&self) -> NavigationMetrics {
        self.navigation.unwrap_or_default()
    }

    /// Resource sizes over the stored entries.
    pub fn resources(&self) -> ResourceMetrics {
        ResourceMetrics::from_entries(self.resources.iter())
    }

    /// Interaction counts.
    pub fn interactions(&self) -> InteractionMetrics {
        InteractionMetrics {
            clicks: self.clicks,
            scrolls: self.scrolls,
            total_events: self.user_events,
            session_duration_ms: self.session_duration_ms(),
        }
    }

    /// API aggregates over the recent window.
    pub fn api(&self) -> ApiMetrics {
        let slowest = self.api_latency.max();
        ApiMetrics {
            total_calls: self.api_calls,
            failed_calls: self.api_failures,
            average_response_ms: self.api_latency.average(),
            max_response_ms: slowest.map(|(_, v)| v).unwrap_or(0.0),
            error_rate: if self.api_calls > 0 {
                self.api_failures as f64 / self.api_calls as f64
            } else {
                0.0
            },
            slowest_endpoint: slowest.map(|(name, _)| name.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_aggregates() {
        let mut ledger = PerformanceLedger::new(10);
        ledger.record_api_call("GET /api/plans", 100.0, false);
        ledger.record_api_call("POST /api/log", 500.0, true);

        let api = ledger.api();
        assert_eq!(api.total_calls, 2);
        assert_eq!(api.failed_calls, 1);
        assert!((api.average_response_ms - 300.0).abs() < f64::EPSILON);
        assert!((api.error_rate - 0.5).abs() < f64::EPSILON);
        assert_eq!(api.slowest_endpoint.as_deref(), Some("POST /api/log"));
    }

    #[test]
    fn test_interaction_counts() {
        let mut ledger = PerformanceLedger::new(10);
        ledger.record_user_event(UserEventKind::Click);
        ledger.record_user_event(UserEventKind::Click);
        ledger.record_user_event(UserEventKind::Scroll);
        ledger.record_user_event(UserEventKind::Resize);

        let interactions = ledger.interactions();
        assert_eq!(interactions.clicks, 2);
        assert_eq!(interactions.scrolls, 1);
        assert_eq!(interactions.total_events, 4);
    }

    #[test]
    fn test_navigation_defaults_to_zero() {
        let ledger = PerformanceLedger::new(10);
        assert_eq!(ledger.navigation(), NavigationMetrics::default());
    }
}

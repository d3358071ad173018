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

//! A [`PerformanceSource`] backed by the event monitor's ledger.

use crate::monitor::EventMonitor;
use async_trait::async_trait;
use std::sync::Arc;
use studydash_core::performance::{
    ApiMetrics, InteractionMetrics, MemoryMetrics, MemoryProbe, NavigationMetrics,
    PerformanceSource, ResourceMetrics,
};

/// Reads navigation, resource, interaction, and API aggregates from an
/// [`EventMonitor`], and heap usage from an optional [`MemoryProbe`].
#[derive(Debug, Clone)]
pub struct MonitorPerformanceSource {
    monitor: EventMonitor,
    probe: Option<Arc<dyn MemoryProbe>>,
}

impl MonitorPerformanceSource {
    /// Creates a source reading from `monitor`.
    pub fn new(monitor: EventMonitor, probe: Option<Arc<dyn MemoryProbe>>) -> Self {
        Self { monitor, probe }
    }
}

#[async_trait]
impl PerformanceSource for MonitorPerformanceSource {
    async fn navigation(&self) -> anyhow::Result<NavigationMetrics> {
        Ok(self.monitor.navigation_metrics())
    }

    async fn resources(&self) -> anyhow::Result<ResourceMetrics> {
        Ok(self.monitor.resource_metrics())
    }

    async fn memory(&self) -> anyhow::Result<Option<MemoryMetrics>> {
        Ok(self.probe.as_ref().and_then(|probe| probe.sample()))
    }

    async fn interactions(&self) -> anyhow::Result<InteractionMetrics> {
        Ok(self.monitor.interaction_metrics())
    }

    async fn api(&self) -> anyhow::Result<ApiMetrics> {
        Ok(self.monitor.api_metrics())
    }
}

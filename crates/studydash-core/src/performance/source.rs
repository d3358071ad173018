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

//! Collection contracts for the performance analyzer.

use super::metrics::{
    ApiMetrics, InteractionMetrics, MemoryMetrics, NavigationMetrics, ResourceMetrics,
};
use async_trait::async_trait;
use std::fmt::Debug;

/// Supplies the five metric families of an analysis run.
///
/// The analyzer awaits all five concurrently and fails the run if any of
/// them fails.
#[async_trait]
pub trait PerformanceSource: Send + Sync + Debug + 'static {
    /// Navigation timing and Web-Vitals-style metrics.
    async fn navigation(&self) -> anyhow::Result<NavigationMetrics>;

    /// Resource transfer sizes by type.
    async fn resources(&self) -> anyhow::Result<ResourceMetrics>;

    /// Runtime heap usage, or `None` when the host does not expose it.
    async fn memory(&self) -> anyhow::Result<Option<MemoryMetrics>>;

    /// User-interaction aggregates.
    async fn interactions(&self) -> anyhow::Result<InteractionMetrics>;

    /// API call aggregates.
    async fn api(&self) -> anyhow::Result<ApiMetrics>;
}

/// Samples the runtime heap.
pub trait MemoryProbe: Send + Sync + Debug + 'static {
    /// Takes one sample, or returns `None` if the host cannot tell.
    fn sample(&self) -> Option<MemoryMetrics>;
}

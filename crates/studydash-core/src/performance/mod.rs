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

//! Performance snapshot types and the collection contracts.
//!
//! Collection is abstracted behind [`PerformanceSource`] so the analyzer
//! never touches a host API directly.

pub mod analysis;
pub mod metrics;
pub mod source;

pub use self::analysis::{
    Bottleneck, BottleneckType, Effort, ExpectedImprovement, ImpactLevel, OptimizationSuggestion,
    PerformanceAnalysis, PerformanceScore, SuggestionCategory,
};
pub use self::metrics::{
    ApiMetrics, CollectedMetrics, InteractionMetrics, MemoryMetrics, NavigationMetrics,
    ResourceEntry, ResourceMetrics, ResourceType,
};
pub use self::source::{MemoryProbe, PerformanceSource};

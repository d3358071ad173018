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

//! Output of one performance analysis run.

use super::metrics::CollectedMetrics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a bottleneck sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottleneckType {
    /// Time until meaningful content shows up.
    Loading,
    /// Layout and paint stability.
    Rendering,
    /// Main-thread script work.
    Javascript,
    /// Bytes on the wire.
    Network,
    /// Heap pressure.
    Memory,
}

impl fmt::Display for BottleneckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BottleneckType::Loading => "loading",
            BottleneckType::Rendering => "rendering",
            BottleneckType::Javascript => "javascript",
            BottleneckType::Network => "network",
            BottleneckType::Memory => "memory",
        };
        f.write_str(name)
    }
}

/// Severity of a bottleneck, and priority of a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    /// Barely noticeable.
    Low,
    /// Noticeable.
    Medium,
    /// Hurts the experience.
    High,
    /// Breaks the experience.
    Critical,
}

/// A metric that breached a fixed threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bottleneck {
    /// Where it sits.
    #[serde(rename = "type")]
    pub kind: BottleneckType,
    /// How bad it is.
    pub severity: ImpactLevel,
    /// Offending metric name.
    pub metric: String,
    /// Observed value.
    pub value: f64,
    /// The threshold it breached.
    pub threshold: f64,
    /// Qualitative impact.
    pub impact: String,
    /// Remediation steps, in order.
    pub recommendations: Vec<String>,
}

/// Area an optimization suggestion targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    /// Script bundle size and splitting.
    Bundle,
    /// Image formats and loading.
    Images,
    /// HTTP and application caching.
    Caching,
    /// Backend call latency.
    Api,
    /// Layout and paint work.
    Rendering,
    /// Heap usage.
    Memory,
}

/// Rough implementation cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effort {
    /// An afternoon.
    Low,
    /// A few days.
    Medium,
    /// A project.
    High,
}

/// The improvement a suggestion claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedImprovement {
    /// Metric expected to improve.
    pub metric: String,
    /// By how much, qualitatively or quantitatively.
    pub improvement: String,
}

/// A prioritized remediation template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationSuggestion {
    /// Targeted area.
    pub category: SuggestionCategory,
    /// Priority.
    pub priority: ImpactLevel,
    /// Short title.
    pub title: String,
    /// One-paragraph description.
    pub description: String,
    /// Implementation steps, in order.
    pub implementation: Vec<String>,
    /// Claimed improvement.
    pub expected_improvement: ExpectedImprovement,
    /// Cost estimate.
    pub effort: Effort,
}

/// Composite 0–100 score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceScore {
    /// Weighted blend of the three sub-scores.
    pub overall: f64,
    /// From first and largest contentful paint.
    pub loading: f64,
    /// From first input delay and time to interactive.
    pub interactivity: f64,
    /// From cumulative layout shift.
    pub visual_stability: f64,
}

/// A point-in-time performance snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceAnalysis {
    /// When the run finished.
    pub timestamp: DateTime<Utc>,
    /// What was collected.
    pub metrics: CollectedMetrics,
    /// Breached thresholds.
    pub bottlenecks: Vec<Bottleneck>,
    /// Suggested remediations.
    pub suggestions: Vec<OptimizationSuggestion>,
    /// Composite score.
    pub score: PerformanceScore,
    /// Human-readable summary.
    pub summary: String,
}

impl PerformanceAnalysis {
    /// Counts bottlenecks at exactly `level`.
    pub fn count_at(&self, level: ImpactLevel) -> usize {
        self.bottlenecks
            .iter()
            .filter(|b| b.severity == level)
            .count()
    }
}

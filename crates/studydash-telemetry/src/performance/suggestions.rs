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

//! Optimization suggestion templates.

use crate::config::AnalyzerConfig;
use studydash_core::performance::{
    Bottleneck, BottleneckType, CollectedMetrics, Effort, ExpectedImprovement, ImpactLevel,
    OptimizationSuggestion, SuggestionCategory,
};

/// Builds the suggestions for a run.
///
/// One suggestion per bottleneck type present, in order of first
/// appearance, prioritized by the worst bottleneck of that type. Then a
/// caching suggestion when the cache hit rate is below target and an API
/// suggestion when the average API latency is above target.
pub fn suggest(
    bottlenecks: &[Bottleneck],
    metrics: &CollectedMetrics,
    config: &AnalyzerConfig,
) -> Vec<OptimizationSuggestion> {
    let mut kinds: Vec<(BottleneckType, ImpactLevel)> = Vec::new();
    for bottleneck in bottlenecks {
        match kinds.iter_mut().find(|(kind, _)| *kind == bottleneck.kind) {
            Some((_, priority)) => *priority = (*priority).max(bottleneck.severity),
            None => kinds.push((bottleneck.kind, bottleneck.severity)),
        }
    }

    let mut suggestions: Vec<OptimizationSuggestion> = kinds
        .into_iter()
        .map(|(kind, priority)| for_bottleneck(kind, priority))
        .collect();

    if metrics.resources.cache_hit_rate < config.cache_hit_rate_target {
        suggestions.push(caching(metrics.resources.cache_hit_rate));
    }
    if metrics.api.average_response_ms > config.api_latency_target_ms {
        suggestions.push(api(metrics.api.average_response_ms));
    }
    suggestions
}

fn steps(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn for_bottleneck(kind: BottleneckType, priority: ImpactLevel) -> OptimizationSuggestion {
    match kind {
        BottleneckType::Loading => OptimizationSuggestion {
            category: SuggestionCategory::Images,
            priority,
            title: "Optimize images".to_string(),
            description: "Large or unoptimized images delay the largest contentful paint."
                .to_string(),
            implementation: steps(&[
                "Serve WebP or AVIF with fallbacks",
                "Size images to their rendered dimensions",
                "Lazy-load images below the fold",
                "Preload the hero image",
            ]),
            expected_improvement: ExpectedImprovement {
                metric: "LCP".to_string(),
                improvement: "20-40% faster".to_string(),
            },
            effort: Effort::Low,
        },
        BottleneckType::Javascript => OptimizationSuggestion {
            category: SuggestionCategory::Bundle,
            priority,
            title: "Reduce main-thread JavaScript".to_string(),
            description: "Long script tasks block the page from responding to input.".to_string(),
            implementation: steps(&[
                "Code-split routes and heavy components",
                "Defer third-party scripts",
                "Break up long tasks with scheduling",
            ]),
            expected_improvement: ExpectedImprovement {
                metric: "FID".to_string(),
                improvement: "50-70% lower".to_string(),
            },
            effort: Effort::Medium,
        },
        BottleneckType::Rendering => OptimizationSuggestion {
            category: SuggestionCategory::Rendering,
            priority,
            title: "Stabilize the layout".to_string(),
            description: "Elements moving during load make the page hard to use.".to_string(),
            implementation: steps(&[
                "Set explicit width and height on media",
                "Reserve space for late content",
                "Animate with transforms instead of layout properties",
            ]),
            expected_improvement: ExpectedImprovement {
                metric: "CLS".to_string(),
                improvement: "below 0.1".to_string(),
            },
            effort: Effort::Low,
        },
        BottleneckType::Network => OptimizationSuggestion {
            category: SuggestionCategory::Bundle,
            priority,
            title: "Shrink the script bundle".to_string(),
            description: "The amount of JavaScript downloaded slows every first visit."
                .to_string(),
            implementation: steps(&[
                "Analyze the bundle for large dependencies",
                "Replace heavy libraries with lighter ones",
                "Enable compression on the server",
            ]),
            expected_improvement: ExpectedImprovement {
                metric: "Bundle size".to_string(),
                improvement: "30-50% smaller".to_string(),
            },
            effort: Effort::Medium,
        },
        BottleneckType::Memory => OptimizationSuggestion {
            category: SuggestionCategory::Memory,
            priority,
            title: "Reduce memory usage".to_string(),
            description: "High heap usage leads to jank and crashes on low-end devices."
                .to_string(),
            implementation: steps(&[
                "Find leaks with heap snapshots",
                "Clean up subscriptions on unmount",
                "Virtualize long lists",
            ]),
            expected_improvement: ExpectedImprovement {
                metric: "Heap usage".to_string(),
                improvement: "20-30% lower".to_string(),
            },
            effort: Effort::High,
        },
    }
}

fn caching(hit_rate: f64) -> OptimizationSuggestion {
    OptimizationSuggestion {
        category: SuggestionCategory::Caching,
        priority: ImpactLevel::Medium,
        title: "Improve caching".to_string(),
        description: format!(
            "Only {:.0}% of resources were served from cache.",
            hit_rate * 100.0
        ),
        implementation: steps(&[
            "Set long Cache-Control lifetimes on hashed assets",
            "Add a service worker for static resources",
            "Cache API responses that rarely change",
        ]),
        expected_improvement: ExpectedImprovement {
            metric: "Repeat-visit load time".to_string(),
            improvement: "40-60% faster".to_string(),
        },
        effort: Effort::Low,
    }
}

fn api(average_ms: f64) -> OptimizationSuggestion {
    OptimizationSuggestion {
        category: SuggestionCategory::Api,
        priority: ImpactLevel::High,
        title: "Speed up API calls".to_string(),
        description: format!("API calls take {average_ms:.0} ms on average."),
        implementation: steps(&[
            "Batch or parallelize independent requests",
            "Add pagination to large responses",
            "Cache responses on the client",
        ]),
        expected_improvement: ExpectedImprovement {
            metric: "API response time".to_string(),
            improvement: "30-50% faster".to_string(),
        },
        effort: Effort::Medium,
    }
}

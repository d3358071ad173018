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

//! Threshold-based bottleneck detection.

use studydash_core::performance::{
    Bottleneck, BottleneckType, CollectedMetrics, ImpactLevel, MemoryMetrics, NavigationMetrics,
    ResourceMetrics,
};

/// Largest contentful paint (ms) above which loading is a problem.
const LCP_HIGH_MS: f64 = 2500.0;
/// Largest contentful paint (ms) above which loading is critical.
const LCP_CRITICAL_MS: f64 = 4000.0;
/// First input delay (ms) above which interactivity is a problem.
const FID_HIGH_MS: f64 = 100.0;
/// First input delay (ms) above which interactivity is critical.
const FID_CRITICAL_MS: f64 = 300.0;
/// Cumulative layout shift above which the layout is unstable.
const CLS_MEDIUM: f64 = 0.1;
/// Cumulative layout shift above which the layout is critically unstable.
const CLS_CRITICAL: f64 = 0.25;
const MIB: u64 = 1024 * 1024;
/// Script bytes above which the bundle is too large.
const SCRIPT_MEDIUM_BYTES: u64 = MIB;
/// Script bytes above which the bundle is far too large.
const SCRIPT_HIGH_BYTES: u64 = 2 * MIB;
/// Heap used/limit ratio above which memory is under pressure.
const HEAP_HIGH_RATIO: f64 = 0.8;
/// Heap used/limit ratio above which memory is critical.
const HEAP_CRITICAL_RATIO: f64 = 0.9;

/// Classifies `metrics` against the fixed thresholds.
///
/// Each breached metric yields exactly one bottleneck, in the order
/// loading, javascript, rendering, network, memory.
pub fn detect(metrics: &CollectedMetrics) -> Vec<Bottleneck> {
    let mut bottlenecks = Vec::new();
    bottlenecks.extend(check_lcp(&metrics.navigation));
    bottlenecks.extend(check_fid(&metrics.navigation));
    bottlenecks.extend(check_cls(&metrics.navigation));
    bottlenecks.extend(check_scripts(&metrics.resources));
    if let Some(memory) = &metrics.memory {
        bottlenecks.extend(check_heap(memory));
    }
    for bottleneck in &bottlenecks {
        log::debug!(
            "Bottleneck: {} {:?} ({} = {} > {})",
            bottleneck.kind,
            bottleneck.severity,
            bottleneck.metric,
            bottleneck.value,
            bottleneck.threshold
        );
    }
    bottlenecks
}

fn check_lcp(navigation: &NavigationMetrics) -> Option<Bottleneck> {
    let value = navigation.largest_contentful_paint;
    let (severity, threshold) = if value > LCP_CRITICAL_MS {
        (ImpactLevel::Critical, LCP_CRITICAL_MS)
    } else if value > LCP_HIGH_MS {
        (ImpactLevel::High, LCP_HIGH_MS)
    } else {
        return None;
    };
    Some(Bottleneck {
        kind: BottleneckType::Loading,
        severity,
        metric: "largestContentfulPaint".to_string(),
        value,
        threshold,
        impact: "The main content takes too long to appear.".to_string(),
        recommendations: vec![
            "Optimize and compress above-the-fold images".to_string(),
            "Preload the largest contentful element".to_string(),
            "Reduce server response time".to_string(),
            "Remove render-blocking resources".to_string(),
        ],
    })
}

fn check_fid(navigation: &NavigationMetrics) -> Option<Bottleneck> {
    let value = navigation.first_input_delay;
    let (severity, threshold) = if value > FID_CRITICAL_MS {
        (ImpactLevel::Critical, FID_CRITICAL_MS)
    } else if value > FID_HIGH_MS {
        (ImpactLevel::High, FID_HIGH_MS)
    } else {
        return None;
    };
    Some(Bottleneck {
        kind: BottleneckType::Javascript,
        severity,
        metric: "firstInputDelay".to_string(),
        value,
        threshold,
        impact: "The page responds slowly to the first interaction.".to_string(),
        recommendations: vec![
            "Split long main-thread tasks".to_string(),
            "Defer non-critical scripts".to_string(),
            "Move heavy computation off the main thread".to_string(),
        ],
    })
}

fn check_cls(navigation: &NavigationMetrics) -> Option<Bottleneck> {
    let value = navigation.cumulative_layout_shift;
    let (severity, threshold) = if value > CLS_CRITICAL {
        (ImpactLevel::Critical, CLS_CRITICAL)
    } else if value > CLS_MEDIUM {
        (ImpactLevel::Medium, CLS_MEDIUM)
    } else {
        return None;
    };
    Some(Bottleneck {
        kind: BottleneckType::Rendering,
        severity,
        metric: "cumulativeLayoutShift".to_string(),
        value,
        threshold,
        impact: "Content shifts while the page loads.".to_string(),
        recommendations: vec![
            "Reserve space for images and embeds".to_string(),
            "Avoid inserting content above existing content".to_string(),
            "Use font-display: optional or preload fonts".to_string(),
        ],
    })
}

fn check_scripts(resources: &ResourceMetrics) -> Option<Bottleneck> {
    let bytes = resources.script_bytes;
    let (severity, threshold) = if bytes > SCRIPT_HIGH_BYTES {
        (ImpactLevel::High, SCRIPT_HIGH_BYTES)
    } else if bytes > SCRIPT_MEDIUM_BYTES {
        (ImpactLevel::Medium, SCRIPT_MEDIUM_BYTES)
    } else {
        return None;
    };
    Some(Bottleneck {
        kind: BottleneckType::Network,
        severity,
        metric: "scriptBytes".to_string(),
        value: bytes as f64,
        threshold: threshold as f64,
        impact: "Large script bundles delay startup.".to_string(),
        recommendations: vec![
            "Split the bundle by route".to_string(),
            "Remove unused dependencies".to_string(),
            "Enable tree shaking and minification".to_string(),
        ],
    })
}

fn check_heap(memory: &MemoryMetrics) -> Option<Bottleneck> {
    let ratio = memory.usage_ratio()?;
    let (severity, threshold) = if ratio > HEAP_CRITICAL_RATIO {
        (ImpactLevel::Critical, HEAP_CRITICAL_RATIO)
    } else if ratio > HEAP_HIGH_RATIO {
        (ImpactLevel::High, HEAP_HIGH_RATIO)
    } else {
        return None;
    };
    Some(Bottleneck {
        kind: BottleneckType::Memory,
        severity,
        metric: "heapUsageRatio".to_string(),
        value: ratio,
        threshold,
        impact: format!(
            "The heap is close to its limit ({:.1} MB in use).",
            memory.used_heap_mb()
        ),
        recommendations: vec![
            "Release references to detached views".to_string(),
            "Unsubscribe listeners and timers on teardown".to_string(),
            "Paginate or virtualize large lists".to_string(),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_navigation(navigation: NavigationMetrics) -> CollectedMetrics {
        CollectedMetrics {
            navigation,
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_metrics_have_no_bottlenecks() {
        assert!(detect(&CollectedMetrics::default()).is_empty());
    }

    #[test]
    fn test_lcp_bands() {
        let high = detect(&with_navigation(NavigationMetrics {
            largest_contentful_paint: 3000.0,
            ..Default::default()
        }));
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].severity, ImpactLevel::High);
        assert_eq!(high[0].threshold, LCP_HIGH_MS);

        let critical = detect(&with_navigation(NavigationMetrics {
            largest_contentful_paint: 5000.0,
            ..Default::default()
        }));
        assert_eq!(critical[0].kind, BottleneckType::Loading);
        assert_eq!(critical[0].severity, ImpactLevel::Critical);
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        let metrics = with_navigation(NavigationMetrics {
            largest_contentful_paint: LCP_HIGH_MS,
            first_input_delay: FID_HIGH_MS,
            cumulative_layout_shift: CLS_MEDIUM,
            ..Default::default()
        });
        assert!(detect(&metrics).is_empty());
    }

    #[test]
    fn test_every_family_in_order() {
        let metrics = CollectedMetrics {
            navigation: NavigationMetrics {
                largest_contentful_paint: 2600.0,
                first_input_delay: 400.0,
                cumulative_layout_shift: 0.15,
                ..Default::default()
            },
            resources: ResourceMetrics {
                script_bytes: 3 * MIB,
                ..Default::default()
            },
            memory: Some(MemoryMetrics {
                used_heap_bytes: 95,
                total_heap_bytes: 95,
                heap_limit_bytes: 100,
            }),
            ..Default::default()
        };
        let kinds: Vec<_> = detect(&metrics)
            .into_iter()
            .map(|b| (b.kind, b.severity))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (BottleneckType::Loading, ImpactLevel::High),
                (BottleneckType::Javascript, ImpactLevel::Critical),
                (BottleneckType::Rendering, ImpactLevel::Medium),
                (BottleneckType::Network, ImpactLevel::High),
                (BottleneckType::Memory, ImpactLevel::Critical),
            ]
        );
    }

    #[test]
    fn test_heap_pressure_reports_usage() {
        let metrics = CollectedMetrics {
            memory: Some(MemoryMetrics {
                used_heap_bytes: 850 * MIB,
                total_heap_bytes: 900 * MIB,
                heap_limit_bytes: 1000 * MIB,
            }),
            ..Default::default()
        };
        let bottlenecks = detect(&metrics);

        assert_eq!(bottlenecks.len(), 1);
        assert_eq!(bottlenecks[0].severity, ImpactLevel::High);
        assert!(bottlenecks[0].impact.contains("850.0 MB in use"));
    }
}

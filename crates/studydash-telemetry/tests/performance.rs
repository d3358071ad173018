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

mod common;

use common::{active_monitor_config, monitor_with, GatedSource, StaticSource};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use studydash_core::performance::{
    BottleneckType, ImpactLevel, NavigationMetrics, PerformanceAnalysis, ResourceMetrics,
    SuggestionCategory,
};
use studydash_core::telemetry::{MonitoringEvent, PerformanceKind};
use studydash_telemetry::{AnalysisError, AnalyzerConfig, PerformanceAnalyzer, ScoreWeighting};

fn analyzer(source: StaticSource) -> PerformanceAnalyzer {
    PerformanceAnalyzer::new(AnalyzerConfig::default(), Arc::new(source), None)
}

#[tokio::test]
async fn test_slow_lcp_scenario() {
    let source = StaticSource {
        navigation: NavigationMetrics {
            largest_contentful_paint: 5000.0,
            ..Default::default()
        },
        ..Default::default()
    };

    let analysis = analyzer(source).analyze_performance().await.unwrap();

    assert_eq!(analysis.bottlenecks.len(), 1);
    assert_eq!(analysis.bottlenecks[0].kind, BottleneckType::Loading);
    assert_eq!(analysis.bottlenecks[0].severity, ImpactLevel::Critical);

    let images: Vec<_> = analysis
        .suggestions
        .iter()
        .filter(|s| s.category == SuggestionCategory::Images)
        .collect();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].priority, ImpactLevel::Critical);
    // No resources loaded, so the cache hit rate is 0 and the caching check fires.
    assert_eq!(analysis.suggestions.len(), 2);
    assert_eq!(analysis.suggestions[1].category, SuggestionCategory::Caching);

    // LCP scores 0, FCP 100: loading 50. Everything else is perfect.
    assert!((analysis.score.loading - 50.0).abs() < 1e-9);
    assert_eq!(analysis.count_at(ImpactLevel::Critical), 1);
}

#[tokio::test]
async fn test_healthy_snapshot() {
    let source = StaticSource {
        resources: ResourceMetrics {
            request_count: 10,
            cached_count: 9,
            cache_hit_rate: 0.9,
            ..Default::default()
        },
        ..Default::default()
    };

    let analysis = analyzer(source).analyze_performance().await.unwrap();

    assert!(analysis.bottlenecks.is_empty());
    assert!(analysis.suggestions.is_empty());
    assert_eq!(analysis.score.overall, 100.0);
    assert!(analysis.summary.starts_with("Excellent"));
}

#[tokio::test]
async fn test_normalized_weighting() {
    let navigation = NavigationMetrics {
        first_contentful_paint: 2400.0,
        largest_contentful_paint: 3250.0,
        first_input_delay: 200.0,
        time_to_interactive: 5550.0,
        cumulative_layout_shift: 0.175,
        ..Default::default()
    };
    let source = StaticSource {
        navigation,
        ..Default::default()
    };
    let legacy = analyzer(source.clone()).analyze_performance().await.unwrap();
    let normalized = PerformanceAnalyzer::new(
        AnalyzerConfig {
            score_weighting: ScoreWeighting::Normalized,
            ..Default::default()
        },
        Arc::new(source),
        None,
    )
    .analyze_performance()
    .await
    .unwrap();

    // Every sub-score sits at 50.
    assert!((legacy.score.overall - 100.0).abs() < 1e-9);
    assert!((normalized.score.overall - 50.0).abs() < 1e-9);
    assert_eq!(legacy.score.loading, normalized.score.loading);
}

#[tokio::test]
async fn test_concurrent_run_is_rejected() {
    let source = Arc::new(GatedSource::default());
    let analyzer = PerformanceAnalyzer::new(AnalyzerConfig::default(), source.clone(), None);

    let first = tokio::spawn({
        let analyzer = analyzer.clone();
        async move { analyzer.analyze_performance().await }
    });
    for _ in 0..100 {
        if analyzer.is_running() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(analyzer.is_running());

    let second = analyzer.analyze_performance().await;
    assert!(matches!(second, Err(AnalysisError::AlreadyRunning)));
    assert!(analyzer.is_running());

    source.gate.notify_one();
    let first = first.await.unwrap().unwrap();
    assert!(!analyzer.is_running());
    let last = analyzer.last_analysis().unwrap();
    assert!(Arc::ptr_eq(&first, &last));
}

#[tokio::test]
async fn test_collection_failure_clears_busy_flag() {
    let analyzer = analyzer(StaticSource {
        fail_api: true,
        ..Default::default()
    });

    let result = analyzer.analyze_performance().await;

    match result {
        Err(AnalysisError::Collection(e)) => assert!(format!("{e:#}").contains("api stats")),
        other => panic!("expected collection failure, got {other:?}"),
    }
    assert!(!analyzer.is_running());
    assert!(analyzer.last_analysis().is_none());
}

#[tokio::test]
async fn test_completion_callbacks_are_isolated() {
    let analyzer = analyzer(StaticSource::default());
    let calls = Arc::new(AtomicUsize::new(0));

    analyzer.on_analysis_complete(|_: &PerformanceAnalysis| panic!("dashboard bug"));
    let counter = calls.clone();
    let id = analyzer.on_analysis_complete(move |analysis: &PerformanceAnalysis| {
        assert!(analysis.score.overall > 0.0);
        counter.fetch_add(1, Ordering::SeqCst);
    });

    analyzer.analyze_performance().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert!(analyzer.off_analysis_complete(id));
    analyzer.analyze_performance().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_score_is_recorded_as_custom_metric() {
    let (monitor, transport, _) = monitor_with(active_monitor_config());
    let source = StaticSource {
        navigation: NavigationMetrics {
            largest_contentful_paint: 5000.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let analyzer =
        PerformanceAnalyzer::new(AnalyzerConfig::default(), Arc::new(source), Some(monitor.clone()));

    let analysis = analyzer.analyze_performance().await.unwrap();
    monitor.flush().await;

    match &transport.sent_events()[0] {
        MonitoringEvent::Performance(perf) => {
            assert_eq!(perf.kind, PerformanceKind::Custom);
            assert_eq!(perf.name, "performance_score");
            assert_eq!(perf.duration, analysis.score.overall);
            assert_eq!(perf.metadata["bottlenecks"], 1);
            assert_eq!(perf.metadata["suggestions"], 2);
        }
        other => panic!("expected performance_score metric, got {other:?}"),
    }
}

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

//! The performance analyzer service.

use super::{bottlenecks, score, suggestions};
use crate::config::AnalyzerConfig;
use crate::monitor::EventMonitor;
use crate::observer::{ObserverList, SubscriptionId};
use crate::sync::lock;
use anyhow::Context;
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use studydash_core::performance::{CollectedMetrics, PerformanceAnalysis, PerformanceSource};
use thiserror::Error;

/// Why an analysis run produced nothing.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Another run is still in flight.
    #[error("a performance analysis is already running")]
    AlreadyRunning,
    /// A metric family could not be collected.
    #[error("failed to collect performance metrics: {0:#}")]
    Collection(anyhow::Error),
}

/// Holds the busy flag for the duration of one run.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

/// Clears the flag on every exit path, including errors and cancellation.
impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
struct AnalyzerInner {
    config: AnalyzerConfig,
    source: Arc<dyn PerformanceSource>,
    monitor: Option<EventMonitor>,
    running: AtomicBool,
    last: Mutex<Option<Arc<PerformanceAnalysis>>>,
    callbacks: ObserverList<PerformanceAnalysis>,
}

/// Turns metric snapshots into bottlenecks, suggestions, and a score.
///
/// At most one run is in flight at a time; a second call made while one is
/// running fails with [`AnalysisError::AlreadyRunning`] and leaves the first
/// untouched.
#[derive(Debug, Clone)]
pub struct PerformanceAnalyzer {
    inner: Arc<AnalyzerInner>,
}

impl PerformanceAnalyzer {
    /// Creates an analyzer collecting from `source`. With a monitor, each
    /// run records a `performance_score` custom metric.
    pub fn new(
        config: AnalyzerConfig,
        source: Arc<dyn PerformanceSource>,
        monitor: Option<EventMonitor>,
    ) -> Self {
        Self {
            inner: Arc::new(AnalyzerInner {
                config,
                source,
                monitor,
                running: AtomicBool::new(false),
                last: Mutex::new(None),
                callbacks: ObserverList::new(),
            }),
        }
    }

    /// `true` while a run is in flight.
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::Acquire)
    }

    /// The result of the latest successful run.
    pub fn last_analysis(&self) -> Option<Arc<PerformanceAnalysis>> {
        lock(&self.inner.last).clone()
    }

    /// Registers a callback run after every successful analysis.
    pub fn on_analysis_complete<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PerformanceAnalysis) + Send + Sync + 'static,
    {
        self.inner.callbacks.subscribe(callback)
    }

    /// Removes a completion callback.
    pub fn off_analysis_complete(&self, id: SubscriptionId) -> bool {
        self.inner.callbacks.unsubscribe(id)
    }

    /// Runs one analysis.
    pub async fn analyze_performance(&self) -> Result<Arc<PerformanceAnalysis>, AnalysisError> {
        let Some(_busy) = BusyGuard::acquire(&self.inner.running) else {
            log::warn!("Performance analysis requested while one is already running.");
            return Err(AnalysisError::AlreadyRunning);
        };

        let metrics = self.collect().await.map_err(AnalysisError::Collection)?;
        let bottlenecks = bottlenecks::detect(&metrics);
        let suggestions = suggestions::suggest(&bottlenecks, &metrics, &self.inner.config);
        let score = score::compute(&metrics.navigation, self.inner.config.score_weighting);
        let summary = score::summarize(&score, &bottlenecks);

        let analysis = Arc::new(PerformanceAnalysis {
            timestamp: Utc::now(),
            metrics,
            bottlenecks,
            suggestions,
            score,
            summary,
        });
        log::info!(
            "Performance analysis finished: score {:.1}, {} bottleneck(s), {} suggestion(s).",
            analysis.score.overall,
            analysis.bottlenecks.len(),
            analysis.suggestions.len()
        );

        *lock(&self.inner.last) = Some(Arc::clone(&analysis));
        self.inner.callbacks.notify(&analysis);
        if let Some(monitor) = &self.inner.monitor {
            let mut metadata = Map::new();
            metadata.insert(
                "bottlenecks".to_string(),
                Value::from(analysis.bottlenecks.len()),
            );
            metadata.insert(
                "suggestions".to_string(),
                Value::from(analysis.suggestions.len()),
            );
            monitor.track_custom_metric("performance_score", analysis.score.overall, Some(metadata));
        }
        Ok(analysis)
    }

    async fn collect(&self) -> anyhow::Result<CollectedMetrics> {
        let source = &self.inner.source;
        let (navigation, resources, memory, interactions, api) = tokio::join!(
            source.navigation(),
            source.resources(),
            source.memory(),
            source.interactions(),
            source.api(),
        );
        Ok(CollectedMetrics {
            navigation: navigation.context("navigation timing")?,
            resources: resources.context("resource timing")?,
            memory: memory.context("memory usage")?,
            interactions: interactions.context("interaction stats")?,
            api: api.context("api stats")?,
        })
    }
}

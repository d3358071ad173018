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

//! The owner of the telemetry services.

use crate::config::TelemetryConfig;
use crate::errors::ErrorStandardizer;
use crate::monitor::EventMonitor;
use crate::performance::{MonitorPerformanceSource, PerformanceAnalyzer};
use std::sync::Arc;
use studydash_core::performance::{MemoryProbe, PerformanceSource};
use studydash_core::{CollectorTransport, Notifier, Platform};

/// Builds and owns the event monitor, error standardizer, and performance
/// analyzer for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct TelemetryService {
    config: TelemetryConfig,
    monitor: EventMonitor,
    errors: ErrorStandardizer,
    analyzer: PerformanceAnalyzer,
}

impl TelemetryService {
    /// Wires the services together.
    ///
    /// The analyzer reads the monitor's ledger, plus heap usage from `probe`
    /// when one is given.
    pub fn new(
        config: TelemetryConfig,
        platform: Arc<dyn Platform>,
        transport: Arc<dyn CollectorTransport>,
        probe: Option<Arc<dyn MemoryProbe>>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        let monitor = EventMonitor::new(config.monitor.clone(), Arc::clone(&platform), transport);
        let source: Arc<dyn PerformanceSource> =
            Arc::new(MonitorPerformanceSource::new(monitor.clone(), probe));
        Self::with_source(config, platform, monitor, source, notifier)
    }

    /// Wires the services around an existing monitor and a custom
    /// performance source.
    pub fn with_source(
        config: TelemetryConfig,
        platform: Arc<dyn Platform>,
        monitor: EventMonitor,
        source: Arc<dyn PerformanceSource>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        let errors = ErrorStandardizer::new(
            config.errors.clone(),
            platform,
            Some(monitor.clone()),
            notifier,
        );
        let analyzer = PerformanceAnalyzer::new(config.analyzer.clone(), source, Some(monitor.clone()));
        Self {
            config,
            monitor,
            errors,
            analyzer,
        }
    }

    /// Starts the monitor worker. Returns `false` if it did not start.
    pub fn start(&self) -> bool {
        let started = self.monitor.start();
        if started {
            log::info!(
                "Telemetry started (endpoint {}, environment {:?}).",
                self.config.monitor.endpoint,
                self.config.monitor.environment
            );
        }
        started
    }

    /// Stops the monitor worker after a final flush.
    pub async fn shutdown(&self) {
        log::info!("Shutting down telemetry...");
        self.monitor.shutdown().await;
    }

    /// The configuration the services were built from.
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    /// Returns the event monitor.
    pub fn monitor(&self) -> &EventMonitor {
        &self.monitor
    }

    /// Returns the error standardizer.
    pub fn errors(&self) -> &ErrorStandardizer {
        &self.errors
    }

    /// Returns the performance analyzer.
    pub fn analyzer(&self) -> &PerformanceAnalyzer {
        &self.analyzer
    }
}

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

//! Host binary for the study dashboard telemetry services.
//!
//! Usage: `studydash-runtime [config.json]`
//!
//! The collector base URL is read from `STUDYDASH_COLLECTOR_BASE`
//! (default `http://localhost:3000`) and joined with `monitor.endpoint` when
//! the endpoint is a path.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use studydash_core::performance::{NavigationMetrics, ResourceEntry};
use studydash_core::telemetry::HostSignal;
use studydash_core::{ErrorContext, RaisedError};
use studydash_infra::{HeadlessPlatform, HttpCollector, LogNotifier, SysinfoMemoryProbe};
use studydash_telemetry::{TelemetryConfig, TelemetryService};

const DEFAULT_COLLECTOR_BASE: &str = "http://localhost:3000";

fn load_config() -> Result<TelemetryConfig> {
    match std::env::args().nth(1) {
        Some(path) => TelemetryConfig::from_file(&path)
            .with_context(|| format!("failed to load config from '{path}'")),
        None => {
            let mut config = TelemetryConfig::default();
            config.monitor.enabled = true;
            Ok(config)
        }
    }
}

fn resolve_endpoint(base: &str, endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

async fn replay_session(service: &TelemetryService) -> Result<()> {
    let monitor = service.monitor();
    monitor.set_user_id(Some("demo-user".to_string()));

    monitor.publish(HostSignal::Load(NavigationMetrics {
        time_to_first_byte: 180.0,
        dom_content_loaded: 900.0,
        load_complete: 1600.0,
        first_paint: 700.0,
        first_contentful_paint: 1200.0,
        largest_contentful_paint: 2900.0,
        first_input_delay: 40.0,
        cumulative_layout_shift: 0.05,
        time_to_interactive: 2100.0,
    }));
    monitor.publish(HostSignal::Resource(ResourceEntry::new(
        "/static/app.js",
        420_000,
        420_000,
        1350.0,
    )));
    monitor.publish(HostSignal::Resource(ResourceEntry::new(
        "/img/hero.webp",
        0,
        90_000,
        4.0,
    )));
    monitor.publish(HostSignal::Click {
        target: "button#start-session".to_string(),
    });
    monitor.publish(HostSignal::Scroll { x: 0.0, y: 640.0 });

    monitor.track_api_call(
        "/api/study-plans",
        "get",
        Duration::from_millis(240),
        Some(200),
        None,
    );
    monitor.track_api_call(
        "/api/progress",
        "post",
        Duration::from_millis(1800),
        Some(503),
        None,
    );

    let handled = service
        .errors()
        .handle_api_error(
            &RaisedError::http(503, "Service Unavailable"),
            "/api/progress",
            "post",
            ErrorContext::new().with_component("ProgressPanel"),
        )
        .await;
    log::info!(
        "Handled {} as {:?}/{:?}: {}",
        handled.id,
        handled.category,
        handled.severity,
        handled.user_message
    );

    // Let the worker drain the signal channel and the scroll debounce.
    tokio::time::sleep(Duration::from_millis(200)).await;

    let analysis = service
        .analyzer()
        .analyze_performance()
        .await
        .context("performance analysis failed")?;
    log::info!("{}", analysis.summary);
    let report =
        serde_json::to_string_pretty(&*analysis).context("failed to serialize the analysis")?;
    log::debug!("Analysis:\n{report}");

    let stats = service.errors().error_statistics();
    log::info!(
        "Errors this session: {} ({} retryable).",
        stats.total,
        stats.retryable
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("reqwest", log::LevelFilter::Warn)
        .init();

    let config = load_config()?;
    let base = std::env::var("STUDYDASH_COLLECTOR_BASE")
        .unwrap_or_else(|_| DEFAULT_COLLECTOR_BASE.to_string());
    let endpoint = resolve_endpoint(&base, &config.monitor.endpoint);

    let platform = Arc::new(HeadlessPlatform::new(
        concat!("studydash-runtime/", env!("CARGO_PKG_VERSION")),
        base.as_str(),
    ));
    let transport = Arc::new(
        HttpCollector::new(endpoint).context("failed to build the collector client")?,
    );
    let service = TelemetryService::new(
        config,
        platform,
        transport,
        Some(Arc::new(SysinfoMemoryProbe::new())),
        Some(Arc::new(LogNotifier)),
    );

    if !service.start() {
        log::warn!("Monitoring is inactive; events will not be collected.");
    }
    service.monitor().install_panic_hook();

    let outcome = replay_session(&service).await;

    service.monitor().page_unload();
    service.shutdown().await;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_endpoint_joins_paths() {
        assert_eq!(
            resolve_endpoint("http://localhost:3000/", "/api/monitoring/events"),
            "http://localhost:3000/api/monitoring/events"
        );
        assert_eq!(
            resolve_endpoint("http://localhost:3000", "https://collector.example/ingest"),
            "https://collector.example/ingest"
        );
    }
}

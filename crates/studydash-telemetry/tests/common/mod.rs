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

//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use studydash_core::performance::{
    ApiMetrics, InteractionMetrics, MemoryMetrics, NavigationMetrics, PerformanceSource,
    ResourceMetrics,
};
use studydash_core::telemetry::{CollectorPayload, CollectorTransport, MonitoringEvent, TransportError};
use studydash_core::{Notifier, Platform, UserNotification};
use studydash_telemetry::{EventMonitor, MonitorConfig};

/// Lets spawned tasks run without moving any pending deadline.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

pub fn active_monitor_config() -> MonitorConfig {
    MonitorConfig {
        enabled: true,
        ..Default::default()
    }
}

#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<CollectorPayload>>,
    pub beacons: Mutex<Vec<CollectorPayload>>,
    pub failing: AtomicBool,
    pub attempts: AtomicUsize,
}

impl RecordingTransport {
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<CollectorPayload> {
        self.sent.lock().unwrap().clone()
    }

    pub fn beacons(&self) -> Vec<CollectorPayload> {
        self.beacons.lock().unwrap().clone()
    }

    /// Every event delivered through `send`, in order.
    pub fn sent_events(&self) -> Vec<MonitoringEvent> {
        self.sent()
            .into_iter()
            .flat_map(|payload| payload.events)
            .collect()
    }
}

#[async_trait]
impl CollectorTransport for RecordingTransport {
    async fn send(&self, payload: &CollectorPayload) -> Result<(), TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Unreachable("connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(payload.clone());
        Ok(())
    }

    fn send_beacon(&self, payload: CollectorPayload) {
        self.beacons.lock().unwrap().push(payload);
    }
}

#[derive(Debug, Default)]
pub struct TestPlatform {
    pub credentials_cleared: AtomicBool,
    pub navigations: Mutex<Vec<String>>,
    pub reloads: AtomicUsize,
}

impl TestPlatform {
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }
}

impl Platform for TestPlatform {
    fn user_agent(&self) -> String {
        "studydash-tests/1.0".to_string()
    }

    fn current_url(&self) -> String {
        "https://study.example/dashboard".to_string()
    }

    fn clear_credentials(&self) {
        self.credentials_cleared.store(true, Ordering::SeqCst);
    }

    fn navigate(&self, route: &str) {
        self.navigations.lock().unwrap().push(route.to_string());
    }

    fn reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub shown: Mutex<Vec<UserNotification>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &UserNotification) {
        self.shown.lock().unwrap().push(notification.clone());
    }
}

/// Returns fixed metrics.
#[derive(Debug, Default, Clone)]
pub struct StaticSource {
    pub navigation: NavigationMetrics,
    pub resources: ResourceMetrics,
    pub memory: Option<MemoryMetrics>,
    pub api: ApiMetrics,
    pub fail_api: bool,
}

#[async_trait]
impl PerformanceSource for StaticSource {
    async fn navigation(&self) -> anyhow::Result<NavigationMetrics> {
        Ok(self.navigation)
    }

    async fn resources(&self) -> anyhow::Result<ResourceMetrics> {
        Ok(self.resources)
    }

    async fn memory(&self) -> anyhow::Result<Option<MemoryMetrics>> {
        Ok(self.memory)
    }

    async fn interactions(&self) -> anyhow::Result<InteractionMetrics> {
        Ok(InteractionMetrics::default())
    }

    async fn api(&self) -> anyhow::Result<ApiMetrics> {
        if self.fail_api {
            anyhow::bail!("api stats unavailable");
        }
        Ok(self.api.clone())
    }
}

/// Holds the navigation collection open until the gate is opened.
#[derive(Debug, Default)]
pub struct GatedSource {
    pub gate: tokio::sync::Notify,
    pub inner: StaticSource,
}

#[async_trait]
impl PerformanceSource for GatedSource {
    async fn navigation(&self) -> anyhow::Result<NavigationMetrics> {
        self.gate.notified().await;
        self.inner.navigation().await
    }

    async fn resources(&self) -> anyhow::Result<ResourceMetrics> {
        self.inner.resources().await
    }

    async fn memory(&self) -> anyhow::Result<Option<MemoryMetrics>> {
        self.inner.memory().await
    }

    async fn interactions(&self) -> anyhow::Result<InteractionMetrics> {
        self.inner.interactions().await
    }

    async fn api(&self) -> anyhow::Result<ApiMetrics> {
        self.inner.api().await
    }
}

pub fn monitor_with(config: MonitorConfig) -> (EventMonitor, Arc<RecordingTransport>, Arc<TestPlatform>) {
    let transport = Arc::new(RecordingTransport::default());
    let platform = Arc::new(TestPlatform::default());
    let monitor = EventMonitor::new(config, platform.clone(), transport.clone());
    (monitor, transport, platform)
}

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

//! The event monitor.
//!
//! [`EventMonitor`] captures errors, performance entries, and user
//! interactions, queues them, and delivers them in batches through a
//! [`CollectorTransport`]. A background worker flushes the queue when a batch
//! fills up or the flush interval elapses, and dispatches the signals the
//! host publishes on the monitor's channel.

pub mod bus;
pub mod ledger;
pub mod queue;
mod worker;

pub use self::bus::SignalBus;
pub use self::ledger::PerformanceLedger;
pub use self::queue::EventQueue;

use crate::config::MonitorConfig;
use crate::sync::lock;
use serde_json::{Map, Value};
use std::any::Any;
use std::backtrace::Backtrace;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use studydash_core::performance::{
    ApiMetrics, InteractionMetrics, NavigationMetrics, ResourceEntry, ResourceMetrics,
};
use studydash_core::telemetry::{
    CollectorPayload, CollectorTransport, ErrorEvent, HostSignal, MonitoringEvent,
    PerformanceEvent, PerformanceKind, UserEvent, UserEventKind,
};
use studydash_core::Platform;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// What a flush did with the queued events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing was queued.
    Empty,
    /// The collector accepted this many events.
    Sent(usize),
    /// Delivery failed; this many events were put back in the queue.
    Requeued(usize),
    /// Delivery failed and the queue had no room; this many events were lost.
    Dropped(usize),
}

/// Delivery counters since the monitor was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    /// Events currently queued.
    pub queued: usize,
    /// Events acknowledged by the collector or handed to a beacon.
    pub sent: u64,
    /// Events lost to the queue limit, on enqueue or after a failed flush.
    pub dropped: u64,
    /// Flush attempts that failed.
    pub failed_flushes: u64,
}

/// State shared between the monitor handles and the worker task.
#[derive(Debug)]
pub(crate) struct MonitorState {
    config: MonitorConfig,
    platform: Arc<dyn Platform>,
    transport: Arc<dyn CollectorTransport>,
    queue: Mutex<EventQueue>,
    ledger: Mutex<PerformanceLedger>,
    user_id: Mutex<Option<String>>,
    batch_ready: Notify,
    shutdown: Notify,
    sent: AtomicU64,
    dropped: AtomicU64,
    failed_flushes: AtomicU64,
}

impl MonitorState {
    fn enqueue(&self, mut event: MonitoringEvent) {
        if !self.config.is_active() {
            return;
        }
        let user_id = lock(&self.user_id).clone();
        event.stamp(
            &self.platform.user_agent(),
            &self.platform.current_url(),
            user_id.as_deref(),
        );
        let (evicted, batch_full) = {
            let mut queue = lock(&self.queue);
            let evicted = queue.push(event);
            (evicted, queue.has_full_batch())
        };
        if evicted.is_some() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            log::warn!(
                "Queue limit of {} reached; dropped the oldest monitoring event.",
                self.config.max_queue_size
            );
        }
        if batch_full {
            self.batch_ready.notify_one();
        }
    }

    fn payload(&self, events: Vec<MonitoringEvent>) -> CollectorPayload {
        CollectorPayload::new(
            events,
            self.platform.user_agent(),
            self.platform.current_url(),
        )
    }

    async fn flush(&self) -> FlushOutcome {
        let events = lock(&self.queue).drain_all();
        if events.is_empty() {
            return FlushOutcome::Empty;
        }
        let count = events.len();
        let payload = self.payload(events);

        match self.transport.send(&payload).await {
            Ok(()) => {
                self.sent.fetch_add(count as u64, Ordering::Relaxed);
                log::debug!("Flushed {count} monitoring events.");
                FlushOutcome::Sent(count)
            }
            Err(e) => {
                self.failed_flushes.fetch_add(1, Ordering::Relaxed);
                log::warn!("Failed to flush {count} monitoring events: {e}");
                match lock(&self.queue).requeue_front(payload.events) {
                    Ok(requeued) => FlushOutcome::Requeued(requeued),
                    Err(dropped) => {
                        self.dropped.fetch_add(dropped as u64, Ordering::Relaxed);
                        log::warn!(
                            "Queue limit of {} reached; dropped {dropped} monitoring events.",
                            self.config.max_queue_size
                        );
                        FlushOutcome::Dropped(dropped)
                    }
                }
            }
        }
    }

    fn track_user_event(&self, event: UserEvent) {
        if !self.config.is_active() {
            return;
        }
        lock(&self.ledger).record_user_event(event.kind);
        self.enqueue(MonitoringEvent::User(event));
    }

    fn record_scroll(&self, x: f64, y: f64) {
        self.track_user_event(
            UserEvent::new(UserEventKind::Scroll, "window")
                .with_metadata("scrollX", x)
                .with_metadata("scrollY", y),
        );
    }

    fn page_unload(&self) {
        if !self.config.is_active() {
            return;
        }
        let time_on_page = lock(&self.ledger).session_duration_ms();
        self.track_user_event(
            UserEvent::new(UserEventKind::PageUnload, "window")
                .with_metadata("timeOnPage", time_on_page),
        );

        let events = lock(&self.queue).drain_all();
        if events.is_empty() {
            return;
        }
        let count = events.len();
        self.sent.fetch_add(count as u64, Ordering::Relaxed);
        log::debug!("Handing {count} monitoring events to the unload beacon.");
        self.transport.send_beacon(self.payload(events));
    }

    fn handle_signal(&self, signal: HostSignal) {
        match signal {
            HostSignal::UncaughtError {
                message,
                filename,
                line,
                column,
                stack,
            } => {
                let mut event = ErrorEvent::new(message).with_metadata("source", "window.error");
                event.filename = filename;
                event.line = line;
                event.column = column;
                event.stack = stack;
                self.enqueue(MonitoringEvent::Error(event));
            }
            HostSignal::UnhandledRejection { reason, stack } => {
                let mut event = ErrorEvent::new(format!("Unhandled promise rejection: {reason}"))
                    .with_metadata("source", "unhandledrejection");
                event.stack = stack;
                self.enqueue(MonitoringEvent::Error(event));
            }
            HostSignal::FrameworkError {
                message,
                component_stack,
                stack,
            } => {
                let mut event = ErrorEvent::new(message).with_metadata("source", "error-boundary");
                if let Some(component_stack) = component_stack {
                    event = event.with_metadata("componentStack", component_stack);
                }
                event.stack = stack;
                self.enqueue(MonitoringEvent::Error(event));
            }
            HostSignal::Load(navigation) => self.record_navigation(navigation),
            HostSignal::Resource(entry) => self.record_resource(entry),
            HostSignal::Click { target } => {
                self.track_user_event(UserEvent::new(UserEventKind::Click, target));
            }
            HostSignal::Scroll { x, y } => self.record_scroll(x, y),
            HostSignal::Unload => self.page_unload(),
        }
    }

    fn record_navigation(&self, navigation: NavigationMetrics) {
        if !self.config.is_active() {
            return;
        }
        lock(&self.ledger).record_navigation(navigation);

        let mut event = PerformanceEvent::new(
            PerformanceKind::Navigation,
            "page_load",
            navigation.load_complete,
        );
        if let Ok(Value::Object(fields)) = serde_json::to_value(navigation) {
            event.metadata.extend(fields);
        }
        self.enqueue(MonitoringEvent::Performance(event));
    }

    fn record_resource(&self, entry: ResourceEntry) {
        if !self.config.is_active() {
            return;
        }
        if entry.duration > self.config.slow_resource_ms {
            let event =
                PerformanceEvent::new(PerformanceKind::Resource, &entry.name, entry.duration)
                    .with_metadata("type", entry.resource_type.as_str())
                    .with_metadata("size", entry.size())
                    .with_metadata("transferSize", entry.transfer_size);
            self.enqueue(MonitoringEvent::Performance(event));
        }
        lock(&self.ledger).record_resource(entry);
    }
}

/// Captures runtime telemetry and delivers it to the collector in batches.
///
/// `EventMonitor` is a cheap handle; clones share the same queue, ledger,
/// and worker. Nothing is recorded while the monitor is inactive (see
/// [`MonitorConfig::is_active`]), and delivery failures never reach callers.
///
/// The queue never holds more than `max_queue_size` events. While no worker
/// drains it (before `start`, after `shutdown`), new events evict the oldest.
#[derive(Debug, Clone)]
pub struct EventMonitor {
    state: Arc<MonitorState>,
    bus: Arc<SignalBus>,
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl EventMonitor {
    /// Creates a monitor. Call [`start`](Self::start) to run its worker.
    pub fn new(
        config: MonitorConfig,
        platform: Arc<dyn Platform>,
        transport: Arc<dyn CollectorTransport>,
    ) -> Self {
        let state = MonitorState {
            queue: Mutex::new(EventQueue::new(config.batch_size, config.max_queue_size)),
            ledger: Mutex::new(PerformanceLedger::new(config.api_window)),
            user_id: Mutex::new(None),
            batch_ready: Notify::new(),
            shutdown: Notify::new(),
            sent: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            failed_flushes: AtomicU64::new(0),
            platform,
            transport,
            config,
        };
        let bus = SignalBus::new(state.config.signal_capacity);
        Self {
            state: Arc::new(state),
            bus: Arc::new(bus),
            worker: Arc::new(Mutex::new(None)),
        }
    }

    /// Spawns the worker on the current tokio runtime.
    ///
    /// Returns `false` if the monitor is inactive, already running, or there
    /// is no runtime to spawn on.
    pub fn start(&self) -> bool {
        if !self.is_active() {
            log::info!("Event monitor is inactive; not starting the worker.");
            return false;
        }
        let mut worker = lock(&self.worker);
        if worker.as_ref().is_some_and(|handle| !handle.is_finished()) {
            log::warn!("Event monitor worker is already running.");
            return false;
        }
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                log::error!("Cannot start the event monitor worker: {e}");
                return false;
            }
        };
        *worker = Some(runtime.spawn(worker::run(
            Arc::clone(&self.state),
            self.bus.receiver(),
        )));
        true
    }

    /// Stops the worker and makes a final flush attempt.
    pub async fn shutdown(&self) {
        let worker = lock(&self.worker).take();
        if let Some(worker) = worker {
            self.state.shutdown.notify_one();
            if let Err(e) = worker.await {
                log::error!("Event monitor worker ended abnormally: {e}");
            }
        }
        if self.is_active() {
            self.state.flush().await;
        }
    }

    /// `true` when events are being recorded.
    pub fn is_active(&self) -> bool {
        self.state.config.is_active()
    }

    /// `true` while the worker task is alive.
    pub fn is_running(&self) -> bool {
        lock(&self.worker)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// The configuration the monitor was created with.
    pub fn config(&self) -> &MonitorConfig {
        &self.state.config
    }

    /// A sender the host publishes its signals on.
    pub fn signal_sender(&self) -> flume::Sender<HostSignal> {
        self.bus.sender()
    }

    /// Publishes one host signal. Returns `false` if it was dropped.
    pub fn publish(&self, signal: HostSignal) -> bool {
        self.bus.publish(signal)
    }

    /// Sets the user id stamped on subsequent error events.
    pub fn set_user_id(&self, user_id: Option<String>) {
        *lock(&self.state.user_id) = user_id;
    }

    /// Records an error event.
    pub fn track_error(&self, event: ErrorEvent) {
        self.state.enqueue(MonitoringEvent::Error(event));
    }

    /// Records a performance event.
    pub fn track_performance(&self, event: PerformanceEvent) {
        self.state.enqueue(MonitoringEvent::Performance(event));
    }

    /// Records a user event.
    pub fn track_user_event(&self, event: UserEvent) {
        self.state.track_user_event(event);
    }

    /// Records one API call.
    ///
    /// A call that answered with a status of 400 or above, or that failed
    /// without an answer, is also recorded as an error event.
    pub fn track_api_call(
        &self,
        url: &str,
        method: &str,
        duration: Duration,
        status: Option<u16>,
        error: Option<&str>,
    ) {
        if !self.is_active() {
            return;
        }
        let method = method.to_uppercase();
        let name = format!("{method} {url}");
        let duration_ms = duration.as_secs_f64() * 1000.0;
        let failed = status.is_some_and(|s| s >= 400) || error.is_some();

        let mut event = PerformanceEvent::new(PerformanceKind::Api, &name, duration_ms)
            .with_metadata("url", url)
            .with_metadata("method", method.as_str());
        if let Some(status) = status {
            event = event.with_metadata("status", status);
        }
        if let Some(error) = error {
            event = event.with_metadata("error", error);
        }
        self.track_performance(event);
        lock(&self.state.ledger).record_api_call(&name, duration_ms, failed);

        if failed {
            let mut event = ErrorEvent::new(format!("API Error: {name}"))
                .with_metadata("url", url)
                .with_metadata("method", method.as_str())
                .with_metadata("duration", duration_ms);
            if let Some(status) = status {
                event = event.with_metadata("status", status);
            }
            if let Some(error) = error {
                event = event.with_metadata("error", error);
            }
            self.track_error(event);
        }
    }

    /// Records an application-defined measurement.
    pub fn track_custom_metric(&self, name: &str, value: f64, metadata: Option<Map<String, Value>>) {
        let mut event = PerformanceEvent::new(PerformanceKind::Custom, name, value);
        if let Some(metadata) = metadata {
            event.metadata = metadata;
        }
        self.track_performance(event);
    }

    /// Sends everything queued now.
    pub async fn flush(&self) -> FlushOutcome {
        self.state.flush().await
    }

    /// Records the page-unload event and hands the queue to the beacon.
    pub fn page_unload(&self) {
        self.state.page_unload();
    }

    /// Number of queued events.
    pub fn queue_len(&self) -> usize {
        lock(&self.state.queue).len()
    }

    /// Delivery counters.
    pub fn stats(&self) -> MonitorStats {
        MonitorStats {
            queued: self.queue_len(),
            sent: self.state.sent.load(Ordering::Relaxed),
            dropped: self.state.dropped.load(Ordering::Relaxed),
            failed_flushes: self.state.failed_flushes.load(Ordering::Relaxed),
        }
    }

    /// The latest navigation timing.
    pub fn navigation_metrics(&self) -> NavigationMetrics {
        lock(&self.state.ledger).navigation()
    }

    /// Resource sizes over the recorded entries.
    pub fn resource_metrics(&self) -> ResourceMetrics {
        lock(&self.state.ledger).resources()
    }

    /// Interaction counts.
    pub fn interaction_metrics(&self) -> InteractionMetrics {
        lock(&self.state.ledger).interactions()
    }

    /// API aggregates.
    pub fn api_metrics(&self) -> ApiMetrics {
        lock(&self.state.ledger).api()
    }

    /// Installs a panic hook that records panics as error events before
    /// handing them to the previously installed hook.
    pub fn install_panic_hook(&self) {
        let monitor = self.clone();
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let mut event = ErrorEvent::new(panic_message(info.payload()))
                .with_stack(Backtrace::capture().to_string())
                .with_metadata("source", "panic");
            if let Some(location) = info.location() {
                event = event.with_location(location.file(), location.line(), location.column());
            }
            monitor.track_error(event);
            previous(info);
        }));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_payloads() {
        let text: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(text.as_ref()), "boom");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(panic_message(owned.as_ref()), "owned boom");
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(other.as_ref()), "panic with a non-string payload");
    }
}

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

//! The background task behind an [`EventMonitor`](super::EventMonitor).

use super::MonitorState;
use std::sync::Arc;
use studydash_core::telemetry::HostSignal;
use tokio::time::{sleep_until, Instant};

/// Drives timed flushes, batch flushes, and host signal dispatch until
/// shutdown is requested or every signal sender is gone.
pub(super) async fn run(state: Arc<MonitorState>, signals: flume::Receiver<HostSignal>) {
    let interval = state.config.flush_interval();
    let debounce = state.config.scroll_debounce();
    let mut flush_at = Instant::now() + interval;
    // Latest scroll position and the deadline at which it is recorded.
    let mut pending_scroll: Option<(Instant, f64, f64)> = None;

    log::info!(
        "Event monitor worker started (batch size {}, flush interval {:?}).",
        state.config.batch_size,
        interval
    );

    loop {
        let scroll_deadline = pending_scroll.map(|(deadline, _, _)| deadline);
        let scroll_due = async move {
            match scroll_deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;

            _ = state.shutdown.notified() => break,
            _ = sleep_until(flush_at) => {
                state.flush().await;
                flush_at = Instant::now() + interval;
            }
            _ = state.batch_ready.notified() => {
                state.flush().await;
                flush_at = Instant::now() + interval;
            }
            _ = scroll_due => {
                if let Some((_, x, y)) = pending_scroll.take() {
                    state.record_scroll(x, y);
                }
            }
            received = signals.recv_async() => match received {
                Ok(HostSignal::Scroll { x, y }) => {
                    pending_scroll = Some((Instant::now() + debounce, x, y));
                }
                Ok(signal) => state.handle_signal(signal),
                Err(_) => {
                    log::debug!("All host signal senders dropped.");
                    break;
                }
            },
        }
    }

    // Whatever the host already sent still counts.
    for signal in signals.try_iter() {
        match signal {
            HostSignal::Scroll { x, y } => pending_scroll = Some((Instant::now(), x, y)),
            other => state.handle_signal(other),
        }
    }
    if let Some((_, x, y)) = pending_scroll {
        state.record_scroll(x, y);
    }

    log::info!("Event monitor worker stopped.");
}

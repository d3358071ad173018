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

//! The collector transport contract.

use super::event::MonitoringEvent;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Envelope metadata sent alongside every batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadMetadata {
    /// Host user agent.
    pub user_agent: String,
    /// When the batch was assembled.
    pub timestamp: DateTime<Utc>,
    /// Page URL at flush time.
    pub url: String,
}

/// The JSON body posted to the collector endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorPayload {
    /// The batch, in queue order.
    pub events: Vec<MonitoringEvent>,
    /// Envelope metadata.
    pub metadata: PayloadMetadata,
}

impl CollectorPayload {
    /// Assembles a payload stamped with the current time.
    pub fn new(
        events: Vec<MonitoringEvent>,
        user_agent: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            events,
            metadata: PayloadMetadata {
                user_agent: user_agent.into(),
                timestamp: Utc::now(),
                url: url.into(),
            },
        }
    }

    /// Number of events in the batch.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// `true` if the batch carries no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// A failure to deliver a batch.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The collector could not be reached.
    #[error("collector unreachable: {0}")]
    Unreachable(String),
    /// The collector answered with a non-success status.
    #[error("collector rejected batch with status {0}")]
    Rejected(u16),
    /// The payload could not be encoded.
    #[error("failed to encode payload: {0}")]
    Encoding(String),
}

/// Delivers batches of monitoring events to a collector.
///
/// Implementations live in `studydash-infra` (HTTP) and in tests (recording
/// doubles). The monitor never propagates a `TransportError` to its callers.
#[async_trait]
pub trait CollectorTransport: Send + Sync + Debug + 'static {
    /// Sends a batch and waits for the collector to acknowledge it.
    async fn send(&self, payload: &CollectorPayload) -> Result<(), TransportError>;

    /// Sends a batch without waiting for, or expecting, a response.
    ///
    /// Used while the page is going away; must not block the caller.
    fn send_beacon(&self, payload: CollectorPayload);
}

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

//! Provides the foundational data structures for client telemetry.
//!
//! This module defines the "common language" between instrumentation, the
//! event monitor, and the collector: monitoring events, the host signals the
//! monitor listens to, and the transport contract used to deliver batches.

pub mod envelope;
pub mod event;
pub mod signal;
pub mod transport;

pub use self::envelope::{ApiEnvelope, EnvelopeError};
pub use self::event::{
    ErrorEvent, MonitoringEvent, PerformanceEvent, PerformanceKind, UserEvent, UserEventKind,
};
pub use self::signal::HostSignal;
pub use self::transport::{CollectorPayload, CollectorTransport, PayloadMetadata, TransportError};

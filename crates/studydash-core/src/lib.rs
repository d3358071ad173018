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

//! # Studydash Core
//!
//! Foundational crate containing the data model, traits, and interface
//! contracts shared by the telemetry services of the study dashboard.
//!
//! The abstract "what" lives here: error records, monitoring events,
//! performance snapshots, and the host capabilities (platform, transport,
//! probes) the services are injected with. `studydash-telemetry` provides the
//! services built on these contracts, and `studydash-infra` provides the
//! concrete host implementations.

#![warn(missing_docs)]

pub mod error;
pub mod performance;
pub mod platform;
pub mod telemetry;

pub use error::{
    ErrorCategory, ErrorContext, ErrorSeverity, RaisedError, RecoveryAction, RecoveryKind,
    StandardError,
};
pub use platform::{Notifier, Platform, UserNotification};
pub use telemetry::{CollectorPayload, CollectorTransport, MonitoringEvent, TransportError};

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

//! # Studydash Telemetry
//!
//! The services built on the `studydash-core` contracts:
//!
//! - [`EventMonitor`] batches runtime observations to a collector.
//! - [`ErrorStandardizer`] turns raised errors into [`StandardError`]s,
//!   keeps a bounded history, and drives automatic recovery.
//! - [`PerformanceAnalyzer`] turns metric snapshots into bottlenecks,
//!   suggestions, and a score.
//!
//! [`TelemetryService`] owns all three for the lifetime of the application.
//!
//! [`StandardError`]: studydash_core::StandardError

#![warn(missing_docs)]

pub mod config;
pub mod errors;
pub mod monitor;
pub mod observer;
pub mod performance;
pub mod service;
pub mod stats;

mod sync;

pub use config::{
    AnalyzerConfig, ConfigError, ErrorHandlingConfig, MonitorConfig, RuntimeEnvironment,
    ScoreWeighting, TelemetryConfig,
};
pub use errors::ErrorStandardizer;
pub use monitor::EventMonitor;
pub use observer::{ObserverList, SubscriptionId};
pub use performance::{AnalysisError, MonitorPerformanceSource, PerformanceAnalyzer};
pub use service::TelemetryService;

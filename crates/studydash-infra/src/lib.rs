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

//! # Studydash Infra
//!
//! Concrete implementations of the `studydash-core` host contracts for
//! native hosts:
//!
//! - [`HttpCollector`]: delivers monitoring batches over HTTP with `reqwest`.
//! - [`SysinfoMemoryProbe`]: samples process memory with `sysinfo`.
//! - [`HeadlessPlatform`]: an in-memory platform for hosts without a DOM.
//! - [`LogNotifier`]: shows user notifications as log lines.

#![warn(missing_docs)]

pub mod http;
pub mod notify;
pub mod platform;

pub use http::HttpCollector;
pub use notify::LogNotifier;
pub use platform::{HeadlessPlatform, SysinfoMemoryProbe};

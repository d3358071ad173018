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

//! Performance analysis.
//!
//! [`PerformanceAnalyzer`] collects the five metric families from a
//! [`PerformanceSource`](studydash_core::performance::PerformanceSource),
//! classifies them in [`bottlenecks`], derives [`suggestions`], and scores
//! the navigation timings in [`score`].

mod analyzer;
pub mod bottlenecks;
mod source;
pub mod score;
pub mod suggestions;

pub use self::analyzer::{AnalysisError, PerformanceAnalyzer};
pub use self::source::MonitorPerformanceSource;

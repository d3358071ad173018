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

//! Signals raised by the host environment.
//!
//! In a browser these are the global listeners (window errors, rejections,
//! load, resource timing, click, scroll, unload). A native host publishes the
//! same signals on the monitor's signal channel.

use crate::performance::{NavigationMetrics, ResourceEntry};

/// One observation pushed by the host into the event monitor.
#[derive(Debug, Clone, PartialEq)]
pub enum HostSignal {
    /// An error nobody caught.
    UncaughtError {
        /// The error message.
        message: String,
        /// Source file, if known.
        filename: Option<String>,
        /// Source line, if known.
        line: Option<u32>,
        /// Source column, if known.
        column: Option<u32>,
        /// Stack text, if known.
        stack: Option<String>,
    },
    /// A rejected async task nobody awaited.
    UnhandledRejection {
        /// The rejection reason.
        reason: String,
        /// Stack text, if known.
        stack: Option<String>,
    },
    /// An error caught by a UI error boundary.
    FrameworkError {
        /// The error message.
        message: String,
        /// Component stack reported by the boundary.
        component_stack: Option<String>,
        /// Stack text, if known.
        stack: Option<String>,
    },
    /// The page finished loading.
    Load(NavigationMetrics),
    /// A resource finished loading.
    Resource(ResourceEntry),
    /// The user clicked an element.
    Click {
        /// Descriptor of the clicked element.
        target: String,
    },
    /// The user scrolled.
    Scroll {
        /// Horizontal scroll offset.
        x: f64,
        /// Vertical scroll offset.
        y: f64,
    },
    /// The page is going away.
    Unload,
}

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

//! Monitoring event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One captured observation, queued for delivery to the collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MonitoringEvent {
    /// An error observed at runtime.
    Error(ErrorEvent),
    /// A timing measurement.
    Performance(PerformanceEvent),
    /// A user interaction or page lifecycle step.
    User(UserEvent),
}

impl MonitoringEvent {
    /// Returns the event timestamp.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            MonitoringEvent::Error(e) => e.timestamp,
            MonitoringEvent::Performance(e) => e.timestamp,
            MonitoringEvent::User(e) => e.timestamp,
        }
    }

    /// Fills in the host fields (user agent, URL, user id) the caller left empty.
    pub fn stamp(&mut self, user_agent: &str, url: &str, user_id: Option<&str>) {
        let fill = |field: &mut String, value: &str| {
            if field.is_empty() {
                *field = value.to_string();
            }
        };
        match self {
            MonitoringEvent::Error(e) => {
                fill(&mut e.user_agent, user_agent);
                fill(&mut e.url, url);
                if e.user_id.is_none() {
                    e.user_id = user_id.map(str::to_string);
                }
            }
            MonitoringEvent::Performance(e) => fill(&mut e.url, url),
            MonitoringEvent::User(e) => fill(&mut e.url, url),
        }
    }
}

/// An error observed at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEvent {
    /// The error message.
    pub message: String,
    /// Source file, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Source line, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Source column, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    /// Stack or backtrace text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
    /// Host user agent.
    #[serde(default)]
    pub user_agent: String,
    /// Page URL.
    #[serde(default)]
    pub url: String,
    /// Logged-in user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Extra structured fields (category, code, ...).
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl ErrorEvent {
    /// Creates an error event stamped with the current time.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            filename: None,
            line: None,
            column: None,
            stack: None,
            timestamp: Utc::now(),
            user_agent: String::new(),
            url: String::new(),
            user_id: None,
            metadata: Map::new(),
        }
    }

    /// Sets the source location.
    pub fn with_location(mut self, filename: impl Into<String>, line: u32, column: u32) -> Self {
        self.filename = Some(filename.into());
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Sets the stack text.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Adds one metadata field.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// The kind of timing a [`PerformanceEvent`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceKind {
    /// Page navigation timing.
    Navigation,
    /// A single resource load.
    Resource,
    /// A backend API call.
    Api,
    /// Responsiveness of a user interaction.
    UserInteraction,
    /// An application-defined metric.
    Custom,
}

/// A timing measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceEvent {
    /// What was measured.
    pub kind: PerformanceKind,
    /// Name of the measured thing (resource URL, `"GET /api/plans"`, metric name).
    pub name: String,
    /// Duration in milliseconds, or the metric value for custom metrics.
    pub duration: f64,
    /// When it was measured.
    pub timestamp: DateTime<Utc>,
    /// Page URL.
    #[serde(default)]
    pub url: String,
    /// Extra structured fields.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl PerformanceEvent {
    /// Creates a performance event stamped with the current time.
    pub fn new(kind: PerformanceKind, name: impl Into<String>, duration: f64) -> Self {
        Self {
            kind,
            name: name.into(),
            duration,
            timestamp: Utc::now(),
            url: String::new(),
            metadata: Map::new(),
        }
    }

    /// Adds one metadata field.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// The kind of user or lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserEventKind {
    /// A click.
    Click,
    /// A (debounced) scroll.
    Scroll,
    /// Window gained focus.
    Focus,
    /// Window lost focus.
    Blur,
    /// Window was resized.
    Resize,
    /// The page is going away.
    PageUnload,
}

/// A user interaction or page lifecycle step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEvent {
    /// What happened.
    pub kind: UserEventKind,
    /// Descriptor of the target element (e.g. `"button#save"`).
    pub target: String,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
    /// Page URL.
    #[serde(default)]
    pub url: String,
    /// Extra structured fields.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl UserEvent {
    /// Creates a user event stamped with the current time.
    pub fn new(kind: UserEventKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            timestamp: Utc::now(),
            url: String::new(),
            metadata: Map::new(),
        }
    }

    /// Adds one metadata field.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_shape() {
        let event = MonitoringEvent::Performance(
            PerformanceEvent::new(PerformanceKind::Api, "GET /api/plans", 120.0)
                .with_metadata("status", 200),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "performance");
        assert_eq!(json["kind"], "api");
        assert_eq!(json["metadata"]["status"], 200);

        let back: MonitoringEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_stamp_only_fills_empty_fields() {
        let mut event = MonitoringEvent::Error(ErrorEvent {
            url: "/quiz".to_string(),
            ..ErrorEvent::new("boom")
        });
        event.stamp("agent/1.0", "/dashboard", Some("user-7"));

        match event {
            MonitoringEvent::Error(e) => {
                assert_eq!(e.url, "/quiz");
                assert_eq!(e.user_agent, "agent/1.0");
                assert_eq!(e.user_id.as_deref(), Some("user-7"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}

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

//! The standard error record and its context.

use super::category::{ErrorCategory, ErrorSeverity};
use super::recovery::{RecoveryAction, RecoveryHandler};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Explicit choices that bypass the categorization rule table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorOverrides {
    /// Forces the category.
    pub category: Option<ErrorCategory>,
    /// Forces the severity.
    pub severity: Option<ErrorSeverity>,
    /// Forces the user-facing message.
    pub user_message: Option<String>,
}

/// Where an error happened, as far as the caller knows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorContext {
    /// Originating URL or API endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// HTTP method of the failed request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// The logged-in user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Correlation id of the failed request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// User agent of the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Stack or backtrace text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// The UI component that raised the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Rule-table overrides. Consumed during standardization, never serialized.
    #[serde(skip)]
    pub overrides: ErrorOverrides,
    /// Re-runs the failed operation when the retry action fires.
    #[serde(skip)]
    pub retry: Option<RecoveryHandler>,
}

impl ErrorContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the originating URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the HTTP method.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets the user id.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Sets the request id.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Sets the component name.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Forces the category.
    pub fn with_category(mut self, category: ErrorCategory) -> Self {
        self.overrides.category = Some(category);
        self
    }

    /// Forces the severity.
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.overrides.severity = Some(severity);
        self
    }

    /// Forces the user-facing message.
    pub fn with_user_message(mut self, message: impl Into<String>) -> Self {
        self.overrides.user_message = Some(message.into());
        self
    }

    /// Attaches the operation to re-run on retry.
    pub fn with_retry(mut self, retry: RecoveryHandler) -> Self {
        self.retry = Some(retry);
        self
    }
}

/// The normalized error record.
///
/// Created once by the standardizer and never mutated afterwards; the
/// history and subscribers each receive their own clone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardError {
    /// Unique per occurrence.
    pub id: String,
    /// Resolved category.
    pub category: ErrorCategory,
    /// Resolved severity.
    pub severity: ErrorSeverity,
    /// Machine code (backend code, `HTTP_<status>`, or the category default).
    pub code: String,
    /// Internal, developer-facing message.
    pub message: String,
    /// Localized message shown to the user.
    pub user_message: String,
    /// Structured details.
    #[serde(default)]
    pub details: Map<String, Value>,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// Where it happened.
    #[serde(default)]
    pub context: ErrorContext,
    /// `true` if retrying may succeed.
    pub retryable: bool,
    /// Offered remediations, in display order.
    #[serde(default)]
    pub recovery_actions: Vec<RecoveryAction>,
}

impl StandardError {
    /// The HTTP status recorded in `details.status`, if any.
    pub fn status(&self) -> Option<u16> {
        self.details
            .get("status")
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
    }

    /// The first action the standardizer may run on its own.
    pub fn automatic_action(&self) -> Option<&RecoveryAction> {
        self.recovery_actions.iter().find(|a| a.automatic)
    }

    /// The key automatic recovery attempts are counted under.
    pub fn recovery_key(&self) -> String {
        format!("{}_{}", self.category, self.code)
    }
}

impl fmt::Display for StandardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{}] {}: {}",
            self.category, self.severity, self.code, self.message
        )
    }
}

impl std::error::Error for StandardError {}

/// Aggregates over the error history.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorStatistics {
    /// Number of errors in the history.
    pub total: usize,
    /// Count per category.
    pub by_category: BTreeMap<ErrorCategory, usize>,
    /// Count per severity.
    pub by_severity: BTreeMap<ErrorSeverity, usize>,
    /// Number of retryable errors.
    pub retryable: usize,
    /// The most recent entries, newest first.
    pub recent: Vec<StandardError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StandardError {
        let mut details = Map::new();
        details.insert("status".to_string(), Value::from(503));
        StandardError {
            id: "err_1".to_string(),
            category: ErrorCategory::Server,
            severity: ErrorSeverity::Critical,
            code: "HTTP_503".to_string(),
            message: "unavailable".to_string(),
            user_message: "server".to_string(),
            details,
            timestamp: Utc::now(),
            context: ErrorContext::new().with_url("/api/plans").with_method("GET"),
            retryable: true,
            recovery_actions: Vec::new(),
        }
    }

    #[test]
    fn test_status_and_recovery_key() {
        let error = sample();
        assert_eq!(error.status(), Some(503));
        assert_eq!(error.recovery_key(), "server_HTTP_503");
        assert!(error.automatic_action().is_none());
    }

    #[test]
    fn test_context_overrides_are_not_serialized() {
        let context = ErrorContext::new()
            .with_url("/api/log")
            .with_category(ErrorCategory::Validation)
            .with_user_message("custom");
        let json = serde_json::to_value(&context).unwrap();
        assert_eq!(json, serde_json::json!({ "url": "/api/log" }));
    }
}

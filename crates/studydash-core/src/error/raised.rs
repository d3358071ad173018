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

//! The shape of an arbitrary raised error, before standardization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Name carried by failures of the fetch layer itself.
pub const NETWORK_ERROR_NAME: &str = "TypeError";
/// Name carried by rejected user input.
pub const VALIDATION_ERROR_NAME: &str = "ValidationError";
/// Name carried by non-2xx HTTP responses.
pub const HTTP_ERROR_NAME: &str = "HttpError";

/// Whatever was raised or rejected, reduced to the fields the standardizer
/// inspects: a name, a message, and optionally an HTTP status and a code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaisedError {
    /// Error type name (e.g. `"TypeError"`, `"ValidationError"`).
    pub name: String,
    /// Internal, developer-facing message.
    pub message: String,
    /// HTTP status, when the error came from a response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Machine code supplied by the backend, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Captured backtrace or stack text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// Free-form structured details.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub details: Map<String, Value>,
}

impl RaisedError {
    /// Creates a raised error with a name and a message.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    /// A failure of the transport itself: the request never got a response.
    pub fn network(detail: impl fmt::Display) -> Self {
        Self::new(NETWORK_ERROR_NAME, format!("Failed to fetch: {detail}"))
    }

    /// A non-2xx HTTP response.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            ..Self::new(HTTP_ERROR_NAME, message)
        }
    }

    /// Rejected user input.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(VALIDATION_ERROR_NAME, message)
    }

    /// Captures any `std::error::Error`, recording its source chain in
    /// `details.causes`.
    pub fn from_error<E: std::error::Error + ?Sized>(error: &E) -> Self {
        let mut raised = Self::new("Error", error.to_string());
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(Value::String(cause.to_string()));
            source = cause.source();
        }
        if !causes.is_empty() {
            raised.details.insert("causes".to_string(), Value::Array(causes));
        }
        raised
    }

    /// Sets the machine code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the stack text.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Adds one structured detail.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// `true` when this is a fetch-layer failure (`TypeError` mentioning fetch).
    pub fn is_network_failure(&self) -> bool {
        self.name == NETWORK_ERROR_NAME && self.message.to_lowercase().contains("fetch")
    }
}

impl fmt::Display for RaisedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({status}): {}", self.name, self.message),
            None => write!(f, "{}: {}", self.name, self.message),
        }
    }
}

impl std::error::Error for RaisedError {}

impl From<anyhow::Error> for RaisedError {
    fn from(error: anyhow::Error) -> Self {
        let mut raised = Self::new("Error", error.to_string());
        let causes: Vec<Value> = error
            .chain()
            .skip(1)
            .map(|cause| Value::String(cause.to_string()))
            .collect();
        if !causes.is_empty() {
            raised.details.insert("causes".to_string(), Value::Array(causes));
        }
        raised
    }
}

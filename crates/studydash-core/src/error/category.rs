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

//! Error categories and severities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse error classification used for routing, messaging, and retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The request never reached the server (connection refused, DNS, offline).
    Network,
    /// The server answered with something the client could not classify.
    Api,
    /// User input was rejected.
    Validation,
    /// The user is not (or no longer) logged in.
    Authentication,
    /// The user is logged in but not allowed to do this.
    Authorization,
    /// The requested resource does not exist.
    NotFound,
    /// Too many requests.
    RateLimit,
    /// The server failed (5xx).
    Server,
    /// Any other 4xx.
    Client,
    /// Nothing else matched.
    Unknown,
}

impl ErrorCategory {
    /// All categories, in declaration order.
    pub const ALL: [ErrorCategory; 10] = [
        ErrorCategory::Network,
        ErrorCategory::Api,
        ErrorCategory::Validation,
        ErrorCategory::Authentication,
        ErrorCategory::Authorization,
        ErrorCategory::NotFound,
        ErrorCategory::RateLimit,
        ErrorCategory::Server,
        ErrorCategory::Client,
        ErrorCategory::Unknown,
    ];

    /// Returns the wire name of the category (e.g. `"not_found"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Api => "api",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Authentication => "authentication",
            ErrorCategory::Authorization => "authorization",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::RateLimit => "rate_limit",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::Unknown => "unknown",
        }
    }

    /// Returns the machine code used when the raised error carries none.
    pub fn default_code(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "NETWORK_ERROR",
            ErrorCategory::Api => "API_ERROR",
            ErrorCategory::Validation => "VALIDATION_ERROR",
            ErrorCategory::Authentication => "AUTHENTICATION_ERROR",
            ErrorCategory::Authorization => "AUTHORIZATION_ERROR",
            ErrorCategory::NotFound => "NOT_FOUND",
            ErrorCategory::RateLimit => "RATE_LIMIT_EXCEEDED",
            ErrorCategory::Server => "SERVER_ERROR",
            ErrorCategory::Client => "CLIENT_ERROR",
            ErrorCategory::Unknown => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal urgency of an error.
///
/// The ordering is meaningful: reporting thresholds compare severities with
/// `>=`, so `Low < Medium < High < Critical` must hold.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    /// Cosmetic or user-correctable.
    Low,
    /// Default severity.
    #[default]
    Medium,
    /// The user is blocked until something changes.
    High,
    /// The service itself is failing.
    Critical,
}

impl ErrorSeverity {
    /// All severities, from lowest to highest.
    pub const ALL: [ErrorSeverity; 4] = [
        ErrorSeverity::Low,
        ErrorSeverity::Medium,
        ErrorSeverity::High,
        ErrorSeverity::Critical,
    ];

    /// Returns the wire name of the severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Low => "low",
            ErrorSeverity::Medium => "medium",
            ErrorSeverity::High => "high",
            ErrorSeverity::Critical => "critical",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(ErrorSeverity::Low < ErrorSeverity::Medium);
        assert!(ErrorSeverity::Medium < ErrorSeverity::High);
        assert!(ErrorSeverity::High < ErrorSeverity::Critical);
        assert_eq!(ErrorSeverity::default(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(ErrorCategory::NotFound.to_string(), "not_found");
        assert_eq!(
            serde_json::to_string(&ErrorCategory::RateLimit).unwrap(),
            "\"rate_limit\""
        );
        for category in ErrorCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }
}

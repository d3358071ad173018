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

//! The categorization rule table.
//!
//! Category, severity, and retryability are derived here and nowhere else,
//! from the raised error's shape, its HTTP status, and explicit overrides.

use studydash_core::error::raised::VALIDATION_ERROR_NAME;
use studydash_core::error::ErrorOverrides;
use studydash_core::{ErrorCategory, ErrorSeverity, RaisedError};

/// Resolves the category: override, then network failure, then HTTP status,
/// then the validation error name, else unknown.
pub fn categorize(error: &RaisedError, overrides: &ErrorOverrides) -> ErrorCategory {
    if let Some(category) = overrides.category {
        return category;
    }
    if error.is_network_failure() {
        return ErrorCategory::Network;
    }
    if let Some(status) = error.status {
        return category_for_status(status);
    }
    if error.name == VALIDATION_ERROR_NAME {
        return ErrorCategory::Validation;
    }
    ErrorCategory::Unknown
}

/// Maps an HTTP status to its category.
pub fn category_for_status(status: u16) -> ErrorCategory {
    match status {
        401 => ErrorCategory::Authentication,
        403 => ErrorCategory::Authorization,
        404 => ErrorCategory::NotFound,
        429 => ErrorCategory::RateLimit,
        400..=499 => ErrorCategory::Client,
        500..=u16::MAX => ErrorCategory::Server,
        _ => ErrorCategory::Api,
    }
}

/// The severity a category carries unless overridden.
pub fn severity_for(category: ErrorCategory) -> ErrorSeverity {
    match category {
        ErrorCategory::Authentication | ErrorCategory::Authorization | ErrorCategory::Network => {
            ErrorSeverity::High
        }
        ErrorCategory::Server => ErrorSeverity::Critical,
        ErrorCategory::Validation => ErrorSeverity::Low,
        _ => ErrorSeverity::Medium,
    }
}

/// Whether retrying may succeed.
pub fn is_retryable(category: ErrorCategory, status: Option<u16>) -> bool {
    match category {
        ErrorCategory::Network | ErrorCategory::RateLimit => true,
        ErrorCategory::Server => status.is_some_and(|s| (500..600).contains(&s)),
        _ => false,
    }
}

/// The machine code: the backend's code, else `HTTP_<status>`, else the
/// category default.
pub fn error_code(error: &RaisedError, category: ErrorCategory) -> String {
    match (&error.code, error.status) {
        (Some(code), _) => code.clone(),
        (None, Some(status)) => format!("HTTP_{status}"),
        (None, None) => category.default_code().to_string(),
    }
}

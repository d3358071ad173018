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

//! Host capabilities the telemetry services are injected with.
//!
//! A browser host answers these from `navigator`, `location` and
//! `localStorage`; `studydash-infra` ships a headless implementation for
//! native hosts and tests.

use crate::error::{ErrorSeverity, StandardError};
use std::fmt::Debug;
use std::time::Duration;

/// Route the logout recovery navigates to.
pub const LOGIN_ROUTE: &str = "/login";
/// Route the not-found recovery navigates to.
pub const HOME_ROUTE: &str = "/";

/// The environment the services run in.
pub trait Platform: Send + Sync + Debug + 'static {
    /// The host user agent string.
    fn user_agent(&self) -> String;

    /// The URL of the current page.
    fn current_url(&self) -> String;

    /// Drops the locally stored credential token.
    fn clear_credentials(&self);

    /// Navigates to `route`.
    fn navigate(&self, route: &str);

    /// Reloads the current page.
    fn reload(&self);
}

/// What the UI collaborator is asked to show for a handled error.
#[derive(Debug, Clone)]
pub struct UserNotification {
    /// The error to present, with its message and recovery actions.
    pub error: StandardError,
    /// How long to show it; `None` means it stays until dismissed.
    pub auto_dismiss: Option<Duration>,
}

impl UserNotification {
    /// Builds the notification for `error`, deriving the dismissal time from
    /// its severity. Critical errors are never auto-dismissed.
    pub fn for_error(error: StandardError) -> Self {
        let auto_dismiss = match error.severity {
            ErrorSeverity::Low => Some(Duration::from_secs(3)),
            ErrorSeverity::Medium => Some(Duration::from_secs(5)),
            ErrorSeverity::High => Some(Duration::from_secs(8)),
            ErrorSeverity::Critical => None,
        };
        Self {
            error,
            auto_dismiss,
        }
    }
}

/// Presents handled errors to the user (toast, modal, log line, ...).
pub trait Notifier: Send + Sync + Debug + 'static {
    /// Shows one notification.
    fn notify(&self, notification: &UserNotification);
}

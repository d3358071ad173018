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

use studydash_core::{ErrorSeverity, Notifier, UserNotification};

/// Shows user notifications as log lines, at a level matching the severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl LogNotifier {
    /// The line written for `notification`.
    pub fn render(notification: &UserNotification) -> String {
        let error = &notification.error;
        let actions: Vec<&str> = error
            .recovery_actions
            .iter()
            .map(|action| action.label.as_str())
            .collect();
        let dismiss = match notification.auto_dismiss {
            Some(after) => format!("{}s", after.as_secs()),
            None => "manual".to_string(),
        };
        format!(
            "[{}] {} (code {}, actions [{}], dismiss {dismiss})",
            error.severity,
            error.user_message,
            error.code,
            actions.join(", ")
        )
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, notification: &UserNotification) {
        let line = Self::render(notification);
        match notification.error.severity {
            ErrorSeverity::Critical | ErrorSeverity::High => log::error!("{line}"),
            ErrorSeverity::Medium => log::warn!("{line}"),
            ErrorSeverity::Low => log::info!("{line}"),
        }
    }
}

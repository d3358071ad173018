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

//! The error standardizer service.

use super::messages::{self, HOME_LABEL, LOGOUT_LABEL, REFRESH_LABEL, RETRY_LABEL};
use super::recovery::{self, RecoveryTracker};
use super::rules;
use crate::config::ErrorHandlingConfig;
use crate::monitor::EventMonitor;
use crate::observer::{ObserverList, SubscriptionId};
use crate::sync::lock;
use chrono::Utc;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use studydash_core::error::{ErrorStatistics, RecoveryHandler};
use studydash_core::platform::{HOME_ROUTE, LOGIN_ROUTE};
use studydash_core::telemetry::ErrorEvent;
use studydash_core::{
    ErrorCategory, ErrorContext, ErrorSeverity, Notifier, Platform, RaisedError, RecoveryAction,
    RecoveryKind, StandardError, UserNotification,
};
use uuid::Uuid;

/// Number of entries returned in [`ErrorStatistics::recent`].
const RECENT_ERRORS: usize = 10;

type Subscribers = ObserverList<StandardError>;

#[derive(Debug)]
struct StandardizerInner {
    config: ErrorHandlingConfig,
    platform: Arc<dyn Platform>,
    monitor: Option<EventMonitor>,
    notifier: Option<Arc<dyn Notifier>>,
    history: Mutex<VecDeque<StandardError>>,
    subscribers: Mutex<HashMap<ErrorCategory, Arc<Subscribers>>>,
    recovery: Arc<RecoveryTracker>,
}

/// The single point where raised errors become [`StandardError`]s.
///
/// Besides building the record, [`handle_error`](Self::handle_error) keeps a
/// bounded, most-recent-first history, reports to the event monitor, fans out
/// to per-category subscribers, schedules automatic recovery, and asks the
/// notifier to show the error. None of these steps can make it fail.
#[derive(Debug, Clone)]
pub struct ErrorStandardizer {
    inner: Arc<StandardizerInner>,
}

impl ErrorStandardizer {
    /// Creates a standardizer.
    ///
    /// Without a monitor nothing is reported; without a notifier nothing is
    /// shown to the user.
    pub fn new(
        config: ErrorHandlingConfig,
        platform: Arc<dyn Platform>,
        monitor: Option<EventMonitor>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        Self {
            inner: Arc::new(StandardizerInner {
                history: Mutex::new(VecDeque::with_capacity(config.history_limit)),
                subscribers: Mutex::new(HashMap::new()),
                recovery: Arc::new(RecoveryTracker::new()),
                config,
                platform,
                monitor,
                notifier,
            }),
        }
    }

    /// The configuration the standardizer was created with.
    pub fn config(&self) -> &ErrorHandlingConfig {
        &self.inner.config
    }

    /// Builds the standard record for `error` without any side effect.
    pub fn standardize_error(&self, error: &RaisedError, mut context: ErrorContext) -> StandardError {
        let overrides = context.overrides.clone();
        let category = rules::categorize(error, &overrides);
        let severity = overrides
            .severity
            .unwrap_or_else(|| rules::severity_for(category));
        let retryable = rules::is_retryable(category, error.status);
        let user_message = overrides
            .user_message
            .unwrap_or_else(|| messages::user_message(category).to_string());

        let mut details = error.details.clone();
        if let Some(status) = error.status {
            details.insert("status".to_string(), Value::from(status));
        }
        if context.stack.is_none() {
            context.stack = error.stack.clone();
        }
        if context.user_agent.is_none() {
            context.user_agent = Some(self.inner.platform.user_agent());
        }
        let recovery_actions = self.recovery_actions(category, retryable, &context);

        StandardError {
            id: new_error_id(),
            category,
            severity,
            code: rules::error_code(error, category),
            message: error.message.clone(),
            user_message,
            details,
            timestamp: Utc::now(),
            context,
            retryable,
            recovery_actions,
        }
    }

    fn recovery_actions(
        &self,
        category: ErrorCategory,
        retryable: bool,
        context: &ErrorContext,
    ) -> Vec<RecoveryAction> {
        let platform = &self.inner.platform;
        let mut actions = Vec::new();

        if retryable {
            let handler = context.retry.clone().unwrap_or_else(|| {
                let platform = Arc::clone(platform);
                RecoveryHandler::from_fn(move || {
                    platform.reload();
                    Ok(())
                })
            });
            let mut retry = RecoveryAction::new(RecoveryKind::Retry, RETRY_LABEL, handler);
            if self.inner.config.auto_retry {
                retry = retry.automatic(Some(self.inner.config.retry_delay()));
            }
            actions.push(retry);
        }

        let platform = Arc::clone(platform);
        match category {
            ErrorCategory::Authentication => actions.push(RecoveryAction::new(
                RecoveryKind::Logout,
                LOGOUT_LABEL,
                RecoveryHandler::from_fn(move || {
                    platform.clear_credentials();
                    platform.navigate(LOGIN_ROUTE);
                    Ok(())
                }),
            )),
            ErrorCategory::Network => actions.push(RecoveryAction::new(
                RecoveryKind::Refresh,
                REFRESH_LABEL,
                RecoveryHandler::from_fn(move || {
                    platform.reload();
                    Ok(())
                }),
            )),
            ErrorCategory::NotFound => actions.push(RecoveryAction::new(
                RecoveryKind::Redirect,
                HOME_LABEL,
                RecoveryHandler::from_fn(move || {
                    platform.navigate(HOME_ROUTE);
                    Ok(())
                }),
            )),
            _ => {}
        }
        actions
    }

    /// Standardizes `error` and runs the full handling pipeline.
    pub async fn handle_error(&self, error: &RaisedError, context: ErrorContext) -> StandardError {
        let standard = self.standardize_error(error, context);
        match standard.severity {
            ErrorSeverity::High | ErrorSeverity::Critical => log::warn!("Handled error {standard}"),
            _ => log::info!("Handled error {standard}"),
        }

        self.push_history(&standard);
        self.report(&standard);
        self.notify_subscribers(&standard);
        if standard.retryable && self.inner.config.auto_retry {
            self.attempt_recovery(&standard);
        }
        if self.inner.config.show_user_notifications {
            if let Some(notifier) = &self.inner.notifier {
                let notification = UserNotification::for_error(standard.clone());
                let shown = panic::catch_unwind(AssertUnwindSafe(|| notifier.notify(&notification)));
                if shown.is_err() {
                    log::warn!("Notifier panicked while showing error {}.", standard.id);
                }
            }
        }
        standard
    }

    /// Handles a failed API call to `endpoint`.
    ///
    /// Errors the rule table cannot place are filed as API errors.
    pub async fn handle_api_error(
        &self,
        error: &RaisedError,
        endpoint: &str,
        method: &str,
        context: ErrorContext,
    ) -> StandardError {
        let mut context = context
            .with_url(endpoint)
            .with_method(method.to_uppercase());
        if rules::categorize(error, &context.overrides) == ErrorCategory::Unknown {
            context.overrides.category = Some(ErrorCategory::Api);
        }
        self.handle_error(error, context).await
    }

    /// Handles a request that never got a response.
    pub async fn handle_network_error(
        &self,
        error: &RaisedError,
        context: ErrorContext,
    ) -> StandardError {
        self.handle_error(error, context.with_category(ErrorCategory::Network))
            .await
    }

    /// Builds a validation error carrying `field_errors` in
    /// `details.fieldErrors`.
    ///
    /// Only the record is built: it is not added to the history and no
    /// subscriber, report, or recovery is triggered.
    pub fn handle_validation_error(
        &self,
        field_errors: &HashMap<String, Vec<String>>,
        message: Option<&str>,
    ) -> StandardError {
        let fields: serde_json::Map<String, Value> = field_errors
            .iter()
            .map(|(field, errors)| (field.clone(), Value::from(errors.clone())))
            .collect();
        let error = RaisedError::validation(message.unwrap_or("Validation failed"))
            .with_detail("fieldErrors", Value::Object(fields));
        self.standardize_error(
            &error,
            ErrorContext::new().with_category(ErrorCategory::Validation),
        )
    }

    /// Registers `callback` for errors of `category`. Callbacks of one
    /// category run in registration order.
    pub fn on_error<F>(&self, category: ErrorCategory, callback: F) -> SubscriptionId
    where
        F: Fn(&StandardError) + Send + Sync + 'static,
    {
        self.subscribers_for(category).subscribe(callback)
    }

    /// Removes a subscription. Returns `false` if it was unknown.
    pub fn off_error(&self, id: SubscriptionId) -> bool {
        let lists: Vec<Arc<Subscribers>> = lock(&self.inner.subscribers).values().cloned().collect();
        lists.iter().any(|list| list.unsubscribe(id))
    }

    /// The most recent errors, newest first, at most `limit` of them.
    pub fn error_history(&self, limit: Option<usize>) -> Vec<StandardError> {
        let history = lock(&self.inner.history);
        let limit = limit.unwrap_or(history.len());
        history.iter().take(limit).cloned().collect()
    }

    /// Aggregates over the history.
    pub fn error_statistics(&self) -> ErrorStatistics {
        let history = lock(&self.inner.history);
        let mut stats = ErrorStatistics {
            total: history.len(),
            ..Default::default()
        };
        for error in history.iter() {
            *stats.by_category.entry(error.category).or_insert(0) += 1;
            *stats.by_severity.entry(error.severity).or_insert(0) += 1;
            if error.retryable {
                stats.retryable += 1;
            }
        }
        stats.recent = history.iter().take(RECENT_ERRORS).cloned().collect();
        stats
    }

    /// Empties the history and resets every automatic recovery counter.
    pub fn clear_history(&self) {
        lock(&self.inner.history).clear();
        self.inner.recovery.clear();
    }

    /// Automatic recovery attempts made for `key` (`category_code`).
    pub fn recovery_attempts(&self, key: &str) -> u32 {
        self.inner.recovery.attempts(key)
    }

    fn subscribers_for(&self, category: ErrorCategory) -> Arc<Subscribers> {
        Arc::clone(
            lock(&self.inner.subscribers)
                .entry(category)
                .or_insert_with(|| Arc::new(ObserverList::new())),
        )
    }

    fn push_history(&self, error: &StandardError) {
        let mut history = lock(&self.inner.history);
        history.push_front(error.clone());
        history.truncate(self.inner.config.history_limit);
    }

    fn report(&self, error: &StandardError) {
        let config = &self.inner.config;
        if !config.report_errors || error.severity < config.report_threshold {
            return;
        }
        let Some(monitor) = &self.inner.monitor else {
            return;
        };
        let mut event = ErrorEvent::new(error.message.as_str())
            .with_metadata("errorId", error.id.as_str())
            .with_metadata("category", error.category.as_str())
            .with_metadata("severity", error.severity.as_str())
            .with_metadata("code", error.code.as_str())
            .with_metadata("retryable", error.retryable);
        if let Some(endpoint) = &error.context.url {
            event = event.with_metadata("endpoint", endpoint.as_str());
        }
        event.stack = error.context.stack.clone();
        event.user_id = error.context.user_id.clone();
        monitor.track_error(event);
    }

    fn notify_subscribers(&self, error: &StandardError) {
        let subscribers = lock(&self.inner.subscribers).get(&error.category).cloned();
        if let Some(subscribers) = subscribers {
            let panicked = subscribers.notify(error);
            if panicked > 0 {
                log::warn!("{panicked} error subscribers for '{}' panicked.", error.category);
            }
        }
    }

    fn attempt_recovery(&self, error: &StandardError) {
        let Some(action) = error.automatic_action() else {
            return;
        };
        let key = error.recovery_key();
        match self
            .inner
            .recovery
            .begin(&key, self.inner.config.max_retry_attempts)
        {
            Some(attempt) => {
                log::debug!("Scheduling automatic recovery attempt {attempt} for '{key}'.");
                recovery::spawn_attempt(Arc::clone(&self.inner.recovery), key, action.clone());
            }
            None => log::debug!("Automatic recovery for '{key}' exhausted; skipping."),
        }
    }
}

fn new_error_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("err_{}_{}", Utc::now().timestamp_millis(), &suffix[..9])
}

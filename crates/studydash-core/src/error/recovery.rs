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

//! Recovery actions attached to standard errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// The future returned by a recovery handler.
pub type RecoveryFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'static>>;

/// An executable, possibly asynchronous, remediation.
///
/// Handlers are live closures and therefore never serialized; a deserialized
/// [`RecoveryAction`] has no handler and must be rebuilt by the receiver.
#[derive(Clone)]
pub struct RecoveryHandler(Arc<dyn Fn() -> RecoveryFuture + Send + Sync>);

impl RecoveryHandler {
    /// Wraps an async closure.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self(Arc::new(move || Box::pin(handler())))
    }

    /// Wraps a synchronous closure.
    pub fn from_fn<F>(handler: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(move || {
            let result = handler();
            Box::pin(async move { result })
        }))
    }

    /// Starts the handler, returning its future.
    pub fn run(&self) -> RecoveryFuture {
        (self.0)()
    }
}

impl fmt::Debug for RecoveryHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RecoveryHandler(..)")
    }
}

/// The kind of remediation an action performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryKind {
    /// Re-run the failed operation.
    Retry,
    /// Reload the current page.
    Refresh,
    /// Drop the stored credential and go to the login route.
    Logout,
    /// Navigate somewhere else.
    Redirect,
    /// Anything application specific.
    Custom,
}

/// A remediation offered to the user or run automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryAction {
    /// What the action does.
    pub kind: RecoveryKind,
    /// Human-readable button label.
    pub label: String,
    /// `true` if the standardizer may run this action without the user.
    pub automatic: bool,
    /// Delay before an automatic run, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
    /// The executable part. Not serialized.
    #[serde(skip)]
    pub handler: Option<RecoveryHandler>,
}

impl RecoveryAction {
    /// Creates a manual action.
    pub fn new(kind: RecoveryKind, label: impl Into<String>, handler: RecoveryHandler) -> Self {
        Self {
            kind,
            label: label.into(),
            automatic: false,
            delay_ms: None,
            handler: Some(handler),
        }
    }

    /// Marks the action as automatic, to be run after `delay`.
    pub fn automatic(mut self, delay: Option<Duration>) -> Self {
        self.automatic = true;
        self.delay_ms = delay.map(|d| d.as_millis() as u64);
        self
    }

    /// The delay before an automatic run.
    pub fn delay(&self) -> Option<Duration> {
        self.delay_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// `true` if the action still carries a live handler.
    pub fn is_executable(&self) -> bool {
        self.handler.is_some()
    }

    /// Runs the action.
    pub async fn execute(&self) -> anyhow::Result<()> {
        match &self.handler {
            Some(handler) => handler.run().await,
            None => anyhow::bail!("recovery action '{}' has no handler", self.label),
        }
    }
}

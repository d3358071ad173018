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

//! An in-memory platform for hosts without a DOM.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use studydash_core::Platform;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A [`Platform`] that keeps the credential, the current route, and the
/// reload count in memory.
#[derive(Debug)]
pub struct HeadlessPlatform {
    user_agent: String,
    origin: String,
    route: Mutex<String>,
    credential: Mutex<Option<String>>,
    history: Mutex<Vec<String>>,
    reloads: AtomicUsize,
}

impl HeadlessPlatform {
    /// Creates a platform at `origin` (e.g. `http://localhost:3000`), on the
    /// home route.
    pub fn new(user_agent: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            origin: origin.into().trim_end_matches('/').to_string(),
            route: Mutex::new("/".to_string()),
            credential: Mutex::new(None),
            history: Mutex::new(Vec::new()),
            reloads: AtomicUsize::new(0),
        }
    }

    /// Stores a credential token.
    pub fn set_credential(&self, token: impl Into<String>) {
        *lock(&self.credential) = Some(token.into());
    }

    /// The stored credential token.
    pub fn credential(&self) -> Option<String> {
        lock(&self.credential).clone()
    }

    /// The current route.
    pub fn route(&self) -> String {
        lock(&self.route).clone()
    }

    /// Every route navigated to, in order.
    pub fn history(&self) -> Vec<String> {
        lock(&self.history).clone()
    }

    /// How many times the page was reloaded.
    pub fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::Relaxed)
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new(
            concat!("studydash/", env!("CARGO_PKG_VERSION")),
            "http://localhost",
        )
    }
}

impl Platform for HeadlessPlatform {
    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn current_url(&self) -> String {
        format!("{}{}", self.origin, lock(&self.route))
    }

    fn clear_credentials(&self) {
        if lock(&self.credential).take().is_some() {
            log::info!("Cleared stored credential.");
        }
    }

    fn navigate(&self, route: &str) {
        log::info!("Navigating to {route}");
        *lock(&self.route) = route.to_string();
        lock(&self.history).push(route.to_string());
    }

    fn reload(&self) {
        log::info!("Reloading {}", self.current_url());
        self.reloads.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studydash_core::platform::LOGIN_ROUTE;

    #[test]
    fn test_navigation_updates_current_url() {
        let platform = HeadlessPlatform::new("agent", "http://localhost:3000/");
        assert_eq!(platform.current_url(), "http://localhost:3000/");
        platform.navigate(LOGIN_ROUTE);
        assert_eq!(platform.current_url(), "http://localhost:3000/login");
        assert_eq!(platform.history(), vec!["/login"]);
    }

    #[test]
    fn test_credentials_and_reloads() {
        let platform = HeadlessPlatform::default();
        platform.set_credential("token");
        assert_eq!(platform.credential().as_deref(), Some("token"));
        platform.clear_credentials();
        assert_eq!(platform.credential(), None);
        platform.reload();
        platform.reload();
        assert_eq!(platform.reload_count(), 2);
    }
}

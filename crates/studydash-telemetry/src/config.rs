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

//! Configuration for the telemetry services.
//!
//! Every field has a default, so a JSON file only needs the keys it changes:
//!
//! ```json
//! { "monitor": { "environment": "production", "batchSize": 20 } }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use studydash_core::ErrorSeverity;
use thiserror::Error;

/// An error loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The JSON was malformed.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of range.
    #[error("invalid config value for '{field}': {reason}")]
    Invalid {
        /// The offending key.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// The deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeEnvironment {
    /// Local development.
    #[default]
    Development,
    /// Automated tests.
    Test,
    /// Production-like deployment.
    Production,
}

/// Event monitor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonitorConfig {
    /// Collector endpoint the batches are posted to.
    pub endpoint: String,
    /// Deployment environment.
    pub environment: RuntimeEnvironment,
    /// Enables monitoring outside production.
    pub enabled: bool,
    /// Queue length that triggers an immediate flush.
    pub batch_size: usize,
    /// Period of the flush timer, in milliseconds.
    pub flush_interval_ms: u64,
    /// Upper bound on events kept after a failed flush.
    pub max_queue_size: usize,
    /// Quiet time before a scroll is recorded, in milliseconds.
    pub scroll_debounce_ms: u64,
    /// Resources slower than this are recorded as events, in milliseconds.
    pub slow_resource_ms: f64,
    /// Number of recent API calls kept for latency aggregates.
    pub api_window: usize,
    /// Capacity of the host signal channel.
    pub signal_capacity: usize,
}

impl MonitorConfig {
    /// `true` when the monitor should record anything at all.
    pub fn is_active(&self) -> bool {
        self.enabled || self.environment == RuntimeEnvironment::Production
    }

    /// The flush timer period.
    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    /// The scroll debounce window.
    pub fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            endpoint: "/api/monitoring/events".to_string(),
            environment: RuntimeEnvironment::Development,
            enabled: false,
            batch_size: 10,
            flush_interval_ms: 5000,
            max_queue_size: 100,
            scroll_debounce_ms: 100,
            slow_resource_ms: 1000.0,
            api_window: 100,
            signal_capacity: 1024,
        }
    }
}

/// Error standardizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ErrorHandlingConfig {
    /// Lets the standardizer run automatic retry actions.
    pub auto_retry: bool,
    /// Automatic attempts per `category_code` key before giving up.
    pub max_retry_attempts: u32,
    /// Delay before an automatic retry, in milliseconds.
    pub retry_delay_ms: u64,
    /// Forwards handled errors to the notifier.
    pub show_user_notifications: bool,
    /// Forwards handled errors to the event monitor.
    pub report_errors: bool,
    /// Lowest severity forwarded to the event monitor.
    pub report_threshold: ErrorSeverity,
    /// Number of errors kept in the history.
    pub history_limit: usize,
}

impl ErrorHandlingConfig {
    /// The automatic retry delay.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for ErrorHandlingConfig {
    fn default() -> Self {
        Self {
            auto_retry: true,
            max_retry_attempts: 3,
            retry_delay_ms: 1000,
            show_user_notifications: true,
            report_errors: true,
            report_threshold: ErrorSeverity::Medium,
            history_limit: 100,
        }
    }
}

/// How the three sub-scores are blended into the overall score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreWeighting {
    /// `(0.25·L + 0.25·I + 0.15·V) × 4`, clamped. Matches existing dashboards.
    #[default]
    Legacy,
    /// The same weights divided by their sum (0.65).
    Normalized,
}

/// Performance analyzer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzerConfig {
    /// Overall score blending.
    pub score_weighting: ScoreWeighting,
    /// Cache hit rate below which a caching suggestion is made.
    pub cache_hit_rate_target: f64,
    /// Average API latency above which an API suggestion is made, in milliseconds.
    pub api_latency_target_ms: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            score_weighting: ScoreWeighting::Legacy,
            cache_hit_rate_target: 0.7,
            api_latency_target_ms: 300.0,
        }
    }
}

/// Complete telemetry configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Event monitor settings.
    pub monitor: MonitorConfig,
    /// Error standardizer settings.
    pub errors: ErrorHandlingConfig,
    /// Performance analyzer settings.
    pub analyzer: AnalyzerConfig,
}

impl TelemetryConfig {
    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration to a JSON file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Rejects values the services cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitor.batch_size == 0 {
            return Err(ConfigError::Invalid {
                field: "monitor.batchSize",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.monitor.flush_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "monitor.flushIntervalMs",
                reason: "must be positive".to_string(),
            });
        }
        if self.monitor.max_queue_size < self.monitor.batch_size {
            return Err(ConfigError::Invalid {
                field: "monitor.maxQueueSize",
                reason: format!(
                    "must be at least the batch size ({})",
                    self.monitor.batch_size
                ),
            });
        }
        if self.monitor.signal_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "monitor.signalCapacity",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.errors.history_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "errors.historyLimit",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

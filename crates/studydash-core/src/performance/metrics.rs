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

//! Raw metric families collected for one analysis run.

use serde::{Deserialize, Serialize};

/// Navigation timing and Web-Vitals-style metrics, in milliseconds
/// (layout shift is unitless). Zero means "not observed".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationMetrics {
    /// Time to first byte.
    pub time_to_first_byte: f64,
    /// DOMContentLoaded.
    pub dom_content_loaded: f64,
    /// Load event end.
    pub load_complete: f64,
    /// First paint.
    pub first_paint: f64,
    /// First contentful paint.
    pub first_contentful_paint: f64,
    /// Largest contentful paint.
    pub largest_contentful_paint: f64,
    /// First input delay.
    pub first_input_delay: f64,
    /// Cumulative layout shift.
    pub cumulative_layout_shift: f64,
    /// Time to interactive.
    pub time_to_interactive: f64,
}

/// Coarse type of a loaded resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// JavaScript.
    Script,
    /// CSS.
    Stylesheet,
    /// Any image format.
    Image,
    /// Web fonts.
    Font,
    /// XHR / fetch.
    Fetch,
    /// Everything else.
    Other,
}

impl ResourceType {
    /// Guesses the type from a resource URL's extension.
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let extension = path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "js" | "mjs" | "cjs" => ResourceType::Script,
            "css" => ResourceType::Stylesheet,
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "avif" | "svg" | "ico" => {
                ResourceType::Image
            }
            "woff" | "woff2" | "ttf" | "otf" | "eot" => ResourceType::Font,
            _ if path.contains("/api/") => ResourceType::Fetch,
            _ => ResourceType::Other,
        }
    }

    /// The serialized name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Script => "script",
            ResourceType::Stylesheet => "stylesheet",
            ResourceType::Image => "image",
            ResourceType::Font => "font",
            ResourceType::Fetch => "fetch",
            ResourceType::Other => "other",
        }
    }
}

/// One resource-timing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
    /// Resource URL.
    pub name: String,
    /// Coarse type.
    pub resource_type: ResourceType,
    /// Bytes on the wire (0 when served from cache).
    pub transfer_size: u64,
    /// Body size before content decoding.
    pub encoded_body_size: u64,
    /// Load duration in milliseconds.
    pub duration: f64,
}

impl ResourceEntry {
    /// Creates an entry, guessing the type from the URL.
    pub fn new(
        name: impl Into<String>,
        transfer_size: u64,
        encoded_body_size: u64,
        duration: f64,
    ) -> Self {
        let name = name.into();
        Self {
            resource_type: ResourceType::from_url(&name),
            name,
            transfer_size,
            encoded_body_size,
            duration,
        }
    }

    /// `true` when the resource was served from a cache.
    pub fn from_cache(&self) -> bool {
        self.transfer_size == 0 && self.encoded_body_size > 0
    }

    /// The size attributed to the resource: wire bytes, or the body size for
    /// cached entries.
    pub fn size(&self) -> u64 {
        if self.from_cache() {
            self.encoded_body_size
        } else {
            self.transfer_size
        }
    }
}

/// Resource byte counts by type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetrics {
    /// Sum over every resource.
    pub total_bytes: u64,
    /// JavaScript bytes.
    pub script_bytes: u64,
    /// CSS bytes.
    pub stylesheet_bytes: u64,
    /// Image bytes.
    pub image_bytes: u64,
    /// Font bytes.
    pub font_bytes: u64,
    /// Everything else.
    pub other_bytes: u64,
    /// Number of entries.
    pub request_count: u64,
    /// Number of entries served from cache.
    pub cached_count: u64,
    /// `cached_count / request_count`, 0 when nothing was loaded.
    pub cache_hit_rate: f64,
}

impl ResourceMetrics {
    /// Aggregates a set of resource entries.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a ResourceEntry>) -> Self {
        let mut metrics = Self::default();
        for entry in entries {
            let size = entry.size();
            metrics.total_bytes += size;
            match entry.resource_type {
                ResourceType::Script => metrics.script_bytes += size,
                ResourceType::Stylesheet => metrics.stylesheet_bytes += size,
                ResourceType::Image => metrics.image_bytes += size,
                ResourceType::Font => metrics.font_bytes += size,
                ResourceType::Fetch | ResourceType::Other => metrics.other_bytes += size,
            }
            metrics.request_count += 1;
            if entry.from_cache() {
                metrics.cached_count += 1;
            }
        }
        if metrics.request_count > 0 {
            metrics.cache_hit_rate = metrics.cached_count as f64 / metrics.request_count as f64;
        }
        metrics
    }
}

/// Runtime heap usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryMetrics {
    /// Bytes currently used.
    pub used_heap_bytes: u64,
    /// Bytes currently reserved.
    pub total_heap_bytes: u64,
    /// Upper bound the heap may grow to.
    pub heap_limit_bytes: u64,
}

impl MemoryMetrics {
    /// `used / limit`, or `None` when the limit is unknown.
    pub fn usage_ratio(&self) -> Option<f64> {
        (self.heap_limit_bytes > 0)
            .then(|| self.used_heap_bytes as f64 / self.heap_limit_bytes as f64)
    }

    /// Used heap in megabytes (MB).
    pub fn used_heap_mb(&self) -> f64 {
        self.used_heap_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// User-interaction aggregates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionMetrics {
    /// Clicks observed.
    pub clicks: u64,
    /// Debounced scrolls observed.
    pub scrolls: u64,
    /// All user events observed.
    pub total_events: u64,
    /// Time since the monitor started, in milliseconds.
    pub session_duration_ms: f64,
}

/// API call aggregates over the recent window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetrics {
    /// Calls observed since start.
    pub total_calls: u64,
    /// Failed calls observed since start.
    pub failed_calls: u64,
    /// Mean response time over the recent window, in milliseconds.
    pub average_response_ms: f64,
    /// Slowest response time over the recent window, in milliseconds.
    pub max_response_ms: f64,
    /// `failed_calls / total_calls`.
    pub error_rate: f64,
    /// Name of the slowest recent call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slowest_endpoint: Option<String>,
}

/// Everything collected for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedMetrics {
    /// Navigation timing.
    pub navigation: NavigationMetrics,
    /// Resource sizes.
    pub resources: ResourceMetrics,
    /// Heap usage, when the host exposes it.
    pub memory: Option<MemoryMetrics>,
    /// Interaction aggregates.
    pub interactions: InteractionMetrics,
    /// API aggregates.
    pub api: ApiMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_from_url() {
        assert_eq!(ResourceType::from_url("/static/app.js?v=3"), ResourceType::Script);
        assert_eq!(ResourceType::from_url("/img/hero.WEBP"), ResourceType::Image);
        assert_eq!(ResourceType::from_url("/fonts/noto.woff2"), ResourceType::Font);
        assert_eq!(ResourceType::from_url("/api/plans"), ResourceType::Fetch);
        assert_eq!(ResourceType::from_url("/favicon"), ResourceType::Other);
    }

    #[test]
    fn test_resource_aggregation() {
        let entries = vec![
            ResourceEntry::new("/app.js", 600_000, 600_000, 120.0),
            ResourceEntry::new("/vendor.js", 0, 500_000, 5.0),
            ResourceEntry::new("/hero.png", 200_000, 200_000, 80.0),
            ResourceEntry::new("/site.css", 0, 30_000, 2.0),
        ];
        let metrics = ResourceMetrics::from_entries(&entries);

        assert_eq!(metrics.script_bytes, 1_100_000);
        assert_eq!(metrics.image_bytes, 200_000);
        assert_eq!(metrics.stylesheet_bytes, 30_000);
        assert_eq!(metrics.total_bytes, 1_330_000);
        assert_eq!(metrics.request_count, 4);
        assert_eq!(metrics.cached_count, 2);
        assert!((metrics.cache_hit_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_resources_have_zero_hit_rate() {
        let metrics = ResourceMetrics::from_entries(std::iter::empty::<&ResourceEntry>());
        assert_eq!(metrics.request_count, 0);
        assert_eq!(metrics.cache_hit_rate, 0.0);
    }

    #[test]
    fn test_memory_usage_ratio() {
        let memory = MemoryMetrics {
            used_heap_bytes: 850,
            total_heap_bytes: 900,
            heap_limit_bytes: 1000,
        };
        assert_eq!(memory.usage_ratio(), Some(0.85));
        assert_eq!(MemoryMetrics::default().usage_ratio(), None);
    }
}

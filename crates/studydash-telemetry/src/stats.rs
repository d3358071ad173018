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

//! Rolling storage for recent latency samples.

use std::collections::VecDeque;

/// A bounded window of labelled samples, overwriting the oldest when full.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    samples: VecDeque<(String, f64)>,
    capacity: usize,
}

impl RollingWindow {
    /// Creates an empty window holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Pushes a new sample, evicting the oldest if full.
    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back((label.into(), value));
    }

    /// Returns the number of samples currently held.
    pub fn count(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if no sample has been pushed.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Arithmetic mean of the samples, 0 when empty.
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().map(|(_, v)| v).sum::<f64>() / self.samples.len() as f64
    }

    /// The largest sample and its label.
    pub fn max(&self) -> Option<(&str, f64)> {
        self.samples
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(label, value)| (label.as_str(), *value))
    }

    /// Iterates over the samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.samples.iter().map(|(l, v)| (l.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_evicts_oldest() {
        let mut window = RollingWindow::new(3);
        for (i, v) in [10.0, 20.0, 30.0, 40.0].into_iter().enumerate() {
            window.push(format!("call-{i}"), v);
        }
        assert_eq!(window.count(), 3);
        let values: Vec<f64> = window.iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![20.0, 30.0, 40.0]);
        assert!((window.average() - 30.0).abs() < f64::EPSILON);
        assert_eq!(window.max(), Some(("call-3", 40.0)));
    }

    #[test]
    fn test_empty_window() {
        let window = RollingWindow::new(0);
        assert!(window.is_empty());
        assert_eq!(window.average(), 0.0);
        assert_eq!(window.max(), None);
    }
}

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

//! The in-memory event queue.

use std::collections::VecDeque;
use studydash_core::MonitoringEvent;

/// Ordered queue of events waiting for the next flush.
#[derive(Debug)]
pub struct EventQueue {
    events: VecDeque<MonitoringEvent>,
    batch_size: usize,
    max_size: usize,
}

impl EventQueue {
    /// Creates an empty queue.
    pub fn new(batch_size: usize, max_size: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(batch_size),
            batch_size: batch_size.max(1),
            max_size,
        }
    }

    /// Appends an event, evicting the oldest one when the queue is already
    /// at its limit. Returns the evicted event.
    pub fn push(&mut self, event: MonitoringEvent) -> Option<MonitoringEvent> {
        let evicted = if self.events.len() >= self.max_size {
            self.events.pop_front()
        } else {
            None
        };
        self.events.push_back(event);
        evicted
    }

    /// `true` once the queue holds a full batch.
    pub fn has_full_batch(&self) -> bool {
        self.events.len() >= self.batch_size
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Takes every queued event, oldest first.
    pub fn drain_all(&mut self) -> Vec<MonitoringEvent> {
        self.events.drain(..).collect()
    }

    /// Puts the events of a failed flush back in front of anything queued
    /// since, keeping their original order.
    ///
    /// If that would leave more than `max_size` events pending, the failed
    /// events are dropped instead and their count is returned as the error.
    pub fn requeue_front(&mut self, failed: Vec<MonitoringEvent>) -> Result<usize, usize> {
        let count = failed.len();
        if self.events.len() + count > self.max_size {
            return Err(count);
        }
        for event in failed.into_iter().rev() {
            self.events.push_front(event);
        }
        Ok(count)
    }

    /// Iterates over the queued events, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &MonitoringEvent> {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studydash_core::telemetry::{UserEvent, UserEventKind};

    fn click(target: &str) -> MonitoringEvent {
        MonitoringEvent::User(UserEvent::new(UserEventKind::Click, target))
    }

    fn targets(queue: &EventQueue) -> Vec<String> {
        queue
            .iter()
            .map(|e| match e {
                MonitoringEvent::User(u) => u.target.clone(),
                other => panic!("unexpected event {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_push_reports_full_batch() {
        let mut queue = EventQueue::new(3, 10);
        queue.push(click("a"));
        queue.push(click("b"));
        assert!(!queue.has_full_batch());
        queue.push(click("c"));
        assert!(queue.has_full_batch());
        assert_eq!(queue.drain_all().len(), 3);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_push_at_limit_evicts_oldest() {
        let mut queue = EventQueue::new(2, 3);
        for target in ["a", "b", "c"] {
            assert!(queue.push(click(target)).is_none());
        }
        let evicted = queue.push(click("d"));

        assert!(matches!(evicted, Some(MonitoringEvent::User(u)) if u.target == "a"));
        assert_eq!(targets(&queue), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_requeue_preserves_order_in_front() {
        let mut queue = EventQueue::new(10, 100);
        queue.push(click("a"));
        queue.push(click("b"));
        let failed = queue.drain_all();
        queue.push(click("c"));

        assert_eq!(queue.requeue_front(failed), Ok(2));
        assert_eq!(targets(&queue), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_requeue_beyond_cap_drops_failed_events() {
        let mut queue = EventQueue::new(2, 4);
        let failed = vec![click("a"), click("b"), click("c")];
        queue.push(click("d"));
        queue.push(click("e"));

        assert_eq!(queue.requeue_front(failed), Err(3));
        assert_eq!(targets(&queue), vec!["d", "e"]);
    }

    #[test]
    fn test_requeue_exactly_at_cap_is_kept() {
        let mut queue = EventQueue::new(2, 3);
        queue.push(click("c"));
        assert_eq!(queue.requeue_front(vec![click("a"), click("b")]), Ok(2));
        assert_eq!(queue.len(), 3);
    }
}

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

//! The host signal channel.

use studydash_core::telemetry::HostSignal;

/// A bounded channel carrying host signals to the monitor worker.
///
/// Hosts hold clones of the sender; the worker owns the receiving end. When
/// the channel is full, new signals are dropped.
#[derive(Debug)]
pub struct SignalBus {
    sender: flume::Sender<HostSignal>,
    receiver: flume::Receiver<HostSignal>,
}

impl SignalBus {
    /// Creates a bus holding at most `capacity` pending signals.
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = flume::bounded(capacity.max(1));
        Self { sender, receiver }
    }

    /// Attempts to send a signal, logging if it had to be dropped.
    pub fn publish(&self, signal: HostSignal) -> bool {
        match self.sender.try_send(signal) {
            Ok(()) => true,
            Err(flume::TrySendError::Full(_)) => {
                log::warn!("Host signal channel full; dropping signal.");
                false
            }
            Err(flume::TrySendError::Disconnected(_)) => {
                log::error!("Host signal channel disconnected; dropping signal.");
                false
            }
        }
    }

    /// Returns a clone of the sender end of the channel.
    pub fn sender(&self) -> flume::Sender<HostSignal> {
        self.sender.clone()
    }

    /// Returns a clone of the receiver end of the channel.
    pub fn receiver(&self) -> flume::Receiver<HostSignal> {
        self.receiver.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_bus_drops_signals() {
        let bus = SignalBus::new(1);
        assert!(bus.publish(HostSignal::Unload));
        assert!(!bus.publish(HostSignal::Unload));
        assert_eq!(bus.receiver().try_recv(), Ok(HostSignal::Unload));
    }

    #[test]
    fn test_sender_clone_reaches_receiver() {
        let bus = SignalBus::new(4);
        bus.sender()
            .send(HostSignal::Click {
                target: "button#save".to_string(),
            })
            .expect("send should succeed");
        assert!(matches!(
            bus.receiver().try_recv(),
            Ok(HostSignal::Click { .. })
        ));
    }
}

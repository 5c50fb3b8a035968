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

use crate::marker::ObservationBatch;
use std::sync::{Mutex, PoisonError};

/// A thread-safe, append-only broadcast of [`ObservationBatch`] values.
///
/// Every subscriber owns an unbounded `flume` channel, so a slow consumer never
/// blocks the producer and never loses a batch. Subscribers whose receiver has
/// been dropped are pruned on the next publish.
#[derive(Debug, Default)]
pub struct ObservationStream {
    subscribers: Mutex<Vec<flume::Sender<ObservationBatch>>>,
}

impl ObservationStream {
    /// Creates a stream with no subscribers.
    pub fn new() -> Self {
        log::info!("ObservationStream initialized.");
        Self::default()
    }

    /// Registers a new consumer.
    ///
    /// ## Returns
    /// The receiving end of a channel that yields every batch published from
    /// now on, in publication order.
    pub fn subscribe(&self) -> flume::Receiver<ObservationBatch> {
        let (sender, receiver) = flume::unbounded();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        receiver
    }

    /// Publishes a batch to every live subscriber.
    ///
    /// ## Returns
    /// The number of subscribers the batch was delivered to.
    pub fn publish(&self, batch: ObservationBatch) -> usize {
        log::trace!(
            "Publishing observation batch {} ({} markers).",
            batch.sequence,
            batch.len()
        );

        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|sender| sender.send(batch.clone()).is_ok());
        subscribers.len()
    }

    /// Returns the number of subscribers that were live at the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

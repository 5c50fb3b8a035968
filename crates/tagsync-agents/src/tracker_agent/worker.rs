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

//! The background worker that feeds observation batches to a tracker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use flume::RecvTimeoutError;
use tagsync_core::{ObservationStream, SharedSceneSink, SinkSlot};

use super::agent::{bind_sink, MarkerTracker};
use super::status::{TrackerCounters, TrackerStatus};

/// How long the worker blocks on an empty stream before re-checking its stop flag.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(50);

impl MarkerTracker {
    /// Subscribes to `stream` and moves the tracker onto a dedicated worker thread.
    ///
    /// The worker processes batches strictly one at a time, in publication
    /// order. It exits when the stream is dropped or the returned service is
    /// stopped.
    pub fn spawn(self, stream: &ObservationStream) -> std::io::Result<TrackerService> {
        let receiver = stream.subscribe();
        let running = Arc::new(AtomicBool::new(true));
        let sink = self.sink_slot();
        let counters = self.counters();

        let flag = Arc::clone(&running);
        let mut tracker = self;
        let handle = thread::Builder::new()
            .name("tagsync-tracker".to_string())
            .spawn(move || {
                log::info!("MarkerTracker worker started.");
                while flag.load(Ordering::Relaxed) {
                    match receiver.recv_timeout(STOP_POLL_INTERVAL) {
                        Ok(batch) => {
                            tracker.on_observation_batch(&batch);
                        }
                        Err(RecvTimeoutError::Timeout) => continue,
                        Err(RecvTimeoutError::Disconnected) => {
                            log::info!("MarkerTracker: observation stream closed.");
                            break;
                        }
                    }
                }
                log::info!("MarkerTracker worker stopped.");
                tracker
            })?;

        Ok(TrackerService {
            sink,
            counters,
            running,
            handle: Some(handle),
        })
    }
}

/// A handle to a [`MarkerTracker`] running on its own worker thread.
///
/// Dropping the service stops the worker and joins it.
pub struct TrackerService {
    sink: SinkSlot,
    counters: Arc<TrackerCounters>,
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<MarkerTracker>>,
}

impl TrackerService {
    /// Records the scene sink render tasks will use from now on.
    pub fn bind_scene_sink(&self, sink: &SharedSceneSink) {
        bind_sink(&self.sink, sink);
    }

    /// Reports the tracker's counters and phase.
    pub fn report_status(&self) -> TrackerStatus {
        self.counters.snapshot()
    }

    /// Returns `true` while the worker thread is alive.
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the worker after the batch it is processing, and returns the tracker.
    ///
    /// Batches still queued in the stream are not processed.
    pub fn stop(mut self) -> Option<MarkerTracker> {
        self.running.store(false, Ordering::SeqCst);
        self.join_worker()
    }

    /// Waits for the worker to drain the stream and exit, and returns the tracker.
    ///
    /// Only returns once every producer has dropped the stream.
    pub fn join(mut self) -> Option<MarkerTracker> {
        self.join_worker()
    }

    fn join_worker(&mut self) -> Option<MarkerTracker> {
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(tracker) => Some(tracker),
            Err(_) => {
                log::error!("MarkerTracker worker panicked.");
                None
            }
        }
    }
}

impl Drop for TrackerService {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.join_worker();
    }
}

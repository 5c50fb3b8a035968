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

//! Counters shared between the decision worker and the render tasks, and the
//! status snapshot built from them.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

use serde::Serialize;

use super::plan::TrackingPhase;

#[derive(Debug, Default)]
pub(crate) struct TrackerCounters {
    phase: AtomicU8,
    pub(crate) batches_processed: AtomicU64,
    pub(crate) instances_created: AtomicU64,
    pub(crate) placements_scheduled: AtomicU64,
    pub(crate) detaches_scheduled: AtomicU64,
    pub(crate) template_misses: AtomicU64,
    pub(crate) stale_tasks_dropped: AtomicU64,
    pub(crate) tasks_skipped_not_ready: AtomicU64,
}

impl TrackerCounters {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn set_phase(&self, phase: TrackingPhase) {
        self.phase.store(phase.to_u8(), Ordering::Release);
    }

    pub(crate) fn snapshot(&self) -> TrackerStatus {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        let phase = TrackingPhase::from_u8(self.phase.load(Ordering::Acquire));

        let mut status = TrackerStatus {
            phase,
            batches_processed: load(&self.batches_processed),
            instances_created: load(&self.instances_created),
            placements_scheduled: load(&self.placements_scheduled),
            detaches_scheduled: load(&self.detaches_scheduled),
            template_misses: load(&self.template_misses),
            stale_tasks_dropped: load(&self.stale_tasks_dropped),
            tasks_skipped_not_ready: load(&self.tasks_skipped_not_ready),
            message: String::new(),
        };
        status.message = format!(
            "phase={:?} batches={} placements={} detaches={} template_misses={} stale={} not_ready={}",
            status.phase,
            status.batches_processed,
            status.placements_scheduled,
            status.detaches_scheduled,
            status.template_misses,
            status.stale_tasks_dropped,
            status.tasks_skipped_not_ready,
        );
        status
    }
}

/// A point-in-time report of a tracker's activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerStatus {
    /// Decision-side phase after the last processed batch.
    pub phase: TrackingPhase,
    /// Observation batches processed.
    pub batches_processed: u64,
    /// Node instances cloned from the template. Never exceeds 1.
    pub instances_created: u64,
    /// Place sequences (transform, scale, attach-if-needed) scheduled.
    pub placements_scheduled: u64,
    /// Detaches scheduled.
    pub detaches_scheduled: u64,
    /// Batches that saw the target but found no template.
    pub template_misses: u64,
    /// Render tasks dropped because a newer decision had already been applied.
    pub stale_tasks_dropped: u64,
    /// Render tasks skipped because the scene sink or camera parent was missing.
    pub tasks_skipped_not_ready: u64,
    /// One-line human readable summary.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let counters = TrackerCounters::default();
        TrackerCounters::bump(&counters.batches_processed);
        TrackerCounters::bump(&counters.batches_processed);
        TrackerCounters::bump(&counters.template_misses);
        counters.set_phase(TrackingPhase::InstanceUnparented);

        let status = counters.snapshot();
        assert_eq!(status.batches_processed, 2);
        assert_eq!(status.template_misses, 1);
        assert_eq!(status.phase, TrackingPhase::InstanceUnparented);
        assert!(status.message.contains("batches=2"));
    }
}

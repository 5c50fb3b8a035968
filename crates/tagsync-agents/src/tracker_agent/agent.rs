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

//! The MarkerTracker is responsible for keeping one scene node on one marker.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tagsync_core::math::Mat4;
use tagsync_core::{
    ObservationBatch, RenderDispatch, SceneNode, SceneSink, SharedSceneSink, SinkSlot,
    TemplateCache,
};

use super::config::{ConfigError, TrackerConfig};
use super::plan::{ScenePlan, TrackedNodeState, TrackingPhase};
use super::status::{TrackerCounters, TrackerStatus};

/// Drops render tasks that were overtaken by a newer decision.
///
/// Holds the highest decision sequence applied on the rendering thread.
#[derive(Debug, Clone, Default)]
struct SequenceGuard(Arc<AtomicU64>);

impl SequenceGuard {
    /// Records `sequence` as applied unless a newer one already was.
    fn admit(&self, sequence: u64) -> bool {
        self.0.fetch_max(sequence, Ordering::AcqRel) < sequence
    }
}

/// Everything a render task needs, cloned out of the tracker at schedule time.
#[derive(Clone)]
struct TaskContext {
    sink: SinkSlot,
    guard: SequenceGuard,
    counters: Arc<TrackerCounters>,
}

impl TaskContext {
    /// Runs `f` against the bound sink if the task is still current.
    fn run(&self, sequence: u64, f: impl FnOnce(&mut dyn SceneSink) -> bool) {
        if !self.guard.admit(sequence) {
            log::trace!("MarkerTracker: dropping stale scene task #{sequence}.");
            TrackerCounters::bump(&self.counters.stale_tasks_dropped);
            return;
        }

        match self.sink.with_sink(f) {
            Some(true) => {}
            Some(false) => {
                log::debug!("MarkerTracker: camera parent not ready, skipping task #{sequence}.");
                TrackerCounters::bump(&self.counters.tasks_skipped_not_ready);
            }
            None => {
                log::debug!("MarkerTracker: no scene sink bound, skipping task #{sequence}.");
                TrackerCounters::bump(&self.counters.tasks_skipped_not_ready);
            }
        }
    }
}

/// Sets the pose, then the scale, then parents the node under the camera if
/// it is not already there.
///
/// The scale must follow the pose: a full transform assignment overwrites the
/// scale component of the node.
fn place_node(sink: &mut dyn SceneSink, node: &SceneNode, pose: Mat4, scale: f32) -> bool {
    let Some(camera) = sink.camera_parent() else {
        return false;
    };
    sink.set_transform(node, pose);
    sink.set_uniform_scale(node, scale);
    if sink.parent_of(node.id()) != Some(camera) {
        sink.attach(node, camera);
    }
    true
}

/// Removes the node from its parent, if it has one.
fn detach_node(sink: &mut dyn SceneSink, node: &SceneNode) -> bool {
    if sink.parent_of(node.id()).is_some() {
        sink.detach(node.id());
    }
    true
}

/// Points `slot` at `sink` for every render task run from now on.
pub(crate) fn bind_sink(slot: &SinkSlot, sink: &SharedSceneSink) {
    slot.bind(sink);
    log::info!("MarkerTracker: scene sink bound.");
}

/// Keeps a single renderable instance aligned with the pose of one marker.
///
/// The tracker makes its decisions on whatever thread calls
/// [`on_observation_batch`](Self::on_observation_batch), normally the worker
/// spawned by [`spawn`](Self::spawn). It never touches the scene itself: every
/// mutation is dispatched to the rendering thread.
pub struct MarkerTracker {
    config: TrackerConfig,
    templates: Arc<dyn TemplateCache>,
    dispatcher: Arc<dyn RenderDispatch>,
    state: TrackedNodeState,
    last_sequence: u64,
    tasks: TaskContext,
}

impl MarkerTracker {
    /// Creates a tracker with no instance and no scene sink bound.
    pub fn new(
        config: TrackerConfig,
        templates: Arc<dyn TemplateCache>,
        dispatcher: Arc<dyn RenderDispatch>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!(
            "MarkerTracker: tracking marker {} as '{}' (scale {}).",
            config.target_marker,
            config.node_name,
            config.model_scale
        );

        Ok(Self {
            config,
            templates,
            dispatcher,
            state: TrackedNodeState::default(),
            last_sequence: 0,
            tasks: TaskContext {
                sink: SinkSlot::new(),
                guard: SequenceGuard::default(),
                counters: Arc::new(TrackerCounters::default()),
            },
        })
    }

    /// Records the scene sink render tasks will use from now on.
    ///
    /// Binding the same sink again is harmless. Binding a different one while
    /// the node is attached redirects every task that runs afterwards.
    pub fn bind_scene_sink(&self, sink: &SharedSceneSink) {
        bind_sink(&self.tasks.sink, sink);
    }

    /// Returns a handle to the sink slot, for binding from another thread.
    pub fn sink_slot(&self) -> SinkSlot {
        self.tasks.sink.clone()
    }

    /// Returns the tracker configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Returns the decision-side phase.
    pub fn phase(&self) -> TrackingPhase {
        self.state.phase()
    }

    /// Returns the node instance, once one has been cloned.
    pub fn instance(&self) -> Option<&SceneNode> {
        self.state.node()
    }

    /// Reports the tracker's counters and phase.
    pub fn report_status(&self) -> TrackerStatus {
        self.tasks.counters.snapshot()
    }

    pub(crate) fn counters(&self) -> Arc<TrackerCounters> {
        Arc::clone(&self.tasks.counters)
    }

    /// Processes one observation batch.
    ///
    /// Looks up the target marker (first match wins), advances the state
    /// machine, and dispatches the resulting scene work to the rendering
    /// thread. Never blocks on the rendering thread or on template loading.
    ///
    /// ## Returns
    /// The plan that was decided, for inspection.
    pub fn on_observation_batch(&mut self, batch: &ObservationBatch) -> ScenePlan {
        let counters = &self.tasks.counters;
        TrackerCounters::bump(&counters.batches_processed);

        let target = batch.find(self.config.target_marker);
        log::trace!(
            "MarkerTracker: batch {} ({} markers), target {}.",
            batch.sequence,
            batch.len(),
            if target.is_some() { "seen" } else { "absent" }
        );

        let plan = self.state.advance(
            target,
            self.config.model_scale,
            self.templates.as_ref(),
            &self.config.node_name,
        );
        counters.set_phase(self.state.phase());
        self.schedule(&plan);
        plan
    }

    fn schedule(&mut self, plan: &ScenePlan) {
        let counters = &self.tasks.counters;
        match plan {
            ScenePlan::Idle => {}
            ScenePlan::AwaitTemplate => {
                TrackerCounters::bump(&counters.template_misses);
                log::debug!("MarkerTracker: target visible but template not loaded yet.");
            }
            ScenePlan::Detach { node } => {
                TrackerCounters::bump(&counters.detaches_scheduled);
                let sequence = self.next_sequence();
                let tasks = self.tasks.clone();
                let node = node.clone();
                self.dispatcher.dispatch(Box::new(move || {
                    tasks.run(sequence, |sink| detach_node(sink, &node));
                }));
            }
            ScenePlan::Place {
                node,
                pose,
                scale,
                instantiated,
            } => {
                if *instantiated {
                    TrackerCounters::bump(&counters.instances_created);
                    log::info!(
                        "MarkerTracker: instantiated '{}' ({}) from template.",
                        node.name(),
                        node.id()
                    );
                }
                TrackerCounters::bump(&counters.placements_scheduled);
                let sequence = self.next_sequence();
                let tasks = self.tasks.clone();
                let (node, pose, scale) = (node.clone(), *pose, *scale);
                self.dispatcher.dispatch(Box::new(move || {
                    tasks.run(sequence, |sink| place_node(sink, &node, pose, scale));
                }));
            }
        }
    }

    fn next_sequence(&mut self) -> u64 {
        self.last_sequence += 1;
        self.last_sequence
    }
}

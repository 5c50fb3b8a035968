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

//! The decision step: one observation in, at most one scene plan out.

use serde::Serialize;
use tagsync_core::math::Mat4;
use tagsync_core::{MarkerObservation, SceneNode, TemplateCache};

/// The tracker's view of its node, as seen from the decision side.
///
/// Transitions are recorded when a decision is made, not when the rendering
/// thread applies it, so the phase may briefly run ahead of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TrackingPhase {
    /// No instance has been cloned yet.
    #[default]
    NoInstance,
    /// An instance exists and was last told to leave the scene.
    InstanceUnparented,
    /// An instance exists and was last told to sit under the camera.
    InstanceParented,
}

impl TrackingPhase {
    pub(crate) fn to_u8(self) -> u8 {
        match self {
            TrackingPhase::NoInstance => 0,
            TrackingPhase::InstanceUnparented => 1,
            TrackingPhase::InstanceParented => 2,
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => TrackingPhase::InstanceUnparented,
            2 => TrackingPhase::InstanceParented,
            _ => TrackingPhase::NoInstance,
        }
    }
}

/// What a single observation batch asks of the scene.
#[derive(Debug, Clone)]
pub enum ScenePlan {
    /// Nothing to schedule.
    Idle,
    /// The target is visible but the template is not loaded yet; retry next batch.
    AwaitTemplate,
    /// Remove the node from its parent, keeping the instance.
    Detach {
        /// The node to detach.
        node: SceneNode,
    },
    /// Set the pose, then the scale, then make sure the node sits under the camera.
    Place {
        /// The node to place.
        node: SceneNode,
        /// The observed pose, applied verbatim.
        pose: Mat4,
        /// The uniform scale applied after the pose.
        scale: f32,
        /// `true` if the node was cloned for this plan.
        instantiated: bool,
    },
}

impl ScenePlan {
    /// Returns `true` if the plan needs the rendering thread.
    pub fn touches_scene(&self) -> bool {
        matches!(self, ScenePlan::Detach { .. } | ScenePlan::Place { .. })
    }
}

/// The single instance slot.
#[derive(Debug, Default)]
pub(crate) enum TrackedNodeState {
    #[default]
    Absent,
    Attached {
        node: SceneNode,
        parented: bool,
    },
}

impl TrackedNodeState {
    pub(crate) fn phase(&self) -> TrackingPhase {
        match self {
            TrackedNodeState::Absent => TrackingPhase::NoInstance,
            TrackedNodeState::Attached {
                parented: false, ..
            } => TrackingPhase::InstanceUnparented,
            TrackedNodeState::Attached { parented: true, .. } => TrackingPhase::InstanceParented,
        }
    }

    pub(crate) fn node(&self) -> Option<&SceneNode> {
        match self {
            TrackedNodeState::Absent => None,
            TrackedNodeState::Attached { node, .. } => Some(node),
        }
    }

    /// Advances the state machine by one observation of the target marker
    /// (`None` when the target was not in the batch).
    ///
    /// The template cache is only consulted when the target is visible and no
    /// instance exists. Once an instance exists it is never replaced.
    ///
    /// Every absent tick with an instance plans a detach, even if the last one
    /// already did: a detach skipped on the rendering side is retried on the
    /// next tick. The render task is a no-op for a node without a parent.
    pub(crate) fn advance(
        &mut self,
        target: Option<&MarkerObservation>,
        scale: f32,
        templates: &dyn TemplateCache,
        node_name: &str,
    ) -> ScenePlan {
        let Some(observation) = target else {
            return match self {
                TrackedNodeState::Attached { node, parented } => {
                    *parented = false;
                    ScenePlan::Detach { node: node.clone() }
                }
                TrackedNodeState::Absent => ScenePlan::Idle,
            };
        };

        if let TrackedNodeState::Attached { node, parented } = self {
            *parented = true;
            return ScenePlan::Place {
                node: node.clone(),
                pose: observation.pose,
                scale,
                instantiated: false,
            };
        }

        let Some(template) = templates.current_template() else {
            return ScenePlan::AwaitTemplate;
        };
        let node = SceneNode::instantiate(&template, node_name);
        *self = TrackedNodeState::Attached {
            node: node.clone(),
            parented: true,
        };
        ScenePlan::Place {
            node,
            pose: observation.pose,
            scale,
            instantiated: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::RwLock;
    use tagsync_core::math::Vec3;
    use tagsync_core::{MarkerId, Renderable, Template};

    #[derive(Default)]
    struct PolledCache {
        template: RwLock<Option<Template>>,
        polls: AtomicUsize,
    }

    impl PolledCache {
        fn loaded() -> Self {
            let cache = Self::default();
            *cache.template.write().unwrap() = Some(Template::new(Renderable::new("m", "cube")));
            cache
        }
    }

    impl TemplateCache for PolledCache {
        fn current_template(&self) -> Option<Template> {
            self.polls.fetch_add(1, Ordering::SeqCst);
            self.template.read().unwrap().clone()
        }
    }

    fn seen(pose: Mat4) -> MarkerObservation {
        MarkerObservation::new(MarkerId(4), pose)
    }

    #[test]
    fn absent_and_unseen_is_idle() {
        let cache = PolledCache::loaded();
        let mut state = TrackedNodeState::default();

        let plan = state.advance(None, 0.1, &cache, "n");

        assert!(matches!(plan, ScenePlan::Idle));
        assert_eq!(state.phase(), TrackingPhase::NoInstance);
        assert_eq!(cache.polls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn seen_without_template_waits() {
        let cache = PolledCache::default();
        let mut state = TrackedNodeState::default();

        for _ in 0..3 {
            let plan = state.advance(Some(&seen(Mat4::IDENTITY)), 0.1, &cache, "n");
            assert!(matches!(plan, ScenePlan::AwaitTemplate));
            assert!(!plan.touches_scene());
        }
        assert_eq!(state.phase(), TrackingPhase::NoInstance);
        assert_eq!(cache.polls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn first_sighting_instantiates_once() {
        let cache = PolledCache::loaded();
        let mut state = TrackedNodeState::default();

        let first = state.advance(Some(&seen(Mat4::IDENTITY)), 0.1, &cache, "marker0Model");
        let (node, instantiated) = match first {
            ScenePlan::Place {
                node, instantiated, ..
            } => (node, instantiated),
            other => panic!("expected a placement, got {other:?}"),
        };
        assert!(instantiated);
        assert_eq!(node.name(), "marker0Model");
        assert_eq!(state.phase(), TrackingPhase::InstanceParented);

        let moved = Mat4::from_translation(Vec3::new(0.0, 0.1, -0.3));
        let second = state.advance(Some(&seen(moved)), 0.1, &cache, "marker0Model");
        let (again, pose, instantiated) = match second {
            ScenePlan::Place {
                node,
                pose,
                instantiated,
                ..
            } => (node, pose, instantiated),
            other => panic!("expected a placement, got {other:?}"),
        };
        assert!(!instantiated);
        assert_eq!(again.id(), node.id());
        assert_eq!(pose, moved);
        assert_eq!(cache.polls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn losing_the_marker_plans_detach_every_tick() {
        let cache = PolledCache::loaded();
        let mut state = TrackedNodeState::default();
        state.advance(Some(&seen(Mat4::IDENTITY)), 0.1, &cache, "n");
        let node_id = state.node().map(SceneNode::id);

        let plan = state.advance(None, 0.1, &cache, "n");
        match plan {
            ScenePlan::Detach { node } => assert_eq!(Some(node.id()), node_id),
            other => panic!("expected a detach, got {other:?}"),
        }
        assert_eq!(state.phase(), TrackingPhase::InstanceUnparented);

        for _ in 0..3 {
            match state.advance(None, 0.1, &cache, "n") {
                ScenePlan::Detach { node } => assert_eq!(Some(node.id()), node_id),
                other => panic!("expected a detach, got {other:?}"),
            }
        }
        assert_eq!(state.phase(), TrackingPhase::InstanceUnparented);
        assert_eq!(state.node().map(SceneNode::id), node_id);
        assert_eq!(cache.polls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn phase_round_trips_through_u8() {
        for phase in [
            TrackingPhase::NoInstance,
            TrackingPhase::InstanceUnparented,
            TrackingPhase::InstanceParented,
        ] {
            assert_eq!(TrackingPhase::from_u8(phase.to_u8()), phase);
        }
    }
}

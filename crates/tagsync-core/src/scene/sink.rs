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

use super::{NodeId, SceneNode};
use crate::math::Mat4;
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

/// The scene-graph operations the tracker needs from its host.
///
/// Every method is only ever invoked from the rendering thread, through a
/// scheduled render task. Implementations must accept nodes they have not seen
/// before: a freshly instantiated node receives its transform and scale before
/// it is attached.
pub trait SceneSink: Send {
    /// The camera-relative parent node, or `None` while the host view is not ready.
    fn camera_parent(&self) -> Option<NodeId>;

    /// The current parent of `node`, or `None` if it is not parented.
    fn parent_of(&self, node: NodeId) -> Option<NodeId>;

    /// Parents `child` under `parent`, detaching it from any previous parent first.
    fn attach(&mut self, child: &SceneNode, parent: NodeId);

    /// Removes `child` from its parent. The node itself stays alive.
    fn detach(&mut self, child: NodeId);

    /// Replaces the node's full local transform, scale component included.
    fn set_transform(&mut self, node: &SceneNode, transform: Mat4);

    /// Rescales the node's current local transform to a uniform `scale`.
    fn set_uniform_scale(&mut self, node: &SceneNode, scale: f32);
}

/// The owning handle a host keeps to its scene sink.
pub type SharedSceneSink = Arc<Mutex<dyn SceneSink>>;

/// A non-owning, rebindable reference to the host's scene sink.
///
/// The slot never keeps the host alive. A slot that was never bound, or whose
/// host has been dropped, reads as "host not ready" and callers skip their work.
#[derive(Clone, Default)]
pub struct SinkSlot {
    inner: Arc<RwLock<Option<Weak<Mutex<dyn SceneSink>>>>>,
}

impl SinkSlot {
    /// Creates an unbound slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Points the slot at `sink`, replacing any previous binding.
    pub fn bind(&self, sink: &SharedSceneSink) {
        let weak = Arc::downgrade(sink);
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(weak);
    }

    /// Clears the binding.
    pub fn unbind(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Returns `true` if the slot points at a live sink.
    pub fn is_bound(&self) -> bool {
        self.upgrade().is_some()
    }

    /// Runs `f` against the bound sink.
    ///
    /// ## Returns
    /// `None` without calling `f` if no live sink is bound.
    pub fn with_sink<R>(&self, f: impl FnOnce(&mut dyn SceneSink) -> R) -> Option<R> {
        let sink = self.upgrade()?;
        let mut guard = sink.lock().unwrap_or_else(PoisonError::into_inner);
        Some(f(&mut *guard))
    }

    fn upgrade(&self) -> Option<SharedSceneSink> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade)
    }
}

impl std::fmt::Debug for SinkSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkSlot")
            .field("bound", &self.is_bound())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingSink {
        detaches: usize,
    }

    impl SceneSink for CountingSink {
        fn camera_parent(&self) -> Option<NodeId> {
            None
        }
        fn parent_of(&self, _node: NodeId) -> Option<NodeId> {
            None
        }
        fn attach(&mut self, _child: &SceneNode, _parent: NodeId) {}
        fn detach(&mut self, _child: NodeId) {
            self.detaches += 1;
        }
        fn set_transform(&mut self, _node: &SceneNode, _transform: Mat4) {}
        fn set_uniform_scale(&mut self, _node: &SceneNode, _scale: f32) {}
    }

    #[test]
    fn unbound_slot_skips_work() {
        let slot = SinkSlot::new();
        assert!(!slot.is_bound());
        assert!(slot.with_sink(|_| ()).is_none());
    }

    #[test]
    fn bound_slot_reaches_sink() {
        let concrete = Arc::new(Mutex::new(CountingSink::default()));
        let shared: SharedSceneSink = concrete.clone();
        let slot = SinkSlot::new();
        slot.bind(&shared);

        assert_eq!(slot.with_sink(|sink| sink.detach(NodeId::next())), Some(()));
        assert_eq!(concrete.lock().unwrap().detaches, 1);
    }

    #[test]
    fn slot_does_not_keep_host_alive() {
        let shared: SharedSceneSink = Arc::new(Mutex::new(CountingSink::default()));
        let slot = SinkSlot::new();
        slot.bind(&shared);
        assert!(slot.is_bound());

        drop(shared);
        assert!(!slot.is_bound());
        assert!(slot.with_sink(|_| ()).is_none());
    }

    #[test]
    fn rebinding_replaces_target() {
        let first = Arc::new(Mutex::new(CountingSink::default()));
        let second = Arc::new(Mutex::new(CountingSink::default()));
        let (first_shared, second_shared): (SharedSceneSink, SharedSceneSink) =
            (first.clone(), second.clone());

        let slot = SinkSlot::new();
        slot.bind(&first_shared);
        slot.bind(&second_shared);
        slot.with_sink(|sink| sink.detach(NodeId::next()));

        assert_eq!(first.lock().unwrap().detaches, 0);
        assert_eq!(second.lock().unwrap().detaches, 1);
    }
}

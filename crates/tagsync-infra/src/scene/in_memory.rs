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

//! A self-contained scene graph living in memory.
//!
//! `InMemoryScene` keeps a parent map and a local transform per node, and
//! journals every mutation it receives. Hosts without a real renderer use it
//! directly; tests use the journal to check exactly which operations reached
//! the scene and in which order.

use std::collections::HashMap;

use tagsync_core::math::Mat4;
use tagsync_core::{NodeId, SceneNode, SceneSink};

/// One mutation received by an [`InMemoryScene`].
#[derive(Debug, Clone, PartialEq)]
pub enum SceneOp {
    /// A full transform assignment.
    SetTransform {
        /// The node that was transformed.
        node: NodeId,
        /// The transform that was assigned.
        transform: Mat4,
    },
    /// A uniform scale assignment.
    SetUniformScale {
        /// The node that was scaled.
        node: NodeId,
        /// The scale factor.
        scale: f32,
    },
    /// A node was parented.
    Attach {
        /// The attached node.
        child: NodeId,
        /// Its new parent.
        parent: NodeId,
    },
    /// A node was unparented.
    Detach {
        /// The detached node.
        child: NodeId,
    },
}

#[derive(Debug, Clone)]
struct NodeRecord {
    name: String,
    local: Mat4,
    parent: Option<NodeId>,
}

/// An in-memory [`SceneSink`].
#[derive(Debug, Default)]
pub struct InMemoryScene {
    camera: Option<NodeId>,
    nodes: HashMap<NodeId, NodeRecord>,
    journal: Vec<SceneOp>,
}

impl InMemoryScene {
    /// Creates a scene whose view is not ready yet (no camera parent).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scene with a camera parent already installed.
    pub fn with_camera() -> Self {
        let mut scene = Self::new();
        scene.install_camera();
        scene
    }

    /// Installs a fresh camera node and makes it the camera-relative parent.
    pub fn install_camera(&mut self) -> NodeId {
        let camera = NodeId::next();
        self.nodes.insert(
            camera,
            NodeRecord {
                name: "camera".to_string(),
                local: Mat4::IDENTITY,
                parent: None,
            },
        );
        self.camera = Some(camera);
        log::debug!("InMemoryScene: camera parent installed as {camera}.");
        camera
    }

    /// Removes the camera-relative parent, as when the host view is torn down.
    ///
    /// Children of the old camera node keep their parent link.
    pub fn remove_camera(&mut self) {
        self.camera = None;
    }

    /// Returns the local transform of `node`, if the scene knows it.
    pub fn local_transform(&self, node: NodeId) -> Option<Mat4> {
        self.nodes.get(&node).map(|record| record.local)
    }

    /// Returns the name of `node`, if the scene knows it.
    pub fn node_name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|record| record.name.as_str())
    }

    /// Returns the identifiers of all nodes currently parented under `parent`.
    pub fn children_of(&self, parent: NodeId) -> Vec<NodeId> {
        let mut children: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, record)| record.parent == Some(parent))
            .map(|(id, _)| *id)
            .collect();
        children.sort();
        children
    }

    /// Returns the number of nodes the scene knows, camera included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns every mutation received so far, oldest first.
    pub fn journal(&self) -> &[SceneOp] {
        &self.journal
    }

    /// Returns and clears the mutation journal.
    pub fn take_journal(&mut self) -> Vec<SceneOp> {
        std::mem::take(&mut self.journal)
    }

    fn record_mut(&mut self, node: &SceneNode) -> &mut NodeRecord {
        self.nodes.entry(node.id()).or_insert_with(|| NodeRecord {
            name: node.name().to_string(),
            local: Mat4::IDENTITY,
            parent: None,
        })
    }
}

impl SceneSink for InMemoryScene {
    fn camera_parent(&self) -> Option<NodeId> {
        self.camera
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|record| record.parent)
    }

    fn attach(&mut self, child: &SceneNode, parent: NodeId) {
        self.record_mut(child).parent = Some(parent);
        self.journal.push(SceneOp::Attach {
            child: child.id(),
            parent,
        });
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(record) = self.nodes.get_mut(&child) {
            record.parent = None;
        }
        self.journal.push(SceneOp::Detach { child });
    }

    fn set_transform(&mut self, node: &SceneNode, transform: Mat4) {
        self.record_mut(node).local = transform;
        self.journal.push(SceneOp::SetTransform {
            node: node.id(),
            transform,
        });
    }

    fn set_uniform_scale(&mut self, node: &SceneNode, scale: f32) {
        let record = self.record_mut(node);
        record.local = record.local.with_uniform_scale(scale);
        self.journal.push(SceneOp::SetUniformScale {
            node: node.id(),
            scale,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagsync_core::math::Vec3;
    use tagsync_core::{Renderable, Template};

    fn node() -> SceneNode {
        SceneNode::instantiate(&Template::new(Renderable::new("model", "cube")), "instance")
    }

    #[test]
    fn new_scene_has_no_camera() {
        assert!(InMemoryScene::new().camera_parent().is_none());
        assert!(InMemoryScene::with_camera().camera_parent().is_some());
    }

    #[test]
    fn removing_camera_keeps_children_linked() {
        let mut scene = InMemoryScene::with_camera();
        let camera = scene.camera_parent().unwrap();
        let node = node();
        scene.attach(&node, camera);

        scene.remove_camera();

        assert!(scene.camera_parent().is_none());
        assert_eq!(scene.parent_of(node.id()), Some(camera));
    }

    #[test]
    fn attach_and_detach_update_parent() {
        let mut scene = InMemoryScene::with_camera();
        let camera = scene.camera_parent().unwrap();
        let node = node();

        scene.attach(&node, camera);
        assert_eq!(scene.parent_of(node.id()), Some(camera));
        assert_eq!(scene.children_of(camera), vec![node.id()]);
        assert_eq!(scene.node_name(node.id()), Some("instance"));

        scene.detach(node.id());
        assert_eq!(scene.parent_of(node.id()), None);
        assert!(scene.children_of(camera).is_empty());
        assert_eq!(scene.journal().len(), 2);
    }

    #[test]
    fn transform_after_scale_discards_scale() {
        let mut scene = InMemoryScene::with_camera();
        let node = node();
        let pose = Mat4::from_translation(Vec3::new(0.0, 0.0, -0.5));

        scene.set_uniform_scale(&node, 0.1);
        scene.set_transform(&node, pose);

        let local = scene.local_transform(node.id()).unwrap();
        assert!((local.scale().x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn scale_after_transform_keeps_both() {
        let mut scene = InMemoryScene::with_camera();
        let node = node();
        let pose = Mat4::from_translation(Vec3::new(0.0, 0.0, -0.5));

        scene.set_transform(&node, pose);
        scene.set_uniform_scale(&node, 0.1);

        let local = scene.local_transform(node.id()).unwrap();
        assert!((local.scale().x - 0.1).abs() < 1e-5);
        assert_eq!(local.translation(), Vec3::new(0.0, 0.0, -0.5));
    }

    #[test]
    fn take_journal_clears() {
        let mut scene = InMemoryScene::with_camera();
        let node = node();
        scene.detach(node.id());
        assert_eq!(scene.take_journal(), vec![SceneOp::Detach { child: node.id() }]);
        assert!(scene.journal().is_empty());
    }
}

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

//! Provides the template contracts: what a renderable prototype is, how it is
//! shared, and how the tracker asks for it.
//!
//! Templates are loaded once by an external collaborator and shared read-only
//! through [`AssetHandle`]. The tracker never mutates a template: when it needs a
//! live node it deep-copies the template's [`Renderable`] into a fresh handle.

mod handle;

pub use handle::*;

use serde::{Deserialize, Serialize};

/// A marker trait for types that can be shared through an [`AssetHandle`].
///
/// - `Send` + `Sync`: the asset can be handed from a loader thread to the
///   tracker's worker and on to the rendering thread.
/// - `'static`: the asset holds no borrowed data.
pub trait Asset: Send + Sync + 'static {}

/// The content of a renderable prototype: a named node referencing a mesh,
/// with an optional subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    /// Name given to the root node.
    pub name: String,
    /// Identifier of the mesh drawn by the root node.
    pub mesh: String,
    /// Child nodes, cloned along with the root.
    #[serde(default)]
    pub children: Vec<Renderable>,
}

impl Asset for Renderable {}

impl Renderable {
    /// Creates a renderable without children.
    pub fn new(name: impl Into<String>, mesh: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mesh: mesh.into(),
            children: Vec::new(),
        }
    }

    /// Returns the number of nodes in this subtree, root included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Renderable::node_count).sum::<usize>()
    }
}

/// A shared, read-only prototype owned by the template cache.
pub type Template = AssetHandle<Renderable>;

/// The read side of the asset loader, as seen by the tracker.
///
/// Implementations are polled from the tracker's background worker on every
/// tick in which the target marker is visible but no instance exists yet, so
/// `current_template` must be cheap and non-blocking.
pub trait TemplateCache: Send + Sync {
    /// Returns the current template, or `None` while it has not been loaded.
    fn current_template(&self) -> Option<Template>;
}

impl<T: TemplateCache + ?Sized> TemplateCache for std::sync::Arc<T> {
    fn current_template(&self) -> Option<Template> {
        (**self).current_template()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_count_includes_children() {
        let mut root = Renderable::new("root", "body");
        root.children.push(Renderable::new("arm", "arm"));
        root.children[0]
            .children
            .push(Renderable::new("hand", "hand"));
        assert_eq!(root.node_count(), 3);
    }
}

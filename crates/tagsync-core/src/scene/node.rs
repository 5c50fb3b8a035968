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

use crate::asset::{AssetHandle, Renderable, Template};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// A process-unique identifier for a node in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocates a fresh identifier. Identifiers are never reused.
    pub fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identifier.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node:{}", self.0)
    }
}

/// A live renderable instance cloned from a [`Template`].
///
/// The instance owns a deep copy of the template content; cloning a
/// `SceneNode` value only clones the handle, so render tasks can carry it
/// cheaply across threads.
#[derive(Debug, Clone)]
pub struct SceneNode {
    id: NodeId,
    name: String,
    content: AssetHandle<Renderable>,
}

impl SceneNode {
    /// Clones `template` into a new instance with a fresh [`NodeId`].
    pub fn instantiate(template: &Template, name: impl Into<String>) -> Self {
        Self {
            id: NodeId::next(),
            name: name.into(),
            content: template.duplicate(),
        }
    }

    /// Returns the node identifier.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the name assigned at instantiation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the instance's own copy of the template content.
    pub fn content(&self) -> &AssetHandle<Renderable> {
        &self.content
    }
}

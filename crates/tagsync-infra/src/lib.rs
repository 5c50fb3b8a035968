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

//! # Tagsync Infra
//!
//! Concrete implementations of the collaborators the marker tracker talks to:
//! an in-memory scene graph, a channel-backed render-thread queue, and a
//! template store fed from RON files.

#![warn(missing_docs)]

pub mod asset;
pub mod render;
pub mod scene;

pub use asset::{TemplateError, TemplateStore};
pub use render::{ChannelDispatcher, InlineDispatcher, RenderLoop};
pub use scene::{InMemoryScene, SceneOp};

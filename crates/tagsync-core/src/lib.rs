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

//! # Tagsync Core
//!
//! Foundational crate containing the marker data model, math primitives, and the
//! interface contracts (scene sink, template cache, render dispatch) that the
//! marker tracker is written against.

#![warn(missing_docs)]

pub mod asset;
pub mod event;
pub mod marker;
pub mod math;
pub mod render;
pub mod scene;

pub use asset::{AssetHandle, Renderable, Template, TemplateCache};
pub use event::ObservationStream;
pub use marker::{MarkerId, MarkerObservation, ObservationBatch};
pub use render::{RenderDispatch, RenderTask};
pub use scene::{NodeId, SceneNode, SceneSink, SharedSceneSink, SinkSlot};

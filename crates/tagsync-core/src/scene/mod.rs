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

//! Groups the contracts between the tracker and the scene host.
//!
//! The scene graph belongs to the host and may only be touched from its
//! rendering thread. This module defines the node identity the tracker holds
//! on to ([`SceneNode`]), the five operations it needs from the host
//! ([`SceneSink`]), and the non-owning slot through which a scheduled render
//! task finds the host at the moment it runs ([`SinkSlot`]).

mod node;
mod sink;

pub use node::*;
pub use sink::*;

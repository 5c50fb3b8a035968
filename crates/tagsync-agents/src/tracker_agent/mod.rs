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

//! Acts as the **[A]gent** that keeps one scene node glued to one fiducial marker.
//!
//! The tracker reconciles three timelines that never wait for each other:
//! - observation batches, processed one at a time on a background worker,
//! - a template that the asset loader may not have produced yet,
//! - scene mutation, which only the host's rendering thread may perform.
//!
//! Each batch is reduced to a decision on the worker (detach, place, or
//! nothing). Decisions that touch the scene are packaged as render tasks and
//! dispatched fire-and-forget; every task carries the sequence number of its
//! decision so that a task overtaken by a newer one is dropped instead of
//! undoing it.
//!
//! At most one node instance is ever created. It is detached, never destroyed,
//! while the marker is out of view, and re-attached without re-cloning when the
//! marker comes back.

mod agent;
mod config;
mod plan;
mod status;
mod worker;

pub use agent::MarkerTracker;
pub use config::{ConfigError, TrackerConfig};
pub use plan::{ScenePlan, TrackingPhase};
pub use status::TrackerStatus;
pub use worker::TrackerService;

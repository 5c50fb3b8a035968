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

//! Contracts for handing work to the rendering thread.
//!
//! Only one thread may mutate the scene graph. Everything else packages its
//! scene mutations as a [`RenderTask`] and submits it through a
//! [`RenderDispatch`]; submission is fire-and-forget and tasks run in
//! submission order.

/// A unit of scene work to be executed on the rendering thread.
pub type RenderTask = Box<dyn FnOnce() + Send + 'static>;

/// A one-way submission channel to the rendering thread.
pub trait RenderDispatch: Send + Sync {
    /// Queues `task` for execution on the rendering thread.
    ///
    /// Never blocks and never runs the task on the caller's thread unless the
    /// implementation documents otherwise. A task submitted after the
    /// rendering side has shut down is dropped.
    fn dispatch(&self, task: RenderTask);
}

impl<D: RenderDispatch + ?Sized> RenderDispatch for std::sync::Arc<D> {
    fn dispatch(&self, task: RenderTask) {
        (**self).dispatch(task)
    }
}

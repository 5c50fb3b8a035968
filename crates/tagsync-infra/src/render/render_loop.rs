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

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::time::Duration;
use tagsync_core::{RenderDispatch, RenderTask};

/// The rendering-thread end of the task queue.
///
/// The host owns the `RenderLoop` on its rendering thread and calls
/// [`pump`](Self::pump) once per frame; every other thread submits work
/// through a [`ChannelDispatcher`] obtained from
/// [`dispatcher`](Self::dispatcher). Tasks run strictly in submission order.
pub struct RenderLoop {
    sender: Sender<RenderTask>,
    receiver: Receiver<RenderTask>,
    executed: u64,
}

impl RenderLoop {
    /// Creates an empty render queue.
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            sender,
            receiver,
            executed: 0,
        }
    }

    /// Returns a cloneable submission handle for other threads.
    pub fn dispatcher(&self) -> ChannelDispatcher {
        ChannelDispatcher {
            sender: self.sender.clone(),
        }
    }

    /// Runs every task queued so far on the calling thread.
    ///
    /// ## Returns
    /// The number of tasks executed.
    pub fn pump(&mut self) -> usize {
        let mut count = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task();
            count += 1;
        }
        self.executed += count as u64;
        count
    }

    /// Waits up to `timeout` for a task, then drains the queue.
    ///
    /// ## Returns
    /// The number of tasks executed, `0` on timeout.
    pub fn pump_for(&mut self, timeout: Duration) -> usize {
        match self.receiver.recv_timeout(timeout) {
            Ok(task) => {
                task();
                self.executed += 1;
                1 + self.pump()
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => 0,
        }
    }

    /// Returns the number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the total number of tasks executed by this loop.
    pub fn executed(&self) -> u64 {
        self.executed
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

/// Submits tasks to a [`RenderLoop`] over a `crossbeam` channel.
#[derive(Clone)]
pub struct ChannelDispatcher {
    sender: Sender<RenderTask>,
}

impl RenderDispatch for ChannelDispatcher {
    fn dispatch(&self, task: RenderTask) {
        if self.sender.send(task).is_err() {
            log::warn!("Render loop is gone; dropping scheduled scene task.");
        }
    }
}

/// Runs every task immediately on the submitting thread.
///
/// Only valid when the submitting thread is itself the rendering thread, as in
/// single-threaded hosts and tools.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineDispatcher;

impl RenderDispatch for InlineDispatcher {
    fn dispatch(&self, task: RenderTask) {
        task();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::thread;

    #[test]
    fn tasks_wait_for_pump_and_run_in_order() {
        let mut render_loop = RenderLoop::new();
        let dispatcher = render_loop.dispatcher();
        let log = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let log = Arc::clone(&log);
            dispatcher.dispatch(Box::new(move || log.lock().unwrap().push(i)));
        }

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(render_loop.pending(), 3);
        assert_eq!(render_loop.pump(), 3);
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
        assert_eq!(render_loop.executed(), 3);
    }

    #[test]
    fn pump_for_receives_from_other_thread() {
        let mut render_loop = RenderLoop::new();
        let dispatcher = render_loop.dispatcher();
        let ran = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ran);

        let handle = thread::spawn(move || {
            dispatcher.dispatch(Box::new(move || *flag.lock().unwrap() = true));
        });

        assert_eq!(render_loop.pump_for(Duration::from_secs(1)), 1);
        assert!(*ran.lock().unwrap());
        handle.join().expect("Thread join failed");
    }

    #[test]
    fn pump_for_times_out_when_idle() {
        let mut render_loop = RenderLoop::new();
        assert_eq!(render_loop.pump_for(Duration::from_millis(10)), 0);
    }

    #[test]
    fn inline_dispatcher_runs_immediately() {
        let ran = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&ran);
        InlineDispatcher.dispatch(Box::new(move || *counter.lock().unwrap() += 1));
        assert_eq!(*ran.lock().unwrap(), 1);
    }
}

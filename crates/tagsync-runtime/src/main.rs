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

// Tagsync Runtime
// Headless host: replays an observation feed through the marker tracker and
// applies the resulting scene work on the main (rendering) thread.

mod config;
mod feed;

use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tagsync_agents::MarkerTracker;
use tagsync_core::{ObservationStream, Renderable, SceneSink, SharedSceneSink};
use tagsync_infra::{InMemoryScene, RenderLoop, TemplateStore};

use crate::config::RuntimeConfig;

fn builtin_template() -> Renderable {
    Renderable::new("model0", "meshes/model0.obj")
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => RuntimeConfig::load(&path)?,
        None => {
            log::info!("No runtime config given, using defaults.");
            RuntimeConfig::default()
        }
    };
    let frame = Duration::from_millis(config.frame_interval_ms);

    // Template: loaded in the background, the tracker waits for it.
    let templates = Arc::new(TemplateStore::empty());
    let loader = match &config.template_path {
        Some(path) => Some(templates.spawn_load(path.clone())?),
        None => {
            templates.publish(builtin_template());
            None
        }
    };

    let feed = match &config.feed_path {
        Some(path) => feed::load_feed(path)?,
        None => feed::demo_feed(config.tracker.target_marker),
    };
    log::info!("Replaying {} observation batches.", feed.len());

    // Scene and render queue live on this thread.
    let scene = Arc::new(Mutex::new(InMemoryScene::with_camera()));
    let mut render_loop = RenderLoop::new();

    let tracker = MarkerTracker::new(
        config.tracker.clone(),
        templates.clone(),
        Arc::new(render_loop.dispatcher()),
    )?;
    let stream = ObservationStream::new();
    let service = tracker.spawn(&stream)?;
    let sink: SharedSceneSink = scene.clone();
    service.bind_scene_sink(&sink);

    // The producer owns the stream; dropping it at the end closes the worker.
    let producer = thread::Builder::new()
        .name("tagsync-feed".to_string())
        .spawn(move || {
            for batch in feed {
                stream.publish(batch);
                thread::sleep(frame);
            }
        })?;

    while service.is_running() {
        render_loop.pump_for(frame);
    }

    if producer.join().is_err() {
        log::error!("Feed producer panicked.");
    }
    if let Some(loader) = loader {
        if loader.join().is_err() {
            log::error!("Template loader panicked.");
        }
    }
    let tracker = service.join().context("tracker worker did not return")?;
    render_loop.pump();

    let status = tracker.report_status();
    log::info!("Tracker finished: {}", status.message);
    println!("{}", serde_json::to_string_pretty(&status)?);

    let scene = scene.lock().unwrap_or_else(PoisonError::into_inner);
    match tracker.instance() {
        Some(node) => {
            let local = scene.local_transform(node.id()).unwrap_or_default();
            log::info!(
                "'{}' ({}): parent {:?}, translation {:?}, scale {:?}.",
                node.name(),
                node.id(),
                scene.parent_of(node.id()),
                local.translation(),
                local.scale()
            );
        }
        None => log::info!("No instance was created."),
    }
    log::info!("Render loop executed {} scene tasks.", render_loop.executed());

    Ok(())
}

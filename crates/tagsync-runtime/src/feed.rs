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

//! Scripted observation feeds replayed in place of a live detector.

use std::path::Path;

use anyhow::{Context, Result};
use tagsync_core::math::{Mat4, Vec3};
use tagsync_core::{MarkerId, MarkerObservation, ObservationBatch};

/// Parses a RON list of observation batches.
///
/// Batches are renumbered in file order, so the `sequence` field may be omitted.
pub fn parse_feed(source: &str) -> Result<Vec<ObservationBatch>> {
    let mut batches: Vec<ObservationBatch> =
        ron::from_str(source).context("invalid observation feed")?;
    for (index, batch) in batches.iter_mut().enumerate() {
        batch.sequence = index as u64 + 1;
    }
    Ok(batches)
}

/// Reads the feed at `path`.
pub fn load_feed(path: impl AsRef<Path>) -> Result<Vec<ObservationBatch>> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read observation feed '{}'", path.display()))?;
    parse_feed(&source).with_context(|| format!("in observation feed '{}'", path.display()))
}

/// A short scene: the target marker shows up, drifts towards the camera,
/// disappears behind a distractor for a few frames, then comes back.
pub fn demo_feed(target: MarkerId) -> Vec<ObservationBatch> {
    let distractor = MarkerObservation::new(
        MarkerId(target.0 + 1),
        Mat4::from_translation(Vec3::new(0.2, 0.0, -0.8)),
    );
    let at = |z: f32| MarkerObservation::new(target, Mat4::from_translation(Vec3::new(0.0, 0.0, z)));

    let mut frames = Vec::new();
    frames.push(vec![at(-1.0)]);
    for step in 1..=5 {
        frames.push(vec![distractor, at(-1.0 + 0.1 * step as f32)]);
    }
    for _ in 0..3 {
        frames.push(vec![distractor]);
    }
    frames.push(Vec::new());
    frames.push(vec![at(-0.5)]);
    frames.push(vec![
        MarkerObservation::new(
            target,
            Mat4::from_translation(Vec3::new(0.05, 0.0, -0.5))
                * Mat4::from_axis_angle(Vec3::Y, 0.3),
        ),
        distractor,
    ]);

    frames
        .into_iter()
        .enumerate()
        .map(|(index, observations)| ObservationBatch::new(index as u64 + 1, observations))
        .collect()
}

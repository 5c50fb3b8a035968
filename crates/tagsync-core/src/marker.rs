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

//! The marker data model produced by the detection pipeline.
//!
//! A detection tick yields one [`ObservationBatch`]: every fiducial marker seen
//! in that frame, each with its integer identifier and camera-relative pose.
//! Batches are immutable once published.

use crate::math::Mat4;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The integer identifier encoded in a fiducial marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(pub u32);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single detected marker: its identifier and its camera-relative pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerObservation {
    /// The decoded marker identifier.
    pub id: MarkerId,
    /// Homogeneous transform of the marker relative to the camera.
    pub pose: Mat4,
}

impl MarkerObservation {
    /// Creates a new observation.
    pub fn new(id: MarkerId, pose: Mat4) -> Self {
        Self { id, pose }
    }
}

/// All markers observed during one update tick.
///
/// The order of `observations` carries no meaning beyond making duplicate
/// resolution deterministic: lookups return the first match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationBatch {
    /// Monotonic tick counter assigned by the producer.
    #[serde(default)]
    pub sequence: u64,
    /// The markers seen during this tick.
    #[serde(default)]
    pub observations: Vec<MarkerObservation>,
}

impl ObservationBatch {
    /// Creates a batch from a sequence number and a list of observations.
    pub fn new(sequence: u64, observations: Vec<MarkerObservation>) -> Self {
        Self {
            sequence,
            observations,
        }
    }

    /// Creates a batch in which no marker was seen.
    pub fn empty(sequence: u64) -> Self {
        Self::new(sequence, Vec::new())
    }

    /// Returns the first observation carrying `id`, if any.
    pub fn find(&self, id: MarkerId) -> Option<&MarkerObservation> {
        self.observations.iter().find(|obs| obs.id == id)
    }

    /// Returns the number of observations in the batch.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Returns `true` if no marker was observed.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    #[test]
    fn find_returns_none_when_absent() {
        let batch = ObservationBatch::new(
            1,
            vec![MarkerObservation::new(MarkerId(2), Mat4::IDENTITY)],
        );
        assert!(batch.find(MarkerId(4)).is_none());
        assert!(ObservationBatch::empty(2).find(MarkerId(4)).is_none());
    }

    #[test]
    fn find_takes_first_of_duplicates() {
        let first = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let second = Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0));
        let batch = ObservationBatch::new(
            7,
            vec![
                MarkerObservation::new(MarkerId(1), Mat4::IDENTITY),
                MarkerObservation::new(MarkerId(4), first),
                MarkerObservation::new(MarkerId(4), second),
            ],
        );

        let found = batch.find(MarkerId(4)).expect("marker 4 is in the batch");
        assert_eq!(found.pose, first);
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn marker_id_display() {
        assert_eq!(MarkerId(4).to_string(), "#4");
    }
}

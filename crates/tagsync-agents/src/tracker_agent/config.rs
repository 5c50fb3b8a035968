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

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tagsync_core::MarkerId;
use thiserror::Error;

/// Marker tracked when no configuration says otherwise.
pub const DEFAULT_TARGET_MARKER: MarkerId = MarkerId(4);
/// Uniform scale applied to the node when no configuration says otherwise.
pub const DEFAULT_MODEL_SCALE: f32 = 0.1;
/// Name given to the instantiated node when no configuration says otherwise.
pub const DEFAULT_NODE_NAME: &str = "marker0Model";

/// An error raised while loading or validating a [`TrackerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read tracker config '{}': {source}", path.display())]
    Io {
        /// The path that was read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration is not valid RON.
    #[error("failed to parse tracker config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// The model scale is zero, negative, or not finite.
    #[error("model scale must be a positive finite number, got {0}")]
    InvalidScale(f32),
    /// The node name is empty.
    #[error("node name must not be empty")]
    EmptyNodeName,
}

/// Configuration for a [`MarkerTracker`](super::MarkerTracker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Identifier of the marker whose pose drives the node.
    pub target_marker: MarkerId,
    /// Uniform scale re-applied after every pose assignment.
    pub model_scale: f32,
    /// Name given to the node instance when it is cloned from the template.
    pub node_name: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            target_marker: DEFAULT_TARGET_MARKER,
            model_scale: DEFAULT_MODEL_SCALE,
            node_name: DEFAULT_NODE_NAME.to_string(),
        }
    }
}

impl TrackerConfig {
    /// Parses and validates a RON configuration. Missing fields take their defaults.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates the RON configuration at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&source)
    }

    /// Checks the invariants the tracker relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.model_scale.is_finite() || self.model_scale <= 0.0 {
            return Err(ConfigError::InvalidScale(self.model_scale));
        }
        if self.node_name.trim().is_empty() {
            return Err(ConfigError::EmptyNodeName);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_track_marker_four_at_tenth_scale() {
        let config = TrackerConfig::default();
        assert_eq!(config.target_marker, MarkerId(4));
        assert_eq!(config.model_scale, 0.1);
        assert_eq!(config.node_name, "marker0Model");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let config = TrackerConfig::from_ron_str("(target_marker: 7)").unwrap();
        assert_eq!(config.target_marker, MarkerId(7));
        assert_eq!(config.model_scale, DEFAULT_MODEL_SCALE);
    }

    #[test]
    fn rejects_bad_scale() {
        let err = TrackerConfig::from_ron_str("(model_scale: 0.0)").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidScale(_)));

        let config = TrackerConfig {
            model_scale: f32::NAN,
            ..TrackerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidScale(_))));
    }

    #[test]
    fn rejects_empty_name() {
        let err = TrackerConfig::from_ron_str(r#"(node_name: "  ")"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyNodeName));
    }

    #[test]
    fn rejects_malformed_ron() {
        let err = TrackerConfig::from_ron_str("(target_marker: \"four\")").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"(target_marker: 2, model_scale: 0.25, node_name: "probe")"#).unwrap();

        let config = TrackerConfig::load(file.path()).unwrap();
        assert_eq!(
            config,
            TrackerConfig {
                target_marker: MarkerId(2),
                model_scale: 0.25,
                node_name: "probe".to_string(),
            }
        );
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = TrackerConfig::load("/no/such/tracker.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}

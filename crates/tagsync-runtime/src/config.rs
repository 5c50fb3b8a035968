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

//! Host-level configuration: the tracker settings plus where the runtime
//! finds its template and its observation feed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tagsync_agents::TrackerConfig;

/// Default pacing between replayed batches and between render frames.
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// Everything the runtime binary needs to start.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Settings handed to the tracker.
    pub tracker: TrackerConfig,
    /// RON template description. When absent a built-in template is used.
    pub template_path: Option<PathBuf>,
    /// RON list of observation batches. When absent a built-in scenario is replayed.
    pub feed_path: Option<PathBuf>,
    /// Milliseconds between two replayed batches.
    pub frame_interval_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            template_path: None,
            feed_path: None,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
        }
    }
}

impl RuntimeConfig {
    /// Parses a RON runtime configuration and validates the tracker section.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let config: Self = ron::from_str(source).context("invalid runtime config")?;
        config.tracker.validate()?;
        Ok(config)
    }

    /// Reads the configuration at `path`.
    ///
    /// Relative template and feed paths are resolved against the directory
    /// holding the configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config '{}'", path.display()))?;
        let mut config = Self::from_ron_str(&source)
            .with_context(|| format!("in runtime config '{}'", path.display()))?;

        if let Some(base) = path.parent() {
            config.template_path = config.template_path.map(|p| base.join(p));
            config.feed_path = config.feed_path.map(|p| base.join(p));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tagsync_core::MarkerId;

    #[test]
    fn empty_config_uses_defaults() {
        let config = RuntimeConfig::from_ron_str("()").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.tracker.target_marker, MarkerId(4));
    }

    #[test]
    fn relative_paths_follow_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runtime.ron");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"(template_path: Some("model0.ron"), frame_interval_ms: 5, tracker: (model_scale: 0.2))"#
        )
        .unwrap();

        let config = RuntimeConfig::load(&path).unwrap();
        assert_eq!(config.template_path, Some(dir.path().join("model0.ron")));
        assert_eq!(config.feed_path, None);
        assert_eq!(config.frame_interval_ms, 5);
        assert_eq!(config.tracker.model_scale, 0.2);
    }

    #[test]
    fn invalid_tracker_section_is_rejected() {
        assert!(RuntimeConfig::from_ron_str("(tracker: (model_scale: 0.0))").is_err());
    }

    #[test]
    fn bundled_demo_config_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/runtime.ron");
        let config = RuntimeConfig::load(path).unwrap();
        assert_eq!(config.tracker, TrackerConfig::default());
        assert!(config.template_path.unwrap().ends_with("model0.ron"));
    }
}

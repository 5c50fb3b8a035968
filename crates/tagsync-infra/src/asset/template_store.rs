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
use std::sync::{Arc, PoisonError, RwLock};
use std::thread;

use tagsync_core::{Renderable, Template, TemplateCache};
use thiserror::Error;

/// An error raised while loading a template description.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template file could not be read.
    #[error("failed to read template '{}': {source}", path.display())]
    Io {
        /// The path that was read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The template file is not a valid RON `Renderable`.
    #[error("failed to parse template '{}': {source}", path.display())]
    Parse {
        /// The path that was parsed.
        path: PathBuf,
        /// The underlying RON error.
        #[source]
        source: ron::error::SpannedError,
    },
}

/// A single-slot [`TemplateCache`] that starts empty and is filled once the
/// template has been loaded.
///
/// Reads never block on loading: until [`publish`](Self::publish) is called the
/// store answers `None`, which the tracker treats as "not ready yet".
#[derive(Debug, Default)]
pub struct TemplateStore {
    slot: RwLock<Option<Template>>,
}

impl TemplateStore {
    /// Creates a store with no template loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `renderable`.
    pub fn with_template(renderable: Renderable) -> Self {
        let store = Self::empty();
        store.publish(renderable);
        store
    }

    /// Makes `renderable` the current template.
    pub fn publish(&self, renderable: Renderable) -> Template {
        let template = Template::new(renderable);
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(template.clone());
        log::info!("TemplateStore: template '{}' is ready.", template.name);
        template
    }

    /// Returns `true` once a template has been published.
    pub fn is_loaded(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Parses a RON `Renderable` description.
    pub fn parse_ron(source: &str, origin: &Path) -> Result<Renderable, TemplateError> {
        ron::from_str(source).map_err(|source| TemplateError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Reads and parses the template at `path`, then publishes it.
    pub fn load_ron(&self, path: impl AsRef<Path>) -> Result<Template, TemplateError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let renderable = Self::parse_ron(&source, path)?;
        Ok(self.publish(renderable))
    }

    /// Loads the template at `path` on a background thread.
    ///
    /// Failures are logged and leave the store empty.
    pub fn spawn_load(
        self: &Arc<Self>,
        path: impl Into<PathBuf>,
    ) -> std::io::Result<thread::JoinHandle<()>> {
        let store = Arc::clone(self);
        let path = path.into();
        thread::Builder::new()
            .name("tagsync-template-loader".to_string())
            .spawn(move || {
                log::debug!("TemplateStore: loading template from {}.", path.display());
                if let Err(e) = store.load_ron(&path) {
                    log::error!("TemplateStore: {e}");
                }
            })
    }
}

impl TemplateCache for TemplateStore {
    fn current_template(&self) -> Option<Template> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MODEL_RON: &str = r#"(
        name: "model0",
        mesh: "meshes/model0.obj",
        children: [
            (name: "base", mesh: "meshes/base.obj"),
        ],
    )"#;

    #[test]
    fn empty_store_has_no_template() {
        let store = TemplateStore::empty();
        assert!(!store.is_loaded());
        assert!(store.current_template().is_none());
    }

    #[test]
    fn publish_makes_template_available() {
        let store = TemplateStore::empty();
        store.publish(Renderable::new("model0", "cube"));
        let template = store.current_template().expect("template was published");
        assert_eq!(template.name, "model0");
    }

    #[test]
    fn load_ron_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        file.write_all(MODEL_RON.as_bytes())?;

        let store = TemplateStore::empty();
        let template = store.load_ron(file.path())?;

        assert_eq!(template.mesh, "meshes/model0.obj");
        assert_eq!(template.node_count(), 2);
        assert!(store.is_loaded());
        Ok(())
    }

    #[test]
    fn load_ron_reports_missing_file() {
        let store = TemplateStore::empty();
        let err = store
            .load_ron("/definitely/not/here.ron")
            .expect_err("missing file must fail");
        assert!(matches!(err, TemplateError::Io { .. }));
        assert!(!store.is_loaded());
    }

    #[test]
    fn parse_error_is_reported() {
        let err = TemplateStore::parse_ron("(name: 3)", Path::new("inline.ron"))
            .expect_err("malformed template must fail");
        assert!(matches!(err, TemplateError::Parse { .. }));
        assert!(err.to_string().contains("inline.ron"));
    }

    #[test]
    fn spawn_load_fills_store_in_background() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        file.write_all(MODEL_RON.as_bytes())?;

        let store = Arc::new(TemplateStore::empty());
        store.spawn_load(file.path())?.join().expect("loader thread panicked");

        assert!(store.is_loaded());
        Ok(())
    }
}

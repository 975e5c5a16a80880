//! Loading and writing the JSON documents treejack works with
//!
//! Trees, input assignments, simulation responses and unreachable-node
//! reports all arrive as files produced by editors or the evaluation service.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::application::error_ext::{IoResultExt, JsonResultExt};
use crate::application::services::ExampleCatalog;
use crate::application::ApplicationResult;
use crate::domain::{DecisionTree, InputAssignment, SimulationResult, UnreachableReport};
use crate::infrastructure::traits::FileSystem;

/// Prefix selecting a catalog example instead of a file, e.g. `example:age_check`.
pub const EXAMPLE_PREFIX: &str = "example:";

/// Service for reading and writing tree-related JSON documents.
pub struct DocumentService {
    fs: Arc<dyn FileSystem>,
}

impl DocumentService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    fn load<T: DeserializeOwned>(&self, kind: &str, path: &Path) -> ApplicationResult<T> {
        debug!("load {}: {}", kind, path.display());
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context(&format!("read {kind}"), path)?;
        serde_json::from_str(&content).as_document(kind, &path.display().to_string())
    }

    /// Load a tree from a file path or an `example:<name>` reference.
    #[instrument(level = "debug", skip(self, catalog))]
    pub fn load_tree(&self, source: &str, catalog: &ExampleCatalog) -> ApplicationResult<DecisionTree> {
        match source.strip_prefix(EXAMPLE_PREFIX) {
            Some(name) => catalog.tree(name).cloned(),
            None => self.load("tree", Path::new(source)),
        }
    }

    pub fn load_inputs(&self, path: &Path) -> ApplicationResult<InputAssignment> {
        self.load("input", path)
    }

    pub fn load_simulation(&self, path: &Path) -> ApplicationResult<SimulationResult> {
        self.load("simulation result", path)
    }

    pub fn load_unreachable(&self, path: &Path) -> ApplicationResult<UnreachableReport> {
        self.load("unreachable report", path)
    }

    /// Write a simulation response as pretty-printed JSON.
    ///
    /// The content is the response itself; nothing is added.
    pub fn export_simulation(&self, result: &SimulationResult, target: &Path) -> ApplicationResult<()> {
        let json = serde_json::to_string_pretty(result).as_document("simulation result", "export")?;
        self.fs
            .ensure_parent(target)
            .with_path_context("create directory for", target)?;
        self.fs
            .write(target, &json)
            .with_path_context("write export", target)?;
        debug!("exported simulation result to {}", target.display());
        Ok(())
    }
}

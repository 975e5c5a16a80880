//! Example tree catalog
//!
//! Bundled example trees plus an optional directory of user trees. A user
//! file `<name>.json` replaces the bundled example of the same name.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::error_ext::{IoResultExt, JsonResultExt};
use crate::application::ApplicationResult;
use crate::domain::{DecisionTree, DomainError, SampleInput};
use crate::infrastructure::traits::FileSystem;

const BUNDLED: &[(&str, &str)] = &[
    (
        "age_check",
        include_str!("../../../resources/examples/age_check.json"),
    ),
    (
        "complex_loan",
        include_str!("../../../resources/examples/complex_loan.json"),
    ),
    (
        "loan_application",
        include_str!("../../../resources/examples/loan_application.json"),
    ),
    (
        "product_recommendation",
        include_str!("../../../resources/examples/product_recommendation.json"),
    ),
];

/// Where an example came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExampleOrigin {
    Bundled,
    User(std::path::PathBuf),
}

#[derive(Debug, Clone)]
pub struct Example {
    pub tree: DecisionTree,
    pub origin: ExampleOrigin,
}

/// Named example trees, sorted by name.
#[derive(Debug, Clone, Default)]
pub struct ExampleCatalog {
    examples: BTreeMap<String, Example>,
}

impl ExampleCatalog {
    /// Catalog with only the bundled examples.
    pub fn bundled() -> ApplicationResult<Self> {
        let mut examples = BTreeMap::new();
        for (name, json) in BUNDLED {
            let tree: DecisionTree = serde_json::from_str(json).as_document("tree", name)?;
            examples.insert(
                name.to_string(),
                Example {
                    tree,
                    origin: ExampleOrigin::Bundled,
                },
            );
        }
        Ok(Self { examples })
    }

    /// Bundled examples overlaid with every `*.json` tree in `dir`.
    ///
    /// Files that cannot be read or parsed are skipped with a warning.
    pub fn load(fs: &Arc<dyn FileSystem>, dir: Option<&Path>) -> ApplicationResult<Self> {
        let mut catalog = Self::bundled()?;
        let Some(dir) = dir else {
            return Ok(catalog);
        };
        if !fs.is_dir(dir) {
            warn!("examples directory {} not found, using bundled examples", dir.display());
            return Ok(catalog);
        }

        for path in fs.list_files(dir, "json").with_path_context("list examples", dir)? {
            let Some(name) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            let content = match fs.read_to_string(&path) {
                Ok(c) => c,
                Err(e) => {
                    warn!("skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            match serde_json::from_str::<DecisionTree>(&content) {
                Ok(tree) => {
                    debug!("registered example {} from {}", name, path.display());
                    catalog.examples.insert(
                        name,
                        Example {
                            tree,
                            origin: ExampleOrigin::User(path.clone()),
                        },
                    );
                }
                Err(e) => warn!("skipping {}: {}", path.display(), e),
            }
        }
        Ok(catalog)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.examples.keys().map(String::as_str)
    }

    pub fn examples(&self) -> impl Iterator<Item = (&str, &Example)> {
        self.examples.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, name: &str) -> ApplicationResult<&Example> {
        self.examples
            .get(name)
            .ok_or_else(|| DomainError::ExampleNotFound(name.to_string()).into())
    }

    pub fn tree(&self, name: &str) -> ApplicationResult<&DecisionTree> {
        self.get(name).map(|e| &e.tree)
    }

    /// Sample inputs shipped with an example; empty if it has none.
    pub fn sample_inputs(&self, name: &str) -> ApplicationResult<&[SampleInput]> {
        self.tree(name).map(|t| t.sample_inputs.as_slice())
    }
}

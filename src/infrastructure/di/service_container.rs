//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::{CoverageService, DocumentService, ExampleCatalog, RenderService};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Bundled examples overlaid with `settings.examples_dir`
    pub catalog: ExampleCatalog,

    pub documents: DocumentService,
    pub coverage: CoverageService,
    pub render: RenderService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> ApplicationResult<Self> {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> ApplicationResult<Self> {
        let settings = Arc::new(settings);
        let catalog = ExampleCatalog::load(&fs, settings.examples_dir.as_deref())?;
        debug!("catalog: {} examples", catalog.names().count());

        Ok(Self {
            documents: DocumentService::new(fs.clone()),
            coverage: CoverageService::new(settings.max_depth),
            render: RenderService::new(settings.max_depth),
            catalog,
            settings,
            fs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::MemoryFileSystem;
    use std::path::PathBuf;

    #[test]
    fn given_examples_dir_when_wiring_then_catalog_includes_user_trees() {
        let fs = Arc::new(MemoryFileSystem::new().with_file(
            "/trees/mine.json",
            r#"{"root": {"node_id": "r", "text": "Root"}}"#,
        ));
        let settings = Settings {
            examples_dir: Some(PathBuf::from("/trees")),
            ..Settings::default()
        };

        let container = ServiceContainer::with_deps(settings, fs).unwrap();

        assert!(container.catalog.get("mine").is_ok());
        assert!(container.catalog.get("age_check").is_ok());
    }
}

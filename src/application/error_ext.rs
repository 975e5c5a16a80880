//! Error conversion helpers for common I/O and JSON operations
//!
//! Provides extension traits for cleaner error handling with path context.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::DomainError;

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.read_to_string(&path)
    ///     .with_path_context("read tree", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ApplicationError::NotFound(path.to_path_buf()),
            _ => ApplicationError::OperationFailed {
                context: format!("{}: {}", action, path.display()),
                source: Box::new(e),
            },
        })
    }
}

/// Extension trait for turning JSON decode failures into domain errors.
pub trait JsonResultExt<T> {
    /// Report a malformed document of the given kind, e.g. "tree".
    fn as_document(self, kind: &str, origin: &str) -> ApplicationResult<T>;
}

impl<T> JsonResultExt<T> for serde_json::Result<T> {
    fn as_document(self, kind: &str, origin: &str) -> ApplicationResult<T> {
        self.map_err(|e| {
            DomainError::InvalidDocument {
                kind: kind.to_string(),
                message: format!("{origin}: {e}"),
            }
            .into()
        })
    }
}

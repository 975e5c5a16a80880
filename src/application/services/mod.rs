//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the `FileSystem` boundary trait where they touch files,
//! but are themselves concrete structs, not traits.

mod catalog;
mod coverage;
mod documents;
mod render;

pub use catalog::{Example, ExampleCatalog, ExampleOrigin};
pub use coverage::CoverageService;
pub use documents::{DocumentService, EXAMPLE_PREFIX};
pub use render::{RenderOptions, RenderService};

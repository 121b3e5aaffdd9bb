//! Data-driven content for Wavecrest: catalog and session config loading,
//! plus the built-in skill graph.

pub mod loader;
pub mod schema;

use std::path::Path;

use wavecrest_core::catalog::Catalog;

pub use loader::{DataLoadError, Format, load_catalog, load_session_config, parse_catalog};

/// Source of the built-in skill graph.
pub const BUILTIN_CATALOG_RON: &str = include_str!("../data/skill_tree.ron");

/// Parse the built-in skill graph.
pub fn builtin_catalog() -> Result<Catalog, DataLoadError> {
    parse_catalog(
        BUILTIN_CATALOG_RON,
        Format::Ron,
        Path::new("builtin:skill_tree.ron"),
    )
}

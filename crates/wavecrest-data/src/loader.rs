//! Reads catalog and session config files and resolves them into core types.
//!
//! The file format is detected from the extension (`.ron`, `.json`,
//! `.toml`). Catalog files go through [`CatalogBuilder`] so every structural
//! rule of the core crate applies to data-driven catalogs too.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::warn;
use wavecrest_core::catalog::{Catalog, CatalogBuilder, CatalogError, Effect, NodeDef};
use wavecrest_core::config::SessionConfig;
use wavecrest_core::fixed::checked_f64_to_fixed64;
use wavecrest_core::stat::Stat;

use crate::schema::{CatalogData, NodeData};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// An effect value cannot be represented in fixed-point (NaN, infinite
    /// or out of range).
    #[error("invalid value {value} for {stat} on node {node} in {file}")]
    InvalidValue {
        file: PathBuf,
        node: String,
        stat: Stat,
        value: f64,
    },

    /// The nodes parsed but do not form a valid catalog.
    #[error("invalid catalog in {file}: {source}")]
    Catalog {
        file: PathBuf,
        #[source]
        source: CatalogError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize `content` in the given format. `file` is only used for error
/// messages.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<T, DataLoadError> {
    let parse_err = |detail: String| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    };

    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
    }
}

/// Read a file and deserialize it according to its format.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, path)
}

// ===========================================================================
// Catalog resolution
// ===========================================================================

/// Convert parsed node data into a validated catalog. Node order in the
/// file becomes catalog order.
pub fn resolve_catalog(data: CatalogData, file: &Path) -> Result<Catalog, DataLoadError> {
    let catalog_err = |source: CatalogError| {
        warn!(file = %file.display(), error = %source, "catalog failed validation");
        DataLoadError::Catalog {
            file: file.to_path_buf(),
            source,
        }
    };

    let mut builder = CatalogBuilder::new();
    for node in data.nodes {
        let def = resolve_node(node, file)?;
        builder.add(def).map_err(catalog_err)?;
    }
    builder.build().map_err(catalog_err)
}

fn resolve_node(data: NodeData, file: &Path) -> Result<NodeDef, DataLoadError> {
    let effects = data
        .effects
        .iter()
        .map(|&(stat, value)| {
            let value =
                checked_f64_to_fixed64(value).ok_or_else(|| DataLoadError::InvalidValue {
                    file: file.to_path_buf(),
                    node: data.key.clone(),
                    stat,
                    value,
                })?;
            Ok(Effect { stat, value })
        })
        .collect::<Result<Vec<_>, DataLoadError>>()?;

    let name = if data.name.is_empty() {
        data.key.clone()
    } else {
        data.name
    };

    Ok(NodeDef {
        key: data.key,
        name,
        tier: data.tier,
        branch: data.branch,
        cost: data.cost,
        effects,
        behaviors: data.behaviors.into_iter().collect(),
        connections: data.connections,
    })
}

/// Parse a catalog from a string in the given format.
pub fn parse_catalog(content: &str, format: Format, file: &Path) -> Result<Catalog, DataLoadError> {
    let data: CatalogData = deserialize_str(content, format, file)?;
    resolve_catalog(data, file)
}

/// Load a catalog file (`.ron`, `.json` or `.toml`).
pub fn load_catalog(path: &Path) -> Result<Catalog, DataLoadError> {
    let data: CatalogData = deserialize_file(path)?;
    resolve_catalog(data, path)
}

/// Load a session config file. Missing fields take their defaults.
pub fn load_session_config(path: &Path) -> Result<SessionConfig, DataLoadError> {
    deserialize_file(path)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "wavecrest_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Clean up a test directory.
    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    const SMALL_RON: &str = r#"(
        nodes: [
            (key: "origin", tier: start, connections: ["a"]),
            (key: "a", name: "Alpha", tier: small, cost: 1, effects: [(damage, 1.1)]),
            (key: "b", tier: notable, cost: 2, behaviors: [thorns], connections: ["a"]),
        ],
    )"#;

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("tree.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("tree.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("tree.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_unsupported() {
        assert!(matches!(
            detect_format(Path::new("tree.yaml")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            detect_format(Path::new("tree")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn parse_catalog_keeps_file_order() {
        let catalog = parse_catalog(SMALL_RON, Format::Ron, Path::new("test.ron")).unwrap();
        let keys: Vec<&str> = catalog.iter().map(|(_, n)| n.key.as_str()).collect();
        assert_eq!(keys, vec!["origin", "a", "b"]);
        assert_eq!(catalog.node("a").unwrap().name, "Alpha");
        assert_eq!(catalog.node("b").unwrap().name, "b");
    }

    #[test]
    fn structural_errors_surface_as_catalog_errors() {
        let input = r#"(nodes: [
            (key: "origin", tier: start),
            (key: "lonely", tier: small, cost: 1),
        ])"#;
        let err = parse_catalog(input, Format::Ron, Path::new("bad.ron")).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::Catalog {
                source: CatalogError::Unreachable { .. },
                ..
            }
        ));
    }

    #[test]
    fn unrepresentable_values_are_rejected() {
        let input = r#"{"nodes": [
            {"key": "origin", "tier": "start"},
            {"key": "huge", "tier": "small", "effects": [["armor", 1e30]], "connections": ["origin"]}
        ]}"#;
        let err = parse_catalog(input, Format::Json, Path::new("bad.json")).unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidValue { stat: Stat::Armor, .. }));
    }

    #[test]
    fn parse_errors_name_the_file() {
        let err = parse_catalog("(nodes: [", Format::Ron, Path::new("broken.ron")).unwrap_err();
        match err {
            DataLoadError::Parse { file, .. } => assert_eq!(file, PathBuf::from("broken.ron")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn load_catalog_from_each_format() {
        let dir = make_test_dir("load_formats");

        fs::write(dir.join("tree.ron"), SMALL_RON).unwrap();
        fs::write(
            dir.join("tree.json"),
            r#"{"nodes": [{"key": "origin", "tier": "start"}, {"key": "a", "tier": "small", "cost": 1, "connections": ["origin"]}]}"#,
        )
        .unwrap();
        fs::write(
            dir.join("tree.toml"),
            "[[nodes]]\nkey = \"origin\"\ntier = \"start\"\n\n[[nodes]]\nkey = \"a\"\ntier = \"small\"\ncost = 1\nconnections = [\"origin\"]\n",
        )
        .unwrap();

        assert_eq!(load_catalog(&dir.join("tree.ron")).unwrap().len(), 3);
        assert_eq!(load_catalog(&dir.join("tree.json")).unwrap().len(), 2);
        assert_eq!(load_catalog(&dir.join("tree.toml")).unwrap().len(), 2);

        cleanup(&dir);
    }

    #[test]
    fn load_catalog_missing_file_is_io_error() {
        let dir = make_test_dir("missing");
        let err = load_catalog(&dir.join("nope.ron")).unwrap_err();
        assert!(matches!(err, DataLoadError::Io(_)));
        cleanup(&dir);
    }

    #[test]
    fn load_session_config_with_defaults() {
        let dir = make_test_dir("session_config");
        fs::write(dir.join("session.toml"), "starting_points = 4\n").unwrap();
        fs::write(dir.join("empty.json"), "{}").unwrap();

        assert_eq!(
            load_session_config(&dir.join("session.toml")).unwrap().starting_points,
            4
        );
        assert_eq!(
            load_session_config(&dir.join("empty.json")).unwrap(),
            SessionConfig::default()
        );

        cleanup(&dir);
    }
}

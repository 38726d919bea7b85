//! The scan stage: extracting structural views from an architecture
//! manifest.
//!
//! The `Scanner` trait is the seam between the pipeline and whatever
//! produces views; `ManifestScanner` is the built-in implementation,
//! reading a TOML manifest that declares Kinds, instances, and tagged
//! exports directly:
//!
//! ```toml
//! [kinds.Context]
//! members = [{ name = "domain", typeName = "DomainLayer" }]
//! constraints = { noDependency = [["domain", "infra"]] }
//!
//! [[instances]]
//! name = "app"
//! kind = "Context"
//! path = "./src"
//!
//! [[exports]]
//! file = "src/orders/validate.ts"
//! kind = "Decider"
//! name = "validateOrder"
//! ```
//!
//! Malformed manifests are fatal scan errors; semantic problems (unknown
//! Kinds, unresolved members) surface later as soft errors.

use kindcheck_core::views::{
    ConstraintNode, InstanceDecl, KindDef, KindMember, MemberValue, ScanViews, ScopeKind,
    TaggedExport,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Everything one scan produced: the views plus the source files that fed
/// them, for run caching.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub views: ScanViews,
    /// Files whose content determined the views, in scan order.
    pub source_files: Vec<String>,
}

/// The pipeline's input boundary.
pub trait Scanner {
    fn scan(&self) -> Result<ScanResult, ScanError>;
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot read manifest {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("manifest {path} is not valid TOML: {source}")]
    Toml {
        path: String,
        #[source]
        source: Box<toml::de::Error>,
    },
    #[error("manifest {path}: {message}")]
    Shape { path: String, message: String },
}

/// Scans a single TOML architecture manifest.
#[derive(Debug, Clone)]
pub struct ManifestScanner {
    path: PathBuf,
}

impl ManifestScanner {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse manifest text directly. `origin` stands in for the manifest
    /// path: declared instance paths resolve relative to its directory.
    pub fn parse_source(source: &str, origin: &str) -> Result<ScanResult, ScanError> {
        let doc: ManifestDoc = toml::from_str(source).map_err(|e| ScanError::Toml {
            path: origin.to_string(),
            source: Box::new(e),
        })?;

        let mut views = ScanViews::default();
        for (type_name, entry) in doc.kinds {
            let constraints = entry
                .constraints
                .map(|value| constraint_node(&value, origin, &type_name))
                .transpose()?;
            views.kind_defs.insert(
                type_name.clone(),
                KindDef {
                    kind_name_literal: entry
                        .name
                        .unwrap_or_else(|| type_name.to_lowercase()),
                    type_name,
                    members: entry.members,
                    constraints,
                    scope: entry.scope,
                    wraps_type_name: entry.wraps,
                },
            );
        }

        for entry in doc.instances {
            views.instances.push(InstanceDecl {
                variable_name: entry.name,
                kind_type_name: entry.kind,
                declared_path: entry.path,
                members: entry.members,
                source_file: origin.to_string(),
            });
        }

        for entry in doc.exports {
            views.tagged_exports.push(TaggedExport {
                source_file: entry.file,
                kind_type_name: entry.kind,
                export_name: entry.name,
            });
        }

        Ok(ScanResult {
            views,
            source_files: Vec::new(),
        })
    }
}

impl Scanner for ManifestScanner {
    fn scan(&self) -> Result<ScanResult, ScanError> {
        let origin = self.path.to_string_lossy().replace('\\', "/");
        let source = fs::read_to_string(&self.path).map_err(|e| ScanError::Io {
            path: origin.clone(),
            source: e,
        })?;
        let mut result = Self::parse_source(&source, &origin)?;
        result.source_files = vec![origin];
        Ok(result)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestDoc {
    #[serde(default)]
    kinds: BTreeMap<String, KindEntry>,
    #[serde(default)]
    instances: Vec<InstanceEntry>,
    #[serde(default)]
    exports: Vec<ExportEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KindEntry {
    /// Kind name literal; defaults to the lowercased type name.
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    members: Vec<KindMember>,
    #[serde(default)]
    constraints: Option<toml::Value>,
    #[serde(default)]
    scope: Option<ScopeKind>,
    #[serde(default)]
    wraps: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InstanceEntry {
    name: String,
    kind: String,
    path: String,
    #[serde(default)]
    members: Vec<MemberValue>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExportEntry {
    file: String,
    kind: String,
    name: String,
}

/// Map a TOML constraint value onto the structural constraint tree.
///
/// `true` → flag, array of strings → string list, array of string pairs →
/// tuple pairs, table → object (building dotted names downstream).
fn constraint_node(
    value: &toml::Value,
    origin: &str,
    kind_name: &str,
) -> Result<ConstraintNode, ScanError> {
    let shape_err = |message: String| ScanError::Shape {
        path: origin.to_string(),
        message,
    };

    match value {
        toml::Value::Boolean(_) => Ok(ConstraintNode::Bool),
        toml::Value::Array(items) => {
            if items.iter().all(|i| i.is_str()) {
                let values = items
                    .iter()
                    .filter_map(|i| i.as_str())
                    .map(str::to_string)
                    .collect();
                return Ok(ConstraintNode::StringList { values });
            }
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                let pair = item
                    .as_array()
                    .filter(|a| a.len() == 2)
                    .and_then(|a| Some((a[0].as_str()?, a[1].as_str()?)));
                let Some((first, second)) = pair else {
                    return Err(shape_err(format!(
                        "constraint list in Kind<{kind_name}> must hold member names \
                         or [from, to] pairs"
                    )));
                };
                values.push((first.to_string(), second.to_string()));
            }
            Ok(ConstraintNode::TuplePairs { values })
        }
        toml::Value::Table(table) => {
            let mut properties = Vec::with_capacity(table.len());
            for (name, child) in table {
                properties.push((name.clone(), constraint_node(child, origin, kind_name)?));
            }
            Ok(ConstraintNode::Object { properties })
        }
        other => Err(shape_err(format!(
            "unsupported constraint value in Kind<{kind_name}>: {other}"
        ))),
    }
}

//! Scanner views: the raw structural facts the scanner extracts from a
//! host project before any symbol exists.
//!
//! Views are plain serializable data. The parser turns them into the
//! symbol tree; the binder reads them again for Kind-level facts
//! (constraints, scope, wrapping) that do not live on symbols.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A constraint literal as written in a Kind definition.
///
/// Structural, not semantic: the binder decides what each named node means
/// by looking the name up in the provider registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ConstraintNode {
    /// A bare `true` flag, e.g. `pure: true`.
    Bool,
    /// A list of member names, e.g. `noCycles: ["a", "b"]`.
    StringList { values: Vec<String> },
    /// A list of member-name pairs, e.g. `noDependency: [["domain", "infra"]]`.
    TuplePairs { values: Vec<(String, String)> },
    /// Named children; nesting builds dotted constraint names.
    Object { properties: Vec<(String, ConstraintNode)> },
}

impl ConstraintNode {
    pub fn object(properties: Vec<(&str, ConstraintNode)>) -> Self {
        Self::Object {
            properties: properties
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }

    /// Look up a direct property of an object node.
    pub fn property(&self, name: &str) -> Option<&ConstraintNode> {
        match self {
            Self::Object { properties } => properties
                .iter()
                .find_map(|(n, v)| (n == name).then_some(v)),
            _ => None,
        }
    }
}

/// Where an instance of a Kind is allowed to live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScopeKind {
    Folder,
    File,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Folder => write!(f, "folder"),
            Self::File => write!(f, "file"),
        }
    }
}

/// One declared member of a Kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindMember {
    pub name: String,
    /// The member's own Kind type, when it has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Explicit location relative to the instance root; defaults to the
    /// member name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// A Kind definition as scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindDef {
    pub type_name: String,
    pub kind_name_literal: String,
    #[serde(default)]
    pub members: Vec<KindMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<ConstraintNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<ScopeKind>,
    /// Set for wrapped Kinds: instances are tagged exports, not files or
    /// folders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wraps_type_name: Option<String>,
}

/// A member value inside an instance declaration (recursive for nested
/// Kinds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberValue {
    pub name: String,
    #[serde(default)]
    pub children: Vec<MemberValue>,
}

/// An instance declaration as scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceDecl {
    pub variable_name: String,
    pub kind_type_name: String,
    /// Declared root, relative to `source_file`'s directory. A `#export`
    /// suffix binds the instance to one named export of a file.
    pub declared_path: String,
    #[serde(default)]
    pub members: Vec<MemberValue>,
    pub source_file: String,
}

/// A declaration annotated as an instance of a Kind type, anywhere in the
/// project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggedExport {
    pub source_file: String,
    pub kind_type_name: String,
    pub export_name: String,
}

/// Everything the scanner hands to the rest of the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanViews {
    pub kind_defs: BTreeMap<String, KindDef>,
    pub instances: Vec<InstanceDecl>,
    pub tagged_exports: Vec<TaggedExport>,
    pub errors: Vec<String>,
}

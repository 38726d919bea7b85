//! The symbol tree: Kinds, Instances, and Members as a named hierarchy.
//!
//! Symbols are built once by the parser and are immutable from then on.
//! Resolution results (files, declarations) are *not* stored on the tree;
//! the binder returns them in explicit maps keyed by carrier key, so the
//! same tree can be read by any number of later stages without aliasing
//! concerns. Sharing is by `Arc`: contracts hold the same nodes the tree
//! does, and pointer identity is meaningful for deduplication.

use crate::carrier::CarrierExpr;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// What a symbol represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolKind {
    /// A Kind definition (the template itself).
    KindDef,
    /// A concrete binding of a Kind to a location.
    Instance,
    /// A named member within an instance.
    Member,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KindDef => write!(f, "kind"),
            Self::Instance => write!(f, "instance"),
            Self::Member => write!(f, "member"),
        }
    }
}

/// A node in the architectural symbol tree.
#[derive(Debug, Clone)]
pub struct Symbol {
    /// The symbol's own name (not a path).
    pub name: String,
    pub kind: SymbolKind,
    /// What code this symbol denotes. Every resolvable Instance/Member
    /// carries exactly one; Kind-definition symbols carry none.
    pub carrier: Option<CarrierExpr>,
    /// The Kind type this symbol instantiates, when known.
    pub kind_type_name: Option<String>,
    /// For sub-file symbols bound to one named export of a file.
    pub export_name: Option<String>,
    /// Direct members by name. Insertion order is irrelevant; iteration is
    /// name-ordered for determinism.
    pub members: BTreeMap<String, Arc<Symbol>>,
}

impl Symbol {
    /// A symbol with no members and no type reference.
    pub fn leaf(name: impl Into<String>, kind: SymbolKind, carrier: Option<CarrierExpr>) -> Self {
        Self {
            name: name.into(),
            kind,
            carrier,
            kind_type_name: None,
            export_name: None,
            members: BTreeMap::new(),
        }
    }

    /// Find a direct member by name.
    pub fn find_member(&self, name: &str) -> Option<&Arc<Symbol>> {
        self.members.get(name)
    }

    /// Direct members in name order.
    pub fn members(&self) -> impl Iterator<Item = &Arc<Symbol>> {
        self.members.values()
    }

    /// All descendants (not including `self`), depth-first in name order.
    pub fn descendants(&self) -> Vec<&Arc<Symbol>> {
        let mut out = Vec::new();
        for member in self.members.values() {
            out.push(member);
            out.extend(member.descendants());
        }
        out
    }

    /// Find a descendant by dotted path, e.g. `"ordering.domain"`.
    pub fn find_by_path(&self, path: &str) -> Option<&Arc<Symbol>> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut current = self.find_member(first)?;
        for part in parts {
            current = current.find_member(part)?;
        }
        Some(current)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}

//! The carrier algebra: what code does a symbol denote?
//!
//! A `CarrierExpr` is a pure algebraic value describing a set of files.
//! Atoms:
//!
//! - `Path` — code at a filesystem path (directory vs file decided at
//!   resolution time)
//! - `Tagged` — every declaration anywhere in the project annotated as an
//!   instance of a given Kind type
//!
//! Combinators: `Union`, `Exclude`, `Intersect`.
//!
//! Scoping is always composition, never a richer atom: "tagged declarations
//! under `p`" is `Intersect([Tagged(K), Path(p)])`.
//!
//! Carriers carry no behavior and touch no filesystem. Resolution belongs to
//! `kindcheck_bind::CarrierResolver`.

use serde::{Deserialize, Serialize};

/// Algebraic expression over file sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CarrierExpr {
    /// Code at a filesystem path. Whether it is a directory or a single
    /// file is resolved lazily.
    Path { path: String },

    /// All declarations tagged as instances of the named Kind type,
    /// project-wide. Inherently unscoped.
    Tagged { kind_type_name: String },

    /// Files from any child.
    Union { children: Vec<CarrierExpr> },

    /// Files from `base` minus files from `excluded`.
    Exclude {
        base: Box<CarrierExpr>,
        excluded: Box<CarrierExpr>,
    },

    /// Files common to all children.
    Intersect { children: Vec<CarrierExpr> },
}

impl CarrierExpr {
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path { path: path.into() }
    }

    pub fn tagged(kind_type_name: impl Into<String>) -> Self {
        Self::Tagged {
            kind_type_name: kind_type_name.into(),
        }
    }

    pub fn union(children: Vec<CarrierExpr>) -> Self {
        Self::Union { children }
    }

    pub fn exclude(base: CarrierExpr, excluded: CarrierExpr) -> Self {
        Self::Exclude {
            base: Box::new(base),
            excluded: Box::new(excluded),
        }
    }

    pub fn intersect(children: Vec<CarrierExpr>) -> Self {
        Self::Intersect { children }
    }

    /// The conventional "tagged declarations within a subtree" carrier.
    pub fn scoped_tagged(kind_type_name: impl Into<String>, scope: impl Into<String>) -> Self {
        Self::intersect(vec![Self::tagged(kind_type_name), Self::path(scope)])
    }
}

/// Canonical, order-independent serialization of a carrier expression.
///
/// This string is the memoization and deduplication unit: two expressions
/// that are structurally equal up to child order yield the same key, because
/// `Union`/`Intersect` children are sorted by their own keys.
///
/// A bare `Path` carrier keys to its raw path string. Derived-contract
/// deduplication relies on this (a synthetic per-file symbol keys to the
/// file path itself), so changing it is a semantic break, not a formatting
/// choice.
pub fn carrier_key(carrier: &CarrierExpr) -> String {
    match carrier {
        CarrierExpr::Path { path } => path.clone(),
        CarrierExpr::Tagged { kind_type_name } => format!("tagged:{kind_type_name}"),
        CarrierExpr::Union { children } => format!("union({})", sorted_child_keys(children)),
        CarrierExpr::Exclude { base, excluded } => {
            format!("exclude({},{})", carrier_key(base), carrier_key(excluded))
        }
        CarrierExpr::Intersect { children } => {
            format!("intersect({})", sorted_child_keys(children))
        }
    }
}

fn sorted_child_keys(children: &[CarrierExpr]) -> String {
    let mut keys: Vec<String> = children.iter().map(carrier_key).collect();
    keys.sort();
    keys.join(",")
}

/// True iff any reachable atom is `Tagged`.
///
/// Members classified by type annotation (tagged) and members classified by
/// location (path) partition code on orthogonal axes; several binder rules
/// branch on which axis a carrier lives on.
pub fn has_tagged_atom(carrier: &CarrierExpr) -> bool {
    match carrier {
        CarrierExpr::Tagged { .. } => true,
        CarrierExpr::Path { .. } => false,
        CarrierExpr::Union { children } | CarrierExpr::Intersect { children } => {
            children.iter().any(has_tagged_atom)
        }
        CarrierExpr::Exclude { base, .. } => has_tagged_atom(base),
    }
}

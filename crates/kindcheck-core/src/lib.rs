//! # kindcheck-core
//!
//! Data model for the Kindcheck conformance checker: users declare
//! structural **Kinds** (typed templates for a module layout) and
//! **Instances** (concrete bindings of a Kind to a location); the binder
//! compiles those declarations into checkable **Contracts**.
//!
//! This crate holds the pure values everything else agrees on:
//!
//! ```text
//! CarrierExpr        ← algebra: what code does a symbol denote?
//!     │
//! Symbol             ← the Kind/Instance/Member tree built by the parser
//!     │
//! KindDef / views    ← raw structural facts from the scanner
//!     │
//! Contract           ← one checkable rule instance
//!     │
//! Diagnostic         ← one checker finding
//! ```
//!
//! No filesystem access, no resolution, no derivation — those live in
//! `kindcheck-bind` and `kindcheck-pipeline`.

pub mod carrier;
pub mod contract;
pub mod diagnostic;
pub mod paths;
pub mod symbol;
pub mod views;

pub use carrier::{CarrierExpr, carrier_key, has_tagged_atom};
pub use contract::{Contract, ContractType};
pub use diagnostic::{Diagnostic, diagnostic_code};
pub use symbol::{Symbol, SymbolKind};
pub use views::{
    ConstraintNode, InstanceDecl, KindDef, KindMember, MemberValue, ScanViews, ScopeKind,
    TaggedExport,
};

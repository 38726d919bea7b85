//! # kindcheck-bind
//!
//! The binder stage: the small compiler phase at the heart of Kindcheck.
//!
//! Given the symbol tree and the scan facts, the binder
//!
//! 1. resolves every symbol's carrier expression into a concrete file set
//!    (memoized by canonical carrier key), and
//! 2. walks constraint declarations plus structural facts — Kind
//!    hierarchy, member wiring, tagged exports — to emit the contract set,
//!    applying five derivation rules with cross-rule deduplication.
//!
//! Extensibility is the `ConstraintProvider` registry: new rule families
//! register a provider; the binder never changes.

pub mod binder;
pub mod fs;
pub mod provider;
pub mod providers;
pub mod resolver;

pub use binder::{BindInput, BindResult, Binder};
pub use fs::{FileProbe, MemoryFiles, OsFiles};
pub use provider::{
    ConstraintProvider, IntrinsicConstraint, ProviderOutput, ProviderRegistry,
    generate_from_string_list, generate_from_tuple_pairs,
};
pub use resolver::{CarrierResolver, ResolveError, ScanContext};

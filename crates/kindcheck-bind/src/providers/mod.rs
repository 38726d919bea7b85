//! Built-in constraint providers.
//!
//! One module per rule family. Each provider maps a dotted constraint name
//! to contract generation; rule *evaluation* belongs to the checker, not
//! here.

pub mod exhaustiveness;
pub mod mirrors;
pub mod must_implement;
pub mod no_cycles;
pub mod no_dependency;
pub mod purity;

pub use exhaustiveness::ExhaustivenessProvider;
pub use mirrors::MirrorsProvider;
pub use must_implement::MustImplementProvider;
pub use no_cycles::NoCyclesProvider;
pub use no_dependency::NoDependencyProvider;
pub use purity::PurityProvider;

//! # kindcheck-pipeline
//!
//! Orchestration of the four Kindcheck stages over one project:
//!
//! ```text
//! Scan    manifest → structural views (Kinds, instances, tagged exports)
//! Parse   views → immutable symbol tree
//! Bind    tree → resolved carriers + derived contract set
//! Check   contracts → diagnostics
//! ```
//!
//! Scan and Check are trait seams; the binder in between is fixed.

pub mod check;
pub mod parse;
pub mod pipeline;
pub mod scan;

pub use check::{CheckInput, CheckOutcome, Checker, StructuralChecker};
pub use parse::{ParseResult, parse};
pub use pipeline::{Pipeline, PipelineError, RunRecord};
pub use scan::{ManifestScanner, ScanError, ScanResult, Scanner};

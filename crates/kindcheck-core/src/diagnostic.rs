//! Diagnostics: what the checker reports back to the user.
//!
//! The checker itself lives behind a trait in `kindcheck-pipeline`; this is
//! the shared vocabulary at that boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable diagnostic codes, grouped by rule family.
pub mod diagnostic_code {
    pub const FORBIDDEN_DEPENDENCY: u32 = 9001;
    pub const MISSING_IMPLEMENTATION: u32 = 9002;
    pub const IMPURE_IMPORT: u32 = 9003;
    pub const CIRCULAR_DEPENDENCY: u32 = 9004;
    pub const SCOPE_MISMATCH: u32 = 9005;
    pub const OVERLAPPING_MEMBERS: u32 = 9006;
    pub const UNASSIGNED_CODE: u32 = 9007;
    pub const MIRROR_MISMATCH: u32 = 9008;
}

/// A single finding produced by evaluating one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub message: String,
    pub code: u32,
    /// Offending file, when the finding is tied to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Name of the contract that produced this finding.
    pub contract: String,
}

impl Diagnostic {
    pub fn structural(message: impl Into<String>, code: u32, contract: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            file: None,
            contract: contract.into(),
        }
    }

    pub fn at_file(
        message: impl Into<String>,
        code: u32,
        file: impl Into<String>,
        contract: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            code,
            file: Some(file.into()),
            contract: contract.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "KC{}: {} [{}]", self.code, self.message, file),
            None => write!(f, "KC{}: {}", self.code, self.message),
        }
    }
}

//! `exhaustive: true` — every file in the instance's container must belong
//! to some member.
//!
//! Generation is trivial (one contract per instance); the interesting part
//! is `is_excluded`, the default exclusion set the checker applies so that
//! declaration files and tests are never flagged as unassigned.

use crate::provider::{ConstraintProvider, ProviderOutput};
use kindcheck_core::contract::{Contract, ContractType};
use kindcheck_core::symbol::Symbol;
use kindcheck_core::views::ConstraintNode;
use regex::Regex;
use std::sync::{Arc, OnceLock};

pub struct ExhaustivenessProvider;

impl ConstraintProvider for ExhaustivenessProvider {
    fn constraint_name(&self) -> &'static str {
        "exhaustive"
    }

    fn generate(
        &self,
        value: &ConstraintNode,
        instance: &Arc<Symbol>,
        kind_name: &str,
        location: &str,
    ) -> Option<ProviderOutput> {
        let mut out = ProviderOutput::default();
        if !matches!(value, ConstraintNode::Bool) {
            out.errors
                .push(format!("exhaustive in Kind<{kind_name}> must be true (boolean)."));
            return Some(out);
        }

        out.contracts.push(Contract::new(
            ContractType::Exhaustiveness,
            format!("exhaustive:{}", instance.name),
            vec![instance.clone()],
            location,
        ));
        Some(out)
    }
}

fn test_file_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\.(test|spec)\.[a-z]+$").expect("pattern is valid"))
}

/// Files never reported as unassigned: architecture declaration files,
/// test files, and `__tests__` directories.
pub fn is_excluded(file: &str) -> bool {
    if file.ends_with("/context.ts") || file.ends_with("/context.tsx") {
        return true;
    }
    if file.contains("/__tests__/") {
        return true;
    }
    test_file_pattern().is_match(file)
}

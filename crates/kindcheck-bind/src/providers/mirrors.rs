//! `filesystem.mirrors: [[primary, related], ...]` — the related member
//! must mirror the primary's file layout (e.g. a test tree shadowing a
//! source tree). The dotted name demonstrates nested constraint objects.

use crate::provider::{ConstraintProvider, ProviderOutput, generate_from_tuple_pairs};
use kindcheck_core::contract::ContractType;
use kindcheck_core::symbol::Symbol;
use kindcheck_core::views::ConstraintNode;
use std::sync::Arc;

pub struct MirrorsProvider;

impl ConstraintProvider for MirrorsProvider {
    fn constraint_name(&self) -> &'static str {
        "filesystem.mirrors"
    }

    fn generate(
        &self,
        value: &ConstraintNode,
        instance: &Arc<Symbol>,
        kind_name: &str,
        location: &str,
    ) -> Option<ProviderOutput> {
        Some(generate_from_tuple_pairs(
            value,
            instance,
            kind_name,
            location,
            ContractType::Colocated,
            "filesystem.mirrors",
        ))
    }
}

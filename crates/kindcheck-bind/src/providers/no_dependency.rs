//! `noDependency: [[from, to], ...]` — forbidden dependency edges between
//! members.

use crate::provider::{ConstraintProvider, ProviderOutput, generate_from_tuple_pairs};
use kindcheck_core::contract::ContractType;
use kindcheck_core::symbol::Symbol;
use kindcheck_core::views::ConstraintNode;
use std::sync::Arc;

pub struct NoDependencyProvider;

impl ConstraintProvider for NoDependencyProvider {
    fn constraint_name(&self) -> &'static str {
        "noDependency"
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
            ContractType::NoDependency,
            "noDependency",
        ))
    }
}

//! `mustImplement: [[interface, implementation], ...]` — every port must
//! have its adapter.

use crate::provider::{ConstraintProvider, ProviderOutput, generate_from_tuple_pairs};
use kindcheck_core::contract::ContractType;
use kindcheck_core::symbol::Symbol;
use kindcheck_core::views::ConstraintNode;
use std::sync::Arc;

pub struct MustImplementProvider;

impl ConstraintProvider for MustImplementProvider {
    fn constraint_name(&self) -> &'static str {
        "mustImplement"
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
            ContractType::MustImplement,
            "mustImplement",
        ))
    }
}

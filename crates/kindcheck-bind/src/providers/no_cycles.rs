//! `noCycles: [members...]` — no dependency cycles among the listed
//! members.

use crate::provider::{ConstraintProvider, ProviderOutput, generate_from_string_list};
use kindcheck_core::contract::ContractType;
use kindcheck_core::symbol::Symbol;
use kindcheck_core::views::ConstraintNode;
use std::sync::Arc;

pub struct NoCyclesProvider;

impl ConstraintProvider for NoCyclesProvider {
    fn constraint_name(&self) -> &'static str {
        "noCycles"
    }

    fn generate(
        &self,
        value: &ConstraintNode,
        instance: &Arc<Symbol>,
        kind_name: &str,
        location: &str,
    ) -> Option<ProviderOutput> {
        Some(generate_from_string_list(
            value,
            instance,
            kind_name,
            location,
            ContractType::NoCycles,
            "noCycles",
        ))
    }
}

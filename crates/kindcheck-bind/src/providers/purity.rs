//! `pure: true` — the intrinsic purity constraint.
//!
//! Purity is never declared by the parent Kind. A member Kind declares
//! `pure: true` on itself, and the binder propagates one `Purity` contract
//! to every member symbol of that type. The provider therefore has no
//! explicit generator: only a detect/propagate pair.

use crate::provider::{ConstraintProvider, IntrinsicConstraint, ProviderOutput};
use kindcheck_core::contract::{Contract, ContractType};
use kindcheck_core::symbol::Symbol;
use kindcheck_core::views::ConstraintNode;
use std::sync::Arc;

pub struct PurityProvider;

impl ConstraintProvider for PurityProvider {
    fn constraint_name(&self) -> &'static str {
        "pure"
    }

    fn intrinsic(&self) -> Option<&dyn IntrinsicConstraint> {
        Some(self)
    }
}

impl IntrinsicConstraint for PurityProvider {
    fn detect(&self, constraints: &ConstraintNode) -> bool {
        matches!(constraints.property("pure"), Some(ConstraintNode::Bool))
    }

    fn propagate(&self, member: &Arc<Symbol>, member_name: &str, location: &str) -> Contract {
        Contract::new(
            ContractType::Purity,
            format!("purity({member_name})"),
            vec![member.clone()],
            location,
        )
    }
}

//! Constraint providers: the binder's only extensibility seam.
//!
//! A provider owns one dotted constraint name (`"noDependency"`,
//! `"filesystem.mirrors"`, …) and knows how to turn the declared literal
//! into contracts. Two capabilities, both optional:
//!
//! - `generate` — called during the explicit constraint walk with the
//!   declared value and the instance it was declared for.
//! - `intrinsic` — a detect/propagate pair for constraints that are never
//!   declared by the parent Kind but flow automatically from a member
//!   Kind's own definition (purity is the canonical case).
//!
//! New rule families register a new provider; the binder itself never
//! learns about individual rules.

use kindcheck_core::contract::{Contract, ContractType};
use kindcheck_core::symbol::Symbol;
use kindcheck_core::views::ConstraintNode;
use std::collections::BTreeMap;
use std::sync::Arc;

/// What a `generate` call produced: contracts plus soft errors, both
/// appended verbatim to the binder's output.
#[derive(Debug, Default)]
pub struct ProviderOutput {
    pub contracts: Vec<Contract>,
    pub errors: Vec<String>,
}

/// Detect/propagate pair for intrinsic constraints.
pub trait IntrinsicConstraint {
    /// Does this Kind's constraint literal carry the intrinsic marker?
    fn detect(&self, constraints: &ConstraintNode) -> bool;

    /// Synthesize the single contract for one member symbol.
    fn propagate(&self, member: &Arc<Symbol>, member_name: &str, location: &str) -> Contract;
}

/// A pluggable contract-generating strategy for one constraint name.
pub trait ConstraintProvider {
    /// The dotted name this provider answers to.
    fn constraint_name(&self) -> &'static str;

    /// Generate contracts from an explicitly declared constraint value.
    ///
    /// Returning `None` means this provider has no explicit generator; the
    /// constraint walk skips it silently (intrinsic-only providers are
    /// handled by propagation instead).
    fn generate(
        &self,
        value: &ConstraintNode,
        instance: &Arc<Symbol>,
        kind_name: &str,
        location: &str,
    ) -> Option<ProviderOutput> {
        let _ = (value, instance, kind_name, location);
        None
    }

    /// The intrinsic half, when this provider has one.
    fn intrinsic(&self) -> Option<&dyn IntrinsicConstraint> {
        None
    }
}

/// Name-keyed provider lookup, built once at startup.
pub struct ProviderRegistry {
    by_name: BTreeMap<&'static str, Arc<dyn ConstraintProvider>>,
}

impl ProviderRegistry {
    pub fn new(providers: Vec<Arc<dyn ConstraintProvider>>) -> Self {
        let by_name = providers
            .into_iter()
            .map(|p| (p.constraint_name(), p))
            .collect();
        Self { by_name }
    }

    /// The built-in provider set.
    pub fn builtin() -> Self {
        Self::new(vec![
            Arc::new(crate::providers::no_dependency::NoDependencyProvider),
            Arc::new(crate::providers::no_cycles::NoCyclesProvider),
            Arc::new(crate::providers::purity::PurityProvider),
            Arc::new(crate::providers::exhaustiveness::ExhaustivenessProvider),
            Arc::new(crate::providers::must_implement::MustImplementProvider),
            Arc::new(crate::providers::mirrors::MirrorsProvider),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ConstraintProvider>> {
        self.by_name.get(name)
    }

    /// Providers that carry an intrinsic half, in name order.
    pub fn intrinsic_providers(&self) -> impl Iterator<Item = &Arc<dyn ConstraintProvider>> {
        self.by_name.values().filter(|p| p.intrinsic().is_some())
    }
}

/// Shared generator for tuple-pairs constraints. Each pair is resolved to
/// two members of the instance; unresolved names become soft errors and
/// the pair is skipped.
pub fn generate_from_tuple_pairs(
    value: &ConstraintNode,
    instance: &Arc<Symbol>,
    kind_name: &str,
    location: &str,
    contract_type: ContractType,
    constraint_name: &str,
) -> ProviderOutput {
    let mut out = ProviderOutput::default();
    let ConstraintNode::TuplePairs { values } = value else {
        out.errors.push(format!(
            "{constraint_name} in Kind<{kind_name}> must be a list of member pairs."
        ));
        return out;
    };

    for (first_name, second_name) in values {
        let Some(first) = instance.find_by_path(first_name) else {
            out.errors.push(member_not_found(kind_name, first_name, instance));
            continue;
        };
        let Some(second) = instance.find_by_path(second_name) else {
            out.errors.push(member_not_found(kind_name, second_name, instance));
            continue;
        };
        out.contracts.push(Contract::new(
            contract_type,
            format!("{constraint_name}({first_name} -> {second_name})"),
            vec![first.clone(), second.clone()],
            location,
        ));
    }
    out
}

/// Shared generator for string-list constraints. All resolved members feed
/// one contract; unresolved names become soft errors.
pub fn generate_from_string_list(
    value: &ConstraintNode,
    instance: &Arc<Symbol>,
    kind_name: &str,
    location: &str,
    contract_type: ContractType,
    constraint_name: &str,
) -> ProviderOutput {
    let mut out = ProviderOutput::default();
    let ConstraintNode::StringList { values } = value else {
        out.errors.push(format!(
            "{constraint_name} in Kind<{kind_name}> must be a list of member names."
        ));
        return out;
    };

    let mut args = Vec::new();
    for member_name in values {
        match instance.find_by_path(member_name) {
            Some(symbol) => args.push(symbol.clone()),
            None => out.errors.push(member_not_found(kind_name, member_name, instance)),
        }
    }

    if !args.is_empty() {
        let arg_names: Vec<&str> = args.iter().map(|s| s.name.as_str()).collect();
        out.contracts.push(Contract::new(
            contract_type,
            format!("{constraint_name}({})", arg_names.join(", ")),
            args,
            location,
        ));
    }
    out
}

fn member_not_found(kind_name: &str, member_name: &str, instance: &Arc<Symbol>) -> String {
    format!(
        "Kind<{kind_name}>: member '{member_name}' not found in instance '{}'.",
        instance.name
    )
}

//! The check stage boundary.
//!
//! Contract enforcement needs a host-language analyzer (import graphs,
//! call graphs); the pipeline only defines the seam and ships a checker
//! that verifies contract well-formedness and counts the work a real
//! enforcement backend would do.

use kindcheck_bind::BindResult;
use kindcheck_core::contract::Contract;
use kindcheck_core::diagnostic::{Diagnostic, diagnostic_code};
use kindcheck_core::symbol::Symbol;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Everything the checker may consult.
#[derive(Debug, Clone, Copy)]
pub struct CheckInput<'a> {
    pub contracts: &'a [Contract],
    pub symbols: &'a [Arc<Symbol>],
    pub bind: &'a BindResult,
}

#[derive(Debug, Clone, Default)]
pub struct CheckOutcome {
    pub diagnostics: Vec<Diagnostic>,
    pub contracts_checked: usize,
    pub files_analyzed: usize,
}

pub trait Checker {
    fn check(&self, input: &CheckInput<'_>) -> CheckOutcome;
}

/// The built-in checker: validates contract shape, enforces nothing.
///
/// Malformed contracts (wrong arity for their type) become structural
/// diagnostics; everything else passes. Real enforcement plugs in behind
/// the `Checker` trait.
#[derive(Debug, Default)]
pub struct StructuralChecker;

impl Checker for StructuralChecker {
    fn check(&self, input: &CheckInput<'_>) -> CheckOutcome {
        let mut diagnostics = Vec::new();
        for contract in input.contracts {
            if let Some(message) = contract.validate() {
                diagnostics.push(Diagnostic::structural(
                    message,
                    diagnostic_code::UNASSIGNED_CODE,
                    contract.name.clone(),
                ));
            }
        }

        let files: BTreeSet<&str> = input
            .bind
            .resolved_files
            .values()
            .flatten()
            .map(String::as_str)
            .collect();

        CheckOutcome {
            diagnostics,
            contracts_checked: input.contracts.len(),
            files_analyzed: files.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindcheck_core::carrier::CarrierExpr;
    use kindcheck_core::contract::ContractType;
    use kindcheck_core::symbol::SymbolKind;

    fn member(name: &str, path: &str) -> Arc<Symbol> {
        Arc::new(Symbol::leaf(
            name,
            SymbolKind::Member,
            Some(CarrierExpr::path(path)),
        ))
    }

    #[test]
    fn well_formed_contracts_produce_no_diagnostics() {
        let contracts = vec![Contract::new(
            ContractType::NoDependency,
            "noDependency(a -> b)",
            vec![member("a", "/src/a"), member("b", "/src/b")],
            "type:Ctx",
        )];
        let bind = BindResult::default();
        let outcome = StructuralChecker.check(&CheckInput {
            contracts: &contracts,
            symbols: &[],
            bind: &bind,
        });
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.contracts_checked, 1);
    }

    #[test]
    fn arity_violations_become_structural_diagnostics() {
        // NoDependency needs two args.
        let contracts = vec![Contract::new(
            ContractType::NoDependency,
            "noDependency(a)",
            vec![member("a", "/src/a")],
            "type:Ctx",
        )];
        let bind = BindResult::default();
        let outcome = StructuralChecker.check(&CheckInput {
            contracts: &contracts,
            symbols: &[],
            bind: &bind,
        });
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].contract, "noDependency(a)");
    }
}

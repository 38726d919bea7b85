//! Contracts: single checkable rule instances.
//!
//! The binder compiles Kind declarations into contracts; the checker
//! evaluates them. A contract is a value object — its identity is
//! `(type, name, args)`, never a reference.

use crate::carrier::carrier_key;
use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;

/// The rule family a contract instantiates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContractType {
    /// `args[0]` must not depend on `args[1]`.
    NoDependency,
    /// `args[0]` (interface) must be implemented by `args[1]`.
    MustImplement,
    /// `args[0]` must not import effectful modules.
    Purity,
    /// No dependency cycles among `args`.
    NoCycles,
    /// `args[0]`'s location must match its Kind's declared scope.
    Scope,
    /// `args[0]` and `args[1]` must not share files.
    Overlap,
    /// Every file under `args[0]` must belong to some member.
    Exhaustiveness,
    /// `args[0]`'s file layout must be mirrored by `args[1]`.
    Colocated,
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoDependency => "noDependency",
            Self::MustImplement => "mustImplement",
            Self::Purity => "purity",
            Self::NoCycles => "noCycles",
            Self::Scope => "scope",
            Self::Overlap => "overlap",
            Self::Exhaustiveness => "exhaustiveness",
            Self::Colocated => "colocated",
        };
        write!(f, "{name}")
    }
}

/// A single checkable rule instance.
#[derive(Debug, Clone)]
pub struct Contract {
    pub contract_type: ContractType,
    /// Human-readable identifier encoding the rule instance,
    /// e.g. `"overlap:domain/infra"`.
    pub name: String,
    /// The symbols the rule applies to; interpretation depends on the type.
    pub args: Vec<Arc<Symbol>>,
    /// Provenance, e.g. `"type:Ctx"` or `"instance:app"`.
    pub location: String,
}

impl Contract {
    pub fn new(
        contract_type: ContractType,
        name: impl Into<String>,
        args: Vec<Arc<Symbol>>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            contract_type,
            name: name.into(),
            args,
            location: location.into(),
        }
    }

    /// Check argument arity for this contract's type.
    ///
    /// Returns `None` when valid, otherwise the reason.
    pub fn validate(&self) -> Option<String> {
        let got = self.args.len();
        match self.contract_type {
            ContractType::NoDependency if got != 2 => Some(format!(
                "noDependency requires exactly 2 arguments (from, to), got {got}"
            )),
            ContractType::MustImplement if got != 2 => Some(format!(
                "mustImplement requires exactly 2 arguments (interface, implementation), got {got}"
            )),
            ContractType::Purity if got != 1 => {
                Some(format!("purity requires exactly 1 argument (symbol), got {got}"))
            }
            ContractType::NoCycles if got < 1 => {
                Some(format!("noCycles requires at least 1 argument, got {got}"))
            }
            ContractType::Scope if got != 1 => Some(format!(
                "scope requires exactly 1 argument (instance symbol), got {got}"
            )),
            ContractType::Overlap if got != 2 => {
                Some(format!("overlap requires exactly 2 arguments, got {got}"))
            }
            ContractType::Exhaustiveness if got != 1 => Some(format!(
                "exhaustiveness requires exactly 1 argument (instance symbol), got {got}"
            )),
            ContractType::Colocated if got != 2 => Some(format!(
                "colocated requires exactly 2 arguments (primary, related), got {got}"
            )),
            _ => None,
        }
    }

    /// Value equality: same type, same name, same arg names in order.
    pub fn same_as(&self, other: &Contract) -> bool {
        self.contract_type == other.contract_type
            && self.name == other.name
            && self.args.len() == other.args.len()
            && self
                .args
                .iter()
                .zip(&other.args)
                .all(|(a, b)| a.name == b.name)
    }

    /// JSON summary for reports. Args are reduced to name + carrier key;
    /// the full symbol tree is not serialized.
    pub fn to_json(&self) -> Value {
        json!({
            "type": self.contract_type.to_string(),
            "name": self.name,
            "args": self
                .args
                .iter()
                .map(|a| {
                    json!({
                        "symbol": a.name,
                        "carrierKey": a.carrier.as_ref().map(carrier_key),
                    })
                })
                .collect::<Vec<_>>(),
            "location": self.location,
        })
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.args.iter().map(|a| a.name.as_str()).collect();
        write!(f, "{}({})", self.contract_type, names.join(", "))
    }
}

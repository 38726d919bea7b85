//! The binder: carrier resolution plus contract derivation.
//!
//! `Binder::execute` is a pure function of the symbol tree and the scan
//! facts, run to completion in one call. It makes two resolution passes
//! and five derivation passes, all appending into one contract list and
//! one soft-error list — a failure in one constraint never blocks the
//! others.
//!
//! ```text
//! Pass A    carrier resolution (memoized by carrier_key)
//! Pass A'   container resolution (instance roots → total owned files)
//! Pass B    declaration ownership for annotation-typed members
//! D1        explicit constraint walk (provider registry)
//! D2        intrinsic propagation from member Kinds
//! D3        scope contracts
//! D4        overlap contracts (skipping cross-axis pairs)
//! D5        wrapped-Kind synthesis (skipping Kinds D2 already covers)
//! ```
//!
//! D5 must run after D2's coverage is known: a wrapped Kind that is
//! reachable through an *instantiated* parent Kind is already handled by
//! propagation, and synthesizing for it again would double-report.

use crate::provider::ProviderRegistry;
use crate::resolver::{CarrierResolver, ResolveError, ScanContext};
use kindcheck_core::carrier::{CarrierExpr, carrier_key, has_tagged_atom};
use kindcheck_core::contract::{Contract, ContractType};
use kindcheck_core::symbol::{Symbol, SymbolKind};
use kindcheck_core::views::{ConstraintNode, KindDef, TaggedExport};
use serde_json::{Value, json};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Everything the binder consumes, produced by the parser and scanner.
#[derive(Debug, Clone, Copy)]
pub struct BindInput<'a> {
    /// Top-level symbols (instances plus Kind-definition symbols).
    pub symbols: &'a [Arc<Symbol>],
    /// Kind definitions by type name.
    pub kind_defs: &'a BTreeMap<String, KindDef>,
    /// Instances indexed by Kind type name.
    pub instance_symbols: &'a BTreeMap<String, Vec<Arc<Symbol>>>,
    /// Every tagged export in the project.
    pub tagged_exports: &'a [TaggedExport],
}

/// The binder's output: contracts plus the resolution maps downstream
/// stages read instead of mutated tree nodes.
#[derive(Debug, Default)]
pub struct BindResult {
    pub contracts: Vec<Contract>,
    /// Resolved file sets by carrier key.
    pub resolved_files: BTreeMap<String, Vec<String>>,
    /// Total owned file set per instance root, by carrier key.
    pub container_files: BTreeMap<String, Vec<String>>,
    /// Declarations owned per carrier key: file → export names.
    pub declarations: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
    /// Soft binding errors, advisory and unordered relative to contracts.
    pub errors: Vec<String>,
}

impl BindResult {
    /// Files a symbol's carrier resolved to; empty when unresolvable.
    pub fn files_for(&self, symbol: &Symbol) -> &[String] {
        symbol
            .carrier
            .as_ref()
            .and_then(|c| self.resolved_files.get(&carrier_key(c)))
            .map_or(&[], Vec::as_slice)
    }

    /// Declarations a symbol's carrier owns, as file → export names.
    pub fn declarations_for(&self, symbol: &Symbol) -> Option<&BTreeMap<String, BTreeSet<String>>> {
        let carrier = symbol.carrier.as_ref()?;
        self.declarations.get(&carrier_key(carrier))
    }

    /// Inverse ownership view for per-declaration checks:
    /// file → export name → owning carrier key.
    pub fn declaration_ownership(&self) -> BTreeMap<String, BTreeMap<String, String>> {
        let mut ownership: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for (owner_key, by_file) in &self.declarations {
            for (file, exports) in by_file {
                let file_map = ownership.entry(file.clone()).or_default();
                for export in exports {
                    file_map.insert(export.clone(), owner_key.clone());
                }
            }
        }
        ownership
    }

    /// JSON summary for reports.
    pub fn to_json(&self) -> Value {
        json!({
            "contracts": self.contracts.iter().map(Contract::to_json).collect::<Vec<_>>(),
            "resolvedCarriers": self.resolved_files.len(),
            "errors": self.errors,
        })
    }
}

/// Orchestrates resolution and derivation over one symbol tree.
pub struct Binder<'a> {
    registry: &'a ProviderRegistry,
    resolver: CarrierResolver<'a>,
}

impl<'a> Binder<'a> {
    pub fn new(registry: &'a ProviderRegistry, resolver: CarrierResolver<'a>) -> Self {
        Self { registry, resolver }
    }

    /// Run both resolution passes and all five derivations.
    ///
    /// The only fatal error is a resolution precondition violation
    /// (`Tagged` with no scan context); everything else accumulates in
    /// `BindResult::errors`.
    pub fn execute(&self, input: &BindInput<'_>) -> Result<BindResult, ResolveError> {
        let ctx = ScanContext::new(input.tagged_exports);
        let mut result = BindResult::default();

        self.resolve_carriers(input, &ctx, &mut result)?;
        self.resolve_containers(input, &ctx, &mut result)?;
        self.build_declaration_ownership(input, &ctx, &mut result)?;

        self.derive_constraints_and_intrinsics(input, &mut result);
        self.derive_scope_contracts(input, &mut result);
        self.derive_overlap_contracts(input, &mut result);
        self.derive_wrapped_kind_contracts(input, &mut result);

        Ok(result)
    }

    /// Pass A: resolve every carrier in the tree exactly once per
    /// carrier key. A single-file carrier bound to one named export also
    /// records a declarations entry, distinguishing "this declaration"
    /// from "this whole file".
    fn resolve_carriers(
        &self,
        input: &BindInput<'_>,
        ctx: &ScanContext<'_>,
        result: &mut BindResult,
    ) -> Result<(), ResolveError> {
        for root in input.symbols {
            let mut nodes: Vec<&Arc<Symbol>> = vec![root];
            nodes.extend(root.descendants());

            for symbol in nodes {
                let Some(carrier) = &symbol.carrier else {
                    continue;
                };
                let key = carrier_key(carrier);
                if !result.resolved_files.contains_key(&key) {
                    let files = self.resolver.resolve(carrier, Some(ctx))?;
                    result.resolved_files.insert(key.clone(), files);
                }

                if let (Some(export), CarrierExpr::Path { path }) = (&symbol.export_name, carrier) {
                    result
                        .declarations
                        .entry(key)
                        .or_default()
                        .entry(path.clone())
                        .or_default()
                        .insert(export.clone());
                }
            }
        }
        Ok(())
    }

    /// Pass A': resolve instance roots to their total owned file set.
    /// The exhaustiveness check compares this against member files.
    fn resolve_containers(
        &self,
        input: &BindInput<'_>,
        ctx: &ScanContext<'_>,
        result: &mut BindResult,
    ) -> Result<(), ResolveError> {
        for symbol in input.symbols {
            if symbol.kind != SymbolKind::Instance {
                continue;
            }
            let Some(carrier) = &symbol.carrier else {
                continue;
            };
            let key = carrier_key(carrier);
            if result.container_files.contains_key(&key) {
                continue;
            }
            let files = self.resolver.resolve(carrier, Some(ctx))?;
            if !files.is_empty() {
                result.container_files.insert(key, files);
            }
        }
        Ok(())
    }

    /// Pass B: per-declaration ownership for annotation-typed members.
    ///
    /// One file may hold declarations belonging to different typed
    /// members; per-declaration dependency checks need to know which
    /// export belongs to whom, not just which file.
    fn build_declaration_ownership(
        &self,
        input: &BindInput<'_>,
        ctx: &ScanContext<'_>,
        result: &mut BindResult,
    ) -> Result<(), ResolveError> {
        for instance in input.symbols {
            if instance.kind != SymbolKind::Instance {
                continue;
            }
            if !matches!(instance.carrier, Some(CarrierExpr::Path { .. })) {
                continue;
            }

            for member in instance.members() {
                let Some(carrier) = &member.carrier else {
                    continue;
                };
                if !has_tagged_atom(carrier) {
                    continue;
                }
                let member_key = carrier_key(carrier);
                let member_files: BTreeSet<&str> = match result.resolved_files.get(&member_key) {
                    Some(files) => files.iter().map(String::as_str).collect(),
                    None => continue,
                };

                for export in input.tagged_exports {
                    if !member_files.contains(export.source_file.as_str()) {
                        continue;
                    }
                    if member.kind_type_name.as_deref() != Some(export.kind_type_name.as_str()) {
                        continue;
                    }
                    result
                        .declarations
                        .entry(member_key.clone())
                        .or_default()
                        .entry(export.source_file.clone())
                        .or_default()
                        .insert(export.export_name.clone());
                }
            }
        }
        Ok(())
    }

    /// D1 + D2: the explicit constraint walk and intrinsic propagation,
    /// per Kind, per instance.
    fn derive_constraints_and_intrinsics(&self, input: &BindInput<'_>, result: &mut BindResult) {
        for (kind_name, kind_def) in input.kind_defs {
            let Some(instances) = input.instance_symbols.get(kind_name) else {
                continue;
            };
            let location = format!("type:{kind_name}");

            for instance in instances {
                if let Some(constraints) = &kind_def.constraints {
                    self.walk_constraints(
                        constraints,
                        instance,
                        kind_name,
                        &location,
                        "",
                        result,
                    );
                }

                for member in &kind_def.members {
                    let Some(type_name) = &member.type_name else {
                        continue;
                    };
                    let Some(member_constraints) = input
                        .kind_defs
                        .get(type_name)
                        .and_then(|def| def.constraints.as_ref())
                    else {
                        continue;
                    };

                    for provider in self.registry.intrinsic_providers() {
                        let Some(intrinsic) = provider.intrinsic() else {
                            continue;
                        };
                        if !intrinsic.detect(member_constraints) {
                            continue;
                        }
                        let Some(member_symbol) = instance.find_by_path(&member.name) else {
                            continue;
                        };

                        let contract = intrinsic.propagate(member_symbol, &member.name, &location);
                        // The same member Kind may be reached from several
                        // instances; one contract per member symbol.
                        let duplicate = result.contracts.iter().any(|c| {
                            c.contract_type == contract.contract_type
                                && c.args.len() == 1
                                && Arc::ptr_eq(&c.args[0], member_symbol)
                        });
                        if !duplicate {
                            result.contracts.push(contract);
                        }
                    }
                }
            }
        }
    }

    /// Walk a constraint literal, building dotted names through object
    /// nodes and dispatching leaves to the provider registry.
    fn walk_constraints(
        &self,
        node: &ConstraintNode,
        instance: &Arc<Symbol>,
        kind_name: &str,
        location: &str,
        name_prefix: &str,
        result: &mut BindResult,
    ) {
        let ConstraintNode::Object { properties } = node else {
            return;
        };

        for (name, value) in properties {
            let full_name = if name_prefix.is_empty() {
                name.clone()
            } else {
                format!("{name_prefix}.{name}")
            };

            if matches!(value, ConstraintNode::Object { .. }) {
                self.walk_constraints(value, instance, kind_name, location, &full_name, result);
                continue;
            }

            let Some(provider) = self.registry.get(&full_name) else {
                result
                    .errors
                    .push(format!("Unknown constraint '{full_name}' in Kind<{kind_name}>."));
                continue;
            };

            // Intrinsic-only providers generate nothing here; D2 owns them.
            if let Some(out) = provider.generate(value, instance, kind_name, location) {
                result.contracts.extend(out.contracts);
                result.errors.extend(out.errors);
            }
        }
    }

    /// D3: one `Scope` contract per instance of a scope-declaring Kind.
    /// Purely an assertion for the checker; resolution is unaffected.
    fn derive_scope_contracts(&self, input: &BindInput<'_>, result: &mut BindResult) {
        for (kind_name, kind_def) in input.kind_defs {
            let Some(scope) = kind_def.scope else {
                continue;
            };
            let Some(instances) = input.instance_symbols.get(kind_name) else {
                continue;
            };
            for instance in instances {
                result.contracts.push(Contract::new(
                    ContractType::Scope,
                    format!("scope:{scope}({})", instance.name),
                    vec![instance.clone()],
                    format!("type:{kind_name}"),
                ));
            }
        }
    }

    /// D4: one `Overlap` contract per unordered pair of direct members —
    /// except pairs that classify on orthogonal axes. A location member
    /// and an annotation member sharing files is composition, not a
    /// violation.
    fn derive_overlap_contracts(&self, input: &BindInput<'_>, result: &mut BindResult) {
        for instances in input.instance_symbols.values() {
            for instance in instances {
                let members: Vec<&Arc<Symbol>> = instance.members().collect();
                for i in 0..members.len() {
                    for j in (i + 1)..members.len() {
                        let (Some(ci), Some(cj)) = (&members[i].carrier, &members[j].carrier)
                        else {
                            continue;
                        };
                        if has_tagged_atom(ci) != has_tagged_atom(cj) {
                            continue;
                        }
                        result.contracts.push(Contract::new(
                            ContractType::Overlap,
                            format!("overlap:{}/{}", members[i].name, members[j].name),
                            vec![members[i].clone(), members[j].clone()],
                            format!("instance:{}", instance.name),
                        ));
                    }
                }
            }
        }
    }

    /// D5: standalone wrapped Kinds. For each wrapped Kind with its own
    /// constraints that D2 does not already cover, synthesize a per-file
    /// member symbol for every file holding a matching tagged export and
    /// run the intrinsic providers against it.
    fn derive_wrapped_kind_contracts(&self, input: &BindInput<'_>, result: &mut BindResult) {
        // Wrapped Kinds reachable through an instantiated parent: D2 has
        // already propagated for these. An uninstantiated parent never
        // runs D2, so its wrapped members stay eligible here.
        let mut covered: BTreeSet<&str> = BTreeSet::new();
        for (parent_name, parent_def) in input.kind_defs {
            let instantiated = input
                .instance_symbols
                .get(parent_name)
                .is_some_and(|v| !v.is_empty());
            if !instantiated {
                continue;
            }
            for member in &parent_def.members {
                let Some(type_name) = &member.type_name else {
                    continue;
                };
                let Some(member_def) = input.kind_defs.get(type_name) else {
                    continue;
                };
                if member_def.wraps_type_name.is_some() && member_def.constraints.is_some() {
                    covered.insert(type_name);
                }
            }
        }

        for (kind_name, kind_def) in input.kind_defs {
            if kind_def.wraps_type_name.is_none() {
                continue;
            }
            let Some(constraints) = &kind_def.constraints else {
                continue;
            };
            if covered.contains(kind_name.as_str()) {
                continue;
            }

            let files: BTreeSet<&str> = input
                .tagged_exports
                .iter()
                .filter(|e| e.kind_type_name == *kind_name)
                .map(|e| e.source_file.as_str())
                .collect();

            for file in files {
                // Register the file so the checker can look it up like any
                // resolved carrier.
                result
                    .resolved_files
                    .entry(file.to_string())
                    .or_insert_with(|| vec![file.to_string()]);

                let synthetic = Arc::new(Symbol {
                    name: kind_name.clone(),
                    kind: SymbolKind::Member,
                    carrier: Some(CarrierExpr::path(file)),
                    kind_type_name: Some(kind_name.clone()),
                    export_name: None,
                    members: BTreeMap::new(),
                });

                for provider in self.registry.intrinsic_providers() {
                    let Some(intrinsic) = provider.intrinsic() else {
                        continue;
                    };
                    if !intrinsic.detect(constraints) {
                        continue;
                    }
                    let contract =
                        intrinsic.propagate(&synthetic, kind_name, &format!("kind:{kind_name}"));
                    // Keyed dedup makes this derivation idempotent while
                    // still emitting one contract per tagged file.
                    let duplicate = result.contracts.iter().any(|c| {
                        c.contract_type == contract.contract_type
                            && c.args.len() == 1
                            && c.args[0].carrier.as_ref().map(carrier_key).as_deref() == Some(file)
                            && c.name == contract.name
                    });
                    if !duplicate {
                        result.contracts.push(contract);
                    }
                }
            }
        }
    }
}

//! Integration tests: the binder's derivation rules over hand-built
//! symbol trees.
//!
//! Trees are constructed the way the parser would build them; the
//! assertions pin down the derived contract set, the dedup rules, and the
//! ordering dependency between intrinsic propagation and wrapped-Kind
//! synthesis.

use kindcheck_bind::{
    BindInput, BindResult, Binder, CarrierResolver, FileProbe, MemoryFiles, ProviderRegistry,
};
use kindcheck_core::carrier::CarrierExpr;
use kindcheck_core::contract::ContractType;
use kindcheck_core::symbol::{Symbol, SymbolKind};
use kindcheck_core::views::{ConstraintNode, KindDef, KindMember, ScopeKind, TaggedExport};
use std::cell::Cell;
use std::collections::BTreeMap;
use std::sync::Arc;

fn kind_def(type_name: &str) -> KindDef {
    KindDef {
        type_name: type_name.to_string(),
        kind_name_literal: type_name.to_lowercase(),
        members: vec![],
        constraints: None,
        scope: None,
        wraps_type_name: None,
    }
}

fn kind_member(name: &str, type_name: &str) -> KindMember {
    KindMember {
        name: name.to_string(),
        type_name: Some(type_name.to_string()),
        location: None,
    }
}

fn path_member(name: &str, path: &str, type_name: &str) -> Arc<Symbol> {
    Arc::new(Symbol {
        name: name.to_string(),
        kind: SymbolKind::Member,
        carrier: Some(CarrierExpr::path(path)),
        kind_type_name: Some(type_name.to_string()),
        export_name: None,
        members: BTreeMap::new(),
    })
}

fn tagged_member(name: &str, tag: &str, scope: &str) -> Arc<Symbol> {
    Arc::new(Symbol {
        name: name.to_string(),
        kind: SymbolKind::Member,
        carrier: Some(CarrierExpr::scoped_tagged(tag, scope)),
        kind_type_name: Some(tag.to_string()),
        export_name: None,
        members: BTreeMap::new(),
    })
}

fn instance(name: &str, kind_type: &str, root: &str, members: Vec<Arc<Symbol>>) -> Arc<Symbol> {
    let members = members.into_iter().map(|m| (m.name.clone(), m)).collect();
    Arc::new(Symbol {
        name: name.to_string(),
        kind: SymbolKind::Instance,
        carrier: Some(CarrierExpr::path(root)),
        kind_type_name: Some(kind_type.to_string()),
        export_name: None,
        members,
    })
}

fn export(file: &str, kind: &str, name: &str) -> TaggedExport {
    TaggedExport {
        source_file: file.to_string(),
        kind_type_name: kind.to_string(),
        export_name: name.to_string(),
    }
}

struct Project {
    symbols: Vec<Arc<Symbol>>,
    kind_defs: BTreeMap<String, KindDef>,
    instance_symbols: BTreeMap<String, Vec<Arc<Symbol>>>,
    tagged_exports: Vec<TaggedExport>,
}

impl Project {
    fn new(kind_defs: Vec<KindDef>, instances: Vec<Arc<Symbol>>) -> Self {
        let mut instance_symbols: BTreeMap<String, Vec<Arc<Symbol>>> = BTreeMap::new();
        for inst in &instances {
            let kind = inst.kind_type_name.clone().expect("instance has a kind type");
            instance_symbols.entry(kind).or_default().push(inst.clone());
        }
        Self {
            symbols: instances,
            kind_defs: kind_defs
                .into_iter()
                .map(|d| (d.type_name.clone(), d))
                .collect(),
            instance_symbols,
            tagged_exports: vec![],
        }
    }

    fn with_exports(mut self, exports: Vec<TaggedExport>) -> Self {
        self.tagged_exports = exports;
        self
    }

    fn bind_with(&self, probe: &dyn FileProbe) -> BindResult {
        let registry = ProviderRegistry::builtin();
        let binder = Binder::new(&registry, CarrierResolver::new(probe));
        binder
            .execute(&BindInput {
                symbols: &self.symbols,
                kind_defs: &self.kind_defs,
                instance_symbols: &self.instance_symbols,
                tagged_exports: &self.tagged_exports,
            })
            .expect("binder run should succeed")
    }

    fn bind(&self) -> BindResult {
        self.bind_with(&MemoryFiles::default())
    }
}

fn contracts_of(result: &BindResult, contract_type: ContractType) -> Vec<String> {
    result
        .contracts
        .iter()
        .filter(|c| c.contract_type == contract_type)
        .map(|c| c.name.clone())
        .collect()
}

#[test]
fn no_dependency_kind_yields_one_dependency_and_one_overlap_contract() {
    let mut ctx = kind_def("Ctx");
    ctx.members = vec![
        kind_member("domain", "DomainLayer"),
        kind_member("infra", "InfraLayer"),
    ];
    ctx.constraints = Some(ConstraintNode::object(vec![(
        "noDependency",
        ConstraintNode::TuplePairs {
            values: vec![("domain".into(), "infra".into())],
        },
    )]));

    let app = instance(
        "app",
        "Ctx",
        "/src",
        vec![
            path_member("domain", "/src/domain", "DomainLayer"),
            path_member("infra", "/src/infra", "InfraLayer"),
        ],
    );
    let project = Project::new(
        vec![ctx, kind_def("DomainLayer"), kind_def("InfraLayer")],
        vec![app],
    );

    let result = project.bind();
    assert_eq!(result.contracts.len(), 2, "{:?}", result.contracts);
    assert_eq!(
        contracts_of(&result, ContractType::NoDependency),
        vec!["noDependency(domain -> infra)"]
    );
    assert_eq!(
        contracts_of(&result, ContractType::Overlap),
        vec!["overlap:domain/infra"]
    );
    assert!(result.errors.is_empty());
}

#[test]
fn intrinsic_purity_needs_no_declaration_on_the_parent() {
    let mut ctx = kind_def("Ctx");
    ctx.members = vec![kind_member("decider", "DeciderKind")];
    let mut decider = kind_def("DeciderKind");
    decider.constraints = Some(ConstraintNode::object(vec![("pure", ConstraintNode::Bool)]));

    let app = instance(
        "app",
        "Ctx",
        "/src",
        vec![path_member("decider", "/src/decider", "DeciderKind")],
    );
    let project = Project::new(vec![ctx, decider], vec![app]);

    let result = project.bind();
    assert_eq!(result.contracts.len(), 1, "{:?}", result.contracts);
    let contract = &result.contracts[0];
    assert_eq!(contract.contract_type, ContractType::Purity);
    assert_eq!(contract.name, "purity(decider)");
    assert_eq!(contract.args[0].name, "decider");
    assert_eq!(contract.location, "type:Ctx");
}

#[test]
fn intrinsic_propagation_is_once_per_member_symbol() {
    let mut ctx = kind_def("Ctx");
    // A duplicated member entry must not double-report for the one
    // member symbol it resolves to.
    ctx.members = vec![
        kind_member("decider", "DeciderKind"),
        kind_member("decider", "DeciderKind"),
    ];
    let mut decider = kind_def("DeciderKind");
    decider.constraints = Some(ConstraintNode::object(vec![("pure", ConstraintNode::Bool)]));

    let app = instance(
        "app",
        "Ctx",
        "/srv/app",
        vec![path_member("decider", "/srv/app/decider", "DeciderKind")],
    );
    let second = instance(
        "admin",
        "Ctx",
        "/srv/admin",
        vec![path_member("decider", "/srv/admin/decider", "DeciderKind")],
    );
    let project = Project::new(vec![ctx, decider], vec![app, second]);

    let result = project.bind();
    // One contract per *instance's* member symbol, not per member entry.
    let purity = contracts_of(&result, ContractType::Purity);
    assert_eq!(purity, vec!["purity(decider)", "purity(decider)"]);
    let args: Vec<String> = result
        .contracts
        .iter()
        .map(|c| {
            kindcheck_core::carrier_key(c.args[0].carrier.as_ref().expect("member has a carrier"))
        })
        .collect();
    assert_eq!(args, vec!["/srv/app/decider", "/srv/admin/decider"]);
}

#[test]
fn scope_contracts_assert_location_kind_per_instance() {
    let mut feature = kind_def("Feature");
    feature.scope = Some(ScopeKind::Folder);

    let orders = instance("orders", "Feature", "/src/orders", vec![]);
    let billing = instance("billing", "Feature", "/src/billing", vec![]);
    let project = Project::new(vec![feature], vec![orders, billing]);

    let result = project.bind();
    let scopes = contracts_of(&result, ContractType::Scope);
    assert_eq!(scopes, vec!["scope:folder(orders)", "scope:folder(billing)"]);
    for c in &result.contracts {
        assert_eq!(c.location, "type:Feature");
    }
}

#[test]
fn overlap_skips_pairs_on_orthogonal_axes() {
    let ctx = kind_def("Ctx");
    let app = instance(
        "app",
        "Ctx",
        "/src",
        vec![
            path_member("domain", "/src/domain", "DomainLayer"),
            tagged_member("deciders", "Decider", "/src"),
        ],
    );
    let project = Project::new(vec![ctx], vec![app]);

    let result = project.bind();
    assert!(contracts_of(&result, ContractType::Overlap).is_empty());
}

#[test]
fn overlap_fires_for_same_axis_pairs() {
    let ctx = kind_def("Ctx");
    let app = instance(
        "app",
        "Ctx",
        "/src",
        vec![
            tagged_member("deciders", "Decider", "/src"),
            tagged_member("projectors", "Projector", "/src"),
        ],
    );
    let project = Project::new(vec![ctx], vec![app]);

    let result = project.bind();
    assert_eq!(
        contracts_of(&result, ContractType::Overlap),
        vec!["overlap:deciders/projectors"]
    );
    assert_eq!(result.contracts[0].location, "instance:app");
}

#[test]
fn unknown_constraint_is_a_soft_error_and_siblings_survive() {
    let mut ctx = kind_def("Ctx");
    ctx.members = vec![
        kind_member("domain", "DomainLayer"),
        kind_member("infra", "InfraLayer"),
    ];
    ctx.constraints = Some(ConstraintNode::object(vec![
        ("frobnicate", ConstraintNode::Bool),
        (
            "noDependency",
            ConstraintNode::TuplePairs {
                values: vec![("domain".into(), "infra".into())],
            },
        ),
    ]));

    let app = instance(
        "app",
        "Ctx",
        "/src",
        vec![
            path_member("domain", "/src/domain", "DomainLayer"),
            path_member("infra", "/src/infra", "InfraLayer"),
        ],
    );
    let project = Project::new(vec![ctx], vec![app]);

    let result = project.bind();
    assert_eq!(
        result.errors,
        vec!["Unknown constraint 'frobnicate' in Kind<Ctx>."]
    );
    assert_eq!(
        contracts_of(&result, ContractType::NoDependency),
        vec!["noDependency(domain -> infra)"]
    );
}

#[test]
fn dotted_constraint_names_reach_nested_providers() {
    let mut ctx = kind_def("Ctx");
    ctx.members = vec![
        kind_member("src", "SourceTree"),
        kind_member("tests", "TestTree"),
    ];
    ctx.constraints = Some(ConstraintNode::object(vec![(
        "filesystem",
        ConstraintNode::object(vec![(
            "mirrors",
            ConstraintNode::TuplePairs {
                values: vec![("src".into(), "tests".into())],
            },
        )]),
    )]));

    let app = instance(
        "app",
        "Ctx",
        "/proj",
        vec![
            path_member("src", "/proj/src", "SourceTree"),
            path_member("tests", "/proj/tests", "TestTree"),
        ],
    );
    let project = Project::new(vec![ctx], vec![app]);

    let result = project.bind();
    assert_eq!(
        contracts_of(&result, ContractType::Colocated),
        vec!["filesystem.mirrors(src -> tests)"]
    );
}

#[test]
fn wrapped_kind_synthesizes_one_contract_per_tagged_file() {
    let mut decider = kind_def("Decider");
    decider.wraps_type_name = Some("DeciderFn".to_string());
    decider.constraints = Some(ConstraintNode::object(vec![("pure", ConstraintNode::Bool)]));

    let project = Project::new(vec![decider], vec![]).with_exports(vec![
        export("/src/orders/validate.ts", "Decider", "validateOrder"),
        export("/src/billing/charge.ts", "Decider", "chargeCard"),
        export("/src/billing/charge.ts", "Decider", "refundCard"),
    ]);

    let result = project.bind();
    let purity = contracts_of(&result, ContractType::Purity);
    assert_eq!(purity, vec!["purity(Decider)", "purity(Decider)"]);
    let files: Vec<String> = result
        .contracts
        .iter()
        .map(|c| {
            kindcheck_core::carrier_key(c.args[0].carrier.as_ref().expect("synthetic carrier"))
        })
        .collect();
    assert_eq!(
        files,
        vec!["/src/billing/charge.ts", "/src/orders/validate.ts"]
    );
    // Tagged files are registered for downstream lookup.
    assert_eq!(
        result.resolved_files.get("/src/orders/validate.ts").unwrap(),
        &vec!["/src/orders/validate.ts".to_string()]
    );
}

#[test]
fn wrapped_kind_synthesis_is_idempotent() {
    let mut decider = kind_def("Decider");
    decider.wraps_type_name = Some("DeciderFn".to_string());
    decider.constraints = Some(ConstraintNode::object(vec![("pure", ConstraintNode::Bool)]));

    let project = Project::new(vec![decider], vec![])
        .with_exports(vec![export("/src/a.ts", "Decider", "a")]);

    let first = project.bind();
    let second = project.bind();
    let names = |r: &BindResult| {
        r.contracts
            .iter()
            .map(|c| (c.contract_type, c.name.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&first), names(&second));
    assert_eq!(first.contracts.len(), 1);
}

#[test]
fn wrapped_kind_is_skipped_when_an_instantiated_parent_covers_it() {
    let mut ctx = kind_def("Ctx");
    ctx.members = vec![kind_member("deciders", "Decider")];
    let mut decider = kind_def("Decider");
    decider.wraps_type_name = Some("DeciderFn".to_string());
    decider.constraints = Some(ConstraintNode::object(vec![("pure", ConstraintNode::Bool)]));

    let app = instance(
        "app",
        "Ctx",
        "/src",
        vec![tagged_member("deciders", "Decider", "/src")],
    );
    let project = Project::new(vec![ctx, decider], vec![app])
        .with_exports(vec![export("/src/a.ts", "Decider", "decide")]);

    let result = project.bind();
    // Exactly one purity contract: the propagated member one, not a second
    // synthesized per-file one.
    let purity: Vec<&kindcheck_core::Contract> = result
        .contracts
        .iter()
        .filter(|c| c.contract_type == ContractType::Purity)
        .collect();
    assert_eq!(purity.len(), 1, "{:?}", result.contracts);
    assert_eq!(purity[0].name, "purity(deciders)");
    assert_eq!(purity[0].location, "type:Ctx");
}

#[test]
fn wrapped_kind_not_skipped_when_parent_uninstantiated() {
    // The parent references the wrapped Kind but has zero instances, so
    // intrinsic propagation never runs for it; synthesis must still cover
    // the wrapped Kind's own constraints.
    let mut ctx = kind_def("Ctx");
    ctx.members = vec![kind_member("deciders", "Decider")];
    let mut decider = kind_def("Decider");
    decider.wraps_type_name = Some("DeciderFn".to_string());
    decider.constraints = Some(ConstraintNode::object(vec![("pure", ConstraintNode::Bool)]));

    let project = Project::new(vec![ctx, decider], vec![])
        .with_exports(vec![export("/src/a.ts", "Decider", "decide")]);

    let result = project.bind();
    assert_eq!(
        contracts_of(&result, ContractType::Purity),
        vec!["purity(Decider)"]
    );
    assert_eq!(result.contracts[0].location, "kind:Decider");
}

#[test]
fn declaration_ownership_maps_exports_to_typed_members() {
    let ctx = kind_def("Ctx");
    let deciders = tagged_member("deciders", "Decider", "/src/app");
    let app = instance("app", "Ctx", "/src/app", vec![deciders.clone()]);
    let project = Project::new(vec![ctx], vec![app]).with_exports(vec![
        export("/src/app/core.ts", "Decider", "decide"),
        export("/src/app/core.ts", "Projector", "project"),
        export("/elsewhere/x.ts", "Decider", "other"),
    ]);

    let result = project.bind();
    let owned = result
        .declarations_for(&deciders)
        .expect("member owns declarations");
    assert_eq!(owned.len(), 1);
    let exports = owned.get("/src/app/core.ts").unwrap();
    assert_eq!(
        exports.iter().collect::<Vec<_>>(),
        vec![&"decide".to_string()]
    );

    let ownership = result.declaration_ownership();
    let core = ownership.get("/src/app/core.ts").unwrap();
    assert_eq!(
        core.get("decide").unwrap(),
        "intersect(/src/app,tagged:Decider)"
    );
}

#[test]
fn container_files_cover_the_instance_root() {
    let ctx = kind_def("Ctx");
    let app = instance(
        "app",
        "Ctx",
        "/src",
        vec![path_member("domain", "/src/domain", "DomainLayer")],
    );
    let project = Project::new(vec![ctx], vec![app]);
    let files = MemoryFiles::new(["/src/domain/a.ts", "/src/stray.ts"]);

    let result = project.bind_with(&files);
    assert_eq!(
        result.container_files.get("/src").unwrap(),
        &vec!["/src/domain/a.ts".to_string(), "/src/stray.ts".to_string()]
    );
    assert_eq!(
        result.resolved_files.get("/src/domain").unwrap(),
        &vec!["/src/domain/a.ts".to_string()]
    );
}

/// A probe that counts recursive listings, to pin down memoization.
struct CountingProbe {
    inner: MemoryFiles,
    reads: Cell<usize>,
}

impl FileProbe for CountingProbe {
    fn directory_exists(&self, path: &str) -> bool {
        self.inner.directory_exists(path)
    }

    fn file_exists(&self, path: &str) -> bool {
        self.inner.file_exists(path)
    }

    fn read_directory(&self, path: &str) -> Vec<String> {
        self.reads.set(self.reads.get() + 1);
        self.inner.read_directory(path)
    }
}

#[test]
fn carrier_resolution_is_memoized_by_canonical_key() {
    let ctx = kind_def("Ctx");
    // Two members with the same carrier: second resolution must come from
    // the memo, not the probe.
    let app = instance(
        "app",
        "Ctx",
        "/app",
        vec![
            path_member("shared", "/app/shared", "SharedKind"),
            path_member("common", "/app/shared", "CommonKind"),
        ],
    );
    let project = Project::new(vec![ctx], vec![app]);
    let probe = CountingProbe {
        inner: MemoryFiles::new(["/app/shared/util.ts"]),
        reads: Cell::new(0),
    };

    let result = project.bind_with(&probe);
    // One listing for the instance root, one for the shared member key,
    // one for the container pass.
    assert_eq!(probe.reads.get(), 3);
    assert_eq!(
        result.resolved_files.get("/app/shared").unwrap(),
        &vec!["/app/shared/util.ts".to_string()]
    );
}

#[test]
fn single_export_carrier_records_its_declaration() {
    let ctx = kind_def("Workflow");
    let validate = Arc::new(Symbol {
        name: "validate".to_string(),
        kind: SymbolKind::Instance,
        carrier: Some(CarrierExpr::path("/src/orders/validate.ts")),
        kind_type_name: Some("Workflow".to_string()),
        export_name: Some("validateOrder".to_string()),
        members: BTreeMap::new(),
    });
    let mut project = Project::new(vec![ctx], vec![]);
    project.symbols = vec![validate.clone()];
    project
        .instance_symbols
        .entry("Workflow".to_string())
        .or_default()
        .push(validate.clone());

    let result = project.bind();
    let decls = result.declarations_for(&validate).unwrap();
    let exports = decls.get("/src/orders/validate.ts").unwrap();
    assert_eq!(
        exports.iter().collect::<Vec<_>>(),
        vec![&"validateOrder".to_string()]
    );
}

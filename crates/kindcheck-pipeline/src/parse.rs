//! The parse stage: scan views in, symbol tree out.
//!
//! Purely structural. The parser resolves declared instance paths against
//! the declaring file's directory, builds the member tree from Kind
//! definitions, and computes carrier expressions. It never touches the
//! filesystem; turning carriers into file sets is the binder's job.

use kindcheck_core::carrier::CarrierExpr;
use kindcheck_core::paths::{dirname, join_path, resolve_relative};
use kindcheck_core::symbol::{Symbol, SymbolKind};
use kindcheck_core::views::{KindDef, MemberValue, ScanViews};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The parser's output, shaped for direct handoff to the binder.
#[derive(Debug, Default)]
pub struct ParseResult {
    /// Top-level symbols: instances first, then one symbol per Kind
    /// definition.
    pub symbols: Vec<Arc<Symbol>>,
    pub kind_defs: BTreeMap<String, KindDef>,
    /// Instances indexed by Kind type name.
    pub instance_symbols: BTreeMap<String, Vec<Arc<Symbol>>>,
    pub errors: Vec<String>,
}

/// Build the symbol tree from scan views.
pub fn parse(views: &ScanViews) -> ParseResult {
    let mut result = ParseResult {
        kind_defs: views.kind_defs.clone(),
        ..ParseResult::default()
    };

    for decl in &views.instances {
        let Some(kind_def) = views.kind_defs.get(&decl.kind_type_name) else {
            result.errors.push(format!(
                "Instance<{k}>: no Kind definition found for '{k}'.",
                k = decl.kind_type_name
            ));
            continue;
        };

        let base_dir = dirname(&decl.source_file);
        // `./file.ts#exportName` binds the instance to one named export
        // rather than a whole file or folder.
        let (root, export_name) = match decl.declared_path.split_once('#') {
            Some((file_part, export)) => (
                resolve_relative(&base_dir, file_part),
                Some(export.to_string()),
            ),
            None => (resolve_relative(&base_dir, &decl.declared_path), None),
        };

        let members = build_member_tree(kind_def, &root, &decl.members, &views.kind_defs);
        let symbol = Arc::new(Symbol {
            name: decl.variable_name.clone(),
            kind: SymbolKind::Instance,
            carrier: Some(CarrierExpr::path(&root)),
            kind_type_name: Some(decl.kind_type_name.clone()),
            export_name,
            members,
        });

        result
            .instance_symbols
            .entry(decl.kind_type_name.clone())
            .or_default()
            .push(symbol.clone());
        result.symbols.push(symbol);
    }

    for name in views.kind_defs.keys() {
        result
            .symbols
            .push(Arc::new(Symbol::leaf(name, SymbolKind::KindDef, None)));
    }

    result
}

/// Build member symbols for one instance level.
///
/// Each Kind-declared member gets a carrier: wrapped-Kind members
/// intersect the global tagged set with the parent's path ("all tagged
/// declarations inside this instance"); everything else is a plain path,
/// explicit `location` winning over name derivation.
fn build_member_tree(
    kind_def: &KindDef,
    parent_path: &str,
    member_values: &[MemberValue],
    kind_defs: &BTreeMap<String, KindDef>,
) -> BTreeMap<String, Arc<Symbol>> {
    let mut members = BTreeMap::new();

    for property in &kind_def.members {
        let child_def = property
            .type_name
            .as_ref()
            .and_then(|name| kind_defs.get(name));
        let member_value = member_values.iter().find(|v| v.name == property.name);

        let member_path = match &property.location {
            Some(location) => resolve_relative(parent_path, location),
            None => join_path(parent_path, &property.name),
        };

        let wrapped = child_def.is_some_and(|def| def.wraps_type_name.is_some());
        let carrier = if wrapped {
            CarrierExpr::scoped_tagged(
                property.type_name.clone().unwrap_or_default(),
                parent_path,
            )
        } else {
            CarrierExpr::path(&member_path)
        };

        let child_members = match (child_def, member_value) {
            (Some(def), Some(value)) if !def.members.is_empty() && !value.children.is_empty() => {
                build_member_tree(def, &member_path, &value.children, kind_defs)
            }
            _ => BTreeMap::new(),
        };

        members.insert(
            property.name.clone(),
            Arc::new(Symbol {
                name: property.name.clone(),
                kind: SymbolKind::Member,
                carrier: Some(carrier),
                kind_type_name: property.type_name.clone(),
                export_name: None,
                members: child_members,
            }),
        );
    }

    members
}

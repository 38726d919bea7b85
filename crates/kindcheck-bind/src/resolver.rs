//! Carrier resolution: from algebra to concrete file sets.
//!
//! `CarrierResolver` interprets a `CarrierExpr` against a `FileProbe` and
//! the scanned tagged-export list. It is purely functional over its inputs;
//! memoization by `carrier_key` is the caller's concern (the binder keeps a
//! per-run map).

use crate::fs::FileProbe;
use kindcheck_core::carrier::CarrierExpr;
use kindcheck_core::paths::is_file_in;
use kindcheck_core::views::TaggedExport;
use std::collections::BTreeSet;

/// The slice of scanner output carrier resolution needs: every tagged
/// export in the project.
#[derive(Debug, Clone, Default)]
pub struct ScanContext<'a> {
    pub tagged_exports: &'a [TaggedExport],
}

impl<'a> ScanContext<'a> {
    pub fn new(tagged_exports: &'a [TaggedExport]) -> Self {
        Self { tagged_exports }
    }
}

/// Errors raised during carrier resolution.
///
/// A missing path is *not* an error — absence is a normal, checkable state
/// and resolves to the empty set. The only failure is a precondition
/// violation: resolving a tagged atom with no scan context wired in.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("tagged carrier '{kind_type_name}' resolved without scan context")]
    MissingScanContext { kind_type_name: String },
}

/// Resolves carrier expressions to file lists.
pub struct CarrierResolver<'p> {
    probe: &'p dyn FileProbe,
}

impl<'p> CarrierResolver<'p> {
    pub fn new(probe: &'p dyn FileProbe) -> Self {
        Self { probe }
    }

    /// Resolve `carrier` to its constituent files, deduplicated and in
    /// lexicographic order.
    pub fn resolve(
        &self,
        carrier: &CarrierExpr,
        ctx: Option<&ScanContext<'_>>,
    ) -> Result<Vec<String>, ResolveError> {
        match carrier {
            CarrierExpr::Path { path } => Ok(self.resolve_path(path)),
            CarrierExpr::Tagged { kind_type_name } => {
                let ctx = ctx.ok_or_else(|| ResolveError::MissingScanContext {
                    kind_type_name: kind_type_name.clone(),
                })?;
                Ok(Self::resolve_tagged(kind_type_name, ctx))
            }
            CarrierExpr::Union { children } => self.resolve_union(children, ctx),
            CarrierExpr::Exclude { base, excluded } => {
                let mut files: BTreeSet<String> = self.resolve(base, ctx)?.into_iter().collect();
                for f in self.resolve(excluded, ctx)? {
                    files.remove(&f);
                }
                Ok(files.into_iter().collect())
            }
            CarrierExpr::Intersect { children } => self.resolve_intersect(children, ctx),
        }
    }

    /// Directory → recursive listing, file → singleton, absent → empty.
    fn resolve_path(&self, path: &str) -> Vec<String> {
        if self.probe.directory_exists(path) {
            self.probe.read_directory(path)
        } else if self.probe.file_exists(path) {
            vec![path.to_string()]
        } else {
            Vec::new()
        }
    }

    /// Every distinct file containing at least one export tagged with the
    /// Kind type. Scopeless by construction; scoping is
    /// `Intersect(Tagged, Path)` in the algebra.
    fn resolve_tagged(kind_type_name: &str, ctx: &ScanContext<'_>) -> Vec<String> {
        let files: BTreeSet<&str> = ctx
            .tagged_exports
            .iter()
            .filter(|e| e.kind_type_name == kind_type_name)
            .map(|e| e.source_file.as_str())
            .collect();
        files.into_iter().map(str::to_string).collect()
    }

    fn resolve_union(
        &self,
        children: &[CarrierExpr],
        ctx: Option<&ScanContext<'_>>,
    ) -> Result<Vec<String>, ResolveError> {
        let mut all = BTreeSet::new();
        for child in children {
            all.extend(self.resolve(child, ctx)?);
        }
        Ok(all.into_iter().collect())
    }

    /// General case: file-set intersection of all children.
    ///
    /// Fast path: `Intersect([Tagged, Path(p)])` resolves only the tagged
    /// side and filters by the `p` boundary. The scope path is then a pure
    /// filter and never needs to exist as a real directory — the common
    /// shape for scoping a type tag to a conceptual subtree.
    fn resolve_intersect(
        &self,
        children: &[CarrierExpr],
        ctx: Option<&ScanContext<'_>>,
    ) -> Result<Vec<String>, ResolveError> {
        if let [a, b] = children {
            let pair = match (a, b) {
                (tagged @ CarrierExpr::Tagged { .. }, CarrierExpr::Path { path }) => {
                    Some((tagged, path))
                }
                (CarrierExpr::Path { path }, tagged @ CarrierExpr::Tagged { .. }) => {
                    Some((tagged, path))
                }
                _ => None,
            };
            if let Some((tagged, scope)) = pair {
                let files = self.resolve(tagged, ctx)?;
                return Ok(files.into_iter().filter(|f| is_file_in(f, scope)).collect());
            }
        }

        let mut sets = Vec::with_capacity(children.len());
        for child in children {
            let set: BTreeSet<String> = self.resolve(child, ctx)?.into_iter().collect();
            sets.push(set);
        }
        let Some((first, rest)) = sets.split_first() else {
            return Ok(Vec::new());
        };
        Ok(first
            .iter()
            .filter(|f| rest.iter().all(|s| s.contains(*f)))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFiles;

    fn tagged(file: &str, kind: &str) -> TaggedExport {
        TaggedExport {
            source_file: file.to_string(),
            kind_type_name: kind.to_string(),
            export_name: "f".to_string(),
        }
    }

    #[test]
    fn path_resolves_directory_file_or_nothing() {
        let files = MemoryFiles::new(["/x/a.ts", "/x/b.ts", "/y/c.ts"]);
        let resolver = CarrierResolver::new(&files);

        assert_eq!(
            resolver.resolve(&CarrierExpr::path("/x"), None).unwrap(),
            vec!["/x/a.ts", "/x/b.ts"]
        );
        assert_eq!(
            resolver.resolve(&CarrierExpr::path("/y/c.ts"), None).unwrap(),
            vec!["/y/c.ts"]
        );
        // Absence is a normal, checkable state.
        assert!(
            resolver
                .resolve(&CarrierExpr::path("/missing"), None)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn tagged_requires_scan_context() {
        let files = MemoryFiles::default();
        let resolver = CarrierResolver::new(&files);
        let err = resolver
            .resolve(&CarrierExpr::tagged("Decider"), None)
            .unwrap_err();
        assert!(matches!(err, ResolveError::MissingScanContext { .. }));
    }

    #[test]
    fn tagged_is_global_and_distinct() {
        let files = MemoryFiles::default();
        let resolver = CarrierResolver::new(&files);
        let exports = vec![
            tagged("/src/orders/validate.ts", "Decider"),
            tagged("/src/orders/validate.ts", "Decider"),
            tagged("/src/billing/charge.ts", "Decider"),
            tagged("/src/billing/charge.ts", "Projector"),
        ];
        let ctx = ScanContext::new(&exports);

        assert_eq!(
            resolver
                .resolve(&CarrierExpr::tagged("Decider"), Some(&ctx))
                .unwrap(),
            vec!["/src/billing/charge.ts", "/src/orders/validate.ts"]
        );
    }

    #[test]
    fn union_and_exclude_are_set_operations() {
        let files = MemoryFiles::new(["/x/a.ts", "/x/b.ts", "/y/c.ts"]);
        let resolver = CarrierResolver::new(&files);

        let union = CarrierExpr::union(vec![CarrierExpr::path("/x"), CarrierExpr::path("/y")]);
        assert_eq!(
            resolver.resolve(&union, None).unwrap(),
            vec!["/x/a.ts", "/x/b.ts", "/y/c.ts"]
        );

        let exclude = CarrierExpr::exclude(CarrierExpr::path("/x"), CarrierExpr::path("/x/b.ts"));
        assert_eq!(resolver.resolve(&exclude, None).unwrap(), vec!["/x/a.ts"]);
    }

    #[test]
    fn scoped_tagged_filters_without_touching_the_filesystem() {
        // No files at all: the scope path exists only as a filter.
        let files = MemoryFiles::default();
        let resolver = CarrierResolver::new(&files);
        let exports = vec![
            tagged("/src/orders/validate.ts", "Decider"),
            tagged("/src/billing/charge.ts", "Decider"),
        ];
        let ctx = ScanContext::new(&exports);

        let scoped = CarrierExpr::scoped_tagged("Decider", "/src/orders");
        assert_eq!(
            resolver.resolve(&scoped, Some(&ctx)).unwrap(),
            vec!["/src/orders/validate.ts"]
        );

        // Operand order does not matter for the fast path.
        let flipped = CarrierExpr::intersect(vec![
            CarrierExpr::path("/src/orders"),
            CarrierExpr::tagged("Decider"),
        ]);
        assert_eq!(
            resolver.resolve(&flipped, Some(&ctx)).unwrap(),
            vec!["/src/orders/validate.ts"]
        );
    }

    #[test]
    fn general_intersection_needs_all_children() {
        let files = MemoryFiles::new(["/x/a.ts", "/x/b.ts"]);
        let resolver = CarrierResolver::new(&files);

        let both = CarrierExpr::intersect(vec![
            CarrierExpr::path("/x"),
            CarrierExpr::union(vec![CarrierExpr::path("/x/a.ts")]),
        ]);
        assert_eq!(resolver.resolve(&both, None).unwrap(), vec!["/x/a.ts"]);

        // Empty intersections resolve to nothing, not everything.
        let empty = CarrierExpr::intersect(vec![]);
        assert!(resolver.resolve(&empty, None).unwrap().is_empty());
    }
}

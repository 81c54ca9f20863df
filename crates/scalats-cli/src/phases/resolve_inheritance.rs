//! Phase 2: resolve every interface's and class's ancestry against the
//! library's own tree and its dependencies.

use crate::phases::read_typescript::LibTs;
use scalats_ast::{TsDecl, TsIdentLibrary};
use scalats_phases::{GetDeps, Phase, PhaseRes};
use scalats_scope::{DepsMap, ScopeTree, TsTreeScope, resolve_parents};
use std::sync::Arc;

/// One interface or class and its resolved ancestry, by dotted path.
#[derive(Clone, Debug)]
pub struct DeclParents {
    pub owner: String,
    pub parents: Vec<String>,
    pub unresolved: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LibAnalyzed {
    pub lib: LibTs,
    pub inheritance: Vec<DeclParents>,
}

pub struct ResolveInheritance {
    pub pedantic: bool,
}

impl Phase<TsIdentLibrary> for ResolveInheritance {
    type In = LibTs;
    type Out = LibAnalyzed;

    fn apply(
        &self,
        id: &TsIdentLibrary,
        lib: &LibTs,
        _get_deps: GetDeps<'_, TsIdentLibrary, LibAnalyzed>,
        _is_circular: bool,
    ) -> PhaseRes<TsIdentLibrary, LibAnalyzed> {
        let mut deps = DepsMap::default();
        for (dep_name, dep) in lib.deps.iter() {
            deps.insert(dep_name.clone(), Arc::clone(&dep.parsed));
        }
        let scope = TsTreeScope::root(id.clone(), self.pedantic, deps)
            .enter(ScopeTree::File(Arc::clone(&lib.parsed)));

        let mut inheritance = Vec::new();
        walk(&scope, &lib.parsed.members, &mut Vec::new(), &mut inheritance);
        PhaseRes::Ok(LibAnalyzed {
            lib: lib.clone(),
            inheritance,
        })
    }
}

fn walk(
    scope: &TsTreeScope,
    members: &[Arc<TsDecl>],
    path: &mut Vec<String>,
    out: &mut Vec<DeclParents>,
) {
    for member in members {
        if member.is_interface_or_class() {
            let resolved = resolve_parents(scope, member);
            let owner = {
                let mut segments = path.clone();
                if let Some(name) = member.name() {
                    segments.push(name.value().to_string());
                }
                segments.join(".")
            };
            out.push(DeclParents {
                owner,
                parents: resolved
                    .parents
                    .iter()
                    .filter_map(|p| p.name())
                    .map(|n| n.value().to_string())
                    .collect(),
                unresolved: resolved
                    .unresolved
                    .iter()
                    .map(|r| r.name.to_string())
                    .collect(),
            });
        }
        if let Some(inner) = member.container_members() {
            let label = match (&**member, member.name()) {
                (TsDecl::Module(m), _) => m.name.to_string(),
                (_, Some(name)) => name.value().to_string(),
                (_, None) => "_".to_string(),
            };
            path.push(label);
            let inner_scope = scope.enter(ScopeTree::Decl(Arc::clone(member)));
            walk(&inner_scope, inner, path, out);
            path.pop();
        }
    }
}

//! Effective-ancestor resolution.
//!
//! Given an interface or class, resolve its declared parent references into
//! actual declarations: interfaces and classes are accepted directly (and
//! their own parents merged in transitively); type aliases are dereferenced,
//! flattening unions/intersections and wrapping object literals in synthetic
//! anonymous interfaces; anything else lands in `unresolved`.

use crate::scope::{ScopeTree, TsTreeScope};
use rustc_hash::FxHashSet;
use scalats_ast::{TsDecl, TsDeclInterface, TsMember, TsType, TsTypeRef};
use std::sync::Arc;

/// A declaration together with its resolved ancestors.
///
/// `parents` holds interfaces/classes only, deduplicated by identity in
/// first-discovered order, with cyclic edges pruned. `unresolved` records
/// the parent references lookup could not resolve; they are reported, not
/// fatal.
#[derive(Clone, Debug)]
pub struct WithParents {
    pub value: Arc<TsDecl>,
    pub parents: Vec<Arc<TsDecl>>,
    pub unresolved: Vec<TsTypeRef>,
}

pub fn resolve_parents(scope: &TsTreeScope, decl: &Arc<TsDecl>) -> WithParents {
    let mut state = ResolveState {
        seen: FxHashSet::default(),
        parents: Vec::new(),
        unresolved: Vec::new(),
    };
    // the declaration itself is on the chain: a self-referencing hierarchy
    // omits the cyclic edge rather than looping
    state.seen.insert(identity(decl));
    for parent_ref in decl.heritage() {
        state.step(scope, parent_ref);
    }
    WithParents {
        value: Arc::clone(decl),
        parents: state.parents,
        unresolved: state.unresolved,
    }
}

/// Declarations are deduplicated by identity, not by name: merged
/// declarations sharing a name are distinct parents.
fn identity(decl: &Arc<TsDecl>) -> usize {
    Arc::as_ptr(decl) as usize
}

struct ResolveState {
    seen: FxHashSet<usize>,
    parents: Vec<Arc<TsDecl>>,
    unresolved: Vec<TsTypeRef>,
}

impl ResolveState {
    fn step(&mut self, scope: &TsTreeScope, parent_ref: &TsTypeRef) {
        let found = scope.lookup_include_scope(&parent_ref.name, true);
        let picked = found.into_iter().find(|(decl, _)| {
            matches!(
                &**decl,
                TsDecl::Interface(_) | TsDecl::Class(_) | TsDecl::TypeAlias(_)
            )
        });
        match picked {
            Some((decl, found_scope)) => match &*decl {
                TsDecl::Interface(_) | TsDecl::Class(_) => {
                    if self.seen.insert(identity(&decl)) {
                        self.parents.push(Arc::clone(&decl));
                        let inner = found_scope.enter(ScopeTree::Decl(Arc::clone(&decl)));
                        for next_ref in decl.heritage() {
                            self.step(&inner, next_ref);
                        }
                    }
                }
                TsDecl::TypeAlias(alias) => {
                    if self.seen.insert(identity(&decl)) {
                        self.dealias(&found_scope, parent_ref, &alias.alias);
                    }
                }
                _ => unreachable!("picker admits interfaces, classes, and aliases"),
            },
            None => self.unresolved.push(parent_ref.clone()),
        }
    }

    fn dealias(&mut self, scope: &TsTreeScope, origin: &TsTypeRef, tpe: &TsType) {
        match tpe {
            TsType::Ref(r) => self.step(scope, r),
            TsType::Union(parts) | TsType::Intersect(parts) => {
                for part in parts {
                    self.dealias(scope, origin, part);
                }
            }
            TsType::Object(members) => self.synthetic(origin, members),
            _ => self.unresolved.push(origin.clone()),
        }
    }

    /// An object-literal alias target becomes a synthetic anonymous
    /// interface named after the reference that led to it.
    fn synthetic(&mut self, origin: &TsTypeRef, members: &[TsMember]) {
        let name = origin
            .name
            .parts()
            .last()
            .expect("qualified names are non-empty")
            .clone();
        self.parents.push(Arc::new(TsDecl::Interface(TsDeclInterface {
            name,
            tparams: Vec::new(),
            inheritance: Vec::new(),
            members: members.to_vec(),
        })));
    }
}

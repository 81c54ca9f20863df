//! The immutable scope chain.

use rustc_hash::FxHashMap;
use scalats_ast::{TsDecl, TsIdent, TsIdentLibrary, TsParsedFile, TsQIdent};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use tracing::warn;

/// Already-parsed dependency trees, read-only for the duration of a run.
pub type DepsMap = FxHashMap<TsIdentLibrary, Arc<TsParsedFile>>;

/// A tree node a scope can point at.
#[derive(Clone)]
pub enum ScopeTree {
    File(Arc<TsParsedFile>),
    Decl(Arc<TsDecl>),
}

impl ScopeTree {
    fn members(&self) -> &[Arc<TsDecl>] {
        match self {
            Self::File(file) => &file.members,
            Self::Decl(decl) => decl.container_members().unwrap_or(&[]),
        }
    }

    fn label(&self) -> String {
        match self {
            Self::File(_) => "<file>".to_string(),
            Self::Decl(decl) => match (&**decl, decl.name()) {
                (TsDecl::Module(m), _) => format!("\"{}\"", m.name),
                (_, Some(name)) => name.value().to_string(),
                (_, None) => "<anon>".to_string(),
            },
        }
    }
}

impl From<Arc<TsParsedFile>> for ScopeTree {
    fn from(file: Arc<TsParsedFile>) -> Self {
        Self::File(file)
    }
}

impl From<Arc<TsDecl>> for ScopeTree {
    fn from(decl: Arc<TsDecl>) -> Self {
        Self::Decl(decl)
    }
}

enum ScopeNode {
    Root {
        lib_name: TsIdentLibrary,
        pedantic: bool,
        deps: Rc<DepsMap>,
    },
    Scoped {
        outer: TsTreeScope,
        current: ScopeTree,
    },
}

/// An immutable, chainable lookup context: "where in the tree am I, and what
/// is visible from here". Scopes are cheap values created per traversal step
/// and never mutated; `enter` is O(1).
#[derive(Clone)]
pub struct TsTreeScope {
    node: Rc<ScopeNode>,
}

impl TsTreeScope {
    pub fn root(lib_name: TsIdentLibrary, pedantic: bool, deps: DepsMap) -> Self {
        Self {
            node: Rc::new(ScopeNode::Root {
                lib_name,
                pedantic,
                deps: Rc::new(deps),
            }),
        }
    }

    /// Descend into a container.
    pub fn enter(&self, current: impl Into<ScopeTree>) -> Self {
        Self {
            node: Rc::new(ScopeNode::Scoped {
                outer: self.clone(),
                current: current.into(),
            }),
        }
    }

    fn root_node(&self) -> (&TsIdentLibrary, bool, &Rc<DepsMap>) {
        let mut current = self;
        loop {
            match &*current.node {
                ScopeNode::Root {
                    lib_name,
                    pedantic,
                    deps,
                } => return (lib_name, *pedantic, deps),
                ScopeNode::Scoped { outer, .. } => current = outer,
            }
        }
    }

    pub fn lib_name(&self) -> &TsIdentLibrary {
        self.root_node().0
    }

    pub fn pedantic(&self) -> bool {
        self.root_node().1
    }

    /// Look up a qualified name, returning every matching declaration
    /// (TypeScript merges declarations sharing a name).
    pub fn lookup(&self, name: &TsQIdent, skip_validation: bool) -> Vec<Arc<TsDecl>> {
        self.lookup_include_scope(name, skip_validation)
            .into_iter()
            .map(|(decl, _)| decl)
            .collect()
    }

    /// Like [`lookup`](Self::lookup), restricted to type declarations.
    pub fn lookup_type(
        &self,
        name: &TsQIdent,
        skip_validation: bool,
    ) -> Vec<(Arc<TsDecl>, TsTreeScope)> {
        self.lookup_include_scope(name, skip_validation)
            .into_iter()
            .filter(|(decl, _)| decl.is_type_decl())
            .collect()
    }

    /// Look up a qualified name, returning each match together with the
    /// scope it was found in. Resolving a found declaration's own references
    /// must use that scope, not the caller's.
    ///
    /// When the scope is pedantic and `skip_validation` is false, an empty
    /// result is fatal; the unwind is converted to a per-library failure at
    /// the phase boundary.
    pub fn lookup_include_scope(
        &self,
        name: &TsQIdent,
        skip_validation: bool,
    ) -> Vec<(Arc<TsDecl>, TsTreeScope)> {
        let mut out = Vec::new();
        self.lookup_impl(name.parts(), &mut out);
        if out.is_empty() && !skip_validation {
            if self.pedantic() {
                tracing::error!(name = %name, scope = %self, "couldn't resolve name");
                panic!("couldn't resolve {name} from {self}");
            }
            warn!(name = %name, scope = %self, "couldn't resolve name");
        }
        out
    }

    /// Bare-name lookup for implicit globals: in addition to the normal
    /// chain, searches the top level of every dependency, in deterministic
    /// library order. Off the default lookup path.
    pub fn lookup_unqualified(&self, name: &TsIdent) -> Vec<(Arc<TsDecl>, TsTreeScope)> {
        let mut out = Vec::new();
        let parts = [name.clone()];
        self.lookup_impl(&parts, &mut out);
        if !out.is_empty() {
            return out;
        }
        let (_, pedantic, deps) = self.root_node();
        let sorted: BTreeMap<&TsIdentLibrary, &Arc<TsParsedFile>> = deps.iter().collect();
        for (dep_name, dep_file) in sorted {
            let dep_scope = TsTreeScope::root(dep_name.clone(), pedantic, DepsMap::default())
                .enter(ScopeTree::File(Arc::clone(dep_file)));
            dep_scope.lookup_impl(&parts, &mut out);
        }
        out
    }

    fn lookup_impl(&self, parts: &[TsIdent], out: &mut Vec<(Arc<TsDecl>, TsTreeScope)>) {
        match &*self.node {
            ScopeNode::Scoped { outer, current } => {
                search_members(self, current.members(), parts, out);
                outer.lookup_impl(parts, out);
            }
            ScopeNode::Root { deps, pedantic, .. } => {
                // a qualified name whose head names a dependency delegates
                // into that library's root scope
                if let [first, rest @ ..] = parts
                    && !rest.is_empty()
                {
                    let as_lib = TsIdentLibrary::parse(first.value());
                    if let Some(dep_file) = deps.get(&as_lib) {
                        let dep_scope =
                            TsTreeScope::root(as_lib, *pedantic, DepsMap::default())
                                .enter(ScopeTree::File(Arc::clone(dep_file)));
                        dep_scope.lookup_impl(rest, out);
                    }
                }
            }
        }
    }
}

/// Search a container's members for a fragment path, descending into nested
/// containers only (no enclosing-scope fallback past the first fragment).
fn search_members(
    scope: &TsTreeScope,
    members: &[Arc<TsDecl>],
    parts: &[TsIdent],
    out: &mut Vec<(Arc<TsDecl>, TsTreeScope)>,
) {
    let [first, rest @ ..] = parts else { return };
    for member in members {
        if member.name() == Some(first) {
            if rest.is_empty() {
                out.push((Arc::clone(member), scope.clone()));
            } else if let Some(inner_members) = member.container_members() {
                let inner = scope.enter(ScopeTree::Decl(Arc::clone(member)));
                search_members(&inner, inner_members, rest, out);
            }
        }
    }
}

impl fmt::Display for TsTreeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut labels = Vec::new();
        let mut current = self;
        loop {
            match &*current.node {
                ScopeNode::Root { lib_name, .. } => {
                    labels.push(lib_name.to_string());
                    break;
                }
                ScopeNode::Scoped { outer, current: tree } => {
                    labels.push(tree.label());
                    current = outer;
                }
            }
        }
        labels.reverse();
        write!(f, "TreeScope({})", labels.join(" / "))
    }
}

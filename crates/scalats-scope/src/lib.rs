//! Scope-aware name resolution.
//!
//! [`TsTreeScope`] answers "what does this name refer to from here":
//! qualified lookup walks the current container's members, then the
//! enclosing containers up the chain, then — when the leading fragment
//! names a dependency — into that library's root scope.
//!
//! [`resolve_parents`] builds on lookup to compute the effective ancestor
//! set of an interface or class, flattening aliased unions/intersections
//! and pruning inheritance cycles.

pub mod parents;
pub mod scope;

pub use parents::{WithParents, resolve_parents};
pub use scope::{DepsMap, ScopeTree, TsTreeScope};

//! The concrete pipeline: read and link a library, then resolve its
//! inheritance against its dependencies.

pub mod read_typescript;
pub mod resolve_inheritance;

pub use read_typescript::{LibTs, ReadTypescript};
pub use resolve_inheritance::{DeclParents, LibAnalyzed, ResolveInheritance};

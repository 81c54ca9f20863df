//! Library and module resolution.
//!
//! Maps a [`scalats_ast::TsIdentLibrary`] to a concrete source location
//! (standard library, on-disk folder, ignored, or not available), and
//! resolves module specifiers — relative or global — to files and module
//! names. Filesystem layout follows npm conventions: scoped packages live in
//! nested `@scope/name` folders.

pub mod resolver;
pub mod source;

pub use resolver::{LibraryResolver, ResolvedModule};
pub use source::{InFile, InFolder, LibrarySource, LibraryResolverRes};

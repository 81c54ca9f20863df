//! TypeScript declaration tree model for the scalats converter.
//!
//! This crate provides the foundational types used across all scalats crates:
//! - Identifiers (`TsIdent`, `TsQIdent`, `TsIdentLibrary`, `TsIdentModule`)
//! - Declaration trees (`TsDecl`, `TsParsedFile`, `TsType`, members)
//! - A tolerant reader for the ambient-declaration subset (`parser`)
//!
//! Trees are immutable once parsed; shared subtrees are `Arc`-held so that
//! scopes and dependency maps can reference them without copying.

pub mod ident;
pub mod parser;
pub mod trees;

pub use ident::{TsIdent, TsIdentLibrary, TsIdentModule, TsQIdent};
pub use trees::{
    TsDecl, TsDeclClass, TsDeclEnum, TsDeclFunction, TsDeclInterface, TsDeclModule,
    TsDeclNamespace, TsDeclTypeAlias, TsDeclVar, TsFunParam, TsFunSig, TsImport, TsLiteral,
    TsMember, TsMemberFunction, TsMemberProperty, TsParsedFile, TsType, TsTypeRef,
};

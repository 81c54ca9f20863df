//! Declaration trees.
//!
//! The shapes here are deliberately small: enough structure for dependency
//! discovery, qualified-name lookup, and inheritance resolution. Everything
//! is a plain immutable value; container members are `Arc`-shared so a
//! declaration can appear in several scopes without copying.

use crate::ident::{TsIdent, TsIdentModule, TsQIdent};
use std::sync::Arc;

/// A type reference such as `React.Component<P, S>`.
#[derive(Clone, Debug, PartialEq)]
pub struct TsTypeRef {
    pub name: TsQIdent,
    pub tparams: Vec<TsType>,
}

impl TsTypeRef {
    pub fn named(name: TsQIdent) -> Self {
        Self {
            name,
            tparams: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TsLiteral {
    Str(String),
    Num(String),
    Bool(bool),
}

#[derive(Clone, Debug, PartialEq)]
pub enum TsType {
    Ref(TsTypeRef),
    Union(Vec<TsType>),
    Intersect(Vec<TsType>),
    Object(Vec<TsMember>),
    Tuple(Vec<TsType>),
    Function(Box<TsFunSig>),
    Literal(TsLiteral),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TsFunParam {
    pub name: TsIdent,
    pub tpe: Option<TsType>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TsFunSig {
    pub tparams: Vec<TsIdent>,
    pub params: Vec<TsFunParam>,
    pub ret: Option<TsType>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TsMemberProperty {
    pub name: TsIdent,
    pub tpe: Option<TsType>,
    pub optional: bool,
    pub readonly: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TsMemberFunction {
    pub name: TsIdent,
    pub signature: TsFunSig,
    pub optional: bool,
}

/// An interface/class/object-literal member.
#[derive(Clone, Debug, PartialEq)]
pub enum TsMember {
    Property(TsMemberProperty),
    Function(TsMemberFunction),
}

impl TsMember {
    pub fn name(&self) -> &TsIdent {
        match self {
            Self::Property(p) => &p.name,
            Self::Function(f) => &f.name,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TsDeclInterface {
    pub name: TsIdent,
    pub tparams: Vec<TsIdent>,
    pub inheritance: Vec<TsTypeRef>,
    pub members: Vec<TsMember>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TsDeclClass {
    pub name: TsIdent,
    pub tparams: Vec<TsIdent>,
    pub parent: Option<TsTypeRef>,
    pub implements: Vec<TsTypeRef>,
    pub members: Vec<TsMember>,
    pub is_abstract: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TsDeclTypeAlias {
    pub name: TsIdent,
    pub tparams: Vec<TsIdent>,
    pub alias: TsType,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TsDeclEnum {
    pub name: TsIdent,
    pub members: Vec<TsIdent>,
    pub is_const: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TsDeclNamespace {
    pub name: TsIdent,
    pub members: Vec<Arc<TsDecl>>,
}

/// An ambient module, `declare module "name" { ... }`.
#[derive(Clone, Debug, PartialEq)]
pub struct TsDeclModule {
    pub name: TsIdentModule,
    pub members: Vec<Arc<TsDecl>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TsDeclVar {
    pub name: TsIdent,
    pub tpe: Option<TsType>,
    pub readonly: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TsDeclFunction {
    pub name: TsIdent,
    pub signature: TsFunSig,
}

/// A named declaration. TypeScript allows declaration merging, so lookups
/// return every declaration carrying a given name, not the first.
#[derive(Clone, Debug, PartialEq)]
pub enum TsDecl {
    Interface(TsDeclInterface),
    Class(TsDeclClass),
    TypeAlias(TsDeclTypeAlias),
    Enum(TsDeclEnum),
    Namespace(TsDeclNamespace),
    Module(TsDeclModule),
    Var(TsDeclVar),
    Function(TsDeclFunction),
}

impl TsDecl {
    /// The simple name this declaration binds, when it binds one. Ambient
    /// modules are named by module specifier instead.
    pub fn name(&self) -> Option<&TsIdent> {
        match self {
            Self::Interface(d) => Some(&d.name),
            Self::Class(d) => Some(&d.name),
            Self::TypeAlias(d) => Some(&d.name),
            Self::Enum(d) => Some(&d.name),
            Self::Namespace(d) => Some(&d.name),
            Self::Module(_) => None,
            Self::Var(d) => Some(&d.name),
            Self::Function(d) => Some(&d.name),
        }
    }

    /// Members of this declaration when it is a container that qualified
    /// lookup may descend into.
    pub fn container_members(&self) -> Option<&[Arc<TsDecl>]> {
        match self {
            Self::Namespace(d) => Some(&d.members),
            Self::Module(d) => Some(&d.members),
            _ => None,
        }
    }

    pub fn is_interface_or_class(&self) -> bool {
        matches!(self, Self::Interface(_) | Self::Class(_))
    }

    /// Whether this declaration can be the target of a type position lookup.
    pub fn is_type_decl(&self) -> bool {
        matches!(
            self,
            Self::Interface(_) | Self::Class(_) | Self::TypeAlias(_) | Self::Enum(_)
        )
    }

    /// Declared parent references: `extends` for interfaces, `extends` +
    /// `implements` for classes, in declaration order.
    pub fn heritage(&self) -> Vec<&TsTypeRef> {
        match self {
            Self::Interface(d) => d.inheritance.iter().collect(),
            Self::Class(d) => d.parent.iter().chain(d.implements.iter()).collect(),
            _ => Vec::new(),
        }
    }
}

/// An import (or re-export) with a module specifier, recorded for
/// dependency discovery.
#[derive(Clone, Debug, PartialEq)]
pub struct TsImport {
    pub from: String,
}

/// A parsed declaration file: top-level members plus the module specifiers
/// it imports from.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct TsParsedFile {
    pub members: Vec<Arc<TsDecl>>,
    pub imports: Vec<TsImport>,
}

impl TsParsedFile {
    pub fn new(members: Vec<Arc<TsDecl>>, imports: Vec<TsImport>) -> Self {
        Self { members, imports }
    }

    /// Combine several parsed files into one tree, preserving order. Used to
    /// treat a library's files as a single compilation unit.
    pub fn merged(files: impl IntoIterator<Item = TsParsedFile>) -> Self {
        let mut members = Vec::new();
        let mut imports = Vec::new();
        for file in files {
            members.extend(file.members);
            imports.extend(file.imports);
        }
        Self { members, imports }
    }
}

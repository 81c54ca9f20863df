//! Identifier types.
//!
//! `TsIdentLibrary` is the unit of dependency-graph scheduling: the phase
//! pipeline is keyed by it, and the library resolver maps it to a source
//! folder on disk. Equality is structural everywhere.

use smallvec::SmallVec;
use std::fmt;

/// A simple (unqualified) TypeScript identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TsIdent(String);

impl TsIdent {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TsIdent {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TsIdent {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TsIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A qualified name such as `React.Component`. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TsQIdent {
    parts: SmallVec<[TsIdent; 4]>,
}

impl TsQIdent {
    /// Build from parts. Panics on an empty list; qualified names are
    /// non-empty by construction.
    pub fn of(parts: impl IntoIterator<Item = TsIdent>) -> Self {
        let parts: SmallVec<[TsIdent; 4]> = parts.into_iter().collect();
        assert!(!parts.is_empty(), "TsQIdent must have at least one part");
        Self { parts }
    }

    pub fn single(part: impl Into<TsIdent>) -> Self {
        Self::of([part.into()])
    }

    /// Parse a dotted name, e.g. `"a.b.c"`.
    pub fn parse(name: &str) -> Self {
        Self::of(name.split('.').map(TsIdent::from))
    }

    pub fn parts(&self) -> &[TsIdent] {
        &self.parts
    }

    pub fn head(&self) -> &TsIdent {
        &self.parts[0]
    }

    /// Split into the first fragment and the remainder, the shape lookup
    /// consumes one step at a time.
    pub fn split_head(&self) -> (&TsIdent, &[TsIdent]) {
        (&self.parts[0], &self.parts[1..])
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl fmt::Display for TsQIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

/// An npm-style library name, either simple (`lodash`) or scoped
/// (`@types/node`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TsIdentLibrary {
    Simple(String),
    Scoped { scope: String, name: String },
}

impl TsIdentLibrary {
    /// Parse an npm package name. `@scope/name` becomes `Scoped`; everything
    /// else is `Simple`.
    pub fn parse(value: &str) -> Self {
        if let Some(rest) = value.strip_prefix('@')
            && let Some((scope, name)) = rest.split_once('/')
        {
            return Self::Scoped {
                scope: scope.to_string(),
                name: name.to_string(),
            };
        }
        Self::Simple(value.to_string())
    }

    /// The synthetic standard-library pseudo-package.
    pub fn std_lib() -> Self {
        Self::Simple("std".to_string())
    }
}

impl From<&str> for TsIdentLibrary {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl fmt::Display for TsIdentLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(name) => f.write_str(name),
            Self::Scoped { scope, name } => write!(f, "@{scope}/{name}"),
        }
    }
}

/// A module name as it appears in an import specifier, e.g. `@angular/core`
/// or `lodash/fp`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TsIdentModule {
    pub scope: Option<String>,
    pub fragments: Vec<String>,
}

impl TsIdentModule {
    pub fn new(scope: Option<String>, fragments: Vec<String>) -> Self {
        Self { scope, fragments }
    }

    /// The module name a library is imported as when no path fragments are
    /// given, e.g. `react` or `@angular/core`.
    pub fn from_library(lib: &TsIdentLibrary) -> Self {
        match lib {
            TsIdentLibrary::Simple(name) => Self::new(None, vec![name.clone()]),
            TsIdentLibrary::Scoped { scope, name } => {
                Self::new(Some(scope.clone()), vec![name.clone()])
            }
        }
    }

    /// Parse a bare import specifier, e.g. `"@scope/lib/sub"` or `"lib/sub"`.
    pub fn parse(specifier: &str) -> Self {
        if let Some(rest) = specifier.strip_prefix('@')
            && let Some((scope, rest)) = rest.split_once('/')
        {
            return Self::new(
                Some(scope.to_string()),
                rest.split('/').map(str::to_string).collect(),
            );
        }
        Self::new(None, specifier.split('/').map(str::to_string).collect())
    }

    /// The library this module belongs to (its leading segment, or
    /// scope + leading segment).
    pub fn library(&self) -> Option<TsIdentLibrary> {
        let head = self.fragments.first()?;
        Some(match &self.scope {
            Some(scope) => TsIdentLibrary::Scoped {
                scope: scope.clone(),
                name: head.clone(),
            },
            None => TsIdentLibrary::Simple(head.clone()),
        })
    }
}

impl fmt::Display for TsIdentModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scope) = &self.scope {
            write!(f, "@{scope}/")?;
        }
        f.write_str(&self.fragments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scoped_library() {
        assert_eq!(
            TsIdentLibrary::parse("@angular/core"),
            TsIdentLibrary::Scoped {
                scope: "angular".to_string(),
                name: "core".to_string()
            }
        );
        assert_eq!(
            TsIdentLibrary::parse("lodash"),
            TsIdentLibrary::Simple("lodash".to_string())
        );
        // A lone "@foo" with no slash is treated as a simple name.
        assert_eq!(
            TsIdentLibrary::parse("@foo"),
            TsIdentLibrary::Simple("@foo".to_string())
        );
    }

    #[test]
    fn library_display_roundtrip() {
        for name in ["@angular/core", "lodash", "@types/node"] {
            assert_eq!(TsIdentLibrary::parse(name).to_string(), name);
        }
    }

    #[test]
    fn module_parse_and_library() {
        let m = TsIdentModule::parse("@scope/lib/sub");
        assert_eq!(m.scope.as_deref(), Some("scope"));
        assert_eq!(m.fragments, vec!["lib", "sub"]);
        assert_eq!(m.library(), Some(TsIdentLibrary::parse("@scope/lib")));
        assert_eq!(m.to_string(), "@scope/lib/sub");

        let m = TsIdentModule::parse("lodash/fp");
        assert_eq!(m.library(), Some(TsIdentLibrary::parse("lodash")));
    }

    #[test]
    fn qident_split() {
        let q = TsQIdent::parse("a.b.c");
        let (head, rest) = q.split_head();
        assert_eq!(head.value(), "a");
        assert_eq!(rest.len(), 2);
        assert_eq!(q.to_string(), "a.b.c");
    }
}

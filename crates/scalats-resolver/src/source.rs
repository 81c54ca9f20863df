//! Library source locations.

use scalats_ast::TsIdentLibrary;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A file known to exist (or expected to) on disk.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InFile(PathBuf);

impl InFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// A folder on disk.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InFolder(PathBuf);

impl InFolder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Where a library's sources come from. Created once during discovery and
/// never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LibrarySource {
    /// The synthetic standard-library pseudo-package with its ordered
    /// constituent files.
    StdLib {
        folder: InFolder,
        files: Vec<InFile>,
        name: TsIdentLibrary,
    },
    /// A concrete on-disk package folder.
    FromFolder {
        folder: InFolder,
        name: TsIdentLibrary,
    },
}

impl LibrarySource {
    pub fn name(&self) -> &TsIdentLibrary {
        match self {
            Self::StdLib { name, .. } => name,
            Self::FromFolder { name, .. } => name,
        }
    }

    pub fn folder(&self) -> &InFolder {
        match self {
            Self::StdLib { folder, .. } => folder,
            Self::FromFolder { folder, .. } => folder,
        }
    }

    pub fn is_std_lib(&self) -> bool {
        matches!(self, Self::StdLib { .. })
    }

    /// The library's declaration entry point: `types`/`typings` from the
    /// package manifest when present, the `main` entry with its extension
    /// rewritten, then `index.d.ts`.
    pub fn entry_file(&self) -> Option<InFile> {
        match self {
            Self::StdLib { files, .. } => files.first().cloned(),
            Self::FromFolder { folder, .. } => {
                let mut candidates: Vec<String> = Vec::new();
                if let Some(manifest) = PackageManifest::read(&folder.path().join("package.json"))
                {
                    for entry in [manifest.types, manifest.typings] {
                        if let Some(entry) = entry {
                            candidates.push(entry);
                        }
                    }
                    if let Some(main) = manifest.main {
                        let main = main.strip_suffix(".js").unwrap_or(&main).to_string();
                        candidates.push(main);
                    }
                }
                candidates.push("index".to_string());
                candidates.iter().find_map(|candidate| {
                    let candidate = candidate.trim_start_matches("./");
                    crate::resolver::LibraryResolver::file(folder, candidate)
                })
            }
        }
    }
}

#[derive(Deserialize)]
struct PackageManifest {
    types: Option<String>,
    typings: Option<String>,
    main: Option<String>,
}

impl PackageManifest {
    fn read(path: &Path) -> Option<Self> {
        let raw = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&raw).ok()
    }
}

/// Outcome of resolving a library identifier. A library present on disk but
/// explicitly excluded reports `Ignored`, never `Found`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LibraryResolverRes<T> {
    Found(T),
    Ignored(TsIdentLibrary),
    NotAvailable(TsIdentLibrary),
}

impl<T> LibraryResolverRes<T> {
    /// Transform only the `Found` payload.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LibraryResolverRes<U> {
        match self {
            Self::Found(value) => LibraryResolverRes::Found(f(value)),
            Self::Ignored(name) => LibraryResolverRes::Ignored(name),
            Self::NotAvailable(name) => LibraryResolverRes::NotAvailable(name),
        }
    }

    /// Collapse `Ignored`/`NotAvailable` to absence.
    pub fn to_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Ignored(_) | Self::NotAvailable(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

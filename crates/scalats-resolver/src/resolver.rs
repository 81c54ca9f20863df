//! Identifier and module-specifier resolution.

use crate::source::{InFile, InFolder, LibraryResolverRes, LibrarySource};
use rustc_hash::{FxHashMap, FxHashSet};
use scalats_ast::{TsIdentLibrary, TsIdentModule};
use std::sync::Arc;
use tracing::debug;

/// A module specifier resolved to its source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedModule {
    /// A file within the library doing the importing.
    Local { file: InFile, name: TsIdentModule },
    /// A module within another library.
    NotLocal {
        source: Arc<LibrarySource>,
        name: TsIdentModule,
    },
}

impl ResolvedModule {
    pub fn name(&self) -> &TsIdentModule {
        match self {
            Self::Local { name, .. } => name,
            Self::NotLocal { name, .. } => name,
        }
    }
}

/// Path segments treated as interchangeable package trees. Many packages
/// ship both CommonJS (`lib/`) and ES-module (`es/`) layouts of the same
/// modules; a file in one should be importable under the other's name.
pub const DEFAULT_SEGMENT_SWAPS: &[(&str, &str)] = &[("lib", "es")];

pub struct LibraryResolver {
    stdlib: Arc<LibrarySource>,
    by_name: FxHashMap<TsIdentLibrary, Arc<LibrarySource>>,
    ignored: FxHashSet<TsIdentLibrary>,
    segment_swaps: Vec<(String, String)>,
}

impl LibraryResolver {
    pub fn new(
        stdlib: Arc<LibrarySource>,
        all_sources: &[Arc<LibrarySource>],
        ignored: impl IntoIterator<Item = TsIdentLibrary>,
    ) -> Self {
        let mut by_name: FxHashMap<TsIdentLibrary, Arc<LibrarySource>> = FxHashMap::default();
        for source in all_sources {
            // first occurrence wins, later duplicates are shadowed
            by_name
                .entry(source.name().clone())
                .or_insert_with(|| Arc::clone(source));
        }
        Self {
            stdlib,
            by_name,
            ignored: ignored.into_iter().collect(),
            segment_swaps: DEFAULT_SEGMENT_SWAPS
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        }
    }

    /// Override the interchangeable-layout segment pairs.
    pub fn with_segment_swaps(mut self, swaps: Vec<(String, String)>) -> Self {
        self.segment_swaps = swaps;
        self
    }

    pub fn std_lib(&self) -> &Arc<LibrarySource> {
        &self.stdlib
    }

    /// Resolve a library identifier. The ignore set takes priority over
    /// everything else, including presence on disk.
    pub fn library(&self, name: &TsIdentLibrary) -> LibraryResolverRes<Arc<LibrarySource>> {
        if self.ignored.contains(name) {
            return LibraryResolverRes::Ignored(name.clone());
        }
        if name == self.stdlib.name() {
            return LibraryResolverRes::Found(Arc::clone(&self.stdlib));
        }
        match self.by_name.get(name) {
            Some(source) => LibraryResolverRes::Found(Arc::clone(source)),
            None => LibraryResolverRes::NotAvailable(name.clone()),
        }
    }

    /// Resolve a module specifier as seen from `folder` within `within`.
    /// Relative specifiers resolve to local files; everything else is
    /// treated as a library reference. Unresolvable globals are expected
    /// and produce `None`, not an error.
    pub fn module(
        &self,
        within: &Arc<LibrarySource>,
        folder: &InFolder,
        specifier: &str,
    ) -> Option<ResolvedModule> {
        if specifier.starts_with('.') || specifier.starts_with('/') {
            // a leading '/' is relative to the library root, not the filesystem root
            let base = if specifier.starts_with('/') {
                within.folder()
            } else {
                folder
            };
            let file = Self::file(base, specifier)?;
            let name = self
                .module_names_for(within, &file)
                .pop()
                .expect("module_names_for is never empty");
            Some(ResolvedModule::Local { file, name })
        } else {
            let name = TsIdentModule::parse(specifier);
            let lib = name.library()?;
            match self.library(&lib) {
                LibraryResolverRes::Found(source) => {
                    Some(ResolvedModule::NotLocal { source, name })
                }
                LibraryResolverRes::Ignored(_) | LibraryResolverRes::NotAvailable(_) => {
                    debug!(specifier, lib = %lib, "unresolved global import");
                    None
                }
            }
        }
    }

    /// File-existence search with fixed priority: the exact path, then
    /// `.ts`, then `.d.ts`, then `/index.d.ts`.
    pub fn file(folder: &InFolder, fragment: &str) -> Option<InFile> {
        let rel = fragment.trim_start_matches('/');
        let dir = rel.trim_end_matches('/');
        let candidates = [
            folder.path().join(rel),
            folder.path().join(format!("{rel}.ts")),
            folder.path().join(format!("{rel}.d.ts")),
            folder.path().join(format!("{dir}/index.d.ts")),
        ];
        candidates
            .into_iter()
            .find(|candidate| candidate.is_file())
            .map(InFile::new)
    }

    /// Every module name a file can be imported as, from least to most
    /// specific; the most specific (full path) name is last. Never empty.
    pub fn module_names_for(&self, source: &LibrarySource, file: &InFile) -> Vec<TsIdentModule> {
        let base = TsIdentModule::from_library(source.name());

        let mut fragments: Vec<String> = match file.path().strip_prefix(source.folder().path()) {
            Ok(rel) => rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect(),
            Err(_) => file
                .path()
                .file_name()
                .map(|n| vec![n.to_string_lossy().into_owned()])
                .unwrap_or_default(),
        };
        if let Some(last) = fragments.last_mut() {
            if let Some(stripped) = last.strip_suffix(".d.ts") {
                *last = stripped.to_string();
            } else if let Some(stripped) = last.strip_suffix(".ts") {
                *last = stripped.to_string();
            }
        }
        fragments.retain(|fragment| fragment != "index");

        let mut full = base.fragments.clone();
        full.extend(fragments);
        let primary = TsIdentModule::new(base.scope.clone(), full.clone());

        let mut names = Vec::new();
        for (a, b) in &self.segment_swaps {
            for (from, to) in [(a, b), (b, a)] {
                if full.iter().any(|fragment| fragment == from) {
                    let swapped = full
                        .iter()
                        .map(|fragment| {
                            if fragment == from {
                                to.clone()
                            } else {
                                fragment.clone()
                            }
                        })
                        .collect();
                    names.push(TsIdentModule::new(base.scope.clone(), swapped));
                }
            }
        }
        names.push(primary);
        names
    }
}

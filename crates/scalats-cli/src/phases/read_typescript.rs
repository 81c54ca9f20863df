//! Phase 1: locate a library on disk, parse its declaration files, and
//! resolve its imports into pipeline dependencies.

use crate::discover::declaration_files;
use scalats_ast::parser::parse_file;
use scalats_ast::{TsIdentLibrary, TsParsedFile};
use scalats_phases::{GetDeps, Phase, PhaseError, PhaseRes};
use scalats_resolver::{LibraryResolver, LibraryResolverRes, LibrarySource, ResolvedModule};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// A parsed library with its resolved dependencies. Cheap to clone; the
/// parsed tree and the dependency map are shared.
#[derive(Clone, Debug)]
pub struct LibTs {
    pub name: TsIdentLibrary,
    pub source: Arc<LibrarySource>,
    pub parsed: Arc<TsParsedFile>,
    pub deps: Arc<BTreeMap<TsIdentLibrary, LibTs>>,
}

pub struct ReadTypescript {
    pub resolver: Arc<LibraryResolver>,
}

impl Phase<TsIdentLibrary> for ReadTypescript {
    type In = TsIdentLibrary;
    type Out = LibTs;

    fn apply(
        &self,
        id: &TsIdentLibrary,
        _value: &TsIdentLibrary,
        get_deps: GetDeps<'_, TsIdentLibrary, LibTs>,
        is_circular: bool,
    ) -> PhaseRes<TsIdentLibrary, LibTs> {
        let source = match self.resolver.library(id) {
            LibraryResolverRes::Found(source) => source,
            LibraryResolverRes::Ignored(_) => return PhaseRes::Ignore,
            LibraryResolverRes::NotAvailable(name) => {
                let mut errors = BTreeMap::new();
                errors.insert(
                    id.clone(),
                    PhaseError::Msg(format!("library {name} is not available")),
                );
                return PhaseRes::Failure(errors);
            }
        };

        let files = match &*source {
            LibrarySource::StdLib { files, .. } => files.clone(),
            LibrarySource::FromFolder { folder, .. } => declaration_files(folder.path()),
        };
        if files.is_empty() {
            let mut errors = BTreeMap::new();
            errors.insert(
                id.clone(),
                PhaseError::Msg("no declaration files found".to_string()),
            );
            return PhaseRes::Failure(errors);
        }

        let mut parsed_files = Vec::with_capacity(files.len());
        for file in &files {
            match std::fs::read_to_string(file.path()) {
                Ok(content) => parsed_files.push(parse_file(&content)),
                Err(err) => {
                    warn!(file = %file.path().display(), error = %err, "failed to read declaration file")
                }
            }
        }
        let parsed = Arc::new(TsParsedFile::merged(parsed_files));

        // non-relative imports of known libraries become dependencies;
        // relative imports stay within this library, unresolvable globals
        // are tolerated
        let mut wanted: BTreeSet<TsIdentLibrary> = BTreeSet::new();
        for import in &parsed.imports {
            let specifier = import.from.as_str();
            if specifier.starts_with('.') || specifier.starts_with('/') {
                continue;
            }
            if let Some(ResolvedModule::NotLocal { source: dep, .. }) =
                self.resolver.module(&source, source.folder(), specifier)
                && dep.name() != id
            {
                wanted.insert(dep.name().clone());
            }
        }

        if is_circular {
            debug!(lib = %id, "circular dependency, producing a reduced value");
            return PhaseRes::Ok(LibTs {
                name: id.clone(),
                source,
                parsed,
                deps: Arc::new(BTreeMap::new()),
            });
        }

        get_deps(wanted).map(|deps| LibTs {
            name: id.clone(),
            source,
            parsed,
            deps: Arc::new(deps),
        })
    }
}

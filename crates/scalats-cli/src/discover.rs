//! Discovery of candidate library folders and declaration files.

use scalats_ast::TsIdentLibrary;
use scalats_resolver::{InFile, InFolder, LibrarySource};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Enumerate package folders under an npm-style root. Scoped packages live
/// one level down inside `@scope` folders; hidden folders are skipped. The
/// result is sorted by name so discovery order is reproducible.
pub fn discover_sources(root: &Path) -> Vec<Arc<LibrarySource>> {
    let mut folders: Vec<(String, PathBuf)> = Vec::new();
    let Ok(entries) = std::fs::read_dir(root) else {
        return Vec::new();
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if name.starts_with('@') {
            if let Ok(scoped) = std::fs::read_dir(&path) {
                for scoped_entry in scoped.flatten() {
                    let scoped_path = scoped_entry.path();
                    if scoped_path.is_dir() {
                        let scoped_name = scoped_entry.file_name().to_string_lossy().into_owned();
                        folders.push((format!("{name}/{scoped_name}"), scoped_path));
                    }
                }
            }
            continue;
        }
        folders.push((name, path));
    }
    folders.sort();

    folders
        .into_iter()
        .map(|(name, path)| {
            debug!(lib = %name, "discovered library folder");
            Arc::new(LibrarySource::FromFolder {
                folder: InFolder::new(path),
                name: TsIdentLibrary::parse(&name),
            })
        })
        .collect()
}

/// The standard-library source. Without a folder, the pseudo-package is
/// empty; lookups into it simply find nothing.
pub fn std_lib_source(folder: Option<&Path>) -> Arc<LibrarySource> {
    match folder {
        Some(folder) => Arc::new(LibrarySource::StdLib {
            folder: InFolder::new(folder),
            files: declaration_files(folder),
            name: TsIdentLibrary::std_lib(),
        }),
        None => Arc::new(LibrarySource::StdLib {
            folder: InFolder::new(PathBuf::new()),
            files: Vec::new(),
            name: TsIdentLibrary::std_lib(),
        }),
    }
}

/// All declaration files under a folder, deterministically ordered. Nested
/// `node_modules` trees are not part of the library itself.
pub fn declaration_files(folder: &Path) -> Vec<InFile> {
    let mut files: Vec<InFile> = walkdir::WalkDir::new(folder)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != "node_modules")
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".d.ts"))
        .map(|entry| InFile::new(entry.into_path()))
        .collect();
    files.sort();
    files
}

//! On-disk resolution behavior.

use scalats_ast::{TsIdentLibrary, TsIdentModule};
use scalats_resolver::{
    InFile, InFolder, LibraryResolver, LibraryResolverRes, LibrarySource, ResolvedModule,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn std_lib_in(dir: &Path) -> Arc<LibrarySource> {
    let folder = dir.join("stdlib");
    fs::create_dir_all(&folder).unwrap();
    let file = folder.join("lib.es5.d.ts");
    fs::write(&file, "declare var NaN: number;\n").unwrap();
    Arc::new(LibrarySource::StdLib {
        folder: InFolder::new(&folder),
        files: vec![InFile::new(&file)],
        name: TsIdentLibrary::std_lib(),
    })
}

fn from_folder(dir: &Path, name: &str) -> Arc<LibrarySource> {
    let folder = match TsIdentLibrary::parse(name) {
        TsIdentLibrary::Scoped { scope, name } => dir.join(format!("@{scope}")).join(name),
        TsIdentLibrary::Simple(name) => dir.join(name),
    };
    fs::create_dir_all(&folder).unwrap();
    Arc::new(LibrarySource::FromFolder {
        folder: InFolder::new(&folder),
        name: TsIdentLibrary::parse(name),
    })
}

#[test]
fn resolves_scoped_library() {
    let tmp = TempDir::new().unwrap();
    let stdlib = std_lib_in(tmp.path());
    let core = from_folder(tmp.path(), "@angular/core");
    let resolver = LibraryResolver::new(stdlib, &[core.clone()], []);

    match resolver.library(&TsIdentLibrary::parse("@angular/core")) {
        LibraryResolverRes::Found(source) => assert_eq!(source, core),
        other => panic!("expected Found, got {other:?}"),
    }
    assert_eq!(
        resolver.library(&TsIdentLibrary::parse("@angular/other")),
        LibraryResolverRes::NotAvailable(TsIdentLibrary::parse("@angular/other"))
    );
}

#[test]
fn ignored_takes_priority_over_present() {
    let tmp = TempDir::new().unwrap();
    let stdlib = std_lib_in(tmp.path());
    let lodash = from_folder(tmp.path(), "lodash");
    let resolver = LibraryResolver::new(
        stdlib,
        &[lodash],
        [TsIdentLibrary::parse("lodash")],
    );

    assert_eq!(
        resolver.library(&TsIdentLibrary::parse("lodash")),
        LibraryResolverRes::Ignored(TsIdentLibrary::parse("lodash"))
    );
}

#[test]
fn std_lib_resolves_by_name() {
    let tmp = TempDir::new().unwrap();
    let stdlib = std_lib_in(tmp.path());
    let resolver = LibraryResolver::new(stdlib.clone(), &[], []);

    match resolver.library(&TsIdentLibrary::std_lib()) {
        LibraryResolverRes::Found(source) => assert!(source.is_std_lib()),
        other => panic!("expected Found, got {other:?}"),
    }
}

#[test]
fn duplicate_sources_resolve_to_first() {
    let tmp = TempDir::new().unwrap();
    let stdlib = std_lib_in(tmp.path());
    let first = from_folder(tmp.path(), "dup");
    // same name, different folder
    let second_folder = tmp.path().join("elsewhere");
    fs::create_dir_all(&second_folder).unwrap();
    let second = Arc::new(LibrarySource::FromFolder {
        folder: InFolder::new(&second_folder),
        name: TsIdentLibrary::parse("dup"),
    });
    let resolver = LibraryResolver::new(stdlib, &[first.clone(), second], []);

    match resolver.library(&TsIdentLibrary::parse("dup")) {
        LibraryResolverRes::Found(source) => assert_eq!(source, first),
        other => panic!("expected Found, got {other:?}"),
    }
}

#[test]
fn file_prefers_exact_match() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("test"), "").unwrap();
    fs::write(tmp.path().join("test.ts"), "").unwrap();
    fs::write(tmp.path().join("test.d.ts"), "").unwrap();

    let found = LibraryResolver::file(&InFolder::new(tmp.path()), "test").unwrap();
    assert_eq!(found.path(), tmp.path().join("test"));
}

#[test]
fn file_falls_back_through_extensions() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.d.ts"), "").unwrap();
    fs::create_dir_all(tmp.path().join("b")).unwrap();
    fs::write(tmp.path().join("b/index.d.ts"), "").unwrap();

    let a = LibraryResolver::file(&InFolder::new(tmp.path()), "a").unwrap();
    assert_eq!(a.path(), tmp.path().join("a.d.ts"));
    let b = LibraryResolver::file(&InFolder::new(tmp.path()), "b").unwrap();
    assert_eq!(b.path(), tmp.path().join("b/index.d.ts"));
    assert_eq!(LibraryResolver::file(&InFolder::new(tmp.path()), "c"), None);
}

#[test]
fn relative_specifier_resolves_locally() {
    let tmp = TempDir::new().unwrap();
    let stdlib = std_lib_in(tmp.path());
    let lib = from_folder(tmp.path(), "mylib");
    let src = lib.folder().path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("utils.ts"), "export function helper(): void;\n").unwrap();
    let resolver = LibraryResolver::new(stdlib, &[lib.clone()], []);

    let resolved = resolver
        .module(&lib, &InFolder::new(&src), "./utils")
        .unwrap();
    match resolved {
        ResolvedModule::Local { file, name } => {
            assert_eq!(file.path(), src.join("utils.ts"));
            assert_eq!(name.to_string(), "mylib/src/utils");
        }
        other => panic!("expected Local, got {other:?}"),
    }
}

#[test]
fn root_relative_specifier_resolves_from_library_root() {
    let tmp = TempDir::new().unwrap();
    let stdlib = std_lib_in(tmp.path());
    let lib = from_folder(tmp.path(), "mylib");
    fs::write(lib.folder().path().join("shared.d.ts"), "").unwrap();
    let nested = lib.folder().path().join("deep/nested");
    fs::create_dir_all(&nested).unwrap();
    let resolver = LibraryResolver::new(stdlib, &[lib.clone()], []);

    let resolved = resolver
        .module(&lib, &InFolder::new(&nested), "/shared")
        .unwrap();
    match resolved {
        ResolvedModule::Local { file, .. } => {
            assert_eq!(file.path(), lib.folder().path().join("shared.d.ts"));
        }
        other => panic!("expected Local, got {other:?}"),
    }
}

#[test]
fn global_specifier_resolves_to_other_library() {
    let tmp = TempDir::new().unwrap();
    let stdlib = std_lib_in(tmp.path());
    let lib = from_folder(tmp.path(), "mylib");
    let react = from_folder(tmp.path(), "react");
    let resolver = LibraryResolver::new(stdlib, &[lib.clone(), react.clone()], []);

    let resolved = resolver
        .module(&lib, lib.folder(), "react")
        .unwrap();
    match resolved {
        ResolvedModule::NotLocal { source, name } => {
            assert_eq!(source, react);
            assert_eq!(name, TsIdentModule::parse("react"));
        }
        other => panic!("expected NotLocal, got {other:?}"),
    }

    // unresolvable and ignored globals are tolerated, not errors
    assert_eq!(resolver.module(&lib, lib.folder(), "missing"), None);
}

#[test]
fn module_names_include_layout_swaps() {
    let tmp = TempDir::new().unwrap();
    let stdlib = std_lib_in(tmp.path());
    let lib = from_folder(tmp.path(), "antd");
    let button = lib.folder().path().join("lib/button");
    fs::create_dir_all(&button).unwrap();
    fs::write(button.join("index.d.ts"), "").unwrap();
    let resolver = LibraryResolver::new(stdlib, &[lib.clone()], []);

    let file = InFile::new(button.join("index.d.ts"));
    let names = resolver.module_names_for(&lib, &file);
    let rendered: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    assert_eq!(rendered, vec!["antd/es/button", "antd/lib/button"]);
    // the most specific (on-disk) name is last by convention
    assert_eq!(rendered.last().unwrap(), "antd/lib/button");
}

#[test]
fn module_name_for_entry_file_is_the_bare_library() {
    let tmp = TempDir::new().unwrap();
    let stdlib = std_lib_in(tmp.path());
    let lib = from_folder(tmp.path(), "@scope/pkg");
    fs::write(lib.folder().path().join("index.d.ts"), "").unwrap();
    let resolver = LibraryResolver::new(stdlib, &[lib.clone()], []);

    let file = InFile::new(lib.folder().path().join("index.d.ts"));
    let names = resolver.module_names_for(&lib, &file);
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].to_string(), "@scope/pkg");
}

#[test]
fn entry_file_honors_package_manifest() {
    let tmp = TempDir::new().unwrap();
    let lib = from_folder(tmp.path(), "withtypes");
    fs::write(
        lib.folder().path().join("package.json"),
        r#"{ "name": "withtypes", "main": "./lib/index.js", "types": "./custom.d.ts" }"#,
    )
    .unwrap();
    fs::write(lib.folder().path().join("custom.d.ts"), "").unwrap();

    let entry = lib.entry_file().unwrap();
    assert_eq!(entry.path(), lib.folder().path().join("custom.d.ts"));
}

#[test]
fn entry_file_falls_back_to_index() {
    let tmp = TempDir::new().unwrap();
    let lib = from_folder(tmp.path(), "plain");
    fs::write(lib.folder().path().join("index.d.ts"), "").unwrap();

    let entry = lib.entry_file().unwrap();
    assert_eq!(entry.path(), lib.folder().path().join("index.d.ts"));
}

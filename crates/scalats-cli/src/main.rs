//! scalats: analyze TypeScript declaration libraries for Scala.js
//! conversion.

use anyhow::Result;
use clap::Parser;
use scalats_ast::TsIdentLibrary;
use scalats_cli::args::CliArgs;
use scalats_cli::config::Config;
use scalats_cli::discover::{discover_sources, std_lib_source};
use scalats_cli::phases::{ReadTypescript, ResolveInheritance};
use scalats_cli::report::report_line;
use scalats_phases::{PhaseEvent, PhaseListener, PhaseRunner, PipelineExt, RecPhase};
use scalats_resolver::LibraryResolver;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Forwards pipeline lifecycle events to the tracing subscriber.
struct LogListener;

impl PhaseListener<TsIdentLibrary> for LogListener {
    fn on(&self, phase_name: &'static str, id: &TsIdentLibrary, event: PhaseEvent<TsIdentLibrary>) {
        match event {
            PhaseEvent::Blocked(deps) => {
                tracing::debug!(phase = phase_name, lib = %id, ?deps, "blocked on dependencies")
            }
            event => tracing::debug!(phase = phase_name, lib = %id, ?event, "phase event"),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match run() {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<usize> {
    let args = CliArgs::parse();
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let pedantic = args.pedantic || config.pedantic.unwrap_or(false);
    let stdlib_folder = args.stdlib.clone().or_else(|| config.stdlib.clone());

    let sources = discover_sources(&args.root);
    anyhow::ensure!(
        !sources.is_empty(),
        "no libraries found under {}",
        args.root.display()
    );

    let ignored = args
        .ignored
        .iter()
        .chain(config.ignored.iter())
        .map(|name| TsIdentLibrary::parse(name));
    let resolver = Arc::new(LibraryResolver::new(
        std_lib_source(stdlib_folder.as_deref()),
        &sources,
        ignored,
    ));

    let wanted: Vec<TsIdentLibrary> = if args.libs.is_empty() {
        sources.iter().map(|source| source.name().clone()).collect()
    } else {
        args.libs
            .iter()
            .map(|name| TsIdentLibrary::parse(name))
            .collect()
    };

    let pipeline = RecPhase::initial::<TsIdentLibrary>()
        .next(
            ReadTypescript {
                resolver: Arc::clone(&resolver),
            },
            "read-typescript",
        )
        .next(ResolveInheritance { pedantic }, "resolve-inheritance");
    let listener = LogListener;
    let mut runner = PhaseRunner::new(pipeline, &listener);

    let mut failed = 0;
    for lib in &wanted {
        let res = runner.run(lib);
        let (line, is_failure) = report_line(lib, &res);
        println!("{line}");
        if is_failure {
            failed += 1;
        }
    }
    Ok(failed)
}

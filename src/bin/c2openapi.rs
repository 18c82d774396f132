//! `c2openapi <src_dir> <out.json>` — extract an OpenAPI description from annotated C
//! sources.
//!
//! Walks `src_dir` recursively, processes `.c`/`.h` files, and writes the aggregated spec as
//! pretty-printed JSON. Exit codes: 0 success, 1 usage error, 2 I/O error, 3 validation
//! error. Stdout reports each scanned file; stderr reports the first error.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::debug;
use walkdir::WalkDir;

use c2openapi::extract::{extract_source, register_types, Aggregator, SchemaRegistry};
use c2openapi::{validation, ErrorKind};

const EXIT_USAGE: u8 = 1;
const EXIT_IO: u8 = 2;
const EXIT_VALIDATION: u8 = 3;

#[derive(Debug, Parser)]
#[command(
    name = "c2openapi",
    about = "Extract an OpenAPI description from annotated C sources",
    version
)]
struct Args {
    /// Directory walked recursively for `.c` and `.h` files.
    src_dir: PathBuf,

    /// Output file for the aggregated spec, as pretty-printed JSON.
    out: PathBuf,
}

fn main() -> ExitCode {
    pretty_env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // clap renders its own message (also for --help/--version, which are not
            // usage errors).
            let is_usage_error = err.use_stderr();
            let _ = err.print();
            return if is_usage_error {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("c2openapi: {err}");
            match err.kind() {
                ErrorKind::Io => ExitCode::from(EXIT_IO),
                _ => ExitCode::from(EXIT_VALIDATION),
            }
        }
    }
}

fn run(args: &Args) -> Result<(), c2openapi::Error> {
    let files = collect_sources(&args.src_dir)?;
    debug!("found {} source files under {}", files.len(), args.src_dir.display());

    let mut registry = SchemaRegistry::new();
    let mut aggregator = Aggregator::new();

    // First pass: types only, so operations can reference structs from any file.
    for path in &files {
        let src = fs::read_to_string(path)?;
        register_types(&src, &mut registry);
    }

    for path in &files {
        println!("{}", path.display());

        let src = fs::read_to_string(path)?;
        let report = extract_source(&src, &mut registry, &mut aggregator)
            .map_err(c2openapi::Error::Extract)?;

        debug!(
            "{}: {} functions, {} operations, {} dropped",
            path.display(),
            report.functions,
            report.operations,
            report.dropped
        );
    }

    aggregator.register_schemas(&registry);
    let spec = aggregator.into_spec();

    validation::validate(&spec).map_err(c2openapi::Error::Validation)?;

    let json = c2openapi::to_json(&spec)?;
    fs::write(&args.out, json)?;

    Ok(())
}

/// Collects `.c`/`.h` files under the source directory, headers first so type declarations
/// land before their uses, then alphabetical for deterministic output.
fn collect_sources(src_dir: &Path) -> Result<Vec<PathBuf>, c2openapi::Error> {
    let mut files = Vec::new();

    for entry in WalkDir::new(src_dir).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            c2openapi::Error::Io(
                err.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("walk error")),
            )
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        match entry.path().extension().and_then(|ext| ext.to_str()) {
            Some("c") | Some("h") => files.push(entry.into_path()),
            _ => {}
        }
    }

    files.sort_by_key(|path| {
        let is_header = path.extension().is_some_and(|ext| ext == "h");
        (!is_header, path.clone())
    });

    Ok(files)
}

//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `refshelf_core` linkage with a deterministic probe.
//! - Print a saved library in one citation dialect.
//!
//! Usage: `refshelf_cli [<dataset.json> [bibtex|harvard|dstu]]`
//! Set `REFSHELF_LOG_DIR` to an absolute path to enable file logging.

use refshelf_core::persist::render_export;
use refshelf_core::{CitationFormat, InMemoryLibrary};
use std::process::ExitCode;

const LOG_DIR_ENV: &str = "REFSHELF_LOG_DIR";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(dataset_path) = args.first() else {
        println!("refshelf_core ping={}", refshelf_core::ping());
        println!("refshelf_core version={}", refshelf_core::core_version());
        return ExitCode::SUCCESS;
    };

    let format = match args.get(1).map(|value| value.parse::<CitationFormat>()) {
        None => CitationFormat::BibTex,
        Some(Ok(format)) => format,
        Some(Err(err)) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        if let Err(err) = refshelf_core::init_logging(refshelf_core::default_log_level(), &log_dir)
        {
            eprintln!("logging disabled: {err}");
        }
    }

    let mut library = InMemoryLibrary::in_memory();
    if let Err(err) = library.load_from_file(dataset_path) {
        eprintln!("failed to load library: {err}");
        return ExitCode::FAILURE;
    }

    eprintln!(
        "{} references as {}",
        library.get_all_references().len(),
        format.label()
    );
    print!("{}", render_export(format, library.get_all_references()));

    let report = library.audit();
    println!(
        "references={} contexts={} orphaned_contexts={} dangling_context_links={} dangling_related_links={}",
        library.get_all_references().len(),
        library.get_all_contexts().len(),
        report.orphaned_contexts.len(),
        report.unknown_context_links.len(),
        report.unknown_related_links.len()
    );
    ExitCode::SUCCESS
}

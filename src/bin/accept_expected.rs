//! Binary to generate/update .expected.go and .expected.err files
//!
//! Usage:
//!   cargo run --bin accept_expected            # Update all
//!   cargo run --bin accept_expected -- orders  # Update only tests matching "orders"

use std::fs;
use std::path::Path;
use stmtgen::{Options, Pipeline, PlaceholderMode, ReturnShape};
use walkdir::WalkDir;

fn main() {
    let filter: Option<String> = std::env::args().nth(1);
    let test_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests");

    let mut updated = 0;
    let mut skipped = 0;

    for entry in WalkDir::new(&test_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|s| s == "sql").unwrap_or(false))
    {
        let path = entry.path();
        let path_str = path.to_string_lossy();

        // Apply filter if provided
        if let Some(ref f) = filter {
            if !path_str.contains(f) {
                skipped += 1;
                continue;
            }
        }

        if process_file(path) {
            updated += 1;
        } else {
            skipped += 1;
        }
    }

    println!("Updated {} files, skipped {}", updated, skipped);
}

/// Options encoded in a fixture's directory name, e.g. `named_keyed`.
fn fixture_options(path: &Path) -> Option<Options> {
    let dir = path.parent()?.file_name()?.to_str()?;
    let (placeholder, return_shape) = match dir {
        "named_keyed" => (PlaceholderMode::Named, ReturnShape::Keyed),
        "sequential_ordered" | "errors" => (PlaceholderMode::Sequential, ReturnShape::Ordered),
        "positional_ordered" => (PlaceholderMode::Positional, ReturnShape::Ordered),
        _ => return None,
    };
    Some(Options { placeholder, return_shape, ..Options::default() })
}

fn process_file(path: &Path) -> bool {
    let Some(options) = fixture_options(path) else {
        eprintln!("No options known for {:?}", path);
        return false;
    };

    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {:?}: {}", path, e);
            return false;
        }
    };

    let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("statements");
    let filename = path.file_name().and_then(|s| s.to_str()).unwrap_or("unknown");
    let is_error_test = path.to_string_lossy().contains("/errors/");

    let pipeline = match Pipeline::new(options) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Invalid options for {:?}: {}", path, e);
            return false;
        }
    };

    match pipeline.compile(name, &source) {
        Ok(module) if !is_error_test => {
            let expected = path.with_extension("expected.go");
            write(&expected, &module.code)
        }
        Ok(_) => {
            eprintln!("Expected an error from {:?} but it compiled", path);
            false
        }
        Err(e) if is_error_test => {
            let expected = path.with_extension("expected.err");
            write(&expected, &e.render(&source, filename))
        }
        Err(e) => {
            eprintln!("Compile error for {:?}: {}", path, e);
            false
        }
    }
}

fn write(path: &Path, content: &str) -> bool {
    match fs::write(path, content) {
        Ok(()) => {
            println!("  ✓ {}", path.display());
            true
        }
        Err(e) => {
            eprintln!("Failed to write {:?}: {}", path, e);
            false
        }
    }
}

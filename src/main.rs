//! Cellcalc - evaluate spreadsheet formulas from the command line

mod config;
mod error;

use anyhow::{Context, Result, anyhow};
use cellcalc_core::{CellRef, CoreError, Document};
use cellcalc_engine::builtins::{FUNCTIONS, OPERATORS};
use cellcalc_engine::engine::format_result;
use config::Config;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

fn print_usage() {
    eprintln!("Usage: cellcalc [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Sheet to load (.grd or .json)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <FORMULA>   Evaluate a formula and print the result");
    eprintln!("  -s, --set <CELL=INPUT>    Set a cell before evaluating (can be repeated)");
    eprintln!("  -o, --output <FILE>       Save the sheet after edits (.grd or .json)");
    eprintln!("  -l, --list                List operators and functions");
    eprintln!("  --strict                  Reject unrecognized formula fragments");
    eprintln!("  --config <FILE>           Read settings from FILE instead of config.toml");
    eprintln!("  -h, --help                Print help");
}

#[derive(Debug, Default)]
struct Options {
    file_path: Option<PathBuf>,
    command: Option<String>,
    edits: Vec<String>,
    output_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    strict: bool,
    list: bool,
}

fn usage_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    print_usage();
    std::process::exit(1);
}

fn parse_args(args: &[String]) -> Options {
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            "-c" | "--command" => {
                i += 1;
                if i >= args.len() {
                    usage_error("--command requires a formula");
                }
                options.command = Some(args[i].to_string());
            }
            "-s" | "--set" => {
                i += 1;
                if i >= args.len() {
                    usage_error("--set requires CELL=INPUT");
                }
                options.edits.push(args[i].to_string());
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    usage_error("--output requires a file path");
                }
                options.output_file = Some(PathBuf::from(&args[i]));
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    usage_error("--config requires a file path");
                }
                options.config_file = Some(PathBuf::from(&args[i]));
            }
            "--strict" => options.strict = true,
            "-l" | "--list" => options.list = true,
            arg if arg.starts_with('-') => {
                usage_error(&format!("Unknown option: {}", arg));
            }
            _ => {
                if options.file_path.is_none() {
                    options.file_path = Some(PathBuf::from(&args[i]));
                } else {
                    usage_error(&format!("Unexpected argument: {}", args[i]));
                }
            }
        }
        i += 1;
    }

    options
}

fn print_builtins() {
    println!("Operators:");
    for op in OPERATORS {
        println!("  {:<8} {} (precedence {})", op.symbol, op.description, op.precedence);
    }
    println!("Functions:");
    for func in FUNCTIONS {
        println!("  {:<8} {}", func.name, func.description);
    }
}

/// Apply a `CELL=INPUT` edit. The input keeps any `=` after the first one.
fn apply_edit(doc: &mut Document, edit: &str) -> Result<()> {
    let (cell, input) = edit
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected CELL=INPUT, got '{}'", edit))?;
    let cell_ref = CellRef::parse(&cell.trim().to_ascii_uppercase())
        .ok_or_else(|| anyhow!("Invalid cell reference: {}", cell.trim()))?;
    doc.set_cell_from_input(cell_ref, input)
        .with_context(|| format!("Failed to set {}", cell.trim()))
}

fn error_marker(err: &CoreError) -> String {
    match err {
        CoreError::Engine(e) => format_result(&Err(e.clone())),
        _ => "#ERR!".to_string(),
    }
}

/// Recalculate and print every non-empty cell as `CELL: value`.
fn print_sheet(doc: &Document) {
    let mut values = HashMap::new();
    doc.recalculate(&mut |c: &CellRef, v: &cellcalc_engine::Result<f64>| {
        values.insert(c.clone(), format_result(v));
    });

    for (cell_ref, _) in doc.store.cells() {
        let shown = values
            .remove(&cell_ref)
            .unwrap_or_else(|| doc.cell_display(&cell_ref));
        println!("{}: {}", cell_ref, shown);
    }
}

fn run(options: Options) -> Result<i32> {
    if options.list {
        print_builtins();
        return Ok(0);
    }

    let config = Config::load(options.config_file.as_deref())?;

    let mut doc = Document::with_file(options.file_path.clone()).with_context(|| {
        format!(
            "Failed to load {}",
            options
                .file_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        )
    })?;
    doc.strict = options.strict || config.strict;

    for edit in &options.edits {
        apply_edit(&mut doc, edit)?;
    }

    let mut code = 0;
    if let Some(formula) = &options.command {
        match doc.evaluate(formula) {
            Ok(value) => println!("{}", format_result(&Ok(value))),
            Err(e) => {
                println!("{}", error_marker(&e));
                eprintln!("Error: {}", e);
                code = 1;
            }
        }
    } else if options.file_path.is_some() || !options.edits.is_empty() {
        print_sheet(&doc);
    } else if options.output_file.is_none() {
        print_usage();
        return Ok(1);
    }

    if let Some(output_path) = &options.output_file {
        doc.save_as(output_path)
            .with_context(|| format!("Failed to save {}", output_path.display()))?;
        eprintln!("Saved to {}", output_path.display());
    }

    Ok(code)
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);

    match run(options) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

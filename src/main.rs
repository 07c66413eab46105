//! Cellgrid - an in-memory spreadsheet engine with a thin CLI front end.

use std::env;

use cellgrid_core::{Position, Sheet};

/// Evaluate a single formula at A1 in a fresh sheet and print its display
/// value to stdout. Exits non-zero if evaluation yields a `FormulaError`
/// value or the write itself is rejected.
fn run_command_mode(formula: &str) -> anyhow::Result<()> {
    let mut sheet = Sheet::new();
    let a1 = Position::new(0, 0);

    let text = if formula.starts_with('=') {
        formula.to_string()
    } else {
        format!("={}", formula)
    };

    sheet
        .set_cell(a1, &text)
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let value = sheet.value_at(a1).map_err(|e| anyhow::anyhow!("{e}"))?;

    println!("{}", value.display_string());

    if matches!(value, cellgrid_core::Value::Error(_)) {
        std::process::exit(1);
    }
    Ok(())
}

/// Run a `;`-separated sequence of `A1=...` assignments against one sheet,
/// then print the sheet with `print_values`.
fn run_script_mode(script: &str) -> anyhow::Result<()> {
    let mut sheet = Sheet::new();

    for statement in script.split(';') {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        let (cell_ref, text) = statement
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("malformed assignment: {statement:?}"))?;
        let pos = Position::from_str(cell_ref.trim())
            .ok_or_else(|| anyhow::anyhow!("invalid cell reference: {cell_ref:?}"))?;
        sheet
            .set_cell(pos, text.trim())
            .map_err(|e| anyhow::anyhow!("{e}"))?;
    }

    let stdout = std::io::stdout();
    sheet.print_values(stdout.lock())?;
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: cellgrid [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <FORMULA>   Evaluate a formula at A1 and print the result");
    eprintln!(
        "  -s, --script <SCRIPT>     Run `;`-separated A1=... assignments, then print the sheet"
    );
    eprintln!("  -h, --help                Print help");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut command_formula: Option<String> = None;
    let mut script: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-c" | "--command" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --command requires a formula string");
                    std::process::exit(1);
                }
                command_formula = Some(args[i].clone());
            }
            "-s" | "--script" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --script requires a script string");
                    std::process::exit(1);
                }
                script = Some(args[i].clone());
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            other => {
                eprintln!("Error: unexpected argument: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let result = match (command_formula, script) {
        (Some(formula), _) => run_command_mode(&formula),
        (None, Some(script)) => run_script_mode(&script),
        (None, None) => {
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

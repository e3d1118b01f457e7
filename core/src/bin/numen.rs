/// Numen CLI
///
/// Runs, parses and inspects Numen programs. Program output goes to stdout,
/// logs and errors to stderr.

use numen_core::cli;

fn main() {
    if let Err(e) = cli::run_cli() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

//! CLI entry point (§6). Exit 0 on success, -1 on any failure — CLI/
//! environment errors (bad arguments, missing files) and compilation
//! errors are both reported the same way at this boundary (§7).

use clap::Parser;
use cslua_cli::cli::Args;
use cslua_cli::compile;

fn main() {
    let args = Args::parse();
    match compile::run(&args) {
        Ok(summary) if summary.failed.is_empty() => {
            println!("compiled {} unit(s)", summary.total);
        }
        Ok(summary) => {
            eprintln!("{} of {} unit(s) failed to compile", summary.failed.len(), summary.total);
            std::process::exit(-1_i32);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(-1_i32);
        }
    }
}

//! isola CLI
//!
//! Inspect WebAssembly modules and isolate single function bodies.

use std::path::PathBuf;

use isola::commands::{dump_file, info_file, isolate_file, parse_isolate_options};

fn main() {
    isola::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "info" => {
            if args.len() < 3 {
                eprintln!("Usage: isola info <file>");
                std::process::exit(1);
            }
            info_file(&args[2]);
        }
        "dump" => {
            if args.len() < 3 {
                eprintln!("Usage: isola dump <file> [-o <out>]");
                std::process::exit(1);
            }
            let output = match &args[3..] {
                [] => None,
                [flag, path] if flag == "-o" => Some(PathBuf::from(path)),
                _ => {
                    eprintln!("Usage: isola dump <file> [-o <out>]");
                    std::process::exit(1);
                }
            };
            dump_file(&args[2], output.as_deref());
        }
        "isolate" => {
            if args.len() < 4 {
                eprintln!("Usage: isola isolate <file> <index> [options]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  -o <path>           Output file (default: stdout)");
                eprintln!("  --emit=<type>       Emit: wat, wasm (default: wat)");
                std::process::exit(1);
            }
            let options = match parse_isolate_options(&args[4..]) {
                Ok(options) => options,
                Err(msg) => {
                    eprintln!("error: {msg}");
                    std::process::exit(1);
                }
            };
            isolate_file(&args[2], &args[3], &options);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("isola {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("isola (WebAssembly function isolation)");
    println!();
    println!("Usage: isola <command> [options]");
    println!();
    println!("Commands:");
    println!("  info <file>              Validate a module and list its functions");
    println!("  dump <file>              Print the whole module as text");
    println!("  isolate <file> <index>   Copy one function into a module of its own");
    println!("  help                     Show this help message");
    println!("  version                  Show version information");
    println!();
    println!("Dump options:");
    println!("  -o <path>           Write the text to a file");
    println!();
    println!("Isolate options:");
    println!("  -o <path>           Output file (default: stdout)");
    println!("  --emit=<type>       Emit: wat, wasm (default: wat)");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=isola=debug) for diagnostics on stderr.");
}

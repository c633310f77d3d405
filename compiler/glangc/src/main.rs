//! glang compiler CLI.

use std::path::Path;

use glangc::commands::{build_file, check_file, format_diagnostic, lex_file};
use glangc::{init_tracing, parse_build_options, BuildOptions};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: glangc lex <file.g>");
                std::process::exit(1);
            }
            if let Err(err) = lex_file(Path::new(&args[2])) {
                fail(&err);
            }
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: glangc check <file.g>");
                std::process::exit(1);
            }
            let path = Path::new(&args[2]);
            let log = match check_file(path) {
                Ok(log) => log,
                Err(err) => fail(&err),
            };
            for diag in &log {
                eprintln!("{}", format_diagnostic(path, diag));
            }
            if !log.is_empty() {
                std::process::exit(1);
            }
        }
        "build" => {
            if args.len() < 3 {
                eprintln!("Usage: glangc build <file.ll> [options]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --target=<triple>   Target triple (default: aarch64-apple-darwin, or native)");
                eprintln!("  --opt=<level>       Optimization: 0, 1, 2, 3, s, z (default: 3)");
                eprintln!("  -o <path>           Output file (default: exec)");
                eprintln!("  -v, --verbose       Verbose output");
                eprintln!();
                eprintln!("Environment:");
                eprintln!("  GLANGC_CC           Native compiler (default: clang)");
                std::process::exit(1);
            }

            let options = match parse_build_options(&args[3..], BuildOptions::from_env()) {
                Ok(options) => options,
                Err(err) => fail(&err),
            };
            match build_file(Path::new(&args[2]), &options) {
                Ok(output) => {
                    if options.verbose && !output.is_empty() {
                        eprint!("{output}");
                    }
                }
                Err(err) => fail(&err),
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("error: unknown command '{command}'");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn fail(err: &dyn std::error::Error) -> ! {
    eprintln!("error: {err}");
    std::process::exit(1);
}

fn print_usage() {
    println!("glangc - the glang compiler");
    println!();
    println!("Usage: glangc <command> [options]");
    println!();
    println!("Commands:");
    println!("  lex <file>      Print every decoded character with its position");
    println!("  check <file>    Report lexical errors");
    println!("  build <file.ll> Compile textual IR to a native executable");
    println!("  help            Show this message");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=glangc=debug) for debug output.");
}

//! jstep CLI
//!
//! Step-through interpreter for a JavaScript subset.

use jstepc::commands::{lex_file, parse_file, parse_run_options, run_file, step_file};

fn main() {
    jstepc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "run" | "step" => {
            let options = match parse_run_options(&args[2..]) {
                Ok(options) => options,
                Err(message) => {
                    eprintln!("error: {message}");
                    eprintln!("Usage: jstep {command} <file.js> [options]");
                    eprintln!();
                    print_run_options();
                    std::process::exit(1);
                }
            };
            let ok = if command == "run" {
                run_file(&options)
            } else {
                step_file(&options)
            };
            if !ok {
                std::process::exit(1);
            }
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: jstep parse <file.js>");
                std::process::exit(1);
            }
            parse_file(&args[2]);
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: jstep lex <file.js>");
                std::process::exit(1);
            }
            lex_file(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("jstep {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            // A bare file path runs it.
            if std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("js"))
            {
                match parse_run_options(&args[1..]) {
                    Ok(options) => {
                        if !run_file(&options) {
                            std::process::exit(1);
                        }
                    }
                    Err(message) => {
                        eprintln!("error: {message}");
                        std::process::exit(1);
                    }
                }
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!("jstep - step-through JavaScript subset interpreter");
    println!();
    println!("Usage: jstep <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.js>     Run to completion and print output and variables");
    println!("  step <file.js>    Print the state after every step");
    println!("  parse <file.js>   Show the parsed units and functions");
    println!("  lex <file.js>     Show the token stream");
    println!("  help              Show this message");
    println!("  version           Show version information");
    println!();
    print_run_options();
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=jstep_eval=debug) to trace execution.");
}

fn print_run_options() {
    println!("Options for run and step:");
    println!("  --max-steps=<n>   Step ceiling before a Timeout error (default: 10000)");
    println!("  --lenient         Skip unsupported statements instead of failing");
    println!("  --json            Print execution state as JSON");
}

//! blockgen CLI - translate block programs into R
//!
//! Commands:
//!   render   - Generate R source from a block program
//!   check    - Run a generation pass and report problems
//!   rules    - List supported block types
//!   schema   - Print JSON schemas for input files

mod cli;

use blockgen::tracing_config::init_tracing;
use blockgen::VERSION;
use std::process::ExitCode;

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "render" => cli::cmd_render(&args[2..]),
        "check" => cli::cmd_check(&args[2..]),
        "rules" => cli::cmd_rules(),
        "schema" => cli::cmd_schema(&args[2..]),
        "version" | "--version" | "-v" => {
            println!("blockgen {}", VERSION);
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            Err("Unknown command".into())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"
blockgen - Block program to R source generator

USAGE:
    blockgen <COMMAND> [OPTIONS]

COMMANDS:
    render <program.yaml|json>       Generate R source
    check <program.yaml|json>        Run a pass and report unsupported blocks
    rules                            List supported block types
    schema [program|config]          Print JSON schema for an input file
    version                          Print version

OPTIONS:
    --config, -c <file>              Generator config (default: .blockgen.yaml
                                     next to the program, if present)
    --output, -o <file>              Output file (default: stdout)
    --zero-based                     Treat list and text positions as 0-based

ENVIRONMENT:
    BLOCKGEN_LOG                     Log filter, e.g. debug or blockgen=trace
    BLOCKGEN_LOG_FORMAT              text (default) or json

EXAMPLES:
    blockgen render program.yaml > program.R
    blockgen render program.json --zero-based -o program.R
    blockgen check program.yaml
    blockgen schema config
"#
    );
}

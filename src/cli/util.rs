//! CLI utility helpers

use blockgen::{Error, GeneratorConfig, Program, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Value following `--name` or `-short`
pub fn parse_flag_value(args: &[String], long: &str, short: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == long || arg == short)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// Parse --output argument to determine output file path
pub fn parse_output_arg(args: &[String]) -> Option<PathBuf> {
    parse_flag_value(args, "--output", "-o").map(PathBuf::from)
}

/// First argument that is neither a flag nor a flag's value
pub fn positional(args: &[String]) -> Option<&str> {
    let mut skip = false;
    for arg in args {
        if skip {
            skip = false;
            continue;
        }
        match arg.as_str() {
            "--output" | "-o" | "--config" | "-c" => skip = true,
            a if a.starts_with('-') => {}
            a => return Some(a),
        }
    }
    None
}

pub fn read_program(path: &str) -> Result<Program> {
    let text = fs::read_to_string(path).map_err(Error::Io)?;
    Program::parse(&text)
}

/// `--config` wins; otherwise `.blockgen.yaml` next to the program, then the defaults
pub fn load_config(args: &[String], program_path: &str) -> Result<GeneratorConfig> {
    let mut config = match parse_flag_value(args, "--config", "-c") {
        Some(path) => GeneratorConfig::load_from_file(Path::new(&path))?,
        None => {
            let dir = Path::new(program_path)
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            GeneratorConfig::load_from_dir(dir)?.unwrap_or_default()
        }
    };
    if args.iter().any(|a| a == "--zero-based") {
        config.one_based_index = false;
    }
    Ok(config)
}

/// Write content to file or stdout
pub fn write_output(path: &Option<PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(p) => {
            fs::write(p, content).map_err(Error::Io)?;
            eprintln!("Written to: {}", p.display());
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_positional_skips_flag_values() {
        let a = args(&["--config", "c.yaml", "--zero-based", "prog.yaml", "-o", "out.R"]);
        assert_eq!(positional(&a), Some("prog.yaml"));
        assert_eq!(parse_output_arg(&a), Some(PathBuf::from("out.R")));
        assert_eq!(positional(&args(&["--zero-based"])), None);
    }
}

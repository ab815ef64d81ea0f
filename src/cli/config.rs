//! Schema command

use blockgen::*;

pub fn cmd_schema(args: &[String]) -> Result<()> {
    let schema_name = args.first().map(|s| s.as_str()).unwrap_or("list");

    match schema_name {
        "list" => {
            println!("Available schemas: program, config");
            Ok(())
        }
        "program" => print_schema::<Program>(),
        "config" => print_schema::<GeneratorConfig>(),
        _ => Err(format!("Unknown schema: {}. Use 'program' or 'config'.", schema_name).into()),
    }
}

fn print_schema<T: schemars::JsonSchema>() -> Result<()> {
    let schema = schemars::schema_for!(T);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

//! Config loading and its effect on generated code

use blockgen::config::CONFIG_FILE;
use blockgen::*;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn get_second() -> Program {
    Program::from_yaml(
        r#"
variables:
  - { id: v1, name: xs }
blocks:
  - id: p
    type: text_print
    values:
      TEXT:
        id: g
        type: lists_getIndex
        fields: { MODE: GET, WHERE: FROM_START }
        values:
          VALUE: { id: l, type: variables_get, fields: { VAR: { variable: v1 } } }
          AT: { id: n, type: math_number, fields: { NUM: 2 } }
"#,
    )
    .unwrap()
}

#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    assert!(GeneratorConfig::load_from_dir(dir.path()).unwrap().is_none());
}

#[test]
fn test_zero_based_config_shifts_indices() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE),
        "one_based_index: false\nindent: \"    \"\n",
    )
    .unwrap();

    let config = GeneratorConfig::load_from_dir(dir.path()).unwrap().unwrap();
    assert!(!config.one_based_index);
    assert_eq!(config.indent, "    ");
    assert_eq!(config.loop_guard, LoopGuardConfig::default());

    let code = Generator::r(config).unwrap().generate(&get_second()).unwrap();
    assert_eq!(code, "xs <- NA\n\n\nprint(xs[[3]])\n");

    let code = Generator::r(GeneratorConfig::default())
        .unwrap()
        .generate(&get_second())
        .unwrap();
    assert_eq!(code, "xs <- NA\n\n\nprint(xs[[2]])\n");
}

#[test]
fn test_loop_guard_settings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.yaml");
    fs::write(
        &path,
        "loop_guard:\n  max_iterations: 50\n  template: \"check_guard(%2, %3, %1)\"\n",
    )
    .unwrap();
    let config = GeneratorConfig::load_from_file(&path).unwrap();
    assert_eq!(config.loop_guard.max_iterations, 50);
    assert!(config.loop_guard.enabled);

    let program = Program::from_yaml(
        r#"
blocks:
  - { id: w, type: controls_whileUntil, fields: { MODE: WHILE } }
"#,
    )
    .unwrap();
    let code = Generator::r(config).unwrap().generate(&program).unwrap();
    assert_eq!(
        code,
        "loop_guard_w <- 0\n\n\nwhile (FALSE) {\n  check_guard(loop_guard_w, 50, 'w')\n}\n"
    );
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE), "comment_wrap: 2\n").unwrap();
    assert!(matches!(
        GeneratorConfig::load_from_dir(dir.path()),
        Err(Error::Config(_))
    ));

    fs::write(dir.path().join(CONFIG_FILE), "indent: \"x\"\n").unwrap();
    assert!(GeneratorConfig::load_from_dir(dir.path()).is_err());
}

#[test]
fn test_config_schema_lists_fields() {
    let schema = serde_json::to_value(schemars::schema_for!(GeneratorConfig)).unwrap();
    let properties = schema["properties"].as_object().unwrap();
    for field in ["one_based_index", "indent", "comment_wrap", "loop_guard", "provenance"] {
        assert!(properties.contains_key(field), "missing {}", field);
    }
}

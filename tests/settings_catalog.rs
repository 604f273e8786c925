use std::io::Write;

use stockroom::catalog::Catalog;
use stockroom::datatype::{Kind, Value};
use stockroom::protocol::{Interpreter, Outcome};
use stockroom::settings::Settings;

fn settings_from(toml: &str) -> Settings {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().expect("temp file");
    file.write_all(toml.as_bytes()).expect("write");
    Settings::load(Some(file.path())).expect("settings")
}

#[test]
fn defaults_to_the_inventory() {
    let settings = Settings::default();
    assert_eq!(settings.log_filter, "info");
    let catalog = Catalog::from_settings(&settings).expect("catalog");
    assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["Part"]);
    let part = catalog.get("Part").expect("Part");
    assert_eq!(part.record_schema().names().collect::<Vec<_>>(), vec!["id", "description", "footprint", "quantity"]);
    assert_eq!(part.record_schema().get("quantity").map(|a| a.kind()), Some(Kind::Integer));
}

#[test]
fn declared_types_replace_the_inventory() {
    let settings = settings_from(
        r#"
log_filter = "debug"

[[types.resistor]]
name = "ohms"
kind = "float"

[[types.resistor]]
name = "package"
default = "0603"

[[types.resistor]]
name = "note"
required = false
"#,
    );
    assert_eq!(settings.log_filter, "debug");
    let catalog = Catalog::from_settings(&settings).expect("catalog");
    assert!(!catalog.contains("Part"));
    let factory = catalog.get("resistor").expect("resistor");
    assert_eq!(factory.record_schema().names().collect::<Vec<_>>(), vec!["ohms", "package", "note"]);

    let interpreter = Interpreter::new();
    let mut records = Vec::new();
    let outcome = interpreter.interpret_message("add\nresistor: ohms=\"4.7\"", &catalog, &mut records);
    assert_eq!(outcome, Outcome::ok());
    assert_eq!(records[0].record.value("package"), Some(&Value::Text("0603".into())));
    let listed = interpreter.interpret_message("list\nresistor: ohms=\"4.7\"", &catalog, &mut records);
    assert_eq!(listed.message.as_deref(), Some("resistor: ohms=\"4.7\" package=\"0603\"\n"));
}

#[test]
fn bad_declarations_are_config_errors() {
    let settings = settings_from(
        r#"
[[types.widget]]
name = "count"
kind = "integer"
default = "plenty"
"#,
    );
    let err = Catalog::from_settings(&settings).unwrap_err();
    assert!(err.to_string().starts_with("Config error"));

    let settings = settings_from(
        r#"
[[types.widget]]
name = "two words"
"#,
    );
    assert!(Catalog::from_settings(&settings).is_err());
}

#[test]
fn explicit_settings_files_must_exist() {
    let dir = tempfile::tempdir().expect("temp dir");
    assert!(Settings::load(Some(dir.path().join("missing.toml").as_path())).is_err());
}

#[test]
fn defaults_do_not_constrain_matches() {
    let settings = settings_from(
        r#"
[[types.resistor]]
name = "ohms"
kind = "float"

[[types.resistor]]
name = "package"
default = "0603"
"#,
    );
    let catalog = Catalog::from_settings(&settings).expect("catalog");
    let interpreter = Interpreter::new();
    let mut records = Vec::new();
    let outcome = interpreter.interpret_message("add\nresistor: ohms=\"4.7\" package=\"1206\"", &catalog, &mut records);
    assert_eq!(outcome, Outcome::ok());

    let listed = interpreter.interpret_message("list\nresistor: ohms=\"4.7\"", &catalog, &mut records);
    assert_eq!(listed.message.as_deref(), Some("resistor: ohms=\"4.7\" package=\"1206\"\n"));

    let updated = interpreter.interpret_message(
        "update\nresistor: ohms=\"4.7\"\nresistor: ohms=\"5\"",
        &catalog,
        &mut records,
    );
    assert!(updated.success);
    assert_eq!(records[0].record.value("ohms"), Some(&Value::Float(5.0)));
    // the setter leaves the non-default package alone
    assert_eq!(records[0].record.value("package"), Some(&Value::Text("1206".into())));

    let removed = interpreter.interpret_message("remove\nresistor: package=\"1206\"", &catalog, &mut records);
    assert!(removed.success);
    assert!(records.is_empty());
}

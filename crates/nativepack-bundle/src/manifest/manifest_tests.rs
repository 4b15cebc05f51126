#![allow(non_snake_case)]

use super::*;
use crate::TargetRegistry;
use proptest::prelude::*;
use tempfile::TempDir;
use test_case::test_case;

const DEV_MANIFEST: &str = r#"{
  "id": "native-example",
  "name": "Native Example",
  "version": "1.0.0",
  "description": "Demo plugin",
  "ui": {
    "component": "index.vue",
    "title": "Example"
  },
  "native": {
    "library": {
      "linux-x64": "target/debug/libnative_example.so"
    },
    "entry": "call"
  }
}"#;

// Parsing

#[test]
fn Manifest___from_json___parses_development_manifest() {
    let manifest = Manifest::from_json(DEV_MANIFEST).unwrap();

    assert_eq!(manifest.id, "native-example");
    assert_eq!(manifest.version, "1.0.0");
    assert_eq!(
        manifest.ui.as_ref().unwrap().component.as_deref(),
        Some("index.vue")
    );
    assert_eq!(manifest.native.library.len(), 1);
}

#[test]
fn Manifest___from_json___keeps_unknown_fields() {
    let manifest = Manifest::from_json(DEV_MANIFEST).unwrap();

    assert_eq!(manifest.extra["name"], "Native Example");
    assert_eq!(manifest.ui.as_ref().unwrap().extra["title"], "Example");
    assert_eq!(manifest.native.extra["entry"], "call");
}

#[test]
fn Manifest___from_json___native_section_is_optional() {
    let manifest = Manifest::from_json(r#"{"id": "a", "version": "0.1.0"}"#).unwrap();

    assert!(manifest.native.library.is_empty());
    assert!(manifest.ui.is_none());
}

#[test]
fn Manifest___from_json___rejects_missing_id() {
    let result = Manifest::from_json(r#"{"version": "0.1.0"}"#);

    assert!(matches!(result, Err(BundleError::Json(_))));
}

#[test]
fn Manifest___json_roundtrip___preserves_extra_fields() {
    let manifest = Manifest::from_json(DEV_MANIFEST).unwrap();

    let json = manifest.to_json().unwrap();
    let parsed = Manifest::from_json(&json).unwrap();

    assert_eq!(parsed, manifest);
}

// Files

#[test]
fn Manifest___from_file___missing_file_is_missing_file_error() {
    let temp_dir = TempDir::new().unwrap();

    let result = Manifest::from_file(temp_dir.path().join("manifest.json"));

    assert!(matches!(result, Err(BundleError::MissingFile(_))));
}

#[test]
fn Manifest___write_to___writes_two_space_indented_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("manifest.json");
    let manifest = Manifest::new("native-example", "1.0.0");

    manifest.write_to(&path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("\n  \"id\": \"native-example\""));
    assert_eq!(Manifest::from_file(&path).unwrap(), manifest);
}

// Validation

#[test_case("", "1.0.0", "id is required" ; "empty id")]
#[test_case("   ", "1.0.0", "id is required" ; "blank id")]
#[test_case("a/b", "1.0.0", "path separators" ; "id with separator")]
#[test_case("plugin", "", "version is required" ; "empty version")]
fn Manifest___validate___rejects_invalid_identity(id: &str, version: &str, message: &str) {
    let manifest = Manifest::new(id, version);

    let err = manifest.validate().unwrap_err();

    assert!(err.to_string().contains(message), "{err}");
}

#[test_case(r#"{"id": "a", "version": "1.0.0", "ui": {"icon": "x.png"}}"# ; "ui without component")]
#[test_case(r#"{"id": "a", "version": "1.0.0", "ui": {"component": ""}}"# ; "empty component")]
#[test_case(r#"{"id": "a", "version": "1.0.0", "ui": {"component": "  "}}"# ; "blank component")]
fn Manifest___ui_without_component___declares_no_component(json: &str) {
    let manifest = Manifest::from_json(json).unwrap();

    manifest.validate().unwrap();
    assert!(manifest.ui.is_some());
    assert!(manifest.compiled_ui_component().is_none());
}

#[test]
fn Manifest___set_ui_component___leaves_componentless_ui_alone() {
    let mut manifest =
        Manifest::from_json(r#"{"id": "a", "version": "1.0.0", "ui": {"icon": "x.png"}}"#)
            .unwrap();

    manifest.set_ui_component("index.js");

    let ui = manifest.ui.as_ref().unwrap();
    assert!(ui.component.is_none());
    assert_eq!(ui.extra["icon"], "x.png");
    assert!(!manifest.to_json().unwrap().contains("component"));
}

// Archive naming

#[test]
fn Manifest___archive_file_name___uses_id_and_version() {
    let manifest = Manifest::new("native-example", "1.0.0");

    assert_eq!(
        manifest.archive_file_name("zip"),
        "native-example-v1.0.0.zip"
    );
}

// UI rewriting

#[test_case("index.vue", "index.js")]
#[test_case("src/components/Panel.vue", "Panel.js")]
#[test_case("widget", "widget.js")]
#[test_case("app.tsx", "app.js")]
fn compiled_script_name___appends_script_extension(component: &str, expected: &str) {
    assert_eq!(compiled_script_name(component), expected);
}

#[test]
fn Manifest___set_ui_component___rewrites_declared_component() {
    let mut manifest = Manifest::from_json(DEV_MANIFEST).unwrap();

    let compiled = manifest.compiled_ui_component().unwrap();
    manifest.set_ui_component(&compiled);

    assert_eq!(
        manifest.ui.as_ref().unwrap().component.as_deref(),
        Some("index.js")
    );
}

#[test]
fn Manifest___set_ui_component___ignored_without_ui() {
    let mut manifest = Manifest::new("a", "1.0.0");

    manifest.set_ui_component("index.js");

    assert!(manifest.ui.is_none());
    assert!(manifest.compiled_ui_component().is_none());
}

// Library entries

#[test]
fn Manifest___add_library___keys_by_manifest_key() {
    let registry = TargetRegistry::new("native_example");
    let target = registry.lookup("windows-x64").unwrap();
    let mut manifest = Manifest::new("a", "1.0.0");

    manifest.add_library(target, "lib/native_example-windows-x64.dll");

    assert_eq!(
        manifest.native.library.get("win32-x64").map(String::as_str),
        Some("lib/native_example-windows-x64.dll")
    );
}

#[test]
fn Manifest___clear_libraries___discards_previous_entries() {
    let mut manifest = Manifest::from_json(DEV_MANIFEST).unwrap();

    manifest.clear_libraries();

    assert!(manifest.native.library.is_empty());
    assert_eq!(manifest.native.extra["entry"], "call");
}

proptest! {
    /// The archive name always embeds id and version verbatim.
    #[test]
    fn proptest_archive_file_name_format(
        id in "[a-z][a-z0-9-]{0,30}",
        version in "[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}",
    ) {
        let manifest = Manifest::new(&id, &version);
        let name = manifest.archive_file_name("zip");
        prop_assert_eq!(name, format!("{id}-v{version}.zip"));
    }
}

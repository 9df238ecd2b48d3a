//! Shared fixtures for pubapi-check integration tests.

#![allow(dead_code)]

use pubapi_check::ApiChecker;
use pubapi_meta::InMemoryProvider;
use tempfile::TempDir;

/// Package holding every fixture type except the `java.lang` ones.
pub const FIXTURE_PACKAGE: &str = "fixture.java";

/// Provider over `tests/fixtures/types.json`.
pub fn fixture_provider() -> InMemoryProvider {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/types.json");
    InMemoryProvider::from_json_file(path).expect("fixture types should load")
}

/// Fully-qualified fixture type name.
pub fn fixture(simple: &str) -> String {
    format!("{FIXTURE_PACKAGE}.{simple}")
}

/// Temporary allow-list directory with the given `(file name, contents)` pairs.
pub fn config_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    for (name, contents) in files {
        std::fs::write(dir.path().join(name), contents).expect("write config file");
    }
    dir
}

/// Checker over the fixture types with the given allow-list files loaded.
pub fn checker_with(files: &[(&str, &str)]) -> ApiChecker {
    let dir = config_dir(files);
    let checker = ApiChecker::new(fixture_provider());
    checker.load_config(dir.path()).expect("allow-list should load");
    checker
}

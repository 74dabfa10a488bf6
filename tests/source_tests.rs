//! Source mode integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use yamlpatch::error::Error;
use yamlpatch::resource::{Resource, Spec};

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn spec_for(file: &Path, key: &str) -> Spec {
    Spec {
        file: Some(file.to_str().unwrap().to_string()),
        key: key.to_string(),
        ..Spec::default()
    }
}

const GITHUB_YAML: &str = "---\ngithub:\n  owner: olblak\n  repository: charts\n";

#[test]
fn source_returns_the_resolved_value() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "test.yaml", GITHUB_YAML);

    let mut resource = Resource::new(spec_for(&file, "github.owner")).unwrap();
    assert_eq!(resource.source(None).unwrap(), "olblak");

    let mut resource = Resource::new(spec_for(&file, "$.github.owner")).unwrap();
    assert_eq!(resource.source(None).unwrap(), "olblak");
}

#[test]
fn source_resolves_dotted_keys_via_bracket_notation() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "test.yaml",
        "annotations:\n  github.owner: olblak\n",
    );

    let mut resource = Resource::new(spec_for(&file, "$.annotations['github.owner']")).unwrap();
    assert_eq!(resource.source(None).unwrap(), "olblak");
}

#[test]
fn source_resolves_filter_queries() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "test.yaml",
        "repos:\n  - owner: acme\n    repository: website\n  - owner: olblak\n    repository: charts\n",
    );

    let mut resource =
        Resource::new(spec_for(&file, "$.repos[?(@.repository == 'website')].owner")).unwrap();
    assert_eq!(resource.source(None).unwrap(), "acme");
}

#[test]
fn source_missing_key_is_an_error() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "test.yaml", GITHUB_YAML);

    let mut resource = Resource::new(spec_for(&file, "github.country")).unwrap();
    let err = resource.source(None).unwrap_err();
    assert!(matches!(err, Error::KeyNotFound { .. }));
}

#[test]
fn source_rejects_a_multi_file_configuration() {
    let dir = TempDir::new().unwrap();
    let a = write_file(dir.path(), "a.yaml", GITHUB_YAML);
    let b = write_file(dir.path(), "b.yaml", GITHUB_YAML);

    let spec = Spec {
        files: vec![
            a.to_str().unwrap().to_string(),
            b.to_str().unwrap().to_string(),
        ],
        key: "github.owner".to_string(),
        ..Spec::default()
    };
    let mut resource = Resource::new(spec).unwrap();
    let err = resource.source(None).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn source_single_entry_files_list_is_accepted() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "test.yaml", GITHUB_YAML);

    let spec = Spec {
        files: vec![file.to_str().unwrap().to_string()],
        key: "github.owner".to_string(),
        ..Spec::default()
    };
    let mut resource = Resource::new(spec).unwrap();
    assert_eq!(resource.source(None).unwrap(), "olblak");
}

#[test]
fn source_addressing_a_mapping_is_an_error() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "test.yaml", GITHUB_YAML);

    let mut resource = Resource::new(spec_for(&file, "$.github")).unwrap();
    let err = resource.source(None).unwrap_err();
    assert!(matches!(err, Error::NotScalar { .. }));
}

#[test]
fn source_missing_file_is_an_io_error() {
    let mut resource =
        Resource::new(spec_for(Path::new("/nonexistent/nope.yaml"), "a")).unwrap();
    let err = resource.source(None).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn source_invalid_yaml_with_tabs_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "test.yaml",
        "---\n\t\tgithub:\n\t\t\towner: olblak\n",
    );

    let mut resource = Resource::new(spec_for(&file, "github.owner")).unwrap();
    let err = resource.source(None).unwrap_err();
    assert!(matches!(err, Error::DocumentParse { .. }));
}

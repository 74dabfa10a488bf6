//! Format-preservation round trips through the path-query engine.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use yamlpatch::resource::{Resource, Spec};

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn yamlpath_spec(file: &Path, key: &str, value: &str) -> Spec {
    Spec {
        file: Some(file.to_str().unwrap().to_string()),
        key: key.to_string(),
        value: Some(value.to_string()),
        engine: Some("yamlpath".to_string()),
        ..Spec::default()
    }
}

const FIXTURE: &str = "\
# release configuration
---
github:
  owner: olblak      # the maintainer
  repository: 'charts'
versions:
  - 1.0.0
  - 2.0.0
";

#[test]
fn already_correct_value_leaves_the_file_byte_identical() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "test.yaml", FIXTURE);

    let mut resource = Resource::new(yamlpath_spec(&file, "$.github.owner", "olblak")).unwrap();
    let result = resource.target(None, None, false).unwrap();
    assert!(!result.changed);

    assert_eq!(fs::read_to_string(&file).unwrap(), FIXTURE);
}

#[test]
fn patching_one_value_preserves_every_other_byte() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "test.yaml", FIXTURE);

    let mut resource = Resource::new(yamlpath_spec(&file, "$.github.owner", "asterix")).unwrap();
    let result = resource.target(None, None, false).unwrap();
    assert!(result.changed);

    let content = fs::read_to_string(&file).unwrap();
    assert_eq!(
        content,
        "\
# release configuration
---
github:
  owner: asterix      # the maintainer
  repository: 'charts'
versions:
  - 1.0.0
  - 2.0.0
"
    );
}

#[test]
fn quoted_scalars_keep_their_quotes_when_untouched() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "test.yaml", FIXTURE);

    let mut resource = Resource::new(yamlpath_spec(&file, "$.versions[0]", "1.0.1")).unwrap();
    resource.target(None, None, false).unwrap();

    let content = fs::read_to_string(&file).unwrap();
    assert!(content.contains("repository: 'charts'"));
    assert!(content.contains("- 1.0.1"));
    assert!(content.contains("- 2.0.0"));
    assert!(content.contains("# release configuration"));
}

#[test]
fn condition_never_rewrites_the_file() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "test.yaml", FIXTURE);

    let mut resource = Resource::new(yamlpath_spec(&file, "$.github.owner", "nomatch")).unwrap();
    let result = resource.condition(None, None).unwrap();
    assert!(!result.pass);

    assert_eq!(fs::read_to_string(&file).unwrap(), FIXTURE);
}

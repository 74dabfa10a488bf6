//! Column-scoped resolution of dotted key paths.
//!
//! A document tree carries no parent references, so the resolver uses
//! source columns as a proxy for the current scope: every recursive call
//! carries the node it walks plus the column its keys must sit at. An
//! entry whose key column differs from the scope column is visually nested
//! under a sibling rather than under the current scope and is skipped;
//! once an entry's key column drops below the scope column the walk has
//! left the intended scope and scanning stops. Repeated key names at
//! different nesting depths therefore never collide.
//!
//! The scope-exit rule is indentation-derived and is not proven correct
//! for every indentation style; unusually formatted input can miss. Known
//! limitation, kept for compatibility.

use super::parser::Segment;
use crate::document::{Document, Node, NodePath, NodeValue};

/// Resolves a parsed key path against one document.
///
/// Returns the index path of the addressed node, or `None` when no
/// matching chain of entries exists. The addressed node must be a scalar
/// unless the path stops one segment early on a sequence item; paths that
/// address a mapping or sequence as if it were a leaf do not resolve.
pub fn locate(doc: &Document, segments: &[Segment]) -> Option<NodePath> {
    let root = doc.root();
    let first = segments.first()?;

    // A document rooted by a sequence is addressed positionally.
    if let NodeValue::Sequence(items) = root.value() {
        if !first.name.is_empty() {
            return None;
        }
        let index = first.index?;
        let item = items.get(index)?;
        if segments.len() == 1 {
            return item.is_scalar().then(|| vec![index]);
        }
        let sub = locate_in(item, &segments[1..], item.mark().col)?;
        let mut path = vec![index];
        path.extend(sub);
        return Some(path);
    }

    locate_in(root, segments, root.mark().col)
}

/// One scope of the walk: `node` is a mapping whose keys are expected at
/// `scope_col`.
fn locate_in(node: &Node, segments: &[Segment], scope_col: usize) -> Option<NodePath> {
    let seg = segments.first()?;
    let NodeValue::Mapping(entries) = node.value() else {
        return None;
    };

    for (i, entry) in entries.iter().enumerate() {
        if entry.key_mark.col < scope_col {
            // The walk left the intended scope.
            break;
        }
        if entry.key_mark.col != scope_col || entry.key != seg.name {
            continue;
        }

        let value = &entry.value;
        let rest = &segments[1..];

        if rest.is_empty() {
            return match (seg.index, value.value()) {
                // `key: scalar`
                (None, NodeValue::Scalar { .. }) => Some(vec![i]),
                // `key[n]` over a sequence of scalars
                (Some(n), NodeValue::Sequence(items)) => {
                    let item = items.get(n)?;
                    item.is_scalar().then(|| vec![i, n])
                }
                // Addressing a non-leaf as a leaf never resolves.
                _ => None,
            };
        }

        return match (seg.index, value.value()) {
            // `key[n].rest` descends into the nth sequence item.
            (Some(n), NodeValue::Sequence(items)) => {
                let item = items.get(n)?;
                let sub = locate_in(item, rest, item.mark().col)?;
                let mut path = vec![i, n];
                path.extend(sub);
                Some(path)
            }
            // `key.rest` descends with the scope set to the value's column.
            (None, NodeValue::Mapping(_)) => {
                let sub = locate_in(value, rest, value.mark().col)?;
                let mut path = vec![i];
                path.extend(sub);
                Some(path)
            }
            _ => None,
        };
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_documents;
    use crate::keypath::parser::parse;

    fn single(content: &str) -> Document {
        parse_documents(content, "test.yaml")
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
    }

    fn resolve(content: &str, key: &str) -> Option<String> {
        let doc = single(content);
        let segments = parse(key).unwrap();
        let path = locate(&doc, &segments)?;
        doc.node_at(&path)
            .and_then(|n| n.scalar_value())
            .map(String::from)
    }

    #[test]
    fn test_locate_nested_key() {
        let content = "github:\n  owner: olblak\n  repository: charts\n";
        assert_eq!(resolve(content, "github.owner").as_deref(), Some("olblak"));
        assert_eq!(
            resolve(content, "github.repository").as_deref(),
            Some("charts")
        );
    }

    #[test]
    fn test_locate_missing_key() {
        let content = "github:\n  owner: olblak\n";
        assert_eq!(resolve(content, "github.country"), None);
        assert_eq!(resolve(content, "gitlab.owner"), None);
    }

    #[test]
    fn test_repeated_key_names_do_not_collide() {
        // `image` exists both at the root and nested under `sidecar`;
        // each path must address its own scope only.
        let content = "image: outer\nsidecar:\n  image: inner\n";
        assert_eq!(resolve(content, "image").as_deref(), Some("outer"));
        assert_eq!(resolve(content, "sidecar.image").as_deref(), Some("inner"));
    }

    #[test]
    fn test_nested_key_not_reachable_from_root_scope() {
        let content = "sidecar:\n  image: inner\n";
        assert_eq!(resolve(content, "image"), None);
    }

    #[test]
    fn test_positional_index_over_scalar_sequence() {
        let content = "list:\n  - zero\n  - one\n  - two\n";
        assert_eq!(resolve(content, "list[1]").as_deref(), Some("one"));
        assert_eq!(resolve(content, "list[2]").as_deref(), Some("two"));
        assert_eq!(resolve(content, "list[3]"), None);
    }

    #[test]
    fn test_index_then_descend_into_mapping_item() {
        let content = "a:\n  - name: x\n  - name: y\n";
        assert_eq!(resolve(content, "a[1].name").as_deref(), Some("y"));
        assert_eq!(resolve(content, "a[0].name").as_deref(), Some("x"));
    }

    #[test]
    fn test_sequence_rooted_document() {
        let content = "- zero\n- one\n";
        assert_eq!(resolve(content, "[1]").as_deref(), Some("one"));

        let content = "- name: x\n- name: y\n";
        assert_eq!(resolve(content, "[0].name").as_deref(), Some("x"));
    }

    #[test]
    fn test_named_first_segment_on_sequence_root_fails() {
        assert_eq!(resolve("- one\n- two\n", "one"), None);
    }

    #[test]
    fn test_addressing_a_mapping_as_leaf_fails() {
        let content = "github:\n  owner: olblak\n";
        assert_eq!(resolve(content, "github"), None);
    }

    #[test]
    fn test_addressing_a_sequence_without_index_fails() {
        let content = "list:\n  - a\n  - b\n";
        assert_eq!(resolve(content, "list"), None);
    }

    #[test]
    fn test_deeply_nested_resolution() {
        let content = "a:\n  b:\n    c:\n      d: deep\n";
        assert_eq!(resolve(content, "a.b.c.d").as_deref(), Some("deep"));
    }
}

//! Serialization strategies and atomic writes.
//!
//! Two re-encoders exist, and callers must know which one runs:
//!
//! - [`render_preserving`] (path-query engine): keeps every byte of the
//!   original stream and splices only the spans of modified scalars.
//!   Byte-identical round trip when nothing changed.
//! - [`render_structural`] (legacy engine): regenerates canonical
//!   formatting from the tree shape alone — original indentation and flow
//!   style are intentionally not preserved; scalar comments survive as
//!   attached metadata.
//!
//! Writes go through a temp file and an atomic rename so a target file is
//! never left half-written.

use std::fs;
use std::path::Path;

use crate::document::{Document, Node, NodeValue};

/// Re-renders documents by splicing modified scalar spans into the
/// original byte stream. Unmodified content is preserved verbatim,
/// comments and styles included.
pub fn render_preserving(docs: &[Document], original: &str) -> String {
    let mut splices: Vec<(usize, usize, String)> = Vec::new();
    for doc in docs {
        collect_splices(doc.root(), original, &mut splices);
    }
    if splices.is_empty() {
        return original.to_string();
    }
    splices.sort_by_key(|s| s.0);

    let mut out = String::with_capacity(original.len());
    let mut last = 0;
    for (start, end, replacement) in splices {
        out.push_str(&original[last..start]);
        out.push_str(&replacement);
        last = end;
    }
    out.push_str(&original[last..]);
    out
}

fn collect_splices(node: &Node, original: &str, out: &mut Vec<(usize, usize, String)>) {
    if node.is_modified() {
        if let (Some(value), Some(span)) = (node.scalar_value(), node.span()) {
            let mut end = span.end;
            // A comment inherited from the source keeps its original bytes
            // (spacing included); only a changed value or a newly attached
            // comment gets re-rendered.
            let mut replacement = if node.is_value_modified() {
                render_scalar(value)
            } else {
                original[span.start..span.end].to_string()
            };
            if node.is_comment_modified() {
                if let Some(comment) = node.line_comment() {
                    // Swallow the existing trailing comment so the attached
                    // one replaces it instead of stacking.
                    let bytes = original.as_bytes();
                    let mut i = end;
                    while matches!(bytes.get(i), Some(b' ') | Some(b'\t')) {
                        i += 1;
                    }
                    if bytes.get(i) == Some(&b'#') {
                        while i < bytes.len() && bytes[i] != b'\n' {
                            i += 1;
                        }
                        end = i;
                    }
                    replacement.push_str(" # ");
                    replacement.push_str(comment);
                }
            }
            out.push((span.start, end, replacement));
        }
    }
    match node.value() {
        NodeValue::Mapping(entries) => {
            for entry in entries {
                collect_splices(&entry.value, original, out);
            }
        }
        NodeValue::Sequence(items) => {
            for item in items {
                collect_splices(item, original, out);
            }
        }
        NodeValue::Scalar { .. } => {}
    }
}

/// Re-renders documents canonically from the tree shape: block style
/// throughout, mappings and sequence items indented by `indent`, a leading
/// `---` when the source wrote one, and `---` between sub-documents.
pub fn render_structural(docs: &[Document], indent: usize) -> String {
    let indent = indent.max(1);
    let mut out = String::new();
    for (i, doc) in docs.iter().enumerate() {
        if i > 0 || doc.explicit_start() {
            out.push_str("---\n");
        }
        render_node(doc.root(), 0, indent, &mut out);
    }
    out
}

fn render_node(node: &Node, depth: usize, indent: usize, out: &mut String) {
    match node.value() {
        NodeValue::Scalar { .. } => {
            out.push_str(&render_scalar_node(node));
            push_comment(node, out);
            out.push('\n');
        }
        NodeValue::Mapping(entries) => {
            if entries.is_empty() {
                out.push_str("{}\n");
            } else {
                render_mapping(entries, depth, indent, out);
            }
        }
        NodeValue::Sequence(items) => {
            if items.is_empty() {
                out.push_str("[]\n");
            } else {
                render_sequence(items, depth, indent, out);
            }
        }
    }
}

fn render_mapping(
    entries: &[crate::document::MappingEntry],
    depth: usize,
    indent: usize,
    out: &mut String,
) {
    let pad = " ".repeat(depth * indent);
    for entry in entries {
        out.push_str(&pad);
        out.push_str(&render_scalar(&entry.key));
        out.push(':');
        match entry.value.value() {
            NodeValue::Scalar { .. } => {
                let rendered = render_scalar_node(&entry.value);
                if !rendered.is_empty() {
                    out.push(' ');
                    out.push_str(&rendered);
                }
                push_comment(&entry.value, out);
                out.push('\n');
            }
            NodeValue::Mapping(inner) if inner.is_empty() => out.push_str(" {}\n"),
            NodeValue::Mapping(inner) => {
                out.push('\n');
                render_mapping(inner, depth + 1, indent, out);
            }
            NodeValue::Sequence(items) if items.is_empty() => out.push_str(" []\n"),
            NodeValue::Sequence(items) => {
                out.push('\n');
                render_sequence(items, depth + 1, indent, out);
            }
        }
    }
}

fn render_sequence(items: &[Node], depth: usize, indent: usize, out: &mut String) {
    let pad = " ".repeat(depth * indent);
    for item in items {
        match item.value() {
            NodeValue::Scalar { .. } => {
                out.push_str(&pad);
                out.push_str("- ");
                out.push_str(&render_scalar_node(item));
                push_comment(item, out);
                out.push('\n');
            }
            _ => {
                // Render the item with zero depth, then re-anchor each line
                // behind the `- ` marker.
                let mut sub = String::new();
                render_node(item, 0, indent, &mut sub);
                for (j, line) in sub.lines().enumerate() {
                    out.push_str(&pad);
                    out.push_str(if j == 0 { "- " } else { "  " });
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
    }
}

fn push_comment(node: &Node, out: &mut String) {
    if let Some(comment) = node.line_comment() {
        out.push_str(" # ");
        out.push_str(comment);
    }
}

/// Renders a scalar node for the structural encoder. Unmodified plain
/// scalars re-emit their source text so `replicas: 3` stays a number;
/// mutated values were written as strings and go through quoting analysis.
fn render_scalar_node(node: &Node) -> String {
    let NodeValue::Scalar { value, style } = node.value() else {
        return String::new();
    };
    if node.is_value_modified() {
        return render_scalar(value);
    }
    match style {
        crate::document::ScalarStyle::Plain => value.clone(),
        crate::document::ScalarStyle::SingleQuoted => {
            format!("'{}'", value.replace('\'', "''"))
        }
        _ => escape_double_quoted(value),
    }
}

/// Renders one scalar, delegating quoting decisions to the YAML serializer
/// so values that would re-parse as numbers, booleans, or null come back
/// quoted.
fn render_scalar(value: &str) -> String {
    match serde_yaml::to_string(value) {
        Ok(rendered) => {
            let trimmed = rendered.trim_end();
            if trimmed.contains('\n') {
                escape_double_quoted(value)
            } else {
                trimmed.to_string()
            }
        }
        Err(_) => escape_double_quoted(value),
    }
}

fn escape_double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Writes data to a temp file, then atomically renames it over the target.
pub fn write_file_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, data)?;
    fs::rename(&temp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_documents;

    fn docs(content: &str) -> Vec<Document> {
        parse_documents(content, "test.yaml").unwrap()
    }

    #[test]
    fn test_preserving_is_byte_identical_when_unchanged() {
        let content = "# header\ngithub:\n  owner: olblak   # who\n  repository: charts\n";
        let parsed = docs(content);
        assert_eq!(render_preserving(&parsed, content), content);
    }

    #[test]
    fn test_preserving_rewrites_only_the_modified_scalar() {
        let content = "# header\ngithub:\n  owner: olblak\n  repository: charts\n";
        let mut parsed = docs(content);
        parsed[0].set_scalar(&[0, 0], "asterix", None).unwrap();
        let rendered = render_preserving(&parsed, content);
        assert_eq!(
            rendered,
            "# header\ngithub:\n  owner: asterix\n  repository: charts\n"
        );
    }

    #[test]
    fn test_preserving_keeps_untouched_comments_and_quotes() {
        let content = "a: \"one\" # keep me\nb: two\n";
        let mut parsed = docs(content);
        parsed[0].set_scalar(&[1], "three", None).unwrap();
        let rendered = render_preserving(&parsed, content);
        assert_eq!(rendered, "a: \"one\" # keep me\nb: three\n");
    }

    #[test]
    fn test_preserving_keeps_inherited_comment_spacing_on_value_change() {
        let content = "version: 1.0.0      # pinned\n";
        let mut parsed = docs(content);
        parsed[0].set_scalar(&[0], "2.0.0", None).unwrap();
        let rendered = render_preserving(&parsed, content);
        assert_eq!(rendered, "version: 2.0.0      # pinned\n");
    }

    #[test]
    fn test_preserving_attaches_comment_and_replaces_old_one() {
        let content = "version: 1.0.0 # old note\n";
        let mut parsed = docs(content);
        parsed[0]
            .set_scalar(&[0], "2.0.0", Some("updated by automation"))
            .unwrap();
        let rendered = render_preserving(&parsed, content);
        assert_eq!(rendered, "version: 2.0.0 # updated by automation\n");
    }

    #[test]
    fn test_preserving_multi_document_isolation() {
        let content = "---\na: one\n---\na: two\n";
        let mut parsed = docs(content);
        parsed[1].set_scalar(&[0], "three", None).unwrap();
        let rendered = render_preserving(&parsed, content);
        assert_eq!(rendered, "---\na: one\n---\na: three\n");
    }

    #[test]
    fn test_structural_renders_canonical_block_style() {
        let content = "a:\n    b: 1\n    c: [x, y]\n";
        let parsed = docs(content);
        let rendered = render_structural(&parsed, 2);
        assert_eq!(rendered, "a:\n  b: 1\n  c:\n    - x\n    - y\n");
    }

    #[test]
    fn test_structural_reemits_leading_marker() {
        let content = "---\na: 1\n";
        let rendered = render_structural(&docs(content), 2);
        assert_eq!(rendered, "---\na: 1\n");

        let content = "a: 1\n";
        let rendered = render_structural(&docs(content), 2);
        assert_eq!(rendered, "a: 1\n");
    }

    #[test]
    fn test_structural_separates_sub_documents() {
        let content = "a: 1\n---\nb: 2\n";
        let rendered = render_structural(&docs(content), 2);
        assert_eq!(rendered, "a: 1\n---\nb: 2\n");
    }

    #[test]
    fn test_structural_quotes_ambiguous_scalars() {
        let content = "a: x\n";
        let mut parsed = docs(content);
        parsed[0].set_scalar(&[0], "123", None).unwrap();
        let rendered = render_structural(&parsed, 2);
        assert_eq!(rendered, "a: '123'\n");
    }

    #[test]
    fn test_structural_sequence_of_mappings() {
        let content = "a:\n  - name: x\n    v: 1\n  - name: y\n";
        let rendered = render_structural(&docs(content), 2);
        assert_eq!(rendered, "a:\n  - name: x\n    v: 1\n  - name: y\n");
    }

    #[test]
    fn test_structural_output_reparses_equivalently() {
        let content = "b: 1\na:\n  - name: x\n  - name: y\nc:\n  d: deep\n";
        let parsed = docs(content);
        let rendered = render_structural(&parsed, 2);
        let reparsed = docs(&rendered);
        assert_eq!(
            reparsed[0].node_at(&[1, 1, 0]).unwrap().scalar_value(),
            Some("y")
        );
        assert_eq!(
            reparsed[0].node_at(&[2, 0]).unwrap().scalar_value(),
            Some("deep")
        );
    }

    #[test]
    fn test_structural_keeps_scalar_comments() {
        let content = "a: 1 # note\n";
        let rendered = render_structural(&docs(content), 2);
        assert_eq!(rendered, "a: 1 # note\n");
    }

    #[test]
    fn test_write_file_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.yaml");
        write_file_atomic(&path, b"a: 1\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a: 1\n");
        // Overwrites in place.
        write_file_atomic(&path, b"a: 2\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a: 2\n");
    }
}

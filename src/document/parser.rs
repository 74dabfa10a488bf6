//! Marker-aware YAML parsing into position-carrying document trees.
//!
//! The builder consumes yaml-rust2's marked event stream and produces one
//! [`Document`] per YAML sub-document, recording for every node its source
//! position and, for scalars, the exact byte span it occupies plus any
//! trailing line comment. Spans are computed style-aware (plain, quoted,
//! block) so the fidelity serializer can later splice a replacement value
//! without disturbing any other byte of the stream.

use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use super::node::{Mark, MappingEntry, Node, NodeValue, ScalarStyle, TextSpan};
use super::tree::Document;
use crate::error::{Error, Result};

/// Parses a byte stream holding one or more YAML sub-documents.
///
/// `file` is only used to label parse errors.
pub fn parse_documents(content: &str, file: &str) -> Result<Vec<Document>> {
    let mut parser = Parser::new_from_str(content);
    let mut builder = DocumentBuilder::new(content);

    parser
        .load(&mut builder, true)
        .map_err(|err| Error::DocumentParse {
            file: file.to_string(),
            message: err.to_string(),
        })?;

    builder.finish(file)
}

/// A container being assembled while its end event is pending.
enum BuildNode {
    Sequence {
        mark: Mark,
        flow: bool,
        items: Vec<Node>,
    },
    Mapping {
        mark: Mark,
        flow: bool,
        entries: Vec<MappingEntry>,
        pending_key: Option<(String, Mark)>,
    },
}

struct DocumentBuilder<'a> {
    source: &'a str,
    stack: Vec<BuildNode>,
    flow_depth: usize,
    current_root: Option<Node>,
    explicit_start: bool,
    docs: Vec<Document>,
    bad: Option<String>,
}

impl<'a> DocumentBuilder<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            stack: Vec::new(),
            flow_depth: 0,
            current_root: None,
            explicit_start: false,
            docs: Vec::new(),
            bad: None,
        }
    }

    fn finish(self, file: &str) -> Result<Vec<Document>> {
        match self.bad {
            Some(message) => Err(Error::DocumentParse {
                file: file.to_string(),
                message,
            }),
            None => Ok(self.docs),
        }
    }

    /// Attaches a completed node to its parent, or records it as the
    /// document root when the stack is empty.
    fn push_complete(&mut self, node: Node) {
        match self.stack.last_mut() {
            None => self.current_root = Some(node),
            Some(BuildNode::Sequence { items, .. }) => items.push(node),
            Some(BuildNode::Mapping {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                Some((key, key_mark)) => entries.push(MappingEntry {
                    key,
                    key_mark,
                    value: node,
                }),
                None => {
                    // A container completed where a key was expected.
                    self.bad
                        .get_or_insert_with(|| "complex mapping keys are not supported".into());
                }
            },
        }
    }

    fn starts_flow(&self, marker: &Marker) -> bool {
        matches!(
            self.source.as_bytes().get(marker.index()),
            Some(b'[') | Some(b'{')
        )
    }

    /// A trailing `# ...` comment on the same line, if any.
    fn trailing_comment(&self, span: TextSpan) -> Option<String> {
        let bytes = self.source.as_bytes();
        let mut i = span.end;
        while matches!(bytes.get(i), Some(b' ') | Some(b'\t')) {
            i += 1;
        }
        if bytes.get(i) != Some(&b'#') {
            return None;
        }
        let rest = &self.source[i + 1..];
        let line = rest.split('\n').next().unwrap_or("");
        Some(line.trim().to_string())
    }
}

impl<'a> MarkedEventReceiver for DocumentBuilder<'a> {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.bad.is_some() {
            return;
        }
        match ev {
            Event::Nothing | Event::StreamStart | Event::StreamEnd => {}

            Event::DocumentStart => {
                self.explicit_start = self.source[marker.index()..].starts_with("---");
            }

            Event::DocumentEnd => {
                if let Some(root) = self.current_root.take() {
                    self.docs.push(Document::new(root, self.explicit_start));
                }
                self.explicit_start = false;
            }

            Event::Scalar(value, style, _anchor_id, _tag) => {
                let mark = Mark::from_marker(&marker);

                // A scalar arriving while a mapping awaits its key IS the key.
                if let Some(BuildNode::Mapping { pending_key, .. }) = self.stack.last_mut() {
                    if pending_key.is_none() {
                        *pending_key = Some((value, mark));
                        return;
                    }
                }

                let span = scalar_span(
                    self.source,
                    marker.index(),
                    &value,
                    style,
                    self.flow_depth > 0,
                );
                let comment = self.trailing_comment(span);
                let mut node = Node::new(
                    NodeValue::Scalar {
                        value,
                        style: ScalarStyle::from_scan_style(style),
                    },
                    mark,
                )
                .with_span(span);
                node.line_comment = comment;
                self.push_complete(node);
            }

            Event::SequenceStart(_anchor_id, _tag) => {
                let flow = self.starts_flow(&marker);
                if flow {
                    self.flow_depth += 1;
                }
                self.stack.push(BuildNode::Sequence {
                    mark: Mark::from_marker(&marker),
                    flow,
                    items: Vec::new(),
                });
            }

            Event::SequenceEnd => {
                let Some(BuildNode::Sequence { mark, flow, items }) = self.stack.pop() else {
                    self.bad = Some("sequence end without matching start".into());
                    return;
                };
                if flow {
                    self.flow_depth -= 1;
                }
                let span = TextSpan {
                    start: mark.offset,
                    end: marker.index(),
                };
                self.push_complete(Node::new(NodeValue::Sequence(items), mark).with_span(span));
            }

            Event::MappingStart(_anchor_id, _tag) => {
                let flow = self.starts_flow(&marker);
                if flow {
                    self.flow_depth += 1;
                }
                self.stack.push(BuildNode::Mapping {
                    mark: Mark::from_marker(&marker),
                    flow,
                    entries: Vec::new(),
                    pending_key: None,
                });
            }

            Event::MappingEnd => {
                let Some(BuildNode::Mapping {
                    mark,
                    flow,
                    entries,
                    pending_key,
                }) = self.stack.pop()
                else {
                    self.bad = Some("mapping end without matching start".into());
                    return;
                };
                if flow {
                    self.flow_depth -= 1;
                }
                if pending_key.is_some() {
                    self.bad = Some("mapping key without a value".into());
                    return;
                }
                let span = TextSpan {
                    start: mark.offset,
                    end: marker.index(),
                };
                self.push_complete(Node::new(NodeValue::Mapping(entries), mark).with_span(span));
            }

            Event::Alias(_anchor_id) => {
                // Aliases are not resolved; they surface as empty scalars
                // that neither locator will match on value.
                let mark = Mark::from_marker(&marker);
                self.push_complete(Node::new(
                    NodeValue::Scalar {
                        value: String::new(),
                        style: ScalarStyle::Plain,
                    },
                    mark,
                ));
            }
        }
    }
}

/// Computes the byte span a scalar occupies in the source, dispatching on
/// the first byte (quote, block indicator) with the scanned style as a
/// fallback hint.
fn scalar_span(
    source: &str,
    start: usize,
    value: &str,
    style: TScalarStyle,
    in_flow: bool,
) -> TextSpan {
    let bytes = source.as_bytes();
    // An empty plain scalar (a null value) has no bytes of its own; its
    // marker may already sit on the next token. Quoted empties keep their
    // quote bytes.
    let quoted = matches!(
        style,
        TScalarStyle::SingleQuoted | TScalarStyle::DoubleQuoted
    );
    if start >= bytes.len() || (value.is_empty() && !quoted) {
        let start = start.min(bytes.len());
        return TextSpan { start, end: start };
    }

    let end = match bytes[start] {
        b'\'' if matches!(style, TScalarStyle::SingleQuoted) => scan_single_quoted(bytes, start),
        b'"' if matches!(style, TScalarStyle::DoubleQuoted) => scan_double_quoted(bytes, start),
        b'|' | b'>' if matches!(style, TScalarStyle::Literal | TScalarStyle::Folded) => {
            scan_block(source, start)
        }
        _ => {
            let mut end = scan_plain_line(bytes, start, in_flow);
            // A plain scalar folded over several lines occupies more than
            // its first line; extend through the indented continuation.
            if !in_flow && &source[start..end] != value && value.contains(' ') {
                end = scan_continuation(source, line_indent_at(source, start), end);
            }
            end
        }
    };

    TextSpan { start, end }
}

/// End of a plain scalar on its starting line: newline, trailing comment,
/// flow punctuation, or a `: ` key separator.
fn scan_plain_line(bytes: &[u8], start: usize, in_flow: bool) -> usize {
    let mut i = start;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\n' {
            break;
        }
        if b == b'#' && i > start && matches!(bytes[i - 1], b' ' | b'\t') {
            break;
        }
        if in_flow && matches!(b, b',' | b']' | b'}') {
            break;
        }
        if b == b':' && matches!(bytes.get(i + 1), None | Some(b' ') | Some(b'\n')) {
            break;
        }
        i += 1;
    }
    while i > start && matches!(bytes[i - 1], b' ' | b'\t' | b'\r') {
        i -= 1;
    }
    i
}

fn scan_single_quoted(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            if bytes.get(i + 1) == Some(&b'\'') {
                i += 2; // escaped quote
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    i
}

fn scan_double_quoted(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    i.min(bytes.len())
}

/// A block scalar spans its indicator line plus every following line that
/// is blank or indented deeper than the line the indicator sits on.
fn scan_block(source: &str, start: usize) -> usize {
    let bytes = source.as_bytes();
    let indent = line_indent_at(source, start);
    let mut end = start;
    while end < bytes.len() && bytes[end] != b'\n' {
        end += 1;
    }
    scan_continuation(source, indent, end)
}

/// Extends `end` (sitting on a newline or EOF) through every following line
/// that is blank or indented deeper than `indent`.
fn scan_continuation(source: &str, indent: usize, from: usize) -> usize {
    let bytes = source.as_bytes();
    let mut end = from;
    let mut pos = from;
    while pos < bytes.len() && bytes[pos] == b'\n' {
        let line_start = pos + 1;
        let mut line_end = line_start;
        while line_end < bytes.len() && bytes[line_end] != b'\n' {
            line_end += 1;
        }
        let line = source[line_start..line_end].trim_end_matches('\r');
        if line.trim().is_empty() {
            // Blank lines belong to the block only if a deeper line follows.
            pos = line_end;
            continue;
        }
        let line_indent = line.len() - line.trim_start_matches(' ').len();
        if line_indent > indent {
            end = line_end;
            pos = line_end;
        } else {
            break;
        }
    }
    end
}

/// Indentation (leading spaces) of the line containing `offset`.
fn line_indent_at(source: &str, offset: usize) -> usize {
    let bytes = source.as_bytes();
    let mut line_start = offset.min(bytes.len());
    while line_start > 0 && bytes[line_start - 1] != b'\n' {
        line_start -= 1;
    }
    let mut i = line_start;
    while i < bytes.len() && bytes[i] == b' ' {
        i += 1;
    }
    i - line_start
}

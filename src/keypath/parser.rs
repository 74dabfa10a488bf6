//! Dotted key path parser.
//!
//! The legacy syntax: dot-separated identifiers, where a segment may carry
//! a trailing `[N]` addressing the Nth item of a sequence reached through
//! it (`a.b[2].c`). A path may begin with a bare `[N]` when the document
//! root is itself a sequence. The parser is pure; it never touches a
//! document.

use super::error::KeyPathError;

/// One addressing step: a key name, optionally with a positional index.
///
/// `name` is empty only for a leading bare `[N]` segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    pub index: Option<usize>,
}

/// Parses an expression like `a.b[2].c` into ordered segments.
pub fn parse(expression: &str) -> Result<Vec<Segment>, KeyPathError> {
    if expression.is_empty() {
        return Err(KeyPathError::Empty);
    }

    let mut segments = Vec::new();
    for raw in expression.split('.') {
        if raw.is_empty() {
            return Err(KeyPathError::EmptySegment {
                expression: expression.to_string(),
            });
        }
        segments.push(parse_segment(raw)?);
    }
    Ok(segments)
}

fn parse_segment(raw: &str) -> Result<Segment, KeyPathError> {
    if !raw.ends_with(']') {
        if raw.contains('[') || raw.contains(']') {
            return Err(KeyPathError::Unbalanced {
                fragment: raw.to_string(),
            });
        }
        return Ok(Segment {
            name: raw.to_string(),
            index: None,
        });
    }

    let open = raw.rfind('[').ok_or_else(|| KeyPathError::Unbalanced {
        fragment: raw.to_string(),
    })?;
    let index_str = &raw[open + 1..raw.len() - 1];
    let index = index_str
        .parse::<usize>()
        .map_err(|_| KeyPathError::BadIndex {
            fragment: raw.to_string(),
        })?;

    let name = &raw[..open];
    if name.contains('[') || name.contains(']') {
        return Err(KeyPathError::Unbalanced {
            fragment: raw.to_string(),
        });
    }

    Ok(Segment {
        name: name.to_string(),
        index: Some(index),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(name: &str, index: Option<usize>) -> Segment {
        Segment {
            name: name.to_string(),
            index,
        }
    }

    #[test]
    fn test_parse_simple_path() {
        let segments = parse("a.b.c").unwrap();
        assert_eq!(
            segments,
            vec![seg("a", None), seg("b", None), seg("c", None)]
        );
    }

    #[test]
    fn test_parse_indexed_segment() {
        let segments = parse("a.b[2].c").unwrap();
        assert_eq!(
            segments,
            vec![seg("a", None), seg("b", Some(2)), seg("c", None)]
        );
    }

    #[test]
    fn test_parse_leading_bare_index() {
        let segments = parse("[0].name").unwrap();
        assert_eq!(segments, vec![seg("", Some(0)), seg("name", None)]);
    }

    #[test]
    fn test_parse_empty_path_fails() {
        assert_eq!(parse(""), Err(KeyPathError::Empty));
    }

    #[test]
    fn test_parse_empty_segment_fails() {
        assert!(matches!(
            parse("a..b"),
            Err(KeyPathError::EmptySegment { .. })
        ));
    }

    #[test]
    fn test_parse_unbalanced_bracket_fails() {
        assert!(matches!(
            parse("a.b[2"),
            Err(KeyPathError::Unbalanced { .. })
        ));
        assert!(matches!(
            parse("a.b]2["),
            Err(KeyPathError::Unbalanced { .. })
        ));
    }

    #[test]
    fn test_parse_non_numeric_index_fails() {
        let err = parse("a.b[x]").unwrap_err();
        assert_eq!(
            err,
            KeyPathError::BadIndex {
                fragment: "b[x]".to_string()
            }
        );
    }

    #[test]
    fn test_parse_negative_index_fails() {
        assert!(matches!(
            parse("a.b[-1]"),
            Err(KeyPathError::BadIndex { .. })
        ));
    }

    #[test]
    fn test_parse_empty_index_fails() {
        assert!(matches!(parse("a.b[]"), Err(KeyPathError::BadIndex { .. })));
    }

    #[test]
    fn test_error_names_offending_fragment() {
        let err = parse("good.bad[zz]").unwrap_err();
        assert!(err.to_string().contains("bad[zz]"));
    }
}

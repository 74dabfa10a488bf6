//! yamlpath query string parser.

use super::ast::{FilterExpr, PathSegment, YamlPath};
use super::error::YamlPathError;

/// Parser for yamlpath query strings.
pub struct Parser {
    input: String,
    position: usize,
}

impl Parser {
    /// Creates a new parser for the given query string.
    pub fn new(query: &str) -> Self {
        Self {
            input: query.to_string(),
            position: 0,
        }
    }

    /// Parses the query string into a YamlPath.
    pub fn parse(query: &str) -> Result<YamlPath, YamlPathError> {
        let mut parser = Parser::new(query);
        parser.parse_path()
    }

    fn parse_path(&mut self) -> Result<YamlPath, YamlPathError> {
        let mut segments = Vec::new();

        self.skip_whitespace();

        // Expect root ($)
        if self.peek() != Some('$') {
            return Err(YamlPathError::InvalidSyntax {
                message: "yamlpath must start with '$'".to_string(),
            });
        }
        self.next();
        segments.push(PathSegment::Root);

        // Parse remaining segments
        while !self.is_eof() {
            self.skip_whitespace();
            match self.peek() {
                Some('.') => {
                    self.next();
                    if self.peek() == Some('.') {
                        segments.push(self.parse_recursive_descent()?);
                    } else if self.peek() == Some('*') {
                        self.next();
                        segments.push(PathSegment::Wildcard);
                    } else {
                        let name = self.parse_identifier()?;
                        segments.push(PathSegment::Child(name));
                    }
                }
                Some('[') => {
                    segments.push(self.parse_bracket_expression()?);
                }
                _ => break,
            }
        }

        Ok(YamlPath::new(segments))
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Returns the next character and advances position.
    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.next();
            } else {
                break;
            }
        }
    }

    /// Checks if we've reached the end of input.
    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Expects a specific character and advances, or returns an error.
    fn expect(&mut self, expected: char) -> Result<(), YamlPathError> {
        self.skip_whitespace();
        let pos = self.position;
        match self.next() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(YamlPathError::UnexpectedToken {
                position: pos,
                found: ch.to_string(),
                expected: format!("'{}'", expected),
            }),
            None => Err(YamlPathError::UnexpectedEnd {
                expected: format!("'{}'", expected),
            }),
        }
    }

    /// Parses an identifier (property name).
    fn parse_identifier(&mut self) -> Result<String, YamlPathError> {
        self.skip_whitespace();
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '-' {
                name.push(ch);
                self.next();
            } else {
                break;
            }
        }
        if name.is_empty() {
            Err(YamlPathError::InvalidSyntax {
                message: "expected identifier".to_string(),
            })
        } else {
            Ok(name)
        }
    }

    /// Parses recursive descent (..)
    fn parse_recursive_descent(&mut self) -> Result<PathSegment, YamlPathError> {
        self.expect('.')?;
        if self.peek() == Some('[') {
            Ok(PathSegment::RecursiveDescent(None))
        } else if self.peek() == Some('*') {
            self.next();
            Ok(PathSegment::RecursiveDescent(None))
        } else {
            let name = self.parse_identifier()?;
            Ok(PathSegment::RecursiveDescent(Some(name)))
        }
    }

    /// Parses bracket expression: [index], [start:end], ['key'], [*], [?(...)]
    fn parse_bracket_expression(&mut self) -> Result<PathSegment, YamlPathError> {
        self.expect('[')?;
        self.skip_whitespace();

        let segment = match self.peek() {
            Some('*') => {
                self.next();
                self.skip_whitespace();
                self.expect(']')?;
                PathSegment::Wildcard
            }
            Some('?') => {
                let filter = self.parse_filter()?;
                self.skip_whitespace();
                self.expect(']')?;
                PathSegment::Filter(filter)
            }
            Some('\'') | Some('"') => {
                let properties = self.parse_bracket_string()?;
                self.skip_whitespace();
                self.expect(']')?;
                if properties.len() == 1 {
                    PathSegment::Child(properties.into_iter().next().unwrap())
                } else {
                    PathSegment::MultiProperty(properties)
                }
            }
            Some('-') | Some('0'..='9') => {
                // Check if this looks like a slice by peeking ahead for ':'
                let saved_pos = self.position;
                let mut looks_like_slice = false;
                while !self.is_eof() {
                    match self.peek() {
                        Some(':') => {
                            looks_like_slice = true;
                            break;
                        }
                        Some(']') => break,
                        Some(_) => {
                            self.next();
                        }
                        None => break,
                    }
                }
                self.position = saved_pos;

                if looks_like_slice {
                    self.parse_slice()?
                } else {
                    let idx = self.parse_bracket_number()?;
                    self.skip_whitespace();
                    self.expect(']')?;
                    PathSegment::Index(idx)
                }
            }
            Some(':') => self.parse_slice()?,
            _ => {
                return Err(YamlPathError::InvalidSyntax {
                    message: "invalid bracket expression".to_string(),
                })
            }
        };

        Ok(segment)
    }

    /// Parses an equality filter: `?(@.field == 'literal')`.
    fn parse_filter(&mut self) -> Result<FilterExpr, YamlPathError> {
        self.expect('?')?;
        self.expect('(')?;
        self.skip_whitespace();
        self.expect('@')?;

        let mut field = Vec::new();
        loop {
            match self.peek() {
                Some('.') => {
                    self.next();
                    field.push(self.parse_identifier()?);
                }
                Some('[') => {
                    self.next();
                    let mut names = self.parse_bracket_string()?;
                    self.skip_whitespace();
                    self.expect(']')?;
                    if names.len() != 1 {
                        return Err(YamlPathError::InvalidSyntax {
                            message: "filter field expects a single bracketed name".to_string(),
                        });
                    }
                    field.push(names.remove(0));
                }
                _ => break,
            }
        }
        if field.is_empty() {
            return Err(YamlPathError::InvalidSyntax {
                message: "filter must reference a field (@.name)".to_string(),
            });
        }

        self.skip_whitespace();
        self.expect('=')?;
        self.expect('=')?;
        self.skip_whitespace();

        let value = match self.peek() {
            Some('\'') | Some('"') => {
                let mut values = self.parse_bracket_string()?;
                if values.len() != 1 {
                    return Err(YamlPathError::InvalidSyntax {
                        message: "filter expects a single literal".to_string(),
                    });
                }
                values.remove(0)
            }
            _ => {
                // Bare literal up to the closing parenthesis.
                let mut value = String::new();
                while let Some(ch) = self.peek() {
                    if ch == ')' {
                        break;
                    }
                    value.push(ch);
                    self.next();
                }
                let value = value.trim().to_string();
                if value.is_empty() {
                    return Err(YamlPathError::InvalidSyntax {
                        message: "filter comparison is missing a literal".to_string(),
                    });
                }
                value
            }
        };

        self.skip_whitespace();
        self.expect(')')?;

        Ok(FilterExpr { field, value })
    }

    /// Parses string(s) inside brackets: ['key'] or ['key1','key2']
    fn parse_bracket_string(&mut self) -> Result<Vec<String>, YamlPathError> {
        let mut properties = Vec::new();
        loop {
            self.skip_whitespace();
            let quote = match self.peek() {
                Some('\'') | Some('"') => self.next().unwrap(),
                _ => break,
            };

            let mut value = String::new();
            loop {
                match self.next() {
                    Some(ch) if ch == quote => break,
                    Some('\\') => match self.next() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some('\\') => value.push('\\'),
                        Some('\'') => value.push('\''),
                        Some('"') => value.push('"'),
                        Some(_) | None => {
                            return Err(YamlPathError::InvalidSyntax {
                                message: "invalid escape sequence".to_string(),
                            })
                        }
                    },
                    Some(ch) => value.push(ch),
                    None => {
                        return Err(YamlPathError::UnexpectedEnd {
                            expected: format!("closing quote '{}'", quote),
                        })
                    }
                }
            }
            properties.push(value);

            self.skip_whitespace();
            if self.peek() == Some(',') {
                self.next();
            } else {
                break;
            }
        }
        Ok(properties)
    }

    /// Parses a number inside brackets
    fn parse_bracket_number(&mut self) -> Result<isize, YamlPathError> {
        let num_str = self.parse_number_string()?;
        num_str
            .parse::<isize>()
            .map_err(|_| YamlPathError::InvalidSyntax {
                message: format!("invalid number: {}", num_str),
            })
    }

    /// Parses a number as a string
    fn parse_number_string(&mut self) -> Result<String, YamlPathError> {
        let mut num = String::new();
        if self.peek() == Some('-') {
            num.push('-');
            self.next();
        }
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num.push(ch);
                self.next();
            } else {
                break;
            }
        }
        if num.is_empty() || num == "-" {
            Err(YamlPathError::InvalidSyntax {
                message: "expected number".to_string(),
            })
        } else {
            Ok(num)
        }
    }

    /// Parses array slice: [start:end], [start:], [:end], [:]
    fn parse_slice(&mut self) -> Result<PathSegment, YamlPathError> {
        let start = if self.peek() == Some(':') {
            None
        } else {
            Some(self.parse_bracket_number()?)
        };

        self.skip_whitespace();
        self.expect(':')?;
        self.skip_whitespace();

        let end = if self.peek() == Some(']') {
            None
        } else {
            Some(self.parse_bracket_number()?)
        };

        self.skip_whitespace();
        self.expect(']')?;

        // Validate slice bounds
        if let (Some(s), Some(e)) = (start, end) {
            if s >= 0 && e >= 0 && s > e {
                return Err(YamlPathError::InvalidSyntax {
                    message: format!("invalid slice: start ({}) > end ({})", s, e),
                });
            }
        }

        Ok(PathSegment::Slice(start, end))
    }
}

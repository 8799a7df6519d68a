//! Repo tag record parsing.
//!
//! The `--repo-tags` flag carries a single comma-separated record, e.g.
//! `discoenv/apps:qa,discoenv/analyses:qa`. Values may be quoted using the
//! usual CSV rules (`"a,b"`, `"say ""hi"""`) and the record may span several
//! lines, as long as every row has the same number of fields. Beyond that,
//! row boundaries carry no meaning: every non-empty field across all rows
//! becomes one requested reference, in order, duplicates included.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::{ManifestError, Result};

const ERR_QUOTE: &str = "extraneous or missing \" in quoted-field";
const ERR_BARE_QUOTE: &str = "bare \" in non-quoted-field";
const ERR_FIELD_COUNT: &str = "wrong number of fields";

/// Parse a repo tag record into the ordered list of requested references.
///
/// `\r\n` is read as `\n`, blank lines are skipped and field whitespace is
/// preserved. Every row must have as many fields as the first one, counting
/// empty fields. Empty fields are then dropped.
pub fn parse_repo_tags(input: &str) -> Result<Vec<String>> {
    let normalized = input.replace("\r\n", "\n");
    let mut cursor = Cursor::new(&normalized);
    let mut tags = Vec::new();
    let mut width = None;

    while let Some(c) = cursor.peek() {
        if c == '\n' {
            cursor.bump();
            continue;
        }

        let row_line = cursor.line;
        let mut fields = 0;
        loop {
            let field = cursor.field()?;
            fields += 1;
            if !field.is_empty() {
                tags.push(field);
            }
            match cursor.bump() {
                Some(',') => continue,
                _ => break,
            }
        }

        match width {
            None => width = Some(fields),
            Some(expected) if expected != fields => {
                return Err(cursor.error(row_line, 1, ERR_FIELD_COUNT));
            }
            Some(_) => {}
        }
    }

    tracing::debug!(count = tags.len(), "Parsed repo tags");
    Ok(tags)
}

/// Character cursor that tracks the 1-based line and column of the last
/// consumed character.
struct Cursor<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 0,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Read one field, leaving its terminator (`,`, `\n` or end of input)
    /// unconsumed.
    fn field(&mut self) -> Result<String> {
        if self.peek() == Some('"') {
            self.quoted_field()
        } else {
            self.bare_field()
        }
    }

    fn bare_field(&mut self) -> Result<String> {
        let mut field = String::new();
        loop {
            match self.peek() {
                None | Some(',') | Some('\n') => return Ok(field),
                Some('"') => {
                    self.bump();
                    return Err(self.error(self.line, self.column, ERR_BARE_QUOTE));
                }
                Some(c) => {
                    self.bump();
                    field.push(c);
                }
            }
        }
    }

    fn quoted_field(&mut self) -> Result<String> {
        self.bump();
        let (start_line, start_column) = (self.line, self.column);
        let mut field = String::new();

        loop {
            match self.bump() {
                None => return Err(self.error(start_line, start_column, ERR_QUOTE)),
                Some('"') => match self.peek() {
                    Some('"') => {
                        self.bump();
                        field.push('"');
                    }
                    None | Some(',') | Some('\n') => return Ok(field),
                    Some(_) => {
                        self.bump();
                        return Err(self.error(self.line, self.column, ERR_QUOTE));
                    }
                },
                Some(c) => field.push(c),
            }
        }
    }

    fn error(&self, line: usize, column: usize, message: &str) -> ManifestError {
        ManifestError::ParseError {
            line,
            column,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Vec<String> {
        parse_repo_tags(input).unwrap()
    }

    #[test]
    fn test_parse_single_row() {
        assert_eq!(parse("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_multi_row_is_flattened() {
        assert_eq!(parse("a,b\n,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_rows_with_different_widths() {
        let err = parse_repo_tags("a,b\nc").unwrap_err();
        match err {
            ManifestError::ParseError { line, column, message } => {
                assert_eq!(line, 2);
                assert_eq!(column, 1);
                assert_eq!(message, ERR_FIELD_COUNT);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(parse_repo_tags("a\nb,c,d").is_err());
    }

    #[test]
    fn test_parse_width_counts_empty_fields() {
        assert_eq!(parse("a,,b\n,c,\n\n,,d"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_parse_quoted_newline_stays_in_one_row() {
        let err = parse_repo_tags("\"a\nb\",c\nd").unwrap_err();
        assert!(matches!(err, ManifestError::ParseError { line: 3, .. }));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n").is_empty());
    }

    #[test]
    fn test_parse_preserves_order_and_duplicates() {
        assert_eq!(
            parse("repo/y:v1,repo/x:v1,repo/y:v1"),
            vec!["repo/y:v1", "repo/x:v1", "repo/y:v1"]
        );
    }

    #[test]
    fn test_parse_drops_empty_fields() {
        assert_eq!(parse(",a,,b,"), vec!["a", "b"]);
        assert_eq!(parse("\"\",a"), vec!["a"]);
    }

    #[test]
    fn test_parse_keeps_whitespace() {
        assert_eq!(parse(" a , b"), vec![" a ", " b"]);
    }

    #[test]
    fn test_parse_crlf_and_blank_lines() {
        assert_eq!(parse("a,b\r\n\r\nc,d\r\n"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_parse_quoted_fields() {
        assert_eq!(
            parse("\"registry:5000/app:v1\",\"x,y\",\"say \"\"hi\"\"\""),
            vec!["registry:5000/app:v1", "x,y", "say \"hi\""]
        );
    }

    #[test]
    fn test_parse_quoted_field_spanning_lines() {
        assert_eq!(parse("\"a\nb\",c"), vec!["a\nb", "c"]);
    }

    #[test]
    fn test_parse_unterminated_quote() {
        let err = parse_repo_tags("a,\"b").unwrap_err();
        match err {
            ManifestError::ParseError { line, column, message } => {
                assert_eq!(line, 1);
                assert_eq!(column, 3);
                assert_eq!(message, ERR_QUOTE);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_text_after_closing_quote() {
        let err = parse_repo_tags("a\n\"b\"c").unwrap_err();
        match err {
            ManifestError::ParseError { line, column, message } => {
                assert_eq!(line, 2);
                assert_eq!(column, 4);
                assert_eq!(message, ERR_QUOTE);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_bare_quote() {
        let err = parse_repo_tags("ab\"c").unwrap_err();
        match err {
            ManifestError::ParseError { column, message, .. } => {
                assert_eq!(column, 3);
                assert_eq!(message, ERR_BARE_QUOTE);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

//! Lexical core shared by the decoder.
//!
//! A [`Cursor`] owns the input, a one-character lookahead and the location
//! counters used for error reporting. [`Cursor::bump`] skips `#` comments
//! transparently; [`Cursor::bump_raw`] does not and is used inside string
//! literals, where `#` is ordinary content.

use crate::chars::is_whitespace;
use crate::{Error, Result};

pub struct Cursor<'a> {
    input: &'a str,
    lookahead: Option<char>,
    position: usize,
    line: usize,
    column: usize,
    framed: bool,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor positioned on the first significant character.
    ///
    /// Leading whitespace and comments are consumed so that the `framed`
    /// flag can be decided: it is set when the document starts with `{`.
    pub fn new(input: &'a str) -> Self {
        let mut cursor = Cursor {
            input,
            lookahead: input.chars().next(),
            position: 0,
            line: 1,
            column: 1,
            framed: false,
        };
        cursor.skip_comments();
        cursor.skip_whitespace();
        cursor.framed = cursor.lookahead == Some('{');
        cursor
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.lookahead
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.lookahead.is_none()
    }

    /// Whether the document is wrapped in a top-level `{ ... }`.
    #[inline]
    pub fn is_framed(&self) -> bool {
        self.framed
    }

    /// Byte offset of the lookahead character.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Text between a previously recorded position and the lookahead.
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.input[start..self.position]
    }

    /// Advances one character without looking at comments.
    pub fn bump_raw(&mut self) {
        if let Some(ch) = self.lookahead {
            self.position += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.lookahead = self.input[self.position..].chars().next();
        }
    }

    /// Advances one character, then discards any comment that starts there.
    pub fn bump(&mut self) {
        self.bump_raw();
        self.skip_comments();
    }

    /// Discards comments starting at the lookahead.
    pub fn skip_comments(&mut self) {
        while self.lookahead == Some('#') {
            while !matches!(self.lookahead, None | Some('\n')) {
                self.bump_raw();
            }
        }
    }

    /// Skips whitespace and comments, returning whether anything was skipped.
    pub fn skip_whitespace(&mut self) -> bool {
        let start = self.position;
        while matches!(self.lookahead, Some(ch) if is_whitespace(ch)) {
            self.bump();
        }
        self.position != start
    }

    /// Consumes `expected` or fails naming both characters.
    pub fn match_char(&mut self, expected: char) -> Result<()> {
        match self.lookahead {
            Some(ch) if ch == expected => {
                self.bump();
                Ok(())
            }
            Some(ch) => Err(self.error(format!("expected '{}', found '{}'", expected, ch))),
            None => Err(self.error(format!("expected '{}', found end of input", expected))),
        }
    }

    /// Builds a decode error located at the lookahead.
    pub fn error(&self, message: impl Into<String>) -> Error {
        Error::decode(message, self.position, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framed_detection() {
        assert!(Cursor::new("{a: 1}").is_framed());
        assert!(Cursor::new("  \n\t{a: 1}").is_framed());
        assert!(Cursor::new("# leading comment\n{a: 1}").is_framed());
        assert!(!Cursor::new("a: 1").is_framed());
        assert!(!Cursor::new("").is_framed());
    }

    #[test]
    fn test_line_and_column_tracking() {
        let mut cursor = Cursor::new("ab\ncd");
        assert_eq!((cursor.line(), cursor.column()), (1, 1));
        cursor.bump();
        cursor.bump();
        assert_eq!(cursor.peek(), Some('\n'));
        assert_eq!((cursor.line(), cursor.column()), (1, 3));
        cursor.bump();
        assert_eq!(cursor.peek(), Some('c'));
        assert_eq!((cursor.line(), cursor.column()), (2, 1));
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_comments_are_skipped() {
        let mut cursor = Cursor::new("a# comment\nb");
        cursor.bump();
        assert_eq!(cursor.peek(), Some('\n'));
        cursor.bump();
        assert_eq!(cursor.peek(), Some('b'));
    }

    #[test]
    fn test_comment_at_end_of_input() {
        let mut cursor = Cursor::new("a # trailing");
        cursor.bump();
        assert!(cursor.skip_whitespace());
        assert!(cursor.at_end());
    }

    #[test]
    fn test_raw_bump_keeps_hash() {
        let mut cursor = Cursor::new("\"#\"");
        cursor.bump_raw();
        assert_eq!(cursor.peek(), Some('#'));
    }

    #[test]
    fn test_match_char_reports_both_characters() {
        let mut cursor = Cursor::new("x");
        let err = cursor.match_char(']').unwrap_err();
        assert!(err.to_string().contains("expected ']', found 'x'"));

        let mut cursor = Cursor::new("");
        let err = cursor.match_char('}').unwrap_err();
        assert!(err.to_string().contains("end of input"));
    }

    #[test]
    fn test_multibyte_positions() {
        let mut cursor = Cursor::new("é:");
        cursor.bump();
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.column(), 2);
        assert_eq!(cursor.slice_from(0), "é");
    }
}

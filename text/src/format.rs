//! Fixed-width reflow of tokenized prose.
//!
//! Words are packed greedily onto indented lines. Paragraph breaks become a
//! single blank line, and verbatim lines are emitted on their own line with
//! an extra [`VERBATIM_INDENT`].

use std::fmt::{self, Write};

use crate::lexer::{Lexer, Token};

/// Line width used when a caller passes a width of zero.
pub const DEFAULT_WIDTH: usize = 80;

/// Extra indentation placed in front of verbatim lines.
pub const VERBATIM_INDENT: &str = "  ";

const TAB_STOP: usize = 8;

/// Returns the display width of `s` when it starts at column `start`.
///
/// Every character counts as one column, except tab which advances to the
/// next multiple of eight.
///
/// # Examples
///
/// ```
/// use cmdtree_text::display_width;
///
/// assert_eq!(display_width("abc", 0), 3);
/// assert_eq!(display_width("\t", 0), 8);
/// assert_eq!(display_width("ab\tc", 0), 9);
/// assert_eq!(display_width("\t", 3), 5);
/// ```
pub fn display_width(s: &str, start: usize) -> usize {
    let mut column = start;
    for c in s.chars() {
        if c == '\t' {
            column += TAB_STOP - column % TAB_STOP;
        } else {
            column += 1;
        }
    }
    column - start
}

/// Writes `text` reflowed to `width` columns, each line prefixed by `indent`.
///
/// A width of zero selects [`DEFAULT_WIDTH`]. Output is newline-terminated
/// unless `text` contains no tokens, in which case nothing is written.
///
/// # Errors
///
/// Propagates errors of the underlying writer.
pub fn format_text<W: Write>(w: &mut W, text: &str, width: usize, indent: &str) -> fmt::Result {
    let mut formatter = LineFormatter::new(w, width, indent);
    for token in Lexer::new(text) {
        formatter.push(&token)?;
    }
    formatter.finish()
}

/// Reflows `text` into a new string.
///
/// # Examples
///
/// ```
/// use cmdtree_text::reflow;
///
/// let text = "The quick brown fox jumps over the lazy dog.";
/// assert_eq!(
///     reflow(text, 24, "  "),
///     "  The quick brown fox\n  jumps over the lazy\n  dog.\n"
/// );
/// ```
pub fn reflow(text: &str, width: usize, indent: &str) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = format_text(&mut out, text, width, indent);
    out
}

/// Greedy line filler driven one token at a time.
#[derive(Debug)]
pub struct LineFormatter<'w, W> {
    out: &'w mut W,
    width: usize,
    indent: &'w str,
    indent_width: usize,
    column: usize,
    started: bool,
    pending_break: bool,
}

impl<'w, W: Write> LineFormatter<'w, W> {
    /// Creates a formatter writing to `out`.
    pub fn new(out: &'w mut W, width: usize, indent: &'w str) -> Self {
        Self {
            out,
            width: if width == 0 { DEFAULT_WIDTH } else { width },
            indent,
            indent_width: display_width(indent, 0),
            column: 0,
            started: false,
            pending_break: false,
        }
    }

    /// Consumes one token.
    ///
    /// # Errors
    ///
    /// Propagates errors of the underlying writer.
    pub fn push(&mut self, token: &Token) -> fmt::Result {
        match token {
            Token::ParagraphBreak => {
                // Breaks are deferred so that leading and trailing ones vanish.
                if self.started {
                    self.pending_break = true;
                }
                Ok(())
            }
            Token::Word(word) => {
                self.flush_break()?;
                self.word(word)
            }
            Token::Verbatim(line) => {
                self.flush_break()?;
                self.verbatim(line)
            }
        }
    }

    /// Terminates the last line, if one is open.
    ///
    /// # Errors
    ///
    /// Propagates errors of the underlying writer.
    pub fn finish(self) -> fmt::Result {
        if self.column > 0 {
            self.out.write_char('\n')?;
        }
        Ok(())
    }

    fn flush_break(&mut self) -> fmt::Result {
        if self.pending_break {
            self.end_line()?;
            self.out.write_char('\n')?;
            self.pending_break = false;
        }
        self.started = true;
        Ok(())
    }

    fn end_line(&mut self) -> fmt::Result {
        if self.column > 0 {
            self.out.write_char('\n')?;
            self.column = 0;
        }
        Ok(())
    }

    fn word(&mut self, word: &str) -> fmt::Result {
        if self.column > 0 {
            let size = 1 + display_width(word, self.column + 1);
            if self.column + size <= self.width {
                write!(self.out, " {word}")?;
                self.column += size;
                return Ok(());
            }
            self.end_line()?;
        }
        write!(self.out, "{}{word}", self.indent)?;
        self.column = self.indent_width + display_width(word, self.indent_width);
        Ok(())
    }

    fn verbatim(&mut self, line: &str) -> fmt::Result {
        self.end_line()?;
        writeln!(self.out, "{}{VERBATIM_INDENT}{line}", self.indent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        assert_eq!(reflow("a boolean option", 80, "    "), "    a boolean option\n");
    }

    #[test]
    fn test_leading_and_trailing_newlines_are_dropped() {
        assert_eq!(
            reflow("\nEs ist gut. Es wird noch besser.\n", 80, "    "),
            "    Es ist gut. Es wird noch besser.\n"
        );
    }

    #[test]
    fn test_paragraphs_separated_by_one_blank_line() {
        assert_eq!(reflow("one\n\n\n\ntwo", 80, ""), "one\n\ntwo\n");
    }

    #[test]
    fn test_trailing_paragraph_break_leaves_single_newline() {
        assert_eq!(reflow("one\n\n\n", 80, "  "), "  one\n");
    }

    #[test]
    fn test_leading_paragraph_break_is_suppressed() {
        assert_eq!(reflow("\n\n\nfirst", 80, ""), "first\n");
    }

    #[test]
    fn test_wraps_at_width() {
        let out = reflow("aaa bbb ccc ddd", 7, "");
        assert_eq!(out, "aaa bbb\nccc ddd\n");
    }

    #[test]
    fn test_wrap_counts_indent() {
        let out = reflow("aaa bbb", 8, "  ");
        assert_eq!(out, "  aaa\n  bbb\n");
    }

    #[test]
    fn test_overlong_word_stands_alone() {
        let out = reflow("a supercalifragilistic b", 10, "");
        assert_eq!(out, "a\nsupercalifragilistic\nb\n");
    }

    #[test]
    fn test_verbatim_lines_are_not_wrapped() {
        let text = "Example:\n  let x = 1;    // a long comment that must not be wrapped at all\n";
        let out = reflow(text, 20, "  ");
        assert_eq!(
            out,
            "  Example:\n    let x = 1;    // a long comment that must not be wrapped at all\n"
        );
    }

    #[test]
    fn test_paragraph_after_verbatim() {
        let out = reflow("intro\n  code\n\nafter", 80, "");
        assert_eq!(out, "intro\n  code\n\nafter\n");
    }

    #[test]
    fn test_empty_text_writes_nothing() {
        assert_eq!(reflow("", 80, "    "), "");
        assert_eq!(reflow("\n\n\n", 80, "    "), "");
    }

    #[test]
    fn test_zero_width_uses_default() {
        let words = vec!["word"; 30].join(" ");
        let out = reflow(&words, 0, "");
        assert!(out.lines().all(|line| line.len() <= DEFAULT_WIDTH));
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_tab_indent_counts_to_tab_stop() {
        let out = reflow("ab cd", 10, "\t");
        assert_eq!(out, "\tab\n\tcd\n");
    }
}

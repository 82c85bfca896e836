//! Tokenizer for documentation prose.
//!
//! The lexer is a small character-class state machine with a single
//! character of pushback. It classifies input into three token kinds:
//!
//! - [`Token::Word`]: a run of non-whitespace on an ordinary line.
//! - [`Token::ParagraphBreak`]: one or more blank lines.
//! - [`Token::Verbatim`]: a line that starts with whitespace; its content is
//!   kept as written, minus the leading whitespace run.
//!
//! A [`Lexer`] is a single-pass iterator. To tokenize the same text again,
//! construct a new one.

use std::fmt;
use std::str::Chars;

/// A classified piece of prose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A run of non-whitespace characters.
    Word(String),
    /// A blank line (or several) separating paragraphs.
    ParagraphBreak,
    /// An indented line reproduced without reflow.
    Verbatim(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(word) => write!(f, "{:?}", shorten(word)),
            Self::ParagraphBreak => f.write_str("¶"),
            Self::Verbatim(line) => write!(f, "`{}`", shorten(line).escape_debug()),
        }
    }
}

fn shorten(s: &str) -> String {
    let mut chars = s.chars();
    let head: String = chars.by_ref().take(8).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Beginning of input, or right after a word.
    Start,
    /// Just consumed a newline.
    LineStart,
    /// Inside inter-word whitespace on an ordinary line.
    Space,
    /// Skipping the leading whitespace of a verbatim line.
    VerbatimIndent,
    /// Collecting the body of a verbatim line.
    Verbatim,
    /// Collecting a word.
    Word,
    /// Collapsing consecutive newlines into one paragraph break.
    Paragraph,
    Done,
}

/// Single-pass tokenizer over a prose string.
///
/// # Examples
///
/// ```
/// use cmdtree_text::{Lexer, Token};
///
/// let tokens: Vec<Token> = Lexer::new("one two\n\n  code\n").collect();
/// assert_eq!(
///     tokens,
///     vec![
///         Token::Word("one".into()),
///         Token::Word("two".into()),
///         Token::ParagraphBreak,
///         Token::Verbatim("code".into()),
///     ]
/// );
/// ```
#[derive(Debug)]
pub struct Lexer<'a> {
    chars: Chars<'a>,
    pushback: Option<char>,
    buf: String,
    state: State,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `text`.
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars(),
            pushback: None,
            buf: String::new(),
            state: State::Start,
        }
    }

    /// Reads one character, folding `\r\n` into `\n`.
    fn read(&mut self) -> Option<char> {
        if let Some(c) = self.pushback.take() {
            return Some(c);
        }
        match self.chars.next() {
            Some('\r') if self.chars.clone().next() == Some('\n') => self.chars.next(),
            other => other,
        }
    }

    fn unread(&mut self, c: char) {
        debug_assert!(self.pushback.is_none(), "only one character of pushback");
        self.pushback = Some(c);
    }

    fn take_buf(&mut self) -> String {
        std::mem::take(&mut self.buf)
    }

    /// Runs the state machine until a token is complete or input ends.
    fn step(&mut self) -> Option<Token> {
        loop {
            match self.state {
                State::Done => return None,
                State::Start => match self.read() {
                    None => self.state = State::Done,
                    Some('\n') => self.state = State::LineStart,
                    Some(c) if c.is_whitespace() => self.state = State::Space,
                    Some(c) => {
                        self.buf.push(c);
                        self.state = State::Word;
                    }
                },
                State::LineStart => match self.read() {
                    None => self.state = State::Done,
                    Some('\n') => self.state = State::Paragraph,
                    Some(c) if c.is_whitespace() => self.state = State::VerbatimIndent,
                    Some(c) => {
                        self.buf.push(c);
                        self.state = State::Word;
                    }
                },
                State::Space => match self.read() {
                    None => self.state = State::Done,
                    Some('\n') => self.state = State::LineStart,
                    Some(c) if c.is_whitespace() => {}
                    Some(c) => {
                        self.buf.push(c);
                        self.state = State::Word;
                    }
                },
                State::VerbatimIndent => match self.read() {
                    None => self.state = State::Done,
                    Some('\n') => self.state = State::LineStart,
                    Some(c) if c.is_whitespace() => {}
                    Some(c) => {
                        self.buf.push(c);
                        self.state = State::Verbatim;
                    }
                },
                State::Verbatim => match self.read() {
                    None => {
                        self.state = State::Done;
                        return Some(Token::Verbatim(self.take_buf()));
                    }
                    Some('\n') => {
                        self.state = State::LineStart;
                        return Some(Token::Verbatim(self.take_buf()));
                    }
                    Some(c) => self.buf.push(c),
                },
                State::Word => match self.read() {
                    None => {
                        self.state = State::Done;
                        return Some(Token::Word(self.take_buf()));
                    }
                    Some(c) if c.is_whitespace() => {
                        self.unread(c);
                        self.state = State::Start;
                        return Some(Token::Word(self.take_buf()));
                    }
                    Some(c) => self.buf.push(c),
                },
                State::Paragraph => match self.read() {
                    None => {
                        self.state = State::Done;
                        return Some(Token::ParagraphBreak);
                    }
                    Some('\n') => {}
                    Some(c) => {
                        self.unread(c);
                        self.state = State::LineStart;
                        return Some(Token::ParagraphBreak);
                    }
                },
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.step()
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

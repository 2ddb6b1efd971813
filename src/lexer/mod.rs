// Author: Dustin Pilgrim
// License: MIT

use crate::LtxError;

mod rules;
mod scanner;

/// The closed set of LTX token kinds.
///
/// Declaration order doubles as the rule-table priority used to break
/// equal-length match ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // --- structure ---
    Inherit,
    Include,
    Comma,
    Assign,
    HeaderOpen,
    HeaderClose,

    // --- literals ---
    Identifier,
    QuotedString,
    Constraint,
    Eval,

    // --- layout ---
    Eol,
    Eof,
}

/// One matched token: kind, the exact matched text and its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Token {
    /// The token text with the delimiting quotes stripped for a
    /// `QuotedString`; the raw text for every other kind.
    pub fn unquoted(&self) -> &str {
        if self.kind == TokenKind::QuotedString && self.text.len() >= 2 {
            &self.text[1..self.text.len() - 1]
        } else {
            &self.text
        }
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            offset: 0,
            line: 1,
            column: 0,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    fn rest(&self) -> &'a str {
        &self.input[self.offset..]
    }

    /// Produce the next token, skipping horizontal whitespace and comments
    /// first. Line breaks are significant and come back as [`TokenKind::Eol`];
    /// end of input is a terminal [`TokenKind::Eof`] token.
    pub fn next_token(&mut self) -> Result<Token, LtxError> {
        scanner::skip_spacing_and_comments(self);

        let (line, column, offset) = (self.line, self.column, self.offset);
        let rest = self.rest();

        if rest.is_empty() {
            return Ok(Token {
                kind: TokenKind::Eof,
                text: String::new(),
                line,
                column,
                offset,
            });
        }

        match rules::longest_match(rest) {
            Some((kind, text)) => {
                let text = text.to_string();
                scanner::advance(self, text.len());
                Ok(Token { kind, text, line, column, offset })
            }
            None => Err(LtxError::Tokenize {
                character: rest.chars().next().unwrap_or_default(),
                offset,
                line,
                column,
                hint: Some("No token rule matches here".into()),
                code: Some(101),
            }),
        }
    }
}

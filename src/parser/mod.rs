use std::path::{Path, PathBuf};

use crate::ast::StructuralEvent;
use crate::error::{LtxError, Warning};
use crate::lexer::{Lexer, Token, TokenKind};

mod events;
mod include;

/// State shared across the whole parse, including every recursively
/// expanded include: the expansion stack for the cycle guard, the global
/// "a section has been opened" flag, and the warning sink.
pub(crate) struct ParseSession {
    expanding: Vec<PathBuf>,
    section_seen: bool,
    warnings: Vec<Warning>,
}

impl ParseSession {
    fn new() -> Self {
        ParseSession {
            expanding: Vec::new(),
            section_seen: false,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// A structural parser over one file's token stream with one token of
/// lookahead. Include expansion spawns a child `Parser` per file; shared
/// state lives in the [`ParseSession`].
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    peek: Option<Token>,
    path: PathBuf,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, path: &Path) -> Result<Self, LtxError> {
        let mut lexer = Lexer::new(input);
        let peek = Some(lexer.next_token()?);
        Ok(Self {
            lexer,
            peek,
            path: path.to_path_buf(),
        })
    }

    pub(crate) fn bump(&mut self) -> Result<Token, LtxError> {
        let curr = self.peek.take().ok_or_else(|| LtxError::UnexpectedToken {
            token: "end of input".into(),
            line: self.lexer.line(),
            column: self.lexer.column(),
            hint: None,
            code: Some(203),
        })?;
        // the lexer keeps yielding Eof at end of input, so the lookahead
        // slot never runs dry
        self.peek = Some(self.lexer.next_token()?);
        Ok(curr)
    }

    pub(crate) fn peek_kind(&self) -> Option<TokenKind> {
        self.peek.as_ref().map(|t| t.kind)
    }
}

/// Parse a file from disk into its flattened structural event sequence,
/// recursively expanding includes. Returns the events together with the
/// recoverable warnings raised along the way.
pub fn parse_file(path: &Path) -> Result<(Vec<StructuralEvent>, Vec<Warning>), LtxError> {
    let mut session = ParseSession::new();
    let events = include::parse_one_file(path, &mut session)?;
    Ok((events, session.warnings))
}

/// Parse in-memory text. Include paths resolve against `origin`'s
/// directory; `origin` also names the input in diagnostics.
pub fn parse_str(
    input: &str,
    origin: &Path,
) -> Result<(Vec<StructuralEvent>, Vec<Warning>), LtxError> {
    let mut session = ParseSession::new();
    let mut parser = Parser::new(input, origin)?;
    let events = events::parse_events(&mut parser, &mut session)?;
    Ok((events, session.warnings))
}

#[cfg(test)]
mod tests;

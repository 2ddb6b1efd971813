use super::{include, ParseSession, Parser};
use crate::ast::StructuralEvent;
use crate::error::{LtxError, Warning};
use crate::lexer::{Token, TokenKind};

/// The reserved key whose multi-token values are never coalesced.
const NO_COALESCE_KEY: &str = "precondition_parameter";

pub(super) fn parse_events(
    parser: &mut Parser,
    session: &mut ParseSession,
) -> Result<Vec<StructuralEvent>, LtxError> {
    let mut events = Vec::new();

    loop {
        let tok = parser.bump()?;
        match tok.kind {
            TokenKind::Eol => continue,
            TokenKind::Eof => break,
            TokenKind::Include => {
                include::parse_include(parser, session, &mut events)?;
            }
            TokenKind::HeaderOpen => {
                events.push(parse_section_header(parser, session)?);
            }
            TokenKind::Identifier => {
                events.push(parse_assignment(parser, session, tok)?);
            }
            _ => {
                return Err(LtxError::UnexpectedToken {
                    token: format!("{:?}", tok.kind),
                    line: tok.line,
                    column: tok.column,
                    hint: Some("Expected an include, a section header or an assignment".into()),
                    code: Some(203),
                });
            }
        }
    }

    Ok(events)
}

/// `[` has been consumed: name, `]`, then an optional `:`-introduced parent
/// list running to end of line. Parent order is kept exactly as written.
fn parse_section_header(
    parser: &mut Parser,
    session: &mut ParseSession,
) -> Result<StructuralEvent, LtxError> {
    let name = parser.bump()?;
    if name.kind != TokenKind::Identifier {
        return Err(expected("section identifier after '['", &name));
    }

    let close = parser.bump()?;
    if close.kind != TokenKind::HeaderClose {
        return Err(expected("']' after section identifier", &close));
    }

    let mut parents = Vec::new();
    if parser.peek_kind() == Some(TokenKind::Inherit) {
        parser.bump()?;

        loop {
            let tok = parser.bump()?;
            match tok.kind {
                TokenKind::Identifier => parents.push(tok.text),
                TokenKind::Comma => {}
                TokenKind::Eol | TokenKind::Eof => break,
                _ => {} // stray tokens in a parent list are skipped
            }
        }
    }

    session.section_seen = true;
    Ok(StructuralEvent::SectionStart {
        name: name.text,
        parents,
    })
}

/// A line starting with a bare identifier: either a positional entry
/// (identifier immediately followed by end of line) or a key with a value
/// list. Constraint and eval tokens are accepted and dropped, never
/// evaluated.
fn parse_assignment(
    parser: &mut Parser,
    session: &mut ParseSession,
    key: Token,
) -> Result<StructuralEvent, LtxError> {
    if !session.section_seen {
        return Err(LtxError::IdentifierOutOfSection {
            identifier: key.text,
            line: key.line,
            column: key.column,
            hint: Some("Every assignment needs an open [section]".into()),
            code: Some(202),
        });
    }

    match parser.peek_kind() {
        Some(TokenKind::Assign) => {
            parser.bump()?;
        }
        Some(TokenKind::Eol) => {
            // bare entry: the builder synthesizes a positional key
            parser.bump()?;
            return Ok(StructuralEvent::Assign {
                key: None,
                values: vec![key.text],
            });
        }
        _ => {}
    }

    let mut values = Vec::new();
    let mut is_csv = false;

    loop {
        let tok = parser.bump()?;
        match tok.kind {
            TokenKind::Eol | TokenKind::Eof => break,
            TokenKind::QuotedString => values.push(tok.unquoted().to_string()),
            TokenKind::Identifier => values.push(tok.text),
            TokenKind::Comma => is_csv = true,
            TokenKind::Constraint | TokenKind::Eval => {}
            _ => return Err(expected("a value, ',' or end of line", &tok)),
        }
    }

    if values.len() > 1 && !is_csv && key.text != NO_COALESCE_KEY {
        session.warn(Warning::ValueCoalescing {
            key: key.text.clone(),
            line: key.line,
        });
        values = vec![values.concat()];
    }

    Ok(StructuralEvent::Assign {
        key: Some(key.text),
        values,
    })
}

fn expected(what: &str, found: &Token) -> LtxError {
    LtxError::ExpectedToken {
        expected: what.to_string(),
        found: format!("{:?}", found.kind),
        line: found.line,
        column: found.column,
        hint: None,
        code: Some(201),
    }
}

use std::fs;
use std::path::{Component, Path, PathBuf};

use super::{events, ParseSession, Parser};
use crate::ast::StructuralEvent;
use crate::error::{LtxError, Warning};
use crate::lexer::TokenKind;
use crate::utils;

/// Read, decode and parse one file, guarding against include cycles. Both
/// the top-level file and every include candidate come through here.
pub(super) fn parse_one_file(
    path: &Path,
    session: &mut ParseSession,
) -> Result<Vec<StructuralEvent>, LtxError> {
    tracing::debug!(path = %path.display(), "parsing LTX file");

    let identity = file_identity(path);
    if session.expanding.contains(&identity) {
        return Err(LtxError::CyclicInclude {
            path: path.display().to_string(),
            chain: session
                .expanding
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            hint: Some("Remove the include that closes the loop".into()),
            code: Some(204),
        });
    }

    let bytes = fs::read(path).map_err(|e| LtxError::File {
        message: format!("Failed to read file: {}", e),
        path: path.display().to_string(),
        hint: Some("Check that the file exists and is readable".into()),
        code: Some(401),
    })?;
    let text = utils::decode_ltx_bytes(&bytes);

    session.expanding.push(identity);
    let result = Parser::new(&text, path)
        .and_then(|mut parser| events::parse_events(&mut parser, session));
    session.expanding.pop();

    result
}

/// Expand one `#include` directive; the `#include` token has already been
/// consumed. Missing candidates are warned about and skipped, never fatal.
pub(super) fn parse_include(
    parser: &mut Parser,
    session: &mut ParseSession,
    events: &mut Vec<StructuralEvent>,
) -> Result<(), LtxError> {
    let tok = parser.bump()?;
    if tok.kind != TokenKind::QuotedString {
        return Err(LtxError::ExpectedToken {
            expected: "quoted path after #include".into(),
            found: format!("{:?}", tok.kind),
            line: tok.line,
            column: tok.column,
            hint: None,
            code: Some(201),
        });
    }

    // include paths are written with backslash separators
    let raw = tok.unquoted().replace('\\', "/");
    let base = match parser.path.parent() {
        Some(dir) => dir.to_path_buf(),
        None => PathBuf::from("."),
    };
    let target = base.join(&raw);

    let is_glob = raw.contains('*') || raw.contains('?');
    let candidates = if is_glob {
        expand_glob(&target)
    } else {
        vec![target.clone()]
    };

    if is_glob && candidates.is_empty() {
        session.warn(Warning::MissingInclude { path: target });
        return Ok(());
    }

    for candidate in candidates {
        if candidate.exists() {
            let nested = parse_one_file(&candidate, session)?;
            events.push(StructuralEvent::Include {
                path: candidate,
                events: nested,
            });
        } else {
            session.warn(Warning::MissingInclude { path: candidate });
        }
    }

    Ok(())
}

/// The identity tracked by the cycle guard: the canonical path when the
/// file resolves, the joined path otherwise.
fn file_identity(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Expand wildcard path components against the filesystem; matches come
/// back sorted lexicographically.
fn expand_glob(pattern: &Path) -> Vec<PathBuf> {
    let mut prefixes = vec![PathBuf::new()];

    for component in pattern.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_string_lossy().to_string();
                if part.contains('*') || part.contains('?') {
                    let mut next = Vec::new();
                    for prefix in &prefixes {
                        let dir = if prefix.as_os_str().is_empty() {
                            Path::new(".")
                        } else {
                            prefix.as_path()
                        };
                        if let Ok(entries) = fs::read_dir(dir) {
                            for entry in entries.flatten() {
                                let name = entry.file_name();
                                if utils::wildcard_match(&name.to_string_lossy(), &part) {
                                    next.push(prefix.join(&name));
                                }
                            }
                        }
                    }
                    prefixes = next;
                } else {
                    for prefix in &mut prefixes {
                        prefix.push(&part);
                    }
                }
            }
            other => {
                for prefix in &mut prefixes {
                    prefix.push(other.as_os_str());
                }
            }
        }
    }

    prefixes.retain(|p| p.exists());
    prefixes.sort();
    prefixes
}

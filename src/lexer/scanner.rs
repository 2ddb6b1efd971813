use super::rules::{COMMENT, SPACING};
use super::Lexer;

/// Advance the scan position by `len` bytes and update line/column
/// tracking. `len` always comes from a rule match, so it lands on a char
/// boundary.
pub(super) fn advance(lexer: &mut Lexer, len: usize) {
    let skipped = &lexer.input[lexer.offset..lexer.offset + len];
    let newlines = skipped.matches('\n').count();

    if newlines > 0 {
        lexer.line += newlines;
        let tail = match skipped.rfind('\n') {
            Some(i) => &skipped[i + 1..],
            None => "",
        };
        lexer.column = tail.chars().count();
    } else {
        lexer.column += skipped.chars().count();
    }

    lexer.offset += len;
}

/// Skip runs of horizontal whitespace and `;` / `--` / `//` comments, in a
/// loop, until neither matches. Line breaks stay put: `Eol` is a token.
pub(super) fn skip_spacing_and_comments(lexer: &mut Lexer) {
    loop {
        let rest = lexer.rest();

        let skip = SPACING
            .find(rest)
            .or_else(|| COMMENT.find(rest))
            .map(|m| m.end());

        match skip {
            Some(len) => advance(lexer, len),
            None => break,
        }
    }
}

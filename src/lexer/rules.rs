use once_cell::sync::Lazy;
use regex::Regex;

use super::TokenKind;

/// The fixed, ordered token rule table, built once and never mutated.
///
/// Every rule is tried at the current offset; the longest matched text wins
/// and equal lengths keep the earliest entry. That tie-break is what lets
/// `#include` beat the identifier rule on its own keyword while
/// `#includefoo` still lexes as a single identifier.
pub(super) static RULES: Lazy<Vec<(TokenKind, Regex)>> = Lazy::new(|| {
    vec![
        (TokenKind::Inherit, Regex::new(r"^:").unwrap()),
        (TokenKind::Include, Regex::new(r"^#include").unwrap()),
        (TokenKind::Comma, Regex::new(r"^,").unwrap()),
        (TokenKind::Assign, Regex::new(r"^=").unwrap()),
        (TokenKind::HeaderOpen, Regex::new(r"^\[").unwrap()),
        (TokenKind::HeaderClose, Regex::new(r"^\]").unwrap()),
        (
            // first character additionally excludes ':'
            TokenKind::Identifier,
            Regex::new(r#"^[^\[\]"=\n\r\t ,;:{}][^\[\]"=\n\r\t ,;{}]*"#).unwrap(),
        ),
        (TokenKind::QuotedString, Regex::new(r#"^"[^\n\r"]*""#).unwrap()),
        (TokenKind::Constraint, Regex::new(r"^\{[^\n\r}]*\}").unwrap()),
        (TokenKind::Eval, Regex::new(r"^%[^\n\r%]*%").unwrap()),
        (TokenKind::Eol, Regex::new(r"^(\r\n|\n)").unwrap()),
    ]
});

pub(super) static SPACING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\t ]+").unwrap());
pub(super) static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(;|--|//)[^\r\n]*").unwrap());

/// Try every rule against `rest` and pick the longest match, breaking ties
/// by table order.
pub(super) fn longest_match(rest: &str) -> Option<(TokenKind, &str)> {
    let mut choice: Option<(TokenKind, &str)> = None;

    for (kind, rule) in RULES.iter() {
        if let Some(m) = rule.find(rest) {
            let text = m.as_str();
            if choice.map_or(true, |(_, best)| text.len() > best.len()) {
                choice = Some((*kind, text));
            }
        }
    }

    choice
}

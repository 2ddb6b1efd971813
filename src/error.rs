use std::fmt;
use std::path::PathBuf;

/// The main error type for LTX lexing, parsing and document building.
#[derive(Debug, Clone, PartialEq)]
pub enum LtxError {
    /// Raised when no token rule matches at the current offset.
    Tokenize {
        character: char,
        offset: usize,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when a required token kind is missing.
    ExpectedToken {
        expected: String,
        found: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised for a token kind that fits no production at its position.
    UnexpectedToken {
        token: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised for assignment-looking text before any section header.
    IdentifierOutOfSection {
        identifier: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when an include chain revisits a file already being expanded.
    CyclicInclude {
        path: String,
        chain: Vec<String>,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when a section inherits from a name not yet declared.
    MissingParent {
        section: String,
        parent: String,
        file: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    File {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised for unreadable or schema-incompatible document snapshots.
    Snapshot {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
}

impl fmt::Display for LtxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LtxError::Tokenize { character, offset, line, column, hint, code } =>
                write!(f, "[LTX] Tokenize Error at {}:{} (offset {}): no rule matches '{}'{}{}",
                    line, column, offset, character,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            LtxError::ExpectedToken { expected, found, line, column, hint, code } =>
                write!(f, "[LTX] Expected {} at {}:{}, got {}{}{}",
                    expected, line, column, found,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            LtxError::UnexpectedToken { token, line, column, hint, code } =>
                write!(f, "[LTX] Unexpected token {} at {}:{}{}{}",
                    token, line, column,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            LtxError::IdentifierOutOfSection { identifier, line, column, hint, code } =>
                write!(f, "[LTX] Identifier '{}' out of section at {}:{}{}{}",
                    identifier, line, column,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            LtxError::CyclicInclude { path, chain, hint, code } =>
                write!(f, "[LTX] Cyclic include of '{}' (expansion chain: {}){}{}",
                    path, chain.join(" -> "),
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            LtxError::MissingParent { section, parent, file, hint, code } =>
                write!(f, "[LTX] Section '{}' in '{}' inherits from undeclared section '{}'{}{}",
                    section, file, parent,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            LtxError::File { message, path, hint, code } =>
                write!(f, "[LTX] File Error '{}': {}{}{}",
                    path, message,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
            LtxError::Snapshot { message, hint, code } =>
                write!(f, "[LTX] Snapshot Error: {}{}{}",
                    message,
                    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
                    code.map_or(String::new(), |c| format!(" Code: {}", c))
                ),
        }
    }
}

impl std::error::Error for LtxError {}

/// A recoverable condition noticed during parsing or building.
///
/// Warnings are reported through `tracing` as they happen and collected on
/// the finished [`crate::Document`].
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// An include path (or a whole wildcard pattern) resolved to no file.
    MissingInclude { path: PathBuf },
    /// A section name was declared more than once; the later declaration
    /// fully replaced the earlier one.
    DuplicateSection { name: String, file: PathBuf },
    /// Multiple whitespace-separated value tokens were collapsed into one
    /// string.
    ValueCoalescing { key: String, line: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingInclude { path } =>
                write!(f, "missing include {}", path.display()),
            Warning::DuplicateSection { name, file } =>
                write!(f, "overwriting section '{}' (redeclared in {})", name, file.display()),
            Warning::ValueCoalescing { key, line } =>
                write!(f, "coalescing whitespace in value of key '{}' on line {}; use quotes", key, line),
        }
    }
}

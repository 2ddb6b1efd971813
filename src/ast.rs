use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A stored value of a section key.
///
/// `Absent` is a real state, not a missing entry: a key written as `k =`
/// with nothing behind it is present with an `Absent` value and shadows any
/// parent definition of `k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Absent,
    Scalar(String),
    List(Vec<String>),
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_scalar(&self) -> Option<&str> {
        if let Value::Scalar(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        if let Value::List(items) = self {
            Some(items)
        } else {
            None
        }
    }

    /// Normalize to a list: `Absent` is empty, a scalar is a single element.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            Value::Absent => Vec::new(),
            Value::Scalar(s) => vec![s.clone()],
            Value::List(items) => items.clone(),
        }
    }
}

/// One structural fact about an LTX file, produced by the parser and
/// consumed once by the document builder.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuralEvent {
    /// A recursively parsed `#include`, spliced at its point of occurrence.
    Include {
        path: PathBuf,
        events: Vec<StructuralEvent>,
    },
    /// `[name]` with parent names exactly as written after `:`.
    SectionStart {
        name: String,
        parents: Vec<String>,
    },
    /// A key/value line; `key` is `None` for a bare array-style entry.
    Assign {
        key: Option<String>,
        values: Vec<String>,
    },
}

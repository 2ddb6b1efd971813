pub mod ast;
pub mod cache;
pub mod document;
pub mod error;
pub mod export;
pub mod lexer;
pub mod parser;
pub mod utils;

pub use ast::{StructuralEvent, Value};
pub use cache::DocumentCache;
pub use document::{parse_document, Document, Section};
pub use error::{LtxError, Warning};

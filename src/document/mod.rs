// Author: Dustin Pilgrim
// License: MIT

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ast::{StructuralEvent, Value};
use crate::error::{LtxError, Warning};
use crate::parser;

mod section;

pub use section::Section;

/// Parse an LTX file into a [`Document`].
///
/// The single entry point for on-disk input: a pure function of the file's
/// contents (plus any included files it transitively reads) at call time.
pub fn parse_document<P: AsRef<Path>>(path: P) -> Result<Document, LtxError> {
    Document::from_file(path)
}

/// A fully built LTX document: every section declared by the root file and
/// its transitive includes, queryable by name.
///
/// Sections live in an arena and the name table points at the live entry
/// for each name. A redeclared name gets a fresh arena entry while sections
/// that already resolved the earlier one keep their parent reference, so
/// inheritance keeps meaning what it meant at declaration time.
///
/// A `Document` is immutable once built and can be shared freely across
/// readers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    sections: Vec<Section>,
    names: IndexMap<String, usize>,
    #[serde(skip)]
    warnings: Vec<Warning>,
}

impl Document {
    /// Load and build a document from an LTX file on disk.
    ///
    /// # Examples
    /// ```no_run
    /// # use ltx_cfg::Document;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let doc = Document::from_file("configs/system.ltx")?;
    /// for name in doc.section_names() {
    ///     println!("{}", name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LtxError> {
        let path = path.as_ref();
        let (events, warnings) = parser::parse_file(path)?;
        Self::build(&events, path, warnings)
    }

    /// Parse in-memory text. Include paths resolve against the current
    /// directory.
    pub fn from_str(input: &str) -> Result<Self, LtxError> {
        let origin = Path::new("<input>");
        let (events, warnings) = parser::parse_str(input, origin)?;
        Self::build(&events, origin, warnings)
    }

    fn build(
        events: &[StructuralEvent],
        root: &Path,
        warnings: Vec<Warning>,
    ) -> Result<Self, LtxError> {
        let mut doc = Document {
            sections: Vec::new(),
            names: IndexMap::new(),
            warnings,
        };

        let mut cursor = None;
        doc.apply(events, root, &mut cursor)?;

        Ok(doc)
    }

    /// One linear walk over the flattened event sequence. `cursor` is the
    /// single assignment target across the whole stream, include nesting
    /// included; `file` tracks provenance per nesting level.
    fn apply(
        &mut self,
        events: &[StructuralEvent],
        file: &Path,
        cursor: &mut Option<usize>,
    ) -> Result<(), LtxError> {
        for event in events {
            match event {
                StructuralEvent::Include { path, events } => {
                    self.apply(events, path, cursor)?;
                }
                StructuralEvent::SectionStart { name, parents } => {
                    let mut resolved = Vec::with_capacity(parents.len());
                    for parent in parents {
                        match self.names.get(parent) {
                            Some(&idx) => resolved.push(idx),
                            None => {
                                return Err(LtxError::MissingParent {
                                    section: name.clone(),
                                    parent: parent.clone(),
                                    file: file.display().to_string(),
                                    hint: Some(
                                        "Parents must be declared before the sections that inherit them"
                                            .into(),
                                    ),
                                    code: Some(301),
                                });
                            }
                        }
                    }

                    if self.names.contains_key(name) {
                        let warning = Warning::DuplicateSection {
                            name: name.clone(),
                            file: file.to_path_buf(),
                        };
                        tracing::warn!("{}", warning);
                        self.warnings.push(warning);
                    }

                    let idx = self.sections.len();
                    self.sections
                        .push(Section::new(name.clone(), resolved, file.to_path_buf()));
                    self.names.insert(name.clone(), idx);
                    *cursor = Some(idx);
                }
                StructuralEvent::Assign { key, values } => {
                    let idx = match *cursor {
                        Some(idx) => idx,
                        None => {
                            // only reachable with a hand-built event stream
                            return Err(LtxError::IdentifierOutOfSection {
                                identifier: key.clone().unwrap_or_default(),
                                line: 0,
                                column: 0,
                                hint: None,
                                code: Some(202),
                            });
                        }
                    };

                    let section = &mut self.sections[idx];
                    let key = match key {
                        Some(key) => key.clone(),
                        None => section.len().to_string(),
                    };
                    let value = match values.len() {
                        0 => Value::Absent,
                        1 => Value::Scalar(values[0].clone()),
                        _ => Value::List(values.clone()),
                    };
                    section.set(key, value);
                }
            }
        }

        Ok(())
    }

    /// Look up a section by name. A redeclared name resolves to its latest
    /// declaration.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.names.get(name).map(|&idx| &self.sections[idx])
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Live section names in declaration order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    /// Live sections in declaration order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.names.values().map(|&idx| &self.sections[idx])
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Recoverable conditions collected while parsing and building.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub(crate) fn section_at(&self, idx: usize) -> &Section {
        &self.sections[idx]
    }
}

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Document;
use crate::ast::Value;

/// A named record of own key/value pairs plus the parents it inherits
/// from, in declaration order, resolved to arena indices when the document
/// was built.
///
/// Lookups take the owning [`Document`] so a section never holds a direct
/// reference into its siblings. Every returned [`Value`] is an independent
/// copy; callers cannot mutate section state through a read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    name: String,
    parents: Vec<usize>,
    keys: IndexMap<String, Value>,
    declared_in: PathBuf,
}

impl Section {
    pub(crate) fn new(name: String, parents: Vec<usize>, declared_in: PathBuf) -> Self {
        Section {
            name,
            parents,
            keys: IndexMap::new(),
            declared_in,
        }
    }

    pub(crate) fn set(&mut self, key: String, value: Value) {
        self.keys.insert(key, value);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file this section was declared in.
    pub fn declared_in(&self) -> &Path {
        &self.declared_in
    }

    /// Number of own keys, inherited keys excluded.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Own keys in insertion order.
    pub fn own_keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// The value stored directly on this section, without consulting
    /// parents.
    pub fn own(&self, key: &str) -> Option<&Value> {
        self.keys.get(key)
    }

    /// Parent sections in declaration order.
    pub fn parents<'d>(&'d self, doc: &'d Document) -> impl Iterator<Item = &'d Section> {
        self.parents.iter().map(move |&idx| doc.section_at(idx))
    }

    pub fn parent_names(&self, doc: &Document) -> Vec<String> {
        self.parents(doc).map(|p| p.name().to_string()).collect()
    }

    /// Hierarchical lookup.
    ///
    /// Returns the own value if `key` is present — an own [`Value::Absent`]
    /// shadows parents — otherwise the first non-absent value found
    /// searching parents in reverse declaration order, recursively. The
    /// last-declared parent wins.
    ///
    /// # Examples
    /// ```no_run
    /// # use ltx_cfg::{Document, Value};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let doc = Document::from_file("configs/system.ltx")?;
    /// let ak74 = doc.section("wpn_ak74").expect("missing section");
    /// if let Value::Scalar(cost) = ak74.get(&doc, "cost") {
    ///     println!("cost = {}", cost);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn get(&self, doc: &Document, key: &str) -> Value {
        if let Some(value) = self.keys.get(key) {
            return value.clone();
        }

        for &idx in self.parents.iter().rev() {
            let value = doc.section_at(idx).get(doc, key);
            if !value.is_absent() {
                return value;
            }
        }

        Value::Absent
    }

    /// [`Section::get`] with a caller default substituted for an absent
    /// result.
    pub fn get_or(&self, doc: &Document, key: &str, default: Value) -> Value {
        let value = self.get(doc, key);
        if value.is_absent() { default } else { value }
    }

    /// The fully merged key/value mapping.
    ///
    /// Parents are overlaid in declaration order (a later-declared parent
    /// overrides an earlier one), own keys last. An absent value inherited
    /// from a parent never overrides a present one, so the winner for every
    /// key matches what [`Section::get`] resolves.
    pub fn get_all(&self, doc: &Document) -> IndexMap<String, Value> {
        let mut merged = IndexMap::new();

        for &idx in &self.parents {
            for (key, value) in doc.section_at(idx).get_all(doc) {
                if !value.is_absent() {
                    merged.insert(key, value);
                }
            }
        }

        for (key, value) in &self.keys {
            merged.insert(key.clone(), value.clone());
        }

        merged
    }

    /// Every value independently defined for `key`, paired with its
    /// defining section: self first (when the own map defines it), then
    /// parents in reverse declaration order, recursively. Never collapses
    /// to a single winner.
    pub fn get_key_hierarchy<'d>(
        &'d self,
        doc: &'d Document,
        key: &str,
    ) -> Vec<(Value, &'d Section)> {
        let mut entries = Vec::new();

        if let Some(value) = self.keys.get(key) {
            entries.push((value.clone(), self));
        }

        for &idx in self.parents.iter().rev() {
            entries.extend(doc.section_at(idx).get_key_hierarchy(doc, key));
        }

        entries
    }

    pub fn has(&self, doc: &Document, key: &str) -> bool {
        !self.get(doc, key).is_absent()
    }

    /// [`Section::get`] normalized to a materialized list: absent is
    /// empty, a scalar is a single element.
    pub fn get_list(&self, doc: &Document, key: &str) -> Vec<String> {
        self.get(doc, key).to_list()
    }

    /// A finite, restartable iterator over [`Section::get_list`].
    pub fn get_iter(&self, doc: &Document, key: &str) -> impl Iterator<Item = String> {
        self.get_list(doc, key).into_iter()
    }
}

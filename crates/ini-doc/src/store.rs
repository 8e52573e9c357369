//! Case-insensitive, insertion-ordered section storage

use indexmap::IndexMap;

/// Identity used for section and key lookups.
pub(crate) fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// One key within a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    key: String,
    value: Option<String>,
    comment: Option<String>,
    escaped: bool,
}

impl Entry {
    pub(crate) fn new(key: &str, value: Option<&str>, escaped: bool) -> Self {
        Self {
            key: key.to_string(),
            value: value.map(str::to_string),
            comment: None,
            escaped,
        }
    }

    /// Key with its original casing.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Whether the value is re-escaped when written.
    pub fn is_escaped(&self) -> bool {
        self.escaped
    }

    pub(crate) fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
    }
}

/// A named group of entries plus the section's own comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    name: String,
    comment: Option<String>,
    entries: IndexMap<String, Entry>,
}

impl Section {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            comment: None,
            entries: IndexMap::new(),
        }
    }

    /// Section name with its original casing. Empty for the anonymous section.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(&fold(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&fold(key))
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(Entry::key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.entries.get_mut(&fold(key))
    }

    /// Insert or update a key, keeping its position, casing and comment
    /// when it already exists.
    pub(crate) fn upsert(&mut self, key: &str, value: Option<&str>, escaped: bool) -> &mut Entry {
        let entry = self
            .entries
            .entry(fold(key))
            .or_insert_with(|| Entry::new(key, None, false));
        entry.value = value.map(str::to_string);
        entry.escaped = escaped;
        entry
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<Entry> {
        self.entries.shift_remove(&fold(key))
    }
}

/// All sections of one document, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionStore {
    sections: IndexMap<String, Section>,
}

impl SectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.get(&fold(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sections.contains_key(&fold(name))
    }

    /// Entry for `key` in `section`, if both exist locally.
    pub fn entry(&self, section: &str, key: &str) -> Option<&Entry> {
        self.get(section).and_then(|s| s.get(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.values().map(Section::name)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.sections.clear();
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.get_mut(&fold(name))
    }

    /// The section called `name`, created at the end if missing.
    pub(crate) fn ensure(&mut self, name: &str) -> &mut Section {
        self.sections
            .entry(fold(name))
            .or_insert_with(|| Section::new(name))
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Section> {
        self.sections.shift_remove(&fold(name))
    }
}

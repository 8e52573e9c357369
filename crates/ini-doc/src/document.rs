//! The INI document: parsing, queries, mutation and merge layers

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::merge::{self, MergeLayer, MergeStrategy, SharedDocument};
use crate::options::IniOptions;
use crate::parser::escape;
use crate::persist::{PersistStrategy, SectionBlock};
use crate::store::{Entry, SectionStore, fold};
use crate::view::{SectionView, SectionViewMut};

/// An INI document with optional read-through merge layers.
///
/// Section and key lookups are case-insensitive; original casing and
/// insertion order are kept for output. The empty section name refers to
/// keys that appear before any `[section]` header.
#[derive(Debug, Clone, Default)]
pub struct IniDocument {
    store: SectionStore,
    merges: Vec<MergeLayer>,
    path: Option<PathBuf>,
    options: IniOptions,
}

impl IniDocument {
    /// Create an empty document with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document with the given options.
    pub fn with_options(options: IniOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Parse text into a new document with default options.
    ///
    /// # Examples
    ///
    /// ```
    /// use ini_doc::IniDocument;
    ///
    /// let doc = IniDocument::parse_str("[server]\nPort=\"8080\"\n");
    /// assert_eq!(doc.get_value("SERVER", "port").as_deref(), Some("8080"));
    /// ```
    pub fn parse_str(text: &str) -> Self {
        let mut doc = Self::new();
        doc.parse(text);
        doc
    }

    /// Load a file into a new document with default options.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut doc = Self::new();
        doc.load(path)?;
        Ok(doc)
    }

    /// Load a file, creating it empty first if it does not exist.
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self> {
        ini_fs::ensure_file_exists_at(path.as_ref())?;
        Self::from_path(path)
    }

    /// Wrap this document so it can be merged into others.
    pub fn into_shared(self) -> SharedDocument {
        Arc::new(RwLock::new(self))
    }

    pub fn options(&self) -> &IniOptions {
        &self.options
    }

    /// Path of the last successful [`load`](Self::load).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The local store, without merge layers.
    pub fn store(&self) -> &SectionStore {
        &self.store
    }

    /// Read `path` and replace all local sections with its contents.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        tracing::debug!(?path, "Loading INI document");
        let text = ini_fs::read_text(path)?;
        self.parse(&text);
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Replace all local sections with the contents of `text`.
    ///
    /// Comment lines are buffered and attached to the next section header
    /// or key. Comments with nothing after them are dropped.
    pub fn parse(&mut self, text: &str) {
        self.store.clear();
        let parser = self.options.parser();
        let delimiter = self.options.comment_delimiter;
        let terminator = self.options.section_terminator.as_deref();

        let mut current = String::new();
        let mut pending: Vec<String> = Vec::new();

        for line in text.split(['\r', '\n']) {
            let line = line.trim();
            if line.is_empty() || Some(line) == terminator {
                continue;
            }

            let parsed = parser.parse(Some(line));
            if parsed.is_comment() {
                pending.extend(parsed.comment().map(str::to_string));
                continue;
            }
            pending.extend(parsed.comment().map(str::to_string));

            if let Some(name) = parsed.section_name() {
                let section = self.store.ensure(name);
                if let Some(comment) = join_comments(&mut pending, delimiter) {
                    section.set_comment(Some(comment));
                }
                current = name.to_string();
            } else if parsed.key().is_empty() {
                tracing::trace!(line, "Skipping line without a key");
            } else {
                let entry = self.store.ensure(&current).upsert(
                    parsed.key(),
                    parsed.value(),
                    parsed.contained_escaped_entities(),
                );
                if let Some(comment) = join_comments(&mut pending, delimiter) {
                    entry.set_comment(Some(comment));
                }
            }
        }

        if !pending.is_empty() {
            tracing::debug!(dropped = pending.len(), "Dropping trailing comments");
        }
        tracing::debug!(sections = self.store.len(), "Parsed INI text");
    }

    /// Re-read the last loaded path, discarding local changes, then reload
    /// every merge layer.
    pub fn reload(&mut self) -> Result<()> {
        if let Some(path) = self.path.clone() {
            self.load(path)?;
        }
        for layer in &self.merges {
            layer.write().reload()?;
        }
        Ok(())
    }

    /// Ensure a section exists. An existing section keeps its keys; its
    /// comment is replaced only when `comments` is non-empty. Each item may
    /// span several lines.
    pub fn add_section(&mut self, name: &str, comments: &[&str]) {
        let delimiter = self.options.comment_delimiter;
        let section = self.store.ensure(name);
        if !comments.is_empty() {
            let blocks: Vec<String> = comments
                .iter()
                .map(|text| comment_block(text, delimiter))
                .collect();
            section.set_comment(Some(blocks.join(&format!("\n{delimiter}"))));
        }
    }

    /// Remove a local section. Merge layers are untouched, so the section
    /// may still be visible through them.
    pub fn remove_section(&mut self, name: &str) -> bool {
        self.store.remove(name).is_some()
    }

    /// Merge-aware view of a section, or `SectionNotFound` if neither the
    /// local store nor any layer has it.
    pub fn get_section(&self, name: &str) -> Result<SectionView<'_>> {
        if self.has_section(name) {
            Ok(SectionView::new(self, name))
        } else {
            Err(Error::section_not_found(name))
        }
    }

    /// Merge-aware view of a section, whether or not it exists.
    pub fn section(&self, name: &str) -> SectionView<'_> {
        SectionView::new(self, name)
    }

    /// Writable view of a local section.
    pub fn section_mut(&mut self, name: &str) -> SectionViewMut<'_> {
        SectionViewMut::new(self, name)
    }

    /// Insert or update a key, creating the section if needed.
    ///
    /// Values containing quotes or backslashes are escaped when written.
    pub fn set_value(&mut self, section: &str, key: &str, value: Option<&str>) {
        let escaped = value.is_some_and(escape::needs_escaping);
        self.store.ensure(section).upsert(key, value, escaped);
    }

    /// Resolved value for a key, `None` when absent or value-less.
    ///
    /// Merge layers are folded over the local entry in the order they were
    /// added. `Override` layers with a value replace the local value;
    /// `AddIfMissing` layers only fill keys the local store lacks.
    pub fn get_value(&self, section: &str, key: &str) -> Option<String> {
        self.resolve_entry(section, key)
            .and_then(|entry| entry.value().map(str::to_string))
    }

    /// Like [`get_value`](Self::get_value), with `default` standing in for
    /// keys the local store lacks whose resolved value is still `None`.
    ///
    /// A value-less key present locally resolves to `None` regardless of
    /// `default`.
    pub fn get_value_or(&self, section: &str, key: &str, default: Option<&str>) -> Option<String> {
        match self.resolve_entry(section, key) {
            Some(entry) if entry.value().is_some() => entry.value().map(str::to_string),
            _ if self.store.entry(section, key).is_some() => None,
            _ => default.map(str::to_string),
        }
    }

    /// Whether the key exists locally or in any merge layer.
    pub fn has_setting(&self, section: &str, key: &str) -> bool {
        self.store.entry(section, key).is_some()
            || self
                .merges
                .iter()
                .any(|layer| layer.read().has_setting(section, key))
    }

    /// Whether the section exists locally or in any merge layer.
    pub fn has_section(&self, section: &str) -> bool {
        self.store.contains(section)
            || self
                .merges
                .iter()
                .any(|layer| layer.read().has_section(section))
    }

    /// Remove a local key. Values contributed by merge layers stay visible.
    pub fn remove_value(&mut self, section: &str, key: &str) -> bool {
        self.store
            .get_mut(section)
            .and_then(|s| s.remove(key))
            .is_some()
    }

    /// Local section names in insertion order.
    pub fn sections(&self) -> Vec<String> {
        self.store.names().map(str::to_string).collect()
    }

    /// Local section names followed by those only merge layers provide.
    pub fn all_sections(&self) -> Vec<String> {
        let mut seen: IndexMap<String, String> = self
            .store
            .names()
            .map(|name| (fold(name), name.to_string()))
            .collect();
        for layer in &self.merges {
            for name in layer.read().all_sections() {
                seen.entry(fold(&name)).or_insert(name);
            }
        }
        seen.into_values().collect()
    }

    /// Local keys of a section in insertion order.
    pub fn keys(&self, section: &str) -> Vec<String> {
        self.store
            .get(section)
            .map(|s| s.keys().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Local keys of a section followed by those only merge layers provide.
    pub fn all_keys(&self, section: &str) -> Vec<String> {
        let mut seen: IndexMap<String, String> = self
            .keys(section)
            .into_iter()
            .map(|key| (fold(&key), key))
            .collect();
        for layer in &self.merges {
            for key in layer.read().all_keys(section) {
                seen.entry(fold(&key)).or_insert(key);
            }
        }
        seen.into_values().collect()
    }

    /// Section comment, falling back to the first merge layer that has one.
    pub fn section_comment(&self, section: &str) -> Option<String> {
        match self.store.get(section) {
            Some(s) if s.comment().is_some() => s.comment().map(str::to_string),
            _ => self
                .merges
                .iter()
                .find_map(|layer| layer.read().section_comment(section)),
        }
    }

    /// Comment attached to the resolved entry for a key.
    pub fn key_comment(&self, section: &str, key: &str) -> Option<String> {
        self.resolve_entry(section, key)
            .and_then(|entry| entry.comment().map(str::to_string))
    }

    /// Attach a comment to a local key. Returns `false` if the key is not
    /// in the local store. A multi-line comment is written as one comment
    /// line per input line.
    pub fn set_key_comment(&mut self, section: &str, key: &str, comment: Option<&str>) -> bool {
        let delimiter = self.options.comment_delimiter;
        match self.store.get_mut(section).and_then(|s| s.get_mut(key)) {
            Some(entry) => {
                entry.set_comment(comment.map(|text| comment_block(text, delimiter)));
                true
            }
            None => false,
        }
    }

    /// Add a read-through layer. Later layers are consulted after earlier ones.
    pub fn merge(&mut self, other: SharedDocument, strategy: MergeStrategy) {
        tracing::debug!(?strategy, layers = self.merges.len() + 1, "Adding merge layer");
        self.merges.push(MergeLayer::new(other, strategy));
    }

    /// Load `path` as a merge layer. A missing file adds nothing and
    /// returns `false`.
    pub fn merge_path(&mut self, path: impl AsRef<Path>, strategy: MergeStrategy) -> Result<bool> {
        let path = path.as_ref();
        if !path.is_file() {
            tracing::debug!(?path, "Merge source not found, skipping");
            return Ok(false);
        }
        let mut other = Self::with_options(self.options.clone());
        other.load(path)?;
        self.merge(other.into_shared(), strategy);
        Ok(true)
    }

    pub fn merge_layers(&self) -> &[MergeLayer] {
        &self.merges
    }

    /// Snapshot as `{section: {key: value | null}}` with case-folded names.
    pub fn normalize(&self, strategy: PersistStrategy) -> Value {
        let mut root = Map::new();
        for block in self.section_blocks(strategy) {
            let section: Map<String, Value> = block
                .entries
                .iter()
                .map(|entry| {
                    let value = entry
                        .value()
                        .map_or(Value::Null, |v| Value::String(v.to_string()));
                    (fold(entry.key()), value)
                })
                .collect();
            root.insert(fold(&block.name), Value::Object(section));
        }
        Value::Object(root)
    }

    /// Whether both documents resolve to the same sections, keys and values.
    pub fn semantic_eq(&self, other: &Self) -> bool {
        self.normalize(PersistStrategy::IncludeMerged)
            == other.normalize(PersistStrategy::IncludeMerged)
    }

    /// The local entry folded through every merge layer.
    pub(crate) fn resolve_entry(&self, section: &str, key: &str) -> Option<Entry> {
        merge::resolve(&self.merges, self.store.entry(section, key), section, key)
    }

    /// Sections, comments and entries as persistence sees them.
    pub(crate) fn section_blocks(&self, strategy: PersistStrategy) -> Vec<SectionBlock> {
        match strategy {
            PersistStrategy::ExcludeMerged => self
                .store
                .iter()
                .map(|s| SectionBlock {
                    name: s.name().to_string(),
                    comment: s.comment().map(str::to_string),
                    entries: s.entries().cloned().collect(),
                })
                .collect(),
            PersistStrategy::IncludeMerged => self
                .all_sections()
                .into_iter()
                .map(|name| SectionBlock {
                    comment: self.section_comment(&name),
                    entries: self
                        .all_keys(&name)
                        .iter()
                        .filter_map(|key| self.resolve_entry(&name, key))
                        .collect(),
                    name,
                })
                .collect(),
        }
    }
}

/// Drain buffered comment lines into one comment, joined so that writing
/// it behind a single delimiter reproduces every line.
fn join_comments(pending: &mut Vec<String>, delimiter: char) -> Option<String> {
    if pending.is_empty() {
        return None;
    }
    let joined = pending.join(&format!("\n{delimiter}"));
    pending.clear();
    Some(joined)
}

/// Store caller text in the joined form: every line after the first
/// carries its own delimiter. Lines already starting with it are kept, so
/// a stored comment fed back in is unchanged.
fn comment_block(text: &str, delimiter: char) -> String {
    let mut lines = text.lines();
    let mut block = lines.next().unwrap_or_default().to_string();
    for line in lines {
        block.push('\n');
        if !line.starts_with(delimiter) {
            block.push(delimiter);
        }
        block.push_str(line);
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_before_header_go_to_anonymous_section() {
        let doc = IniDocument::parse_str("top=\"1\"\n[named]\ninner=\"2\"\n");
        assert_eq!(doc.sections(), ["", "named"]);
        assert_eq!(doc.get_value("", "top").as_deref(), Some("1"));
    }

    #[test]
    fn test_comments_attach_to_next_entity() {
        let doc = IniDocument::parse_str(";first\n;second\n[s]\n; about k\nk=v\n;dangling\n");
        assert_eq!(doc.section_comment("s").as_deref(), Some("first\n;second"));
        assert_eq!(doc.key_comment("s", "k").as_deref(), Some(" about k"));
    }

    #[test]
    fn test_inline_comment_attaches_to_key() {
        let doc = IniDocument::parse_str("[s]\nk = v ; inline\n");
        assert_eq!(doc.get_value("s", "k").as_deref(), Some("v"));
        assert_eq!(doc.key_comment("s", "k").as_deref(), Some("inline"));
    }

    #[test]
    fn test_comment_block_prefixes_continuation_lines() {
        assert_eq!(comment_block("one", ';'), "one");
        assert_eq!(comment_block("one\ntwo\r\nthree", ';'), "one\n;two\n;three");
        assert_eq!(comment_block("one\n;two", ';'), "one\n;two");
        assert_eq!(comment_block("", ';'), "");
    }

    #[test]
    fn test_terminator_lines_are_skipped() {
        let doc = IniDocument::parse_str("[s]\nk=\"v\"\n-----\n");
        assert_eq!(doc.keys("s"), ["k"]);
    }

    #[test]
    fn test_carriage_returns_split_lines() {
        let doc = IniDocument::parse_str("[s]\r\na=1\r\nb=2\r\n");
        assert_eq!(doc.keys("s"), ["a", "b"]);
    }
}

//! Map-like views over a single section

use indexmap::IndexMap;

use crate::document::IniDocument;

/// Read-only, merge-aware view of one section.
///
/// Views borrow the document and allocate nothing beyond the section name,
/// so they are created on demand rather than cached.
#[derive(Debug, Clone)]
pub struct SectionView<'a> {
    document: &'a IniDocument,
    name: String,
}

impl<'a> SectionView<'a> {
    pub(crate) fn new(document: &'a IniDocument, name: &str) -> Self {
        Self {
            document,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the section exists locally or in a merge layer.
    pub fn exists(&self) -> bool {
        self.document.has_section(&self.name)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.document.get_value(&self.name, key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.document.has_setting(&self.name, key)
    }

    pub fn comment(&self) -> Option<String> {
        self.document.section_comment(&self.name)
    }

    pub fn keys(&self) -> Vec<String> {
        self.document.all_keys(&self.name)
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    /// Keys with their resolved values, local keys first.
    pub fn iter(&self) -> impl Iterator<Item = (String, Option<String>)> + '_ {
        self.keys().into_iter().map(move |key| {
            let value = self.get(&key);
            (key, value)
        })
    }

    /// Owned snapshot of the resolved section.
    pub fn to_map(&self) -> IndexMap<String, Option<String>> {
        self.iter().collect()
    }
}

/// Writable view of one section in the local store.
///
/// Writes never reach merge layers; the section is created on first insert.
#[derive(Debug)]
pub struct SectionViewMut<'a> {
    document: &'a mut IniDocument,
    name: String,
}

impl<'a> SectionViewMut<'a> {
    pub(crate) fn new(document: &'a mut IniDocument, name: &str) -> Self {
        Self {
            document,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn insert(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        self.document.set_value(&self.name, key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.document.remove_value(&self.name, key)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.document.get_value(&self.name, key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.document.has_setting(&self.name, key)
    }

    pub fn set_comment(&mut self, key: &str, comment: Option<&str>) -> bool {
        self.document.set_key_comment(&self.name, key, comment)
    }

    /// Read view over the same section.
    pub fn as_view(&self) -> SectionView<'_> {
        self.document.section(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_tracks_document_values() {
        let mut doc = IniDocument::new();
        doc.section_mut("Net")
            .insert("host", Some("localhost"))
            .insert("flag", None);

        let view = doc.section("net");
        assert!(view.exists());
        assert_eq!(view.len(), 2);
        assert_eq!(view.get("HOST").as_deref(), Some("localhost"));
        assert!(view.contains_key("flag"));
        assert_eq!(view.get("flag"), None);
    }

    #[test]
    fn test_missing_section_view_is_empty() {
        let doc = IniDocument::new();
        let view = doc.section("nothing");
        assert!(!view.exists());
        assert!(view.is_empty());
        assert!(view.to_map().is_empty());
    }
}

//! [`IniFixture`]: a temporary directory holding INI files for a test.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory with helpers for writing and checking INI files.
///
/// # Example
///
/// ```rust,no_run
/// use ini_test_utils::fixture::IniFixture;
///
/// let fixture = IniFixture::new();
/// let path = fixture.write("app.ini", "[main]\nkey=\"value\"\n");
/// fixture.assert_file_contains("app.ini", "[main]");
/// # let _ = path;
/// ```
pub struct IniFixture {
    temp_dir: TempDir,
}

impl Default for IniFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl IniFixture {
    /// Create an empty temporary directory.
    ///
    /// # Panics
    /// Panics if the directory cannot be created.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new()
                .unwrap_or_else(|e| panic!("IniFixture::new: failed to create temp dir: {e}")),
        }
    }

    /// Root of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path for `name` inside the fixture. Nothing is created.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Write `content` to `name`, creating parent folders, and return its path.
    ///
    /// # Panics
    /// Panics if the filesystem operations fail.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("IniFixture::write: failed to create {parent:?}: {e}"));
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("IniFixture::write: failed to write {path:?}: {e}"));
        path
    }

    /// Read `name` back as text.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, name: &str) -> String {
        let path = self.path(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("IniFixture::read: failed to read {path:?}: {e}"))
    }

    /// Assert that `name` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, name: &str) {
        let full_path = self.path(name);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file `name` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, name: &str, content: &str) {
        let file_content = self.read(name);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            self.path(name).display(),
            content,
            file_content
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read_back() {
        let fixture = IniFixture::new();
        let path = fixture.write("nested/app.ini", "[a]\n");
        assert!(path.starts_with(fixture.root()));
        fixture.assert_file_exists("nested/app.ini");
        assert_eq!(fixture.read("nested/app.ini"), "[a]\n");
    }
}

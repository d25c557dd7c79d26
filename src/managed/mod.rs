//! Managed entries: files and directories whose names are reserved and whose
//! presence and contents can be required and validated.
//!
//! A [`Container`][crate::Container] owns a flat set of root-level managed
//! entries; a [`ManagedDirectory`] owns an ordered collection of child
//! [`ManagedFile`]s. Qualified names are computed top-down by prefixing the
//! owning directory's name, so `container.xml` registered under `META-INF`
//! is addressed as `META-INF/container.xml`.
//!
//! Content validation is a pluggable strategy: a [`ManagedFile`] may carry a
//! [`ContentValidator`], and verification applies it to the entry's raw
//! bytes. Files without a validator always pass the content check.

use std::fmt;

use crate::store::ZipStore;
use crate::{Error, Result};

/// Validates the raw contents of a managed file.
///
/// Implement this to plug a schema engine (XML Schema, RelaxNG, anything
/// that can say yes or no to a byte slice) into managed-entry verification.
/// The core crate carries no schema dependency of its own.
///
/// Any `Fn(&[u8]) -> bool` closure implements this trait:
///
/// ```
/// use ucf::{ContentValidator, ManagedFile};
///
/// let non_empty = |contents: &[u8]| !contents.is_empty();
/// let file = ManagedFile::with_validator("manifest.xml", false, non_empty);
/// assert_eq!(file.name(), "manifest.xml");
/// ```
pub trait ContentValidator {
    /// Returns `true` if `contents` is acceptable for the managed file.
    fn validate(&self, contents: &[u8]) -> bool;
}

impl<F> ContentValidator for F
where
    F: Fn(&[u8]) -> bool,
{
    fn validate(&self, contents: &[u8]) -> bool {
        self(contents)
    }
}

impl ContentValidator for Box<dyn ContentValidator> {
    fn validate(&self, contents: &[u8]) -> bool {
        (**self).validate(contents)
    }
}

/// Joins an optional directory prefix with a local entry name.
pub(crate) fn qualify(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(dir) => format!("{}/{}", dir, name),
        None => name.to_string(),
    }
}

/// A managed file: a reserved name with optional presence and content rules.
///
/// `required` is fixed at construction. A file without a validator is valid
/// whenever it exists; a required file must exist for verification to pass.
pub struct ManagedFile {
    name: String,
    required: bool,
    validator: Option<Box<dyn ContentValidator>>,
}

impl ManagedFile {
    /// Creates a managed file with no content validation.
    pub fn new(name: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            required,
            validator: None,
        }
    }

    /// Creates a managed file whose contents must pass `validator`.
    pub fn with_validator(
        name: impl Into<String>,
        required: bool,
        validator: impl ContentValidator + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            required,
            validator: Some(Box::new(validator)),
        }
    }

    /// Returns the local (unqualified) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if this file must be present for verification to pass.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Checks presence and content, returning a descriptive error on failure.
    ///
    /// Missing optional files pass. Missing required files and present files
    /// whose bytes fail the validator do not.
    pub(crate) fn verify_strict(&self, store: &mut ZipStore, prefix: Option<&str>) -> Result<()> {
        let full_name = qualify(prefix, &self.name);

        if !store.contains_file(&full_name) {
            if self.required {
                return Err(Error::malformed(format!(
                    "required entry '{}' is missing",
                    full_name
                )));
            }
            return Ok(());
        }

        let contents = store.read(&full_name)?;
        let valid = match &self.validator {
            Some(validator) => validator.validate(&contents),
            None => true,
        };
        if !valid {
            return Err(Error::malformed(format!(
                "contents of entry '{}' failed validation",
                full_name
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for ManagedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedFile")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}

/// A managed directory: a reserved name owning an ordered set of managed
/// files.
///
/// Children are kept in registration order. Registering a second file with
/// the same name replaces the first in place; this is deliberate overwrite
/// semantics, not an error.
#[derive(Debug)]
pub struct ManagedDirectory {
    name: String,
    required: bool,
    files: Vec<ManagedFile>,
}

impl ManagedDirectory {
    /// Creates an empty managed directory.
    pub fn new(name: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            required,
            files: Vec::new(),
        }
    }

    /// Creates a managed directory pre-populated with `files`.
    pub fn with_files(
        name: impl Into<String>,
        required: bool,
        files: impl IntoIterator<Item = ManagedFile>,
    ) -> Self {
        let mut dir = Self::new(name, required);
        for file in files {
            dir.register_file(file);
        }
        dir
    }

    /// Returns the local (unqualified) directory name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if this directory must be present for verification to
    /// pass.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Registers a child file. The last registration for a given name wins,
    /// keeping the original position in the registration order.
    pub fn register_file(&mut self, file: ManagedFile) {
        match self.files.iter_mut().find(|f| f.name == file.name) {
            Some(existing) => *existing = file,
            None => self.files.push(file),
        }
    }

    /// Returns the child files in registration order.
    pub fn files(&self) -> &[ManagedFile] {
        &self.files
    }

    /// Returns the qualified names of the child files, in registration order.
    pub fn file_names(&self) -> Vec<String> {
        self.files
            .iter()
            .map(|f| qualify(Some(&self.name), &f.name))
            .collect()
    }

    /// Checks the directory's own presence rule, then every child file.
    ///
    /// Children are verified even when the (optional) directory entry itself
    /// is absent: a file can exist under a directory prefix without an
    /// explicit directory entry in the archive.
    pub(crate) fn verify_strict(&self, store: &mut ZipStore) -> Result<()> {
        if self.required && !store.contains_dir(&format!("{}/", self.name)) {
            return Err(Error::malformed(format!(
                "required directory '{}' is missing",
                self.name
            )));
        }
        for file in &self.files {
            file.verify_strict(store, Some(&self.name))?;
        }
        Ok(())
    }
}

/// A managed entry of either kind.
///
/// Containers are configured with a list of these rather than through
/// subclassing; the variant plays the role of runtime type dispatch.
#[derive(Debug)]
pub enum ManagedEntry {
    /// A managed file.
    File(ManagedFile),
    /// A managed directory.
    Directory(ManagedDirectory),
}

impl ManagedEntry {
    /// Returns the local (unqualified) name of the entry.
    pub fn name(&self) -> &str {
        match self {
            ManagedEntry::File(f) => f.name(),
            ManagedEntry::Directory(d) => d.name(),
        }
    }

    /// Returns `true` if this entry is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, ManagedEntry::File(_))
    }

    /// Returns `true` if this entry is a directory.
    pub fn is_directory(&self) -> bool {
        matches!(self, ManagedEntry::Directory(_))
    }
}

impl From<ManagedFile> for ManagedEntry {
    fn from(file: ManagedFile) -> Self {
        ManagedEntry::File(file)
    }
}

impl From<ManagedDirectory> for ManagedEntry {
    fn from(dir: ManagedDirectory) -> Self {
        ManagedEntry::Directory(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_managed_file_accessors() {
        let file = ManagedFile::new("container.xml", true);
        assert_eq!(file.name(), "container.xml");
        assert!(file.is_required());
        assert!(!ManagedFile::new("x", false).is_required());
    }

    #[test]
    fn test_managed_file_debug_hides_validator() {
        let file = ManagedFile::with_validator("m.xml", false, |_: &[u8]| true);
        let debug = format!("{:?}", file);
        assert!(debug.contains("m.xml"));
        assert!(debug.contains("has_validator: true"));
    }

    #[test]
    fn test_directory_registration_order() {
        let dir = ManagedDirectory::with_files(
            "META-INF",
            false,
            [
                ManagedFile::new("container.xml", false),
                ManagedFile::new("manifest.xml", false),
            ],
        );
        assert_eq!(
            dir.file_names(),
            ["META-INF/container.xml", "META-INF/manifest.xml"]
        );
    }

    #[test]
    fn test_duplicate_file_registration_overwrites_in_place() {
        let mut dir = ManagedDirectory::new("data", false);
        dir.register_file(ManagedFile::new("a.xml", false));
        dir.register_file(ManagedFile::new("b.xml", false));
        dir.register_file(ManagedFile::new("a.xml", true));

        // no duplicate, position preserved, required flag replaced
        assert_eq!(dir.files().len(), 2);
        assert_eq!(dir.files()[0].name(), "a.xml");
        assert!(dir.files()[0].is_required());
        assert_eq!(dir.files()[1].name(), "b.xml");
    }

    #[test]
    fn test_qualify() {
        assert_eq!(qualify(None, "mimetype"), "mimetype");
        assert_eq!(qualify(Some("META-INF"), "rights.xml"), "META-INF/rights.xml");
    }

    #[test]
    fn test_entry_kind_predicates() {
        let entry: ManagedEntry = ManagedFile::new("f", false).into();
        assert!(entry.is_file());
        assert!(!entry.is_directory());
        assert_eq!(entry.name(), "f");

        let entry: ManagedEntry = ManagedDirectory::new("d", false).into();
        assert!(entry.is_directory());
        assert_eq!(entry.name(), "d");
    }

    #[test]
    fn test_closure_validator() {
        let validator = |contents: &[u8]| contents.starts_with(b"<?xml");
        assert!(validator.validate(b"<?xml version=\"1.0\"?>"));
        assert!(!validator.validate(b"plain text"));
    }
}

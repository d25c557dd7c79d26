//! The UCF container: a policy layer over an editable ZIP document.
//!
//! A [`Container`] wraps one on-disk archive and intercepts every mutating
//! operation, enforcing the reserved/managed name policy before anything
//! reaches the archive:
//!
//! - `add_bytes` / `add_path` / `entry_writer` / `mkdir` targeting a
//!   protected name fail with [`Error::ReservedNameClash`] and leave the
//!   archive untouched.
//! - `remove` / `replace_*` and the *source* side of `rename` targeting a
//!   protected name are silent no-ops: no violation occurred, so no error is
//!   warranted.
//! - The *destination* side of `rename` targeting a protected name fails
//!   with [`Error::ReservedNameClash`]; renaming *into* a protected name is
//!   always rejected even though renaming *out of* one is harmless.
//!
//! Non-mutating operations pass through untouched.
//!
//! Name protection is case-insensitive, ignores one trailing `/`, and covers
//! the union of ad-hoc reserved names and all managed file and directory
//! names at every nesting level.
//!
//! # Examples
//!
//! ```rust,no_run
//! use ucf::{Container, Result};
//!
//! fn build(path: &str) -> Result<()> {
//!     let mut container = Container::create(path)?;
//!     container.add_bytes("content.xml", "<doc/>")?;
//!     container.mkdir("media")?;
//!     container.close()?;
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::managed::{ManagedDirectory, ManagedEntry, ManagedFile};
use crate::meta_inf;
use crate::reserved::{NameRegistry, names_match, normalize};
use crate::store::{EntryInfo, ZipStore};
use crate::{Error, Result};

/// The default mimetype written by [`Container::create`].
pub const DEFAULT_MIMETYPE: &str = "application/epub+zip";

/// Name of the mandatory mimetype entry.
pub const MIMETYPE_FILE: &str = "mimetype";

/// Additional reserved names and managed entries for a container.
///
/// This replaces subclassing as the extension mechanism: describe the extra
/// structure up front and open the container with it.
///
/// Entries are registered after the built-ins, and registration is
/// last-write-wins by name, so a config can replace the standard `META-INF`
/// directory (for instance to attach schema validators via
/// [`meta_inf::directory_with_validators`][crate::meta_inf::directory_with_validators]).
///
/// # Examples
///
/// ```rust,no_run
/// use ucf::{Container, ContainerConfig, ManagedFile};
///
/// let config = ContainerConfig::new()
///     .reserve_name(".version")
///     .managed_entry(ManagedFile::new("content.xml", true));
///
/// let container = Container::open_with_config("document.ucf", config)?;
/// # Ok::<(), ucf::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct ContainerConfig {
    reserved_names: Vec<String>,
    entries: Vec<ManagedEntry>,
}

impl ContainerConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an ad-hoc reserved name.
    pub fn reserve_name(mut self, name: impl Into<String>) -> Self {
        self.reserved_names.push(name.into());
        self
    }

    /// Adds a managed entry (file or directory).
    pub fn managed_entry(mut self, entry: impl Into<ManagedEntry>) -> Self {
        self.entries.push(entry.into());
        self
    }
}

/// A UCF document: a ZIP archive with a leading, uncompressed `mimetype`
/// entry and a set of reserved and managed names.
///
/// A container exclusively owns its archive for its lifetime. Concurrent
/// access to the same file from two containers is not supported.
pub struct Container {
    store: ZipStore,
    mimetype: String,
    registry: NameRegistry,
    directories: Vec<ManagedDirectory>,
    files: Vec<ManagedFile>,
}

impl Container {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Creates a new container at `path` with the default mimetype
    /// (`application/epub+zip`).
    ///
    /// The new archive contains exactly one entry: the `mimetype` file,
    /// stored uncompressed at local-header offset 0. The file is then
    /// re-opened through [`open`][Self::open], so the returned container has
    /// already passed the structural checks.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::create_with_mimetype(path, DEFAULT_MIMETYPE)
    }

    /// Creates a new container at `path` with the given mimetype string.
    pub fn create_with_mimetype(path: impl AsRef<Path>, mimetype: &str) -> Result<Self> {
        Self::create_with_config(path, mimetype, ContainerConfig::default())
    }

    /// Creates a new container with additional reserved names and managed
    /// entries.
    pub fn create_with_config(
        path: impl AsRef<Path>,
        mimetype: &str,
        config: ContainerConfig,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::create(path)?;
        let mut writer = ZipWriter::new(file);
        writer.start_file(
            MIMETYPE_FILE,
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
        )?;
        writer.write_all(mimetype.as_bytes())?;
        writer.finish()?;

        Self::open_with_config(path, config)
    }

    /// Creates a new container and hands it to `f`, committing on every exit
    /// path.
    ///
    /// The container is committed even when `f` returns an error; the
    /// closure's error takes precedence over any commit failure.
    pub fn create_with<T>(
        path: impl AsRef<Path>,
        mimetype: &str,
        f: impl FnOnce(&mut Container) -> Result<T>,
    ) -> Result<T> {
        let container = Self::create_with_mimetype(path, mimetype)?;
        Self::run_scoped(container, f)
    }

    /// Opens an existing container.
    ///
    /// Fails with [`Error::Malformed`] if the `mimetype` entry is missing,
    /// not at local-header offset 0, or not stored uncompressed. The
    /// standard `META-INF` managed directory is registered automatically.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, ContainerConfig::default())
    }

    /// Opens an existing container with additional reserved names and
    /// managed entries.
    pub fn open_with_config(path: impl AsRef<Path>, config: ContainerConfig) -> Result<Self> {
        let store = ZipStore::open(path)?;
        Self::from_store(store, config)
    }

    /// Opens an existing container and hands it to `f`, committing on every
    /// exit path.
    ///
    /// The container is committed even when `f` returns an error; the
    /// closure's error takes precedence over any commit failure.
    pub fn open_with<T>(
        path: impl AsRef<Path>,
        f: impl FnOnce(&mut Container) -> Result<T>,
    ) -> Result<T> {
        let container = Self::open(path)?;
        Self::run_scoped(container, f)
    }

    fn run_scoped<T>(
        mut container: Container,
        f: impl FnOnce(&mut Container) -> Result<T>,
    ) -> Result<T> {
        let outcome = f(&mut container);
        let committed = container.commit();
        match outcome {
            Ok(value) => {
                committed?;
                Ok(value)
            }
            Err(e) => {
                if let Err(commit_err) = committed {
                    log::warn!("commit failed while unwinding: {}", commit_err);
                }
                Err(e)
            }
        }
    }

    fn from_store(mut store: ZipStore, config: ContainerConfig) -> Result<Self> {
        let mimetype = Self::check_mimetype(&mut store)?;

        let mut registry = NameRegistry::new();
        registry.register(MIMETYPE_FILE);

        let mut container = Self {
            store,
            mimetype,
            registry,
            directories: Vec::new(),
            files: Vec::new(),
        };
        container.register_managed_entry(meta_inf::directory().into());

        for name in config.reserved_names {
            container.registry.register(name);
        }
        for entry in config.entries {
            container.register_managed_entry(entry);
        }
        Ok(container)
    }

    /// Checks the mimetype invariant and returns the cached mimetype string.
    ///
    /// Archive-layer failures while reading the entry are re-classified as
    /// [`Error::Malformed`]: a container whose mimetype cannot be read is a
    /// malformed container, whatever the underlying cause.
    fn check_mimetype(store: &mut ZipStore) -> Result<String> {
        let (header_offset, compression) = match store.find(MIMETYPE_FILE) {
            Some(info) => (info.header_offset, info.compression),
            None => return Err(Error::malformed("'mimetype' file is missing")),
        };
        if header_offset != Some(0) {
            return Err(Error::malformed(
                "'mimetype' file is not at offset 0 in the archive",
            ));
        }
        if compression != CompressionMethod::Stored {
            return Err(Error::malformed("'mimetype' file is compressed"));
        }

        let contents = store.read(MIMETYPE_FILE).map_err(|e| match e {
            Error::Zip(e) => Error::malformed(format!("'mimetype' file could not be read: {}", e)),
            other => other,
        })?;
        String::from_utf8(contents)
            .map_err(|_| Error::malformed("'mimetype' contents are not valid UTF-8"))
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Reserves an ad-hoc name for the lifetime of this container.
    pub fn register_reserved_name(&mut self, name: impl Into<String>) {
        self.registry.register(name);
    }

    /// Registers a managed entry at the container root.
    ///
    /// The last registration for a given name wins, keeping the original
    /// position in the registration order; this is how a configuration
    /// replaces the built-in `META-INF` directory. Call before any
    /// verification.
    pub fn register_managed_entry(&mut self, entry: ManagedEntry) {
        match entry {
            ManagedEntry::File(file) => {
                match self.files.iter_mut().find(|f| f.name() == file.name()) {
                    Some(existing) => *existing = file,
                    None => self.files.push(file),
                }
            }
            ManagedEntry::Directory(dir) => {
                match self.directories.iter_mut().find(|d| d.name() == dir.name()) {
                    Some(existing) => *existing = dir,
                    None => self.directories.push(dir),
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Name queries
    // ------------------------------------------------------------------

    /// Returns the qualified names of all managed files, directories first
    /// in registration order, then root-level files.
    pub fn managed_file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .directories
            .iter()
            .flat_map(|d| d.file_names())
            .collect();
        names.extend(self.files.iter().map(|f| f.name().to_string()));
        names
    }

    /// Returns the names of all managed directories in registration order.
    pub fn managed_directory_names(&self) -> Vec<String> {
        self.directories
            .iter()
            .map(|d| d.name().to_string())
            .collect()
    }

    /// Returns all managed names, directories before their files.
    pub fn managed_entry_names(&self) -> Vec<String> {
        let mut names = self.managed_directory_names();
        names.extend(self.managed_file_names());
        names
    }

    /// Returns every managed file, nested ones included.
    pub fn managed_files(&self) -> Vec<&ManagedFile> {
        let mut files: Vec<&ManagedFile> = self
            .directories
            .iter()
            .flat_map(|d| d.files().iter())
            .collect();
        files.extend(self.files.iter());
        files
    }

    /// Returns the managed directories in registration order.
    pub fn managed_directories(&self) -> &[ManagedDirectory] {
        &self.directories
    }

    /// Returns the ad-hoc reserved names plus all managed names.
    pub fn reserved_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registry.names().to_vec();
        names.extend(self.managed_entry_names());
        names
    }

    /// Returns `true` if `name` is protected from mutation.
    ///
    /// The comparison strips one trailing `/` and ignores case, against the
    /// union of reserved and managed names at every nesting level.
    pub fn is_protected(&self, name: &str) -> bool {
        self.registry.is_reserved(name)
            || self
                .managed_entry_names()
                .iter()
                .any(|managed| names_match(managed, name))
    }

    // ------------------------------------------------------------------
    // Mutating operations (guarded)
    // ------------------------------------------------------------------

    /// Adds a new file entry from bytes in memory.
    ///
    /// # Errors
    ///
    /// [`Error::ReservedNameClash`] if `name` is protected;
    /// [`Error::EntryExists`] if the entry is already present.
    pub fn add_bytes(&mut self, name: &str, data: impl Into<Vec<u8>>) -> Result<()> {
        self.check_clash(name)?;
        self.store.add_bytes(name, data.into())
    }

    /// Adds a new file entry with the contents of a file-system file.
    ///
    /// # Errors
    ///
    /// [`Error::ReservedNameClash`] if `name` is protected;
    /// [`Error::EntryExists`] if the entry is already present.
    pub fn add_path(&mut self, name: &str, source: impl AsRef<Path>) -> Result<()> {
        self.check_clash(name)?;
        self.store.add_path(name, source)
    }

    /// Opens a buffered writer for a new or existing file entry.
    ///
    /// The bytes reach the archive when [`EntryWriter::finish`] is called;
    /// an existing entry with the same name is replaced. The reserved-name
    /// check runs here, before any bytes are accepted.
    ///
    /// # Errors
    ///
    /// [`Error::ReservedNameClash`] if `name` is protected;
    /// [`Error::EntryExists`] if `name` refers to a directory entry.
    pub fn entry_writer(&mut self, name: &str) -> Result<EntryWriter<'_>> {
        self.check_clash(name)?;
        if self.store.contains_dir(&format!("{}/", normalize(name))) {
            return Err(Error::EntryExists {
                path: name.to_string(),
            });
        }
        Ok(EntryWriter {
            store: &mut self.store,
            name: name.to_string(),
            buffer: Vec::new(),
        })
    }

    /// Adds a new directory entry.
    ///
    /// # Errors
    ///
    /// [`Error::ReservedNameClash`] if `name` is protected;
    /// [`Error::EntryExists`] if the entry is already present.
    pub fn mkdir(&mut self, name: &str) -> Result<()> {
        self.check_clash(name)?;
        self.store.mkdir(name)
    }

    /// Removes an entry.
    ///
    /// Removing a protected entry is a silent no-op: the call returns `Ok`
    /// and the archive is untouched.
    ///
    /// # Errors
    ///
    /// [`Error::EntryNotFound`] if the (unprotected) entry does not exist.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        if self.is_protected(name) {
            log::debug!("ignoring remove of protected entry '{}'", name);
            return Ok(());
        }
        self.store.remove(name)
    }

    /// Renames an entry.
    ///
    /// Renaming *from* a protected name is a silent no-op; renaming *into* a
    /// protected name fails.
    ///
    /// # Errors
    ///
    /// [`Error::ReservedNameClash`] if `new_name` is protected;
    /// [`Error::EntryNotFound`] / [`Error::EntryExists`] from the archive
    /// layer otherwise.
    pub fn rename(&mut self, name: &str, new_name: &str) -> Result<()> {
        if self.is_protected(name) {
            log::debug!("ignoring rename of protected entry '{}'", name);
            return Ok(());
        }
        self.check_clash(new_name)?;
        self.store.rename(name, new_name)
    }

    /// Replaces the contents of an existing entry with bytes in memory.
    ///
    /// Replacing a protected entry is a silent no-op.
    ///
    /// # Errors
    ///
    /// [`Error::EntryNotFound`] if the (unprotected) entry does not exist.
    pub fn replace_bytes(&mut self, name: &str, data: impl Into<Vec<u8>>) -> Result<()> {
        if self.is_protected(name) {
            log::debug!("ignoring replace of protected entry '{}'", name);
            return Ok(());
        }
        self.store.replace(name, data.into())
    }

    /// Replaces the contents of an existing entry with the contents of a
    /// file-system file.
    ///
    /// Replacing a protected entry is a silent no-op.
    ///
    /// # Errors
    ///
    /// [`Error::EntryNotFound`] if the (unprotected) entry does not exist.
    pub fn replace_path(&mut self, name: &str, source: impl AsRef<Path>) -> Result<()> {
        if self.is_protected(name) {
            log::debug!("ignoring replace of protected entry '{}'", name);
            return Ok(());
        }
        let data = fs::read(source)?;
        self.store.replace(name, data)
    }

    fn check_clash(&self, name: &str) -> Result<()> {
        if self.is_protected(name) {
            return Err(Error::ReservedNameClash {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read-only passthrough
    // ------------------------------------------------------------------

    /// Returns the cached mimetype of this container.
    ///
    /// The value is read once during open and never changes afterwards.
    pub fn mimetype(&self) -> &str {
        &self.mimetype
    }

    /// Returns the path of the underlying archive file.
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Reads the full contents of a file entry.
    pub fn read(&mut self, name: &str) -> Result<Vec<u8>> {
        self.store.read(name)
    }

    /// Finds an entry by exact name.
    pub fn find_entry(&self, name: &str) -> Option<&EntryInfo> {
        self.store.find(name)
    }

    /// Iterates over entry metadata in archive order.
    pub fn entries(&self) -> impl Iterator<Item = &EntryInfo> {
        self.store.entries()
    }

    /// Returns all entry names in archive order.
    pub fn entry_names(&self) -> Vec<String> {
        self.store.entries().map(|e| e.name.clone()).collect()
    }

    /// Returns the number of entries in the archive.
    pub fn size(&self) -> usize {
        self.store.len()
    }

    /// Returns the archive comment.
    pub fn comment(&self) -> &str {
        self.store.comment()
    }

    /// Sets the archive comment and marks the container dirty.
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.store.set_comment(comment);
    }

    /// Returns `true` if there are uncommitted changes.
    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    // ------------------------------------------------------------------
    // Commit / verification
    // ------------------------------------------------------------------

    /// Writes pending changes back to disk.
    ///
    /// Returns `Ok(false)` without touching the file when nothing changed.
    pub fn commit(&mut self) -> Result<bool> {
        self.store.commit()
    }

    /// Commits and consumes the container. Alias for a final
    /// [`commit`][Self::commit].
    pub fn close(mut self) -> Result<bool> {
        self.commit()
    }

    /// Verifies every managed entry of this container.
    ///
    /// Directories are checked first (presence, then each of their files),
    /// then root-level managed files. The first failure is returned as
    /// [`Error::Malformed`], distinguishing missing required entries from
    /// content that failed validation.
    pub fn verify_managed_entries(&mut self) -> Result<()> {
        let Self {
            store,
            directories,
            files,
            ..
        } = self;
        for dir in directories.iter() {
            dir.verify_strict(store)?;
        }
        for file in files.iter() {
            file.verify_strict(store, None)?;
        }
        Ok(())
    }

    /// Verifies the container at `path`, catching every failure into `false`.
    ///
    /// See [`verify`][crate::verify::verify].
    pub fn verify(path: impl AsRef<Path>) -> bool {
        crate::verify::verify(path)
    }

    /// Verifies the container at `path`, propagating the first failure.
    ///
    /// See [`verify_strict`][crate::verify::verify_strict].
    pub fn verify_strict(path: impl AsRef<Path>) -> Result<()> {
        crate::verify::verify_strict(path)
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.store.path().display(), self.mimetype)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("path", &self.store.path())
            .field("mimetype", &self.mimetype)
            .field("entries", &self.store.len())
            .field("dirty", &self.store.is_dirty())
            .finish()
    }
}

/// A buffered writer for one archive entry.
///
/// Returned by [`Container::entry_writer`]. Bytes are collected in memory
/// and land in the archive when [`finish`][Self::finish] is called; dropping
/// the writer without finishing discards them.
#[must_use = "dropping an entry writer without calling finish() discards the written bytes"]
pub struct EntryWriter<'a> {
    store: &'a mut ZipStore,
    name: String,
    buffer: Vec<u8>,
}

impl EntryWriter<'_> {
    /// Returns the entry name this writer targets.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Writes the buffered bytes into the archive, replacing an existing
    /// entry of the same name.
    pub fn finish(self) -> Result<()> {
        if self.store.find(&self.name).is_some() {
            self.store.replace(&self.name, self.buffer)
        } else {
            self.store.add_bytes(&self.name, self.buffer)
        }
    }
}

impl fmt::Debug for EntryWriter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryWriter")
            .field("name", &self.name)
            .field("buffered", &self.buffer.len())
            .finish()
    }
}

impl Write for EntryWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

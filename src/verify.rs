//! Container verification.
//!
//! Verification proceeds in two phases: opening the container runs the
//! structural checks (mimetype present, at offset 0, stored uncompressed),
//! and the managed-entry walk then checks presence and content of every
//! managed file and directory. The first failure wins.
//!
//! The two public entry points differ only in how they report:
//! [`verify`] booleanizes every failure, [`verify_strict`] propagates it.
//!
//! ```rust,no_run
//! use ucf::Container;
//!
//! if !Container::verify("document.ucf") {
//!     eprintln!("not a valid UCF document");
//! }
//! ```

use std::path::Path;

use crate::container::{Container, ContainerConfig};
use crate::Result;

/// Verifies the container at `path`, propagating the first failure.
///
/// The container is opened (which performs the mimetype invariant checks),
/// the full managed-entry verification runs, and the container is closed
/// before returning.
///
/// # Errors
///
/// [`Error::Malformed`][crate::Error::Malformed] for structural and
/// validation failures; [`Error::Zip`][crate::Error::Zip] /
/// [`Error::Io`][crate::Error::Io] when the archive itself cannot be read.
pub fn verify_strict(path: impl AsRef<Path>) -> Result<()> {
    verify_strict_with_config(path, ContainerConfig::default())
}

/// Verifies like [`verify_strict`], with extra reserved names and managed
/// entries from `config`.
pub fn verify_strict_with_config(path: impl AsRef<Path>, config: ContainerConfig) -> Result<()> {
    let mut container = Container::open_with_config(path, config)?;
    container.verify_managed_entries()?;
    // verification never mutates, so this close is a no-op commit
    container.close()?;
    Ok(())
}

/// Verifies the container at `path`, catching every failure into `false`.
pub fn verify(path: impl AsRef<Path>) -> bool {
    verify_with_config(path, ContainerConfig::default())
}

/// Verifies like [`verify`], with extra reserved names and managed entries
/// from `config`.
pub fn verify_with_config(path: impl AsRef<Path>, config: ContainerConfig) -> bool {
    match verify_strict_with_config(path.as_ref(), config) {
        Ok(()) => true,
        Err(e) => {
            log::debug!("verification of '{}' failed: {}", path.as_ref().display(), e);
            false
        }
    }
}

//! The standard `META-INF` metadata directory.
//!
//! Every container reserves `META-INF` (case-insensitively) and manages a
//! fixed set of optionally-present metadata files inside it. The directory
//! itself is optional; so is each member file. `container.xml` and
//! `manifest.xml` are conventionally schema-validated; the schema engine is
//! injected as a [`ContentValidator`], and without one those files validate
//! as always-pass like the rest.

use crate::managed::{ContentValidator, ManagedDirectory, ManagedFile};

/// Name of the standard metadata directory.
pub const META_INF: &str = "META-INF";

/// Member files of `META-INF`, in their conventional order.
pub const MEMBER_FILES: [&str; 6] = [
    "container.xml",
    "manifest.xml",
    "metadata.xml",
    "signatures.xml",
    "encryption.xml",
    "rights.xml",
];

fn member(name: &str, validator: Option<Box<dyn ContentValidator>>) -> ManagedFile {
    match validator {
        Some(v) => ManagedFile::with_validator(name, false, v),
        None => ManagedFile::new(name, false),
    }
}

/// Builds the standard `META-INF` managed directory with no content
/// validation.
///
/// This is what [`Container::open`][crate::Container::open] registers by
/// default.
pub fn directory() -> ManagedDirectory {
    directory_with_validators(None, None)
}

/// Builds the standard `META-INF` managed directory with injected validators
/// for the two schema-checked members.
///
/// `container_xml` validates `META-INF/container.xml`, `manifest_xml`
/// validates `META-INF/manifest.xml`. A `None` collaborator degrades that
/// file to always-pass.
///
/// Register the result through a
/// [`ContainerConfig`][crate::ContainerConfig]; it overwrites the built-in
/// `META-INF` entry by name.
pub fn directory_with_validators(
    container_xml: Option<Box<dyn ContentValidator>>,
    manifest_xml: Option<Box<dyn ContentValidator>>,
) -> ManagedDirectory {
    ManagedDirectory::with_files(
        META_INF,
        false,
        [
            member("container.xml", container_xml),
            member("manifest.xml", manifest_xml),
            member("metadata.xml", None),
            member("signatures.xml", None),
            member("encryption.xml", None),
            member("rights.xml", None),
        ],
    )
}

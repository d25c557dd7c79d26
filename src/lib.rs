//! # ucf
//!
//! A library for working with Universal Container Format (UCF) documents:
//! ZIP archives carrying a mandatory, uncompressed `mimetype` entry at the
//! very start of the file, plus reserved namespaces (such as `META-INF`)
//! holding managed, validated metadata. UCF is the packaging convention
//! underlying EPUB and similar document formats.
//!
//! The crate layers a policy engine over a plain ZIP archive: every mutating
//! operation is checked against the container's reserved and managed names
//! before it touches the archive, and verification re-checks the structural
//! invariants plus the presence and contents of every managed entry.
//!
//! ## Quick Start
//!
//! ### Creating a container
//!
//! ```rust,no_run
//! use ucf::{Container, Result};
//!
//! fn main() -> Result<()> {
//!     let mut container = Container::create("document.ucf")?;
//!     container.add_bytes("content.xml", "<doc/>")?;
//!     container.mkdir("media")?;
//!     container.close()?;
//!     Ok(())
//! }
//! ```
//!
//! ### Reading and verifying
//!
//! ```rust,no_run
//! use ucf::{Container, Result};
//!
//! fn main() -> Result<()> {
//!     let mut container = Container::open("document.ucf")?;
//!     println!("mimetype: {}", container.mimetype());
//!     for entry in container.entries() {
//!         println!("  {}", entry.name);
//!     }
//!
//!     // boolean form catches everything; the strict form explains
//!     assert!(Container::verify("document.ucf"));
//!     Container::verify_strict("document.ucf")?;
//!     Ok(())
//! }
//! ```
//!
//! ### Reserved names
//!
//! Writes into reserved or managed names are rejected before they reach the
//! archive; destructive operations on them are harmless no-ops:
//!
//! ```rust,no_run
//! use ucf::{Container, Error};
//!
//! # fn main() -> ucf::Result<()> {
//! let mut container = Container::open("document.ucf")?;
//!
//! // creation into a protected name fails fast
//! assert!(matches!(
//!     container.add_bytes("META-INF", b"oops".to_vec()),
//!     Err(Error::ReservedNameClash { .. })
//! ));
//!
//! // removal of a protected name is silently ignored
//! container.remove("mimetype")?;
//! assert_eq!(container.mimetype(), "application/epub+zip");
//! # Ok(())
//! # }
//! ```
//!
//! ### Extending the managed structure
//!
//! Containers are extended by configuration, not subclassing:
//!
//! ```rust,no_run
//! use ucf::{Container, ContainerConfig, ManagedDirectory, ManagedFile};
//!
//! # fn main() -> ucf::Result<()> {
//! let config = ContainerConfig::new()
//!     .reserve_name(".version")
//!     .managed_entry(ManagedFile::new("content.xml", true))
//!     .managed_entry(ManagedDirectory::new("media", false));
//!
//! let container = Container::open_with_config("document.ucf", config)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | No | Command-line interface tool |
//!
//! ## Scope
//!
//! The ZIP codec itself (compression, CRC, archive bytes) is delegated to
//! the `zip` crate; schema validation of metadata files is injected through
//! the [`ContentValidator`] trait so the core has no schema-engine
//! dependency.

pub mod container;
pub mod error;
pub mod managed;
pub mod meta_inf;
pub mod reserved;
pub mod verify;

mod store;

pub use container::{Container, ContainerConfig, EntryWriter, DEFAULT_MIMETYPE, MIMETYPE_FILE};
pub use error::{Error, Result};
pub use managed::{ContentValidator, ManagedDirectory, ManagedEntry, ManagedFile};
pub use reserved::NameRegistry;
pub use store::EntryInfo;
pub use verify::{verify, verify_strict, verify_strict_with_config, verify_with_config};

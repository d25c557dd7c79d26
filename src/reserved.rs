//! Case-insensitive reserved-name registry.
//!
//! Reserved names protect entries like `mimetype` from being created over,
//! removed, or renamed into. Comparison ignores ASCII-irrelevant details the
//! way ZIP tooling does in practice: case is folded and one trailing `/`
//! (the conventional directory suffix) is stripped before matching.

/// Strips one trailing path separator from an entry name.
///
/// Archive directory entries are conventionally suffixed with `/`; reserved
/// names are stored and compared without it. Only a single separator is
/// removed, so `"a//"` normalizes to `"a/"`.
pub(crate) fn normalize(name: &str) -> &str {
    name.strip_suffix('/').unwrap_or(name)
}

/// Returns `true` if two entry names match under reservation rules.
///
/// Both sides are normalized with [`normalize`] and compared
/// case-insensitively.
pub(crate) fn names_match(reserved: &str, candidate: &str) -> bool {
    let reserved = normalize(reserved);
    let candidate = normalize(candidate);
    // Unicode case folding, not just ASCII: entry names are arbitrary UTF-8.
    reserved.to_lowercase() == candidate.to_lowercase()
}

/// An insertion-ordered set of reserved entry names.
///
/// Registration is idempotent under case-insensitive comparison: registering
/// `"mimetype"` and then `"MIMETYPE"` stores only the first, with its
/// original casing intact. There is no removal operation; a name reserved for
/// the lifetime of a [`Container`][crate::Container] stays reserved.
///
/// The registry is deliberately not thread-safe. The owning container
/// serializes all access.
///
/// # Examples
///
/// ```
/// use ucf::NameRegistry;
///
/// let mut registry = NameRegistry::new();
/// registry.register("mimetype");
/// registry.register("MimeType"); // duplicate, ignored
///
/// assert!(registry.is_reserved("MIMETYPE"));
/// assert!(registry.is_reserved("mimetype/"));
/// assert_eq!(registry.names(), ["mimetype"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    names: Vec<String>,
}

impl NameRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `name` if no case-insensitive equivalent is registered yet.
    ///
    /// The stored casing is never mutated by later registrations or lookups.
    pub fn register(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.is_reserved(&name) {
            self.names.push(name);
        }
    }

    /// Returns `true` if `candidate` matches a registered name.
    ///
    /// One trailing `/` is stripped from the candidate before the
    /// case-insensitive comparison, so directory spellings match their
    /// reserved file form.
    pub fn is_reserved(&self, candidate: &str) -> bool {
        self.names.iter().any(|n| names_match(n, candidate))
    }

    /// Returns the registered names in insertion order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

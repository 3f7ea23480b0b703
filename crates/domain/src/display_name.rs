//! Store-qualified display names such as `SECONDARY/alice`.

use serde::{Deserialize, Serialize};

/// Separator between the user-store qualifier and the bare name.
pub const STORE_SEPARATOR: char = '/';

/// Display name split into its user-store prefix and bare name.
///
/// An empty prefix denotes the primary user store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    /// User-store qualifier, empty for the primary store.
    pub store_prefix: String,
    /// Bare name without the qualifier.
    pub name: String,
}

impl QualifiedName {
    /// Splits a display name that carries exactly one separator.
    #[must_use]
    pub fn parse(display_name: &str) -> Self {
        let (store_prefix, name) = split_display_name(display_name);
        Self { store_prefix, name }
    }

    /// Returns the canonical display name.
    #[must_use]
    pub fn compose(&self) -> String {
        compose_display_name(self.store_prefix.as_str(), self.name.as_str())
    }

    /// Returns the store identifier used for naming policy lookups.
    #[must_use]
    pub fn store(&self) -> Option<&str> {
        (!self.store_prefix.is_empty()).then_some(self.store_prefix.as_str())
    }
}

/// Joins a store prefix and a bare name.
///
/// Returns `name` unchanged when `prefix` is empty.
#[must_use]
pub fn compose_display_name(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        return name.to_owned();
    }

    format!("{prefix}{STORE_SEPARATOR}{name}")
}

/// Splits a display name into `(prefix, name)`.
///
/// Only a name with exactly one separator is store-qualified. Any other name
/// gets an empty prefix and is kept whole.
#[must_use]
pub fn split_display_name(display_name: &str) -> (String, String) {
    if display_name.matches(STORE_SEPARATOR).count() != 1 {
        return (String::new(), display_name.to_owned());
    }

    match display_name.split_once(STORE_SEPARATOR) {
        Some((prefix, name)) => (prefix.to_owned(), name.to_owned()),
        None => (String::new(), display_name.to_owned()),
    }
}

//! Typed namespace and locale keys.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use serde::{
    Deserialize,
    Serialize,
};

/// Identifies a group of translations that loads as one unit ("common", "errors").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceKey(String);

impl NamespaceKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for NamespaceKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for NamespaceKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for NamespaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NamespaceKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NamespaceKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NamespaceKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NamespaceKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Identifies a language or language-region pair ("en", "ru", "en-US").
///
/// Plain identifier data; validation against BCP 47 happens only where a
/// component actually needs parsed subtags (the plural selector).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleKey(String);

impl LocaleKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for LocaleKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for LocaleKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for LocaleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for LocaleKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LocaleKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for LocaleKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LocaleKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Collects keys in declaration order, keeping the first occurrence of each.
pub(crate) fn dedup_keys<K>(keys: impl IntoIterator<Item = K>) -> Vec<K>
where
    K: Clone + Eq + Hash,
{
    let mut seen = HashSet::new();
    keys.into_iter().filter(|key| seen.insert(key.clone())).collect()
}

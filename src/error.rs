//! Error types for loading and plural selection.

use thiserror::Error;

use crate::key::{
    LocaleKey,
    NamespaceKey,
};

/// Boxed error as produced by caller-supplied loaders and extractors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by `load` operations on a translation store.
///
/// Loader and extractor failures pass through transparently: display text and
/// source chain are the callback's own, with no added wrapping.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("namespace `{0}` is not registered in this store")]
    UnknownNamespace(NamespaceKey),
    #[error("locale `{locale}` is not registered for namespace `{namespace}`")]
    UnknownLocale { namespace: NamespaceKey, locale: LocaleKey },
    #[error(transparent)]
    Loader(BoxError),
    #[error(transparent)]
    Extraction(BoxError),
}

/// Errors raised while constructing a plural selector.
#[derive(Error, Debug)]
pub enum PluralError {
    #[error("invalid locale identifier `{locale}`")]
    InvalidLocale {
        locale: String,
        #[source]
        source: unic_langid::LanguageIdentifierError,
    },
    #[error("no plural rules available for locale `{locale}`: {reason}")]
    UnsupportedLocale { locale: String, reason: &'static str },
}

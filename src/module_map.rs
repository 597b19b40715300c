//! Lazy loader-thunk table: one thunk per (namespace, locale) pair.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;
use crate::key::{
    LocaleKey,
    NamespaceKey,
    dedup_keys,
};
use crate::loader::ModuleLoader;

/// A zero-argument async loading operation bound to one (namespace, locale)
/// pair.
///
/// Construction captures the pair and a handle to the loader; nothing runs
/// until [`load`](Self::load) is called. Results are never memoized: every
/// call re-invokes the loader and passes its outcome through unchanged.
pub struct ModuleThunk<M> {
    /// Shared loader the thunk delegates to.
    loader: Arc<dyn ModuleLoader<M>>,
    /// Locale captured at build time.
    locale: LocaleKey,
    /// Namespace captured at build time.
    namespace: NamespaceKey,
}

impl<M> ModuleThunk<M> {
    /// Invokes the captured loader with this thunk's (locale, namespace).
    ///
    /// # Errors
    /// Whatever the loader fails with, unchanged.
    pub async fn load(&self) -> Result<M, BoxError> {
        self.loader.load_module(self.locale.clone(), self.namespace.clone()).await
    }

    #[must_use]
    pub const fn locale(&self) -> &LocaleKey {
        &self.locale
    }

    #[must_use]
    pub const fn namespace(&self) -> &NamespaceKey {
        &self.namespace
    }
}

impl<M> Clone for ModuleThunk<M> {
    fn clone(&self) -> Self {
        Self {
            loader: Arc::clone(&self.loader),
            locale: self.locale.clone(),
            namespace: self.namespace.clone(),
        }
    }
}

impl<M> fmt::Debug for ModuleThunk<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleThunk")
            .field("locale", &self.locale)
            .field("namespace", &self.namespace)
            .field("loader", &"<loader>")
            .finish()
    }
}

/// Two-level table of loader thunks: namespace → locale → [`ModuleThunk`].
///
/// Building the map performs no loads. Iteration follows the declaration
/// order of the key sets; duplicate keys collapse to their first occurrence.
pub struct ModuleMap<M> {
    /// Namespaces in declaration order.
    namespaces: Vec<NamespaceKey>,
    /// Thunk rows per namespace.
    entries: HashMap<NamespaceKey, HashMap<LocaleKey, ModuleThunk<M>>>,
}

/// Builds the thunk table for the given namespace and locale key sets.
///
/// Every (namespace, locale) pair gets its own thunk delegating to `loader`.
/// An empty namespace set yields an empty map; an empty locale set yields an
/// empty row per namespace.
#[must_use]
pub fn build_module_map<M, N, L>(
    namespaces: N,
    locales: L,
    loader: impl ModuleLoader<M> + 'static,
) -> ModuleMap<M>
where
    M: Send + 'static,
    N: IntoIterator,
    N::Item: Into<NamespaceKey>,
    L: IntoIterator,
    L::Item: Into<LocaleKey>,
{
    let namespaces = dedup_keys(namespaces.into_iter().map(Into::into));
    let locales = dedup_keys(locales.into_iter().map(Into::into));
    ModuleMap::from_shared_loader(&namespaces, &locales, Arc::new(loader))
}

impl<M> ModuleMap<M>
where
    M: Send + 'static,
{
    /// Builds the table around an already-shared loader handle.
    #[must_use]
    pub fn from_shared_loader(
        namespaces: &[NamespaceKey],
        locales: &[LocaleKey],
        loader: Arc<dyn ModuleLoader<M>>,
    ) -> Self {
        let namespaces = dedup_keys(namespaces.iter().cloned());
        let locales = dedup_keys(locales.iter().cloned());

        let mut entries = HashMap::with_capacity(namespaces.len());
        for namespace in &namespaces {
            let mut row = HashMap::with_capacity(locales.len());
            for locale in &locales {
                let thunk = ModuleThunk {
                    loader: Arc::clone(&loader),
                    locale: locale.clone(),
                    namespace: namespace.clone(),
                };
                row.insert(locale.clone(), thunk);
            }
            entries.insert(namespace.clone(), row);
        }

        tracing::debug!(
            namespaces = namespaces.len(),
            locales = locales.len(),
            "Built module map"
        );

        Self { namespaces, entries }
    }
}

impl<M> ModuleMap<M> {
    /// Looks up the thunk for one (namespace, locale) pair.
    #[must_use]
    pub fn get(&self, namespace: &str, locale: &str) -> Option<&ModuleThunk<M>> {
        self.entries.get(namespace)?.get(locale)
    }

    /// Namespaces in declaration order.
    pub fn namespaces(&self) -> impl Iterator<Item = &NamespaceKey> {
        self.namespaces.iter()
    }

    /// Locales registered under one namespace (empty if the namespace is
    /// unknown).
    pub fn locales(&self, namespace: &str) -> impl Iterator<Item = &LocaleKey> {
        self.entries.get(namespace).into_iter().flat_map(|row| row.keys())
    }

    /// Number of namespaces.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.namespaces.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Tears the map into (namespace, thunk row) pairs in declaration order.
    pub(crate) fn into_rows(self) -> Vec<(NamespaceKey, HashMap<LocaleKey, ModuleThunk<M>>)> {
        let Self { namespaces, mut entries } = self;
        namespaces
            .into_iter()
            .filter_map(|namespace| {
                let row = entries.remove(&namespace)?;
                Some((namespace, row))
            })
            .collect()
    }
}

impl<M> fmt::Debug for ModuleMap<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleMap")
            .field("namespaces", &self.namespaces)
            .field("entries", &"<thunks>")
            .finish()
    }
}

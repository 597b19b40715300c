//! Translation store: eager per-namespace entries, lazy per-locale loading.

use std::collections::HashMap;
use std::fmt;
use std::sync::{
    Arc,
    RwLock,
};

use async_trait::async_trait;
use futures::future::join_all;

use crate::config::StoreSettings;
use crate::error::LoadError;
use crate::key::{
    LocaleKey,
    NamespaceKey,
    dedup_keys,
};
use crate::loader::{
    ModuleLoader,
    TranslationExtractor,
};
use crate::module_map::{
    ModuleMap,
    ModuleThunk,
};

/// Outer stage of the store factory.
///
/// Captures the key sets plus the loader and extractor callbacks without
/// performing any loads. [`instantiate`](Self::instantiate) is the inner
/// stage: it builds a live [`TranslationStore`]. The module type `M` is a
/// concern of this builder only; instantiated stores are parameterized by
/// the extracted-value type alone.
pub struct TranslationStoreBuilder<M, T> {
    /// Namespaces in declaration order.
    namespaces: Vec<NamespaceKey>,
    /// Locales in declaration order.
    locales: Vec<LocaleKey>,
    /// Shared loader callback.
    loader: Arc<dyn ModuleLoader<M>>,
    /// Shared extractor callback.
    extractor: Arc<dyn TranslationExtractor<M, T>>,
}

impl<M, T> TranslationStoreBuilder<M, T>
where
    M: Send + 'static,
    T: Send + Sync + 'static,
{
    /// Captures key sets and callbacks. No loads happen here.
    #[must_use]
    pub fn new<N, L>(
        namespaces: N,
        locales: L,
        loader: impl ModuleLoader<M> + 'static,
        extractor: impl TranslationExtractor<M, T> + 'static,
    ) -> Self
    where
        N: IntoIterator,
        N::Item: Into<NamespaceKey>,
        L: IntoIterator,
        L::Item: Into<LocaleKey>,
    {
        Self {
            namespaces: dedup_keys(namespaces.into_iter().map(Into::into)),
            locales: dedup_keys(locales.into_iter().map(Into::into)),
            loader: Arc::new(loader),
            extractor: Arc::new(extractor),
        }
    }

    /// Captures key sets from validated settings.
    #[must_use]
    pub fn from_settings(
        settings: &StoreSettings,
        loader: impl ModuleLoader<M> + 'static,
        extractor: impl TranslationExtractor<M, T> + 'static,
    ) -> Self {
        Self::new(
            settings.namespaces.iter().cloned(),
            settings.locales.iter().cloned(),
            loader,
            extractor,
        )
    }

    /// Inner stage: builds a live store.
    ///
    /// The loader-thunk table is built once per store and shared across all
    /// of its load calls. Each call to `instantiate` produces an independent
    /// store; stores share the loader and extractor handles.
    #[must_use]
    pub fn instantiate(&self) -> TranslationStore<T> {
        let map = ModuleMap::from_shared_loader(
            &self.namespaces,
            &self.locales,
            Arc::clone(&self.loader),
        );

        let mut entries = HashMap::with_capacity(self.namespaces.len());
        for (namespace, row) in map.into_rows() {
            let entry = TranslationEntry::bind(
                namespace.clone(),
                self.locales.clone(),
                row,
                Arc::clone(&self.extractor),
            );
            entries.insert(namespace, entry);
        }

        tracing::debug!(
            namespaces = self.namespaces.len(),
            locales = self.locales.len(),
            "Instantiated translation store"
        );

        TranslationStore { namespaces: self.namespaces.clone(), entries }
    }
}

impl<M, T> fmt::Debug for TranslationStoreBuilder<M, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationStoreBuilder")
            .field("namespaces", &self.namespaces)
            .field("locales", &self.locales)
            .field("loader", &"<loader>")
            .field("extractor", &"<extractor>")
            .finish()
    }
}

/// Live store with one entry per namespace.
///
/// Entries exist eagerly from instantiation; their translation slots fill
/// lazily as [`TranslationEntry::load`] runs.
pub struct TranslationStore<T> {
    /// Namespaces in declaration order.
    namespaces: Vec<NamespaceKey>,
    /// One entry per namespace.
    entries: HashMap<NamespaceKey, TranslationEntry<T>>,
}

impl<T> TranslationStore<T> {
    /// Looks up the entry for one namespace.
    #[must_use]
    pub fn entry(&self, namespace: &str) -> Option<&TranslationEntry<T>> {
        self.entries.get(namespace)
    }

    /// Namespaces in declaration order.
    pub fn namespaces(&self) -> impl Iterator<Item = &NamespaceKey> {
        self.namespaces.iter()
    }

    /// Entries in namespace declaration order.
    pub fn entries(&self) -> impl Iterator<Item = &TranslationEntry<T>> {
        self.namespaces.iter().filter_map(|namespace| self.entries.get(namespace))
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

    /// Current translation value for one namespace, if loaded.
    #[must_use]
    pub fn translation(&self, namespace: &str) -> Option<T>
    where
        T: Clone,
    {
        self.entry(namespace)?.translation()
    }
}

impl<T> TranslationStore<T>
where
    T: Send + Sync,
{
    /// Loads one namespace for one locale.
    ///
    /// # Errors
    /// [`LoadError::UnknownNamespace`] when the namespace is not part of this
    /// store; otherwise whatever the entry's load fails with.
    pub async fn load(&self, namespace: &str, locale: &str) -> Result<(), LoadError> {
        let Some(entry) = self.entry(namespace) else {
            return Err(LoadError::UnknownNamespace(NamespaceKey::from(namespace)));
        };
        entry.load(locale).await
    }

    /// Loads every namespace for one locale, concurrently.
    ///
    /// All loads run to completion regardless of sibling failures, so
    /// successful entries keep their new values even when this returns an
    /// error.
    ///
    /// # Errors
    /// The first failure in namespace declaration order.
    pub async fn load_all(&self, locale: &str) -> Result<(), LoadError> {
        let loads = self.entries().map(|entry| entry.load(locale));
        for result in join_all(loads).await {
            result?;
        }
        Ok(())
    }
}

impl<T> fmt::Debug for TranslationStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationStore")
            .field("namespaces", &self.namespaces)
            .field("entries", &self.entries)
            .finish()
    }
}

/// One namespace's slice of a store: its loader row and translation slot.
pub struct TranslationEntry<T> {
    /// Namespace this entry belongs to.
    namespace: NamespaceKey,
    /// Locales in declaration order.
    locales: Vec<LocaleKey>,
    /// Bound load pipelines per locale.
    pipelines: HashMap<LocaleKey, Arc<dyn LoadPipeline<T>>>,
    /// Translation slot; absent until the first successful load.
    translation: RwLock<Option<T>>,
}

impl<T> TranslationEntry<T> {
    /// Pairs each thunk in the row with the shared extractor.
    fn bind<M>(
        namespace: NamespaceKey,
        locales: Vec<LocaleKey>,
        row: HashMap<LocaleKey, ModuleThunk<M>>,
        extractor: Arc<dyn TranslationExtractor<M, T>>,
    ) -> Self
    where
        M: Send + 'static,
        T: Send + Sync + 'static,
    {
        let pipelines = row
            .into_iter()
            .map(|(locale, thunk)| {
                let pipeline: Arc<dyn LoadPipeline<T>> =
                    Arc::new(ThunkPipeline { thunk, extractor: Arc::clone(&extractor) });
                (locale, pipeline)
            })
            .collect();

        Self { namespace, locales, pipelines, translation: RwLock::new(None) }
    }

    #[must_use]
    pub const fn namespace(&self) -> &NamespaceKey {
        &self.namespace
    }

    /// Locales this entry can load, in declaration order.
    pub fn locales(&self) -> impl Iterator<Item = &LocaleKey> {
        self.locales.iter()
    }

    /// Current translation value, if any load has succeeded.
    #[must_use]
    pub fn translation(&self) -> Option<T>
    where
        T: Clone,
    {
        match self.translation.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Whether a load has filled the translation slot.
    #[must_use]
    pub fn has_translation(&self) -> bool {
        match self.translation.read() {
            Ok(slot) => slot.is_some(),
            Err(poisoned) => poisoned.into_inner().is_some(),
        }
    }
}

impl<T> TranslationEntry<T>
where
    T: Send + Sync,
{
    /// Loads this namespace for one locale: thunk, extraction, slot overwrite.
    ///
    /// Every call is a fresh loader invocation and extraction; nothing is
    /// cached or deduplicated. On failure the slot keeps its previous value.
    /// Concurrent loads on the same entry race; the slot ends up with
    /// whichever call settled last.
    ///
    /// # Errors
    /// [`LoadError::UnknownLocale`] when the locale is not part of this
    /// store's key set; loader and extractor failures pass through verbatim
    /// as [`LoadError::Loader`] and [`LoadError::Extraction`].
    pub async fn load(&self, locale: &str) -> Result<(), LoadError> {
        let Some(pipeline) = self.pipelines.get(locale) else {
            return Err(LoadError::UnknownLocale {
                namespace: self.namespace.clone(),
                locale: LocaleKey::from(locale),
            });
        };

        tracing::debug!(namespace = %self.namespace, locale = %locale, "Loading translation");
        let value = pipeline.run().await?;

        match self.translation.write() {
            Ok(mut slot) => *slot = Some(value),
            Err(poisoned) => *poisoned.into_inner() = Some(value),
        }
        Ok(())
    }
}

impl<T> fmt::Debug for TranslationEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationEntry")
            .field("namespace", &self.namespace)
            .field("locales", &self.locales)
            .field("loaded", &self.has_translation())
            .finish_non_exhaustive()
    }
}

/// Erased load pipeline for one (namespace, locale) pair.
#[async_trait]
trait LoadPipeline<T>: Send + Sync {
    /// Runs one fresh load: thunk call, then extraction.
    async fn run(&self) -> Result<T, LoadError>;
}

/// Pairs a module thunk with the extractor projecting its modules.
struct ThunkPipeline<M, T> {
    /// Thunk bound to this pipeline's (namespace, locale).
    thunk: ModuleThunk<M>,
    /// Shared extractor callback.
    extractor: Arc<dyn TranslationExtractor<M, T>>,
}

#[async_trait]
impl<M, T> LoadPipeline<T> for ThunkPipeline<M, T>
where
    M: Send + 'static,
    T: Send + Sync + 'static,
{
    async fn run(&self) -> Result<T, LoadError> {
        let module = self.thunk.load().await.map_err(LoadError::Loader)?;
        self.extractor
            .extract(module, self.thunk.locale(), self.thunk.namespace())
            .map_err(LoadError::Extraction)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use googletest::prelude::*;
    use serde_json::{
        Value,
        json,
    };

    use super::*;
    use crate::error::BoxError;

    /// Extractor reading the `data` field of a JSON module as a string.
    fn data_extractor(
        module: Value,
        _locale: &LocaleKey,
        _namespace: &NamespaceKey,
    ) -> Result<String, BoxError> {
        module
            .get("data")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| BoxError::from("module has no data field"))
    }

    /// Loader resolving `{"data": "Hello"}` for "en" and `{"data": "Привет"}`
    /// for "ru".
    async fn greeting_loader(locale: LocaleKey, _namespace: NamespaceKey) -> Result<Value, BoxError> {
        match locale.as_str() {
            "en" => Ok(json!({ "data": "Hello" })),
            "ru" => Ok(json!({ "data": "Привет" })),
            other => Err(format!("no module for locale {other}").into()),
        }
    }

    fn greeting_builder() -> TranslationStoreBuilder<Value, String> {
        TranslationStoreBuilder::new(
            ["common", "errors"],
            ["en", "ru"],
            greeting_loader,
            data_extractor,
        )
    }

    #[googletest::test]
    fn test_store_starts_with_empty_slots() {
        let store = greeting_builder().instantiate();

        assert_that!(store.len(), eq(2));
        for entry in store.entries() {
            expect_that!(entry.has_translation(), eq(false));
            expect_that!(entry.translation(), none());
        }
    }

    #[tokio::test]
    async fn test_load_fills_only_the_target_namespace() {
        let store = greeting_builder().instantiate();

        store.load("common", "en").await.unwrap();

        assert_eq!(store.translation("common"), Some("Hello".to_string()));
        assert_eq!(store.translation("errors"), None);
        assert!(!store.entry("errors").unwrap().has_translation());
    }

    #[tokio::test]
    async fn test_load_overwrites_previous_value() {
        let store = greeting_builder().instantiate();
        let entry = store.entry("common").unwrap();

        entry.load("en").await.unwrap();
        assert_eq!(entry.translation(), Some("Hello".to_string()));

        entry.load("ru").await.unwrap();
        assert_eq!(entry.translation(), Some("Привет".to_string()));
    }

    #[tokio::test]
    async fn test_loader_error_passes_through_and_slot_is_kept() {
        let builder = TranslationStoreBuilder::new(
            ["common"],
            ["en", "broken"],
            |locale: LocaleKey, _namespace: NamespaceKey| async move {
                match locale.as_str() {
                    "broken" => Err::<Value, BoxError>("X".into()),
                    _ => Ok(json!({ "data": "Hello" })),
                }
            },
            data_extractor,
        );
        let store = builder.instantiate();
        let entry = store.entry("common").unwrap();

        let error = entry.load("broken").await.unwrap_err();
        assert!(matches!(error, LoadError::Loader(_)));
        assert_eq!(error.to_string(), "X");
        assert_eq!(entry.translation(), None);

        entry.load("en").await.unwrap();
        entry.load("broken").await.unwrap_err();
        assert_eq!(entry.translation(), Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_extractor_error_passes_through_and_slot_is_kept() {
        let builder = TranslationStoreBuilder::new(
            ["common"],
            ["en", "ru"],
            |locale: LocaleKey, _namespace: NamespaceKey| async move {
                match locale.as_str() {
                    "en" => Ok::<_, BoxError>(json!({ "data": "Hello" })),
                    _ => Ok(json!({ "unexpected": true })),
                }
            },
            data_extractor,
        );
        let store = builder.instantiate();
        let entry = store.entry("common").unwrap();

        entry.load("en").await.unwrap();

        let error = entry.load("ru").await.unwrap_err();
        assert!(matches!(error, LoadError::Extraction(_)));
        assert_eq!(error.to_string(), "module has no data field");
        assert_eq!(entry.translation(), Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_extractor_receives_module_locale_namespace() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let received_in_extractor = Arc::clone(&received);

        let builder = TranslationStoreBuilder::new(
            ["common"],
            ["en"],
            |locale: LocaleKey, namespace: NamespaceKey| async move {
                Ok::<_, BoxError>(json!({ "for": [locale.as_str(), namespace.as_str()] }))
            },
            move |module: Value, locale: &LocaleKey, namespace: &NamespaceKey| {
                received_in_extractor.lock().unwrap().push((
                    module,
                    locale.to_string(),
                    namespace.to_string(),
                ));
                Ok::<String, BoxError>("done".to_string())
            },
        );
        builder.instantiate().load("common", "en").await.unwrap();

        let received = received.lock().unwrap();
        assert_eq!(
            *received,
            vec![(
                json!({ "for": ["en", "common"] }),
                "en".to_string(),
                "common".to_string(),
            )]
        );
    }

    #[tokio::test]
    async fn test_every_load_invokes_the_loader_again() {
        let calls = Arc::new(Mutex::new(0_usize));
        let calls_in_loader = Arc::clone(&calls);

        let builder = TranslationStoreBuilder::new(
            ["common"],
            ["en"],
            move |_locale: LocaleKey, _namespace: NamespaceKey| {
                let calls = Arc::clone(&calls_in_loader);
                async move {
                    *calls.lock().unwrap() += 1;
                    Ok::<_, BoxError>(json!({ "data": "Hello" }))
                }
            },
            data_extractor,
        );
        let store = builder.instantiate();

        store.load("common", "en").await.unwrap();
        store.load("common", "en").await.unwrap();
        store.load("common", "en").await.unwrap();

        assert_eq!(*calls.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_unknown_namespace_and_locale_are_typed_errors() {
        let store = greeting_builder().instantiate();

        let error = store.load("missing", "en").await.unwrap_err();
        assert!(matches!(error, LoadError::UnknownNamespace(_)));

        let error = store.load("common", "fr").await.unwrap_err();
        assert!(matches!(error, LoadError::UnknownLocale { .. }));
        assert_eq!(
            error.to_string(),
            "locale `fr` is not registered for namespace `common`"
        );
    }

    #[tokio::test]
    async fn test_load_all_fills_every_namespace() {
        let store = greeting_builder().instantiate();

        store.load_all("ru").await.unwrap();

        assert_eq!(store.translation("common"), Some("Привет".to_string()));
        assert_eq!(store.translation("errors"), Some("Привет".to_string()));
    }

    #[tokio::test]
    async fn test_load_all_reports_first_failure_in_declaration_order() {
        let builder = TranslationStoreBuilder::new(
            ["a", "b", "c"],
            ["en"],
            |_locale: LocaleKey, namespace: NamespaceKey| async move {
                match namespace.as_str() {
                    "a" => Err::<Value, BoxError>("a down".into()),
                    "c" => Err("c down".into()),
                    _ => Ok(json!({ "data": "b loaded" })),
                }
            },
            data_extractor,
        );
        let store = builder.instantiate();

        let error = store.load_all("en").await.unwrap_err();
        assert_eq!(error.to_string(), "a down");
        assert_eq!(store.translation("b"), Some("b loaded".to_string()));
        assert_eq!(store.translation("a"), None);
        assert_eq!(store.translation("c"), None);
    }

    #[googletest::test]
    fn test_entry_accessors() {
        let store = greeting_builder().instantiate();
        let entry = store.entry("common").unwrap();

        assert_that!(entry.namespace().as_str(), eq("common"));
        let locales: Vec<&str> = entry.locales().map(LocaleKey::as_str).collect();
        assert_that!(locales, eq(&vec!["en", "ru"]));
    }

    #[googletest::test]
    fn test_store_iterates_in_declaration_order() {
        let store = greeting_builder().instantiate();

        let order: Vec<&str> = store.namespaces().map(NamespaceKey::as_str).collect();
        assert_that!(order, eq(&vec!["common", "errors"]));

        let entry_order: Vec<&str> =
            store.entries().map(|entry| entry.namespace().as_str()).collect();
        assert_that!(entry_order, eq(&vec!["common", "errors"]));
    }
}

//! Caller-supplied loading and extraction seams.
//!
//! Both traits have blanket implementations over plain functions, so a
//! closure with matching signature satisfies them without a named type.

use std::future::Future;

use async_trait::async_trait;

use crate::error::BoxError;
use crate::key::{
    LocaleKey,
    NamespaceKey,
};

/// Resolves the raw translation module for a (locale, namespace) pair.
///
/// Must resolve for any pair drawn from the key sets handed to the builder.
/// Failures pass through to the caller unchanged.
#[async_trait]
pub trait ModuleLoader<M>: Send + Sync {
    /// Loads the module for one locale and namespace.
    async fn load_module(&self, locale: LocaleKey, namespace: NamespaceKey)
    -> Result<M, BoxError>;
}

#[async_trait]
impl<M, F, Fut> ModuleLoader<M> for F
where
    F: Fn(LocaleKey, NamespaceKey) -> Fut + Send + Sync,
    Fut: Future<Output = Result<M, BoxError>> + Send,
{
    async fn load_module(
        &self,
        locale: LocaleKey,
        namespace: NamespaceKey,
    ) -> Result<M, BoxError> {
        self(locale, namespace).await
    }
}

/// Projects a loaded module into the value a store entry keeps.
///
/// Receives the module together with the locale and namespace that produced
/// it, in that order. Failures pass through to the caller unchanged.
pub trait TranslationExtractor<M, T>: Send + Sync {
    /// Extracts the stored value from one loaded module.
    fn extract(
        &self,
        module: M,
        locale: &LocaleKey,
        namespace: &NamespaceKey,
    ) -> Result<T, BoxError>;
}

impl<M, T, F> TranslationExtractor<M, T> for F
where
    F: Fn(M, &LocaleKey, &NamespaceKey) -> Result<T, BoxError> + Send + Sync,
{
    fn extract(
        &self,
        module: M,
        locale: &LocaleKey,
        namespace: &NamespaceKey,
    ) -> Result<T, BoxError> {
        self(module, locale, namespace)
    }
}

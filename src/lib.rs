//! i18n-store
//!
//! Lazy translation-module loading, per-namespace translation stores, and
//! CLDR plural selection for i18n clients.

pub mod config;
pub mod error;
pub mod key;
pub mod loader;
pub mod module_map;
pub mod plural;
pub mod store;

// Re-export the primary surface
pub use config::StoreSettings;
pub use error::{
    BoxError,
    LoadError,
    PluralError,
};
pub use key::{
    LocaleKey,
    NamespaceKey,
};
pub use loader::{
    ModuleLoader,
    TranslationExtractor,
};
pub use module_map::{
    ModuleMap,
    ModuleThunk,
    build_module_map,
};
pub use plural::{
    PluralCategory,
    PluralSelector,
    PluralVariants,
};
pub use store::{
    TranslationEntry,
    TranslationStore,
    TranslationStoreBuilder,
};

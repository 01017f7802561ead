//! Internationalization (i18n) for the portfolio site.
//!
//! All language-related logic lives here: the registry of supported
//! languages, the per-language translation stores, key resolution with
//! fallback, formatting helpers, the language controller that owns the
//! active choice and its persistence, and the completeness validator.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for supported languages and their metadata
//! - `language`: Type-safe `Language` handle backed by the registry
//! - `store`: Nested translation data per language and the catalog of all stores
//! - `resolver`: Dotted-key resolution with default-language fallback
//! - `format`: `{{name}}` interpolation and count-based pluralization
//! - `storage`: Durable preference plus mirroring cookie
//! - `events`: Language change notifications
//! - `controller`: Active-language lifecycle, switching and persistence
//! - `validator`: Build-time completeness checks across languages
//! - `metrics`: Resolution counters
//!
//! # Example
//!
//! ```rust
//! use portfolio_i18n::i18n::{Language, TranslationCatalog, Translator};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(TranslationCatalog::embedded().unwrap());
//! let translator = Translator::new(catalog, Language::TURKISH);
//! assert_eq!(translator.t("navigation.home", None), "Ana Sayfa");
//! ```

mod controller;
mod error;
mod events;
mod format;
mod language;
mod metrics;
mod registry;
mod resolver;
mod storage;
mod store;
mod validator;

pub use controller::{
    ChangeCallback, ControllerOptions, LanguageController, LanguageState, LifecyclePhase,
};
pub use error::{I18nError, StorageError};
pub use events::{LanguageChangeEvent, LanguageEvents, LanguageSubscription, LANGUAGE_CHANGE_EVENT};
pub use format::{format_with_count, interpolate, pluralize, PLURAL_SUFFIX_KEY};
pub use language::Language;
pub use metrics::{MetricsReport, ResolutionMetrics};
pub use registry::{DisplayLanguage, LanguageInfo, LanguageRegistry};
pub use resolver::{ResolutionError, Translator};
pub use storage::{
    language_from_cookie_header, FileStorage, MemoryStorage, PreferenceCookie, PreferenceStorage,
    COOKIE_MAX_AGE, PREFERENCE_KEY,
};
pub use store::{KeyPath, TranslationCatalog, TranslationNode, TranslationStore};
pub use validator::{
    CompletenessValidator, LengthMismatch, TranslationStats, TypeMismatch, ValidationResult,
    ValidationSummary,
};

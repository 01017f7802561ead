//! Translation function: key-path resolution with default-language fallback.
//!
//! Every user-visible string goes through [`Translator::t`]. It never fails:
//! a missing key degrades to the default language, then to the caller's
//! fallback, then to the key itself, and each degraded lookup is recorded as
//! a [`ResolutionError`] for later inspection.

use crate::i18n::language::Language;
use crate::i18n::metrics::ResolutionMetrics;
use crate::i18n::store::{KeyPath, TranslationCatalog, TranslationNode};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error};

/// A lookup that did not succeed directly against the active language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionError {
    /// Key that was requested
    pub key: String,

    /// Language that failed to supply it
    pub language: Language,

    /// Value returned instead
    pub fallback: String,

    /// When the lookup happened
    pub timestamp: DateTime<Utc>,
}

impl ResolutionError {
    /// Create a record stamped with the current time.
    pub fn new(key: impl Into<String>, language: Language, fallback: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            language,
            fallback: fallback.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Translation function bound to one active language.
///
/// Each translator keeps its own error list. Controllers create a fresh one
/// per language, so errors never mix across languages.
#[derive(Debug)]
pub struct Translator {
    catalog: Arc<TranslationCatalog>,
    language: Language,
    fallback_language: Language,
    errors: Mutex<Vec<ResolutionError>>,
    metrics: Arc<ResolutionMetrics>,
}

impl Translator {
    /// Create a translator falling back to the catalog's default language.
    pub fn new(catalog: Arc<TranslationCatalog>, language: Language) -> Self {
        let fallback_language = catalog.default_language();
        Self::with_fallback(catalog, language, fallback_language)
    }

    /// Create a translator with an explicit fallback language.
    pub fn with_fallback(
        catalog: Arc<TranslationCatalog>,
        language: Language,
        fallback_language: Language,
    ) -> Self {
        Self {
            catalog,
            language,
            fallback_language,
            errors: Mutex::new(Vec::new()),
            metrics: Arc::new(ResolutionMetrics::new()),
        }
    }

    /// Share a metrics sink with other translators.
    pub fn with_metrics(mut self, metrics: Arc<ResolutionMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Active language of this translator.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Language used when the active one lacks a key.
    pub fn fallback_language(&self) -> Language {
        self.fallback_language
    }

    /// Resolve a key to display text.
    ///
    /// # Arguments
    /// * `key` - Dotted key-path (e.g., "navigation.home")
    /// * `fallback` - Text to show if no language has the key
    ///
    /// # Returns
    /// * The active language's string, if present
    /// * Otherwise the default language's string (recorded as an error)
    /// * Otherwise `fallback` if non-empty, else the key itself (recorded)
    /// * For unusable keys, `fallback` or `""`, with nothing recorded
    pub fn t(&self, key: &str, fallback: Option<&str>) -> String {
        let Some(path) = KeyPath::parse(key) else {
            return fallback.unwrap_or_default().to_string();
        };

        if let Some(text) = self.text_in(self.language, &path) {
            self.metrics.record_direct_hit();
            return text.to_string();
        }

        if self.language != self.fallback_language {
            if let Some(text) = self.text_in(self.fallback_language, &path) {
                let text = text.to_string();
                self.metrics.record_fallback_hit();
                self.record(key, &text);
                return text;
            }
        }

        let final_fallback = match fallback {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => key.to_string(),
        };
        self.metrics.record_miss();
        self.record(key, &final_fallback);
        final_fallback
    }

    /// Resolve a key with no caller fallback.
    pub fn translate(&self, key: &str) -> String {
        self.t(key, None)
    }

    /// Resolve a key to any node (string, list or nested mapping).
    ///
    /// Uses the same active-then-default order as [`Translator::t`] but
    /// records nothing; callers asking for structures handle absence.
    pub fn value(&self, key: &str) -> Option<TranslationNode> {
        let path = KeyPath::parse(key)?;
        self.node_in(self.language, &path)
            .or_else(|| self.node_in(self.fallback_language, &path))
            .cloned()
    }

    /// Resolve a key expected to hold a list of strings.
    ///
    /// Returns an empty list when no language has a list at that key.
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.value(key) {
            Some(TranslationNode::List(items)) => items,
            _ => {
                debug!("No list translation for key '{}' in '{}'", key, self.language);
                Vec::new()
            }
        }
    }

    /// Snapshot of recorded resolution errors, oldest first.
    pub fn errors(&self) -> Vec<ResolutionError> {
        self.lock_errors().clone()
    }

    /// Forget all recorded resolution errors.
    pub fn clear_errors(&self) {
        self.lock_errors().clear();
    }

    /// Whether any resolution error has been recorded.
    pub fn has_errors(&self) -> bool {
        !self.lock_errors().is_empty()
    }

    fn node_in(&self, language: Language, path: &KeyPath) -> Option<&TranslationNode> {
        self.catalog.store(language)?.lookup(path)
    }

    fn text_in(&self, language: Language, path: &KeyPath) -> Option<&str> {
        self.node_in(language, path)
            .and_then(TranslationNode::as_text)
    }

    fn record(&self, key: &str, fallback: &str) {
        debug!(
            "Translation missing for key: {} in language: {}",
            key, self.language
        );
        self.lock_errors()
            .push(ResolutionError::new(key, self.language, fallback));
    }

    /// Lock the error list, recovering it if a panicking thread poisoned it.
    fn lock_errors(&self) -> MutexGuard<'_, Vec<ResolutionError>> {
        self.errors.lock().unwrap_or_else(|poisoned| {
            error!("Translation error log was poisoned; recovering");
            poisoned.into_inner()
        })
    }
}

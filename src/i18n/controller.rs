//! Language state controller: the session's single source of truth for the
//! active language.
//!
//! # Lifecycle
//!
//! `Uninitialized -> Loading -> Ready`. Construction moves straight to
//! `Loading`; [`LanguageController::initialize`] restores any stored
//! preference and always ends in `Ready`, which is terminal. Language changes
//! happen inside `Ready` and never revisit `Loading`.
//!
//! # Failure semantics
//!
//! Nothing here returns an error. Unreadable storage means "no stored
//! preference", failed writes keep the in-memory change, and unsupported
//! language requests are ignored. Each case logs a warning.

use crate::i18n::events::{LanguageChangeEvent, LanguageEvents, LanguageSubscription};
use crate::i18n::language::Language;
use crate::i18n::metrics::ResolutionMetrics;
use crate::i18n::registry::{DisplayLanguage, LanguageInfo};
use crate::i18n::resolver::Translator;
use crate::i18n::storage::{PreferenceCookie, PreferenceStorage};
use crate::i18n::store::TranslationCatalog;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lifecycle phase of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LifecyclePhase {
    /// Not yet constructed
    Uninitialized,
    /// Restoring the stored preference
    Loading,
    /// Serving lookups and accepting changes
    Ready,
}

/// Construction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Language to start with; the default language when `None`
    pub initial_language: Option<Language>,
    /// Whether to read and write the stored preference
    pub persist_language: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            initial_language: None,
            persist_language: true,
        }
    }
}

/// Snapshot of the controller's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageState {
    /// Active language
    pub language: Language,
    /// True only while the stored preference is being restored
    pub is_loading: bool,
    /// Whether changes are persisted
    pub persist_language: bool,
}

/// Callback invoked with the new language after every change.
pub type ChangeCallback = Box<dyn Fn(Language) + Send + Sync>;

/// Owns the active language for one session.
pub struct LanguageController<S: PreferenceStorage> {
    language: Language,
    phase: LifecyclePhase,
    persist_language: bool,
    storage: S,
    catalog: Arc<TranslationCatalog>,
    on_change: Option<ChangeCallback>,
    events: LanguageEvents,
    metrics: Arc<ResolutionMetrics>,
}

impl<S: PreferenceStorage> LanguageController<S> {
    /// Create a controller in the `Loading` phase.
    ///
    /// Call [`initialize`](Self::initialize) (or use [`start`](Self::start))
    /// before exposing it to user interaction.
    pub fn new(catalog: Arc<TranslationCatalog>, storage: S, options: ControllerOptions) -> Self {
        let mut controller = Self {
            language: options
                .initial_language
                .unwrap_or_else(|| catalog.default_language()),
            phase: LifecyclePhase::Uninitialized,
            persist_language: options.persist_language,
            storage,
            catalog,
            on_change: None,
            events: LanguageEvents::new(),
            metrics: Arc::new(ResolutionMetrics::new()),
        };
        controller.phase = LifecyclePhase::Loading;
        controller
    }

    /// Create a controller and run [`initialize`](Self::initialize).
    pub async fn start(
        catalog: Arc<TranslationCatalog>,
        storage: S,
        options: ControllerOptions,
    ) -> Self {
        let mut controller = Self::new(catalog, storage, options);
        controller.initialize().await;
        controller
    }

    /// Register the change callback.
    pub fn with_change_callback(mut self, callback: impl Fn(Language) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Restore the stored preference and move to `Ready`.
    ///
    /// A stored value is adopted only if it names a supported language.
    /// Calling this again once `Ready` does nothing.
    pub async fn initialize(&mut self) {
        if self.phase == LifecyclePhase::Ready {
            return;
        }

        if self.persist_language {
            match self.storage.load_preference().await {
                Ok(Some(code)) => match Language::from_code(&code) {
                    Ok(language) => {
                        debug!("Restored preferred language '{}'", language);
                        self.language = language;
                    }
                    Err(e) => debug!("Ignoring stored language preference: {}", e),
                },
                Ok(None) => debug!("No stored language preference"),
                Err(e) => warn!("Failed to load language preference: {}", e),
            }
        }

        self.phase = LifecyclePhase::Ready;
        info!("Language controller ready with '{}'", self.language);
    }

    /// Switch to the language with the given code.
    ///
    /// # Returns
    /// `true` if the active language changed. Unsupported codes and the
    /// already-active language are no-ops returning `false`.
    pub fn set_language(&mut self, code: &str) -> bool {
        match Language::from_code(code) {
            Ok(language) => self.set(language),
            Err(e) => {
                warn!("Invalid language: {}", e);
                false
            }
        }
    }

    /// Switch to an already-validated language.
    ///
    /// On change: updates state, calls the change callback, persists the
    /// preference and cookie (when enabled), then notifies subscribers.
    pub fn set(&mut self, language: Language) -> bool {
        if language == self.language {
            debug!("Language already '{}', nothing to do", language);
            return false;
        }

        let previous = self.language;
        self.language = language;

        if let Some(callback) = &self.on_change {
            callback(language);
        }

        if self.persist_language {
            self.persist(language);
        }

        self.events.publish(LanguageChangeEvent { language, previous });
        info!("Language changed from '{}' to '{}'", previous, language);
        true
    }

    /// Switch to the other supported language.
    pub fn toggle_language(&mut self) -> bool {
        self.set(self.language.toggled())
    }

    fn persist(&self, language: Language) {
        if let Err(e) = self.storage.save_preference(language.code()) {
            warn!("Failed to save language preference: {}", e);
        }
        if let Err(e) = self
            .storage
            .set_cookie(&PreferenceCookie::for_language(language))
        {
            warn!("Failed to write language cookie: {}", e);
        }
    }

    /// Active language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// True until [`initialize`](Self::initialize) has finished.
    pub fn is_loading(&self) -> bool {
        self.phase != LifecyclePhase::Ready
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    /// Whether changes are persisted.
    pub fn persists_language(&self) -> bool {
        self.persist_language
    }

    /// Snapshot of language, loading flag and persistence flag.
    pub fn state(&self) -> LanguageState {
        LanguageState {
            language: self.language,
            is_loading: self.is_loading(),
            persist_language: self.persist_language,
        }
    }

    /// Metadata for every supported language.
    pub fn available_languages(&self) -> Vec<&'static LanguageInfo> {
        Language::all().into_iter().map(|lang| lang.info()).collect()
    }

    /// Codes of every supported language.
    pub fn available_codes(&self) -> Vec<&'static str> {
        Language::all().into_iter().map(|lang| lang.code()).collect()
    }

    /// Metadata for the active language.
    pub fn current_language_info(&self) -> &'static LanguageInfo {
        self.language.info()
    }

    /// Display forms for the language picker.
    pub fn available_languages_display(&self) -> Vec<DisplayLanguage> {
        self.available_languages()
            .into_iter()
            .map(LanguageInfo::display)
            .collect()
    }

    /// Display form of the active language, including its direction.
    pub fn current_language_display(&self) -> DisplayLanguage {
        self.current_language_info().display_with_direction()
    }

    /// Fresh translation function for the active language.
    ///
    /// Translators share this controller's metrics but keep their own error
    /// lists.
    pub fn translator(&self) -> Translator {
        Translator::new(self.catalog.clone(), self.language).with_metrics(self.metrics.clone())
    }

    /// Listen for language changes.
    pub fn subscribe(&self) -> LanguageSubscription {
        self.events.subscribe()
    }

    /// Lookup counters for this session.
    pub fn metrics(&self) -> &ResolutionMetrics {
        &self.metrics
    }

    /// Translations this controller resolves against.
    pub fn catalog(&self) -> &Arc<TranslationCatalog> {
        &self.catalog
    }

    /// Preference storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: PreferenceStorage> fmt::Debug for LanguageController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageController")
            .field("language", &self.language)
            .field("phase", &self.phase)
            .field("persist_language", &self.persist_language)
            .field("listeners", &self.events.listener_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::storage::{MemoryStorage, PREFERENCE_KEY};
    use proptest::prelude::*;
    use std::sync::Mutex;

    fn catalog() -> Arc<TranslationCatalog> {
        Arc::new(TranslationCatalog::embedded().expect("embedded translations"))
    }

    async fn ready(storage: MemoryStorage) -> LanguageController<MemoryStorage> {
        LanguageController::start(catalog(), storage, ControllerOptions::default()).await
    }

    // ==================== Lifecycle Tests ====================

    #[test]
    fn test_new_is_loading() {
        let controller =
            LanguageController::new(catalog(), MemoryStorage::new(), ControllerOptions::default());
        assert_eq!(controller.phase(), LifecyclePhase::Loading);
        assert!(controller.is_loading());
        assert_eq!(controller.language(), Language::ENGLISH);
    }

    #[tokio::test]
    async fn test_start_defaults_to_english() {
        let controller = ready(MemoryStorage::new()).await;
        assert_eq!(controller.phase(), LifecyclePhase::Ready);
        assert!(!controller.is_loading());
        assert_eq!(controller.language(), Language::ENGLISH);
    }

    #[tokio::test]
    async fn test_restores_stored_language() {
        let controller = ready(MemoryStorage::with_preference("tr")).await;
        assert_eq!(controller.language(), Language::TURKISH);
    }

    #[tokio::test]
    async fn test_ignores_invalid_stored_language() {
        let options = ControllerOptions {
            initial_language: Some(Language::TURKISH),
            persist_language: true,
        };
        let controller =
            LanguageController::start(catalog(), MemoryStorage::with_preference("fr"), options)
                .await;
        assert_eq!(controller.language(), Language::TURKISH);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_read_failure_uses_default() {
        let storage = MemoryStorage::with_preference("tr");
        storage.fail_reads(true);
        let controller = ready(storage).await;
        assert_eq!(controller.language(), Language::ENGLISH);
        assert_eq!(controller.phase(), LifecyclePhase::Ready);
    }

    #[tokio::test]
    async fn test_persistence_disabled_skips_read() {
        let storage = MemoryStorage::with_preference("tr");
        storage.fail_reads(true);
        let options = ControllerOptions {
            initial_language: None,
            persist_language: false,
        };
        let controller = LanguageController::start(catalog(), storage, options).await;
        assert_eq!(controller.language(), Language::ENGLISH);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_initialize_twice_is_noop() {
        let storage = MemoryStorage::new();
        let mut controller = ready(storage.clone()).await;
        storage.save_preference("tr").unwrap();

        controller.initialize().await;
        assert_eq!(controller.language(), Language::ENGLISH);
    }

    // ==================== set_language Tests ====================

    #[tokio::test]
    async fn test_set_language_persists_and_notifies() {
        let storage = MemoryStorage::new();
        let mut controller = ready(storage.clone()).await;
        let mut listener = controller.subscribe();

        assert!(controller.set_language("tr"));
        assert_eq!(controller.language(), Language::TURKISH);
        assert_eq!(storage.preference().as_deref(), Some("tr"));
        assert_eq!(
            storage.cookie(PREFERENCE_KEY).as_deref(),
            Some("preferred-language=tr; path=/; max-age=31536000")
        );
        assert_eq!(
            listener.try_recv(),
            Some(LanguageChangeEvent {
                language: Language::TURKISH,
                previous: Language::ENGLISH,
            })
        );
    }

    #[tokio::test]
    async fn test_set_invalid_language_is_rejected() {
        let storage = MemoryStorage::new();
        let mut controller = ready(storage.clone()).await;
        let mut listener = controller.subscribe();

        assert!(!controller.set_language("fr"));
        assert_eq!(controller.language(), Language::ENGLISH);
        assert_eq!(storage.write_count(), 0);
        assert_eq!(listener.try_recv(), None);
    }

    #[tokio::test]
    async fn test_set_same_language_is_noop() {
        let storage = MemoryStorage::new();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = calls.clone();
        let mut controller = ready(storage.clone())
            .await
            .with_change_callback(move |lang| seen.lock().unwrap().push(lang));
        let mut listener = controller.subscribe();

        assert!(!controller.set_language("en"));
        assert_eq!(storage.write_count(), 0);
        assert_eq!(listener.try_recv(), None);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_change_callback_receives_new_language() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = calls.clone();
        let mut controller = ready(MemoryStorage::new())
            .await
            .with_change_callback(move |lang| seen.lock().unwrap().push(lang));

        controller.set_language("tr");
        controller.set_language("en");
        assert_eq!(
            *calls.lock().unwrap(),
            vec![Language::TURKISH, Language::ENGLISH]
        );
    }

    #[tokio::test]
    async fn test_write_failure_keeps_new_language() {
        let storage = MemoryStorage::new();
        let mut controller = ready(storage.clone()).await;
        let mut listener = controller.subscribe();
        storage.fail_writes(true);

        assert!(controller.set_language("tr"));
        assert_eq!(controller.language(), Language::TURKISH);
        assert_eq!(storage.preference(), None);
        assert!(listener.try_recv().is_some());
    }

    #[tokio::test]
    async fn test_no_writes_when_persistence_disabled() {
        let storage = MemoryStorage::new();
        let options = ControllerOptions {
            initial_language: None,
            persist_language: false,
        };
        let mut controller = LanguageController::start(catalog(), storage.clone(), options).await;
        let mut listener = controller.subscribe();

        assert!(controller.set_language("tr"));
        assert_eq!(storage.write_count(), 0);
        assert!(listener.try_recv().is_some());
    }

    // ==================== Toggle Tests ====================

    #[tokio::test]
    async fn test_toggle_twice_restores_language() {
        let mut controller = ready(MemoryStorage::new()).await;
        controller.toggle_language();
        assert_eq!(controller.language(), Language::TURKISH);
        controller.toggle_language();
        assert_eq!(controller.language(), Language::ENGLISH);
    }

    // ==================== Info Tests ====================

    #[tokio::test]
    async fn test_available_languages() {
        let controller = ready(MemoryStorage::new()).await;
        assert_eq!(controller.available_codes(), vec!["en", "tr"]);
        let names: Vec<_> = controller
            .available_languages()
            .iter()
            .map(|info| info.name)
            .collect();
        assert_eq!(names, vec!["English", "Turkish"]);
    }

    #[tokio::test]
    async fn test_display_forms() {
        let mut controller = ready(MemoryStorage::new()).await;
        let list = serde_json::to_value(controller.available_languages_display()).unwrap();
        assert_eq!(
            list,
            serde_json::json!([
                {"code": "en", "name": "English", "nativeName": "English"},
                {"code": "tr", "name": "Türkçe", "nativeName": "Türkçe"}
            ])
        );

        controller.set_language("tr");
        let current = serde_json::to_value(controller.current_language_display()).unwrap();
        assert_eq!(current["name"], "Türkçe");
        assert_eq!(current["isRTL"], false);
        assert_eq!(controller.current_language_info().name, "Turkish");
    }

    #[tokio::test]
    async fn test_state_snapshot() {
        let controller = ready(MemoryStorage::new()).await;
        let json = serde_json::to_value(controller.state()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"language": "en", "isLoading": false, "persistLanguage": true})
        );
    }

    // ==================== Translator Tests ====================

    #[tokio::test]
    async fn test_translator_follows_language() {
        let mut controller = ready(MemoryStorage::new()).await;
        assert_eq!(controller.translator().translate("navigation.home"), "Homepage");

        controller.set_language("tr");
        let t = controller.translator();
        assert_eq!(t.language(), Language::TURKISH);
        assert_eq!(t.translate("navigation.home"), "Ana Sayfa");
        assert_eq!(controller.metrics().direct_hits(), 2);
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_even_toggles_are_identity(start_tr in any::<bool>(), pairs in 0usize..5) {
            let initial = if start_tr { Language::TURKISH } else { Language::ENGLISH };
            let options = ControllerOptions {
                initial_language: Some(initial),
                persist_language: false,
            };
            let mut controller = tokio_test::block_on(LanguageController::start(
                catalog(),
                MemoryStorage::new(),
                options,
            ));
            for _ in 0..pairs * 2 {
                controller.toggle_language();
            }
            prop_assert_eq!(controller.language(), initial);
        }
    }
}

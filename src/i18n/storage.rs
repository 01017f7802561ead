//! Durable storage for the preferred-language choice.
//!
//! Two records are kept: a durable `preferred-language` entry, read back when
//! a session starts, and a same-named cookie so server-rendered pages can pick
//! the language before first paint.

use crate::i18n::error::StorageError;
use crate::i18n::language::Language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// Storage key and cookie name for the preferred language.
pub const PREFERENCE_KEY: &str = "preferred-language";

/// Cookie lifetime: one year.
pub const COOKIE_MAX_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Cookie mirroring the durable preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceCookie {
    /// Cookie name
    pub name: String,
    /// Cookie value (a language code)
    pub value: String,
    /// Cookie path
    pub path: String,
    /// Cookie lifetime
    pub max_age: Duration,
}

impl PreferenceCookie {
    /// Cookie carrying a language preference.
    pub fn for_language(language: Language) -> Self {
        Self {
            name: PREFERENCE_KEY.to_string(),
            value: language.code().to_string(),
            path: "/".to_string(),
            max_age: COOKIE_MAX_AGE,
        }
    }

    /// `Set-Cookie`-style rendering, e.g. `preferred-language=tr; path=/; max-age=31536000`.
    pub fn header_value(&self) -> String {
        format!(
            "{}={}; path={}; max-age={}",
            self.name,
            self.value,
            self.path,
            self.max_age.as_secs()
        )
    }
}

/// Read the preferred language from a `Cookie` request header.
///
/// Lets a server-side renderer agree with the client's stored choice.
/// Unknown or malformed values yield `None`.
pub fn language_from_cookie_header(header: &str) -> Option<Language> {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| name.trim() == PREFERENCE_KEY)
        .and_then(|(_, value)| Language::from_code(value.trim()).ok())
}

/// Backend holding the durable preference and its cookie.
///
/// Reading is the only asynchronous step: it happens once, while a
/// controller initializes. Writes are synchronous.
pub trait PreferenceStorage {
    /// Read the stored preference, if any. The value is not validated.
    fn load_preference(&self) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store the preference.
    fn save_preference(&self, value: &str) -> Result<(), StorageError>;

    /// Store the mirroring cookie.
    fn set_cookie(&self, cookie: &PreferenceCookie) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
struct MemoryState {
    preference: Option<String>,
    cookies: BTreeMap<String, String>,
    writes: usize,
    fail_reads: bool,
    fail_writes: bool,
}

/// In-process storage shared between clones.
///
/// Two controllers built on clones of the same `MemoryStorage` see the same
/// preference, which models a page reload against the same browser storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with a raw preference value.
    pub fn with_preference(value: &str) -> Self {
        let storage = Self::new();
        storage.lock().preference = Some(value.to_string());
        storage
    }

    /// Make subsequent reads fail.
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Make subsequent writes fail.
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Currently stored preference.
    pub fn preference(&self) -> Option<String> {
        self.lock().preference.clone()
    }

    /// Stored cookie header value by name.
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.lock().cookies.get(name).cloned()
    }

    /// Number of successful preference writes.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PreferenceStorage for MemoryStorage {
    fn load_preference(&self) -> impl Future<Output = Result<Option<String>, StorageError>> + Send {
        let result = {
            let state = self.lock();
            if state.fail_reads {
                Err(StorageError::Unavailable("reads disabled".to_string()))
            } else {
                Ok(state.preference.clone())
            }
        };
        async move { result }
    }

    fn save_preference(&self, value: &str) -> Result<(), StorageError> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }
        state.preference = Some(value.to_string());
        state.writes += 1;
        Ok(())
    }

    fn set_cookie(&self, cookie: &PreferenceCookie) -> Result<(), StorageError> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }
        state
            .cookies
            .insert(cookie.name.clone(), cookie.header_value());
        Ok(())
    }
}

/// On-disk layout of [`FileStorage`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferenceDocument {
    #[serde(rename = "preferred-language", skip_serializing_if = "Option::is_none")]
    preferred_language: Option<String>,
    #[serde(default)]
    cookies: BTreeMap<String, String>,
}

/// Preference storage backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage at `path`; the file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored cookie header value by name.
    pub fn cookie(&self, name: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_document()?.cookies.get(name).cloned())
    }

    fn read_document(&self) -> Result<PreferenceDocument, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PreferenceDocument::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn update_document(
        &self,
        update: impl FnOnce(&mut PreferenceDocument),
    ) -> Result<(), StorageError> {
        // A corrupt file is replaced rather than blocking every later write.
        let mut document = match self.read_document() {
            Err(StorageError::Corrupt(e)) => {
                debug!("Replacing corrupt preference file {}: {}", self.path.display(), e);
                PreferenceDocument::default()
            }
            other => other?,
        };
        update(&mut document);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&document)?)?;
        Ok(())
    }
}

impl PreferenceStorage for FileStorage {
    fn load_preference(&self) -> impl Future<Output = Result<Option<String>, StorageError>> + Send {
        let path = self.path.clone();
        async move {
            let contents = match tokio::fs::read_to_string(&path).await {
                Ok(contents) => contents,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(e.into()),
            };
            let document: PreferenceDocument = serde_json::from_str(&contents)?;
            Ok(document.preferred_language)
        }
    }

    fn save_preference(&self, value: &str) -> Result<(), StorageError> {
        self.update_document(|document| document.preferred_language = Some(value.to_string()))
    }

    fn set_cookie(&self, cookie: &PreferenceCookie) -> Result<(), StorageError> {
        self.update_document(|document| {
            document
                .cookies
                .insert(cookie.name.clone(), cookie.header_value());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Cookie Tests ====================

    #[test]
    fn test_cookie_header_value() {
        let cookie = PreferenceCookie::for_language(Language::TURKISH);
        assert_eq!(
            cookie.header_value(),
            "preferred-language=tr; path=/; max-age=31536000"
        );
    }

    #[test]
    fn test_language_from_cookie_header() {
        assert_eq!(
            language_from_cookie_header("theme=dark; preferred-language=tr"),
            Some(Language::TURKISH)
        );
        assert_eq!(
            language_from_cookie_header("preferred-language=en"),
            Some(Language::ENGLISH)
        );
    }

    #[test]
    fn test_language_from_cookie_header_rejects_unknown() {
        assert_eq!(language_from_cookie_header("preferred-language=fr"), None);
        assert_eq!(language_from_cookie_header("theme=dark"), None);
        assert_eq!(language_from_cookie_header(""), None);
    }

    // ==================== Memory Storage Tests ====================

    #[test]
    fn test_memory_storage_shared_between_clones() {
        let storage = MemoryStorage::new();
        let clone = storage.clone();
        storage.save_preference("tr").unwrap();

        assert_eq!(clone.preference().as_deref(), Some("tr"));
        let loaded = tokio_test::block_on(clone.load_preference()).unwrap();
        assert_eq!(loaded.as_deref(), Some("tr"));
    }

    #[test]
    fn test_memory_storage_failures() {
        let storage = MemoryStorage::with_preference("tr");
        storage.fail_reads(true);
        storage.fail_writes(true);

        assert!(tokio_test::block_on(storage.load_preference()).is_err());
        assert!(storage.save_preference("en").is_err());
        assert!(storage
            .set_cookie(&PreferenceCookie::for_language(Language::ENGLISH))
            .is_err());
        assert_eq!(storage.write_count(), 0);
    }

    // ==================== File Storage Tests ====================

    #[tokio::test]
    async fn test_file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("prefs.json"));
        assert_eq!(storage.load_preference().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("prefs.json"));

        storage.save_preference("tr").unwrap();
        storage
            .set_cookie(&PreferenceCookie::for_language(Language::TURKISH))
            .unwrap();

        let reopened = FileStorage::new(storage.path());
        assert_eq!(
            reopened.load_preference().await.unwrap().as_deref(),
            Some("tr")
        );
        assert_eq!(
            reopened.cookie(PREFERENCE_KEY).unwrap().as_deref(),
            Some("preferred-language=tr; path=/; max-age=31536000")
        );
    }

    #[tokio::test]
    async fn test_file_storage_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();
        let storage = FileStorage::new(&path);

        assert!(matches!(
            storage.load_preference().await,
            Err(StorageError::Corrupt(_))
        ));

        storage.save_preference("en").unwrap();
        assert_eq!(
            storage.load_preference().await.unwrap().as_deref(),
            Some("en")
        );
    }
}

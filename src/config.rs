use crate::i18n::{ControllerOptions, FileStorage, Language, TranslationCatalog};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Default location of the persisted language preference
pub const DEFAULT_PREFERENCE_FILE: &str = ".portfolio-i18n/preferences.json";

#[derive(Debug, Clone)]
pub struct Config {
    // Language selection
    pub default_language: Language,
    pub persist_language: bool,

    // Storage
    pub preference_file: PathBuf,

    // Translation data (embedded when unset)
    pub translations_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            default_language: match std::env::var("DEFAULT_LANGUAGE") {
                Ok(code) => Language::from_code(&code).context("Invalid DEFAULT_LANGUAGE")?,
                Err(_) => Language::default_language(),
            },
            persist_language: match std::env::var("PERSIST_LANGUAGE") {
                Ok(value) => parse_bool(&value)
                    .with_context(|| format!("Invalid PERSIST_LANGUAGE: '{}'", value))?,
                Err(_) => true,
            },
            preference_file: std::env::var("PREFERENCE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_PREFERENCE_FILE)),
            translations_dir: std::env::var("TRANSLATIONS_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    /// Load translations from `translations_dir`, or the embedded data.
    pub fn load_catalog(&self) -> Result<Arc<TranslationCatalog>> {
        let catalog = match &self.translations_dir {
            Some(dir) => TranslationCatalog::from_dir(dir)
                .with_context(|| format!("Failed to load translations from {}", dir.display()))?,
            None => TranslationCatalog::embedded().context("Failed to load embedded translations")?,
        };
        Ok(Arc::new(catalog))
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            initial_language: Some(self.default_language),
            persist_language: self.persist_language,
        }
    }

    pub fn preference_storage(&self) -> FileStorage {
        FileStorage::new(&self.preference_file)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

//! Language type: validated handle onto the registry's closed language set.

use crate::i18n::error::I18nError;
use crate::i18n::registry::{LanguageInfo, LanguageRegistry};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A validated language.
///
/// Only supported, enabled languages can be constructed, so holding a
/// `Language` means the value is always one of the registry's codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "en", "tr")
    code: &'static str,
}

impl Language {
    /// English, the default language.
    pub const ENGLISH: Language = Language { code: "en" };

    /// Turkish.
    pub const TURKISH: Language = Language { code: "tr" };

    /// Create a Language from a language code string.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is valid and the language is enabled
    /// * `Err` if the code is not found or the language is disabled
    pub fn from_code(code: &str) -> Result<Language, I18nError> {
        match LanguageRegistry::get().get_by_code(code) {
            Some(info) if info.enabled => Ok(Language { code: info.code }),
            Some(_) => Err(I18nError::LanguageDisabled(code.to_string())),
            None => Err(I18nError::UnknownLanguage(code.to_string())),
        }
    }

    /// Check whether a code names a supported, enabled language.
    pub fn is_supported(code: &str) -> bool {
        LanguageRegistry::get().is_enabled(code)
    }

    /// Get the default (fallback) language.
    pub fn default_language() -> Language {
        Language {
            code: LanguageRegistry::get().default_language().code,
        }
    }

    /// All enabled languages, in registry order.
    pub fn all() -> Vec<Language> {
        LanguageRegistry::get()
            .list_enabled()
            .into_iter()
            .map(|info| Language { code: info.code })
            .collect()
    }

    /// Get the ISO 639-1 language code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the language's registry metadata.
    pub fn info(&self) -> &'static LanguageInfo {
        let registry = LanguageRegistry::get();
        registry
            .get_by_code(self.code)
            .unwrap_or_else(|| registry.default_language())
    }

    /// Get the English name of the language.
    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// Get the native name of the language.
    pub fn native_name(&self) -> &'static str {
        self.info().native_name
    }

    /// Check if this is the default language.
    pub fn is_default(&self) -> bool {
        self.info().is_default
    }

    /// The language a toggle switches to.
    ///
    /// Cycles through the enabled languages in registry order; over the
    /// two-language set this is simply "the other one".
    pub fn toggled(&self) -> Language {
        let all = Language::all();
        let position = all.iter().position(|lang| lang == self);
        match position {
            Some(index) => all
                .get((index + 1) % all.len())
                .copied()
                .unwrap_or(*self),
            None => Language::default_language(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl FromStr for Language {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s.trim())
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

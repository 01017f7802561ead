//! Language registry: Single source of truth for all supported languages.
//!
//! This module provides a centralized registry of the languages the site can
//! render. It uses a singleton pattern with `OnceLock` to ensure thread-safe
//! initialization and access.

use serde::Serialize;
use std::sync::OnceLock;

/// Metadata for a supported language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    /// ISO 639-1 language code (e.g., "en", "tr")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "Turkish")
    pub name: &'static str,

    /// Native name of the language (e.g., "English", "Türkçe")
    pub native_name: &'static str,

    /// Whether the language is written right-to-left
    #[serde(rename = "isRTL")]
    pub is_rtl: bool,

    /// Whether this is the default/fallback language (only one should be true)
    #[serde(skip)]
    pub is_default: bool,

    /// Whether this language is enabled for use
    #[serde(skip)]
    pub enabled: bool,
}

/// Serialized display form of a language.
///
/// `name` carries the display name (see [`LanguageInfo::display_name`]), not
/// the raw English name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayLanguage {
    /// Language code
    pub code: &'static str,
    /// Display name
    pub name: &'static str,
    /// Native name
    pub native_name: &'static str,
    /// Right-to-left flag, only present on the current-language form
    #[serde(rename = "isRTL", skip_serializing_if = "Option::is_none")]
    pub is_rtl: Option<bool>,
}

/// Code of the one language that displays its native name.
const NATIVE_DISPLAY_CODE: &str = "tr";

impl LanguageInfo {
    /// Name shown to users when language metadata is rendered.
    ///
    /// Turkish is shown by its native name, every other language by its
    /// English name. Existing consumers depend on this asymmetry, so it is
    /// kept as an explicit rule.
    pub fn display_name(&self) -> &'static str {
        if self.code == NATIVE_DISPLAY_CODE {
            self.native_name
        } else {
            self.name
        }
    }

    /// Display form used in the available-languages list (no RTL flag).
    pub fn display(&self) -> DisplayLanguage {
        DisplayLanguage {
            code: self.code,
            name: self.display_name(),
            native_name: self.native_name,
            is_rtl: None,
        }
    }

    /// Display form used for the current language (includes the RTL flag).
    pub fn display_with_direction(&self) -> DisplayLanguage {
        DisplayLanguage {
            is_rtl: Some(self.is_rtl),
            ..self.display()
        }
    }
}

/// English: the default language every lookup falls back to.
pub const ENGLISH_INFO: LanguageInfo = LanguageInfo {
    code: "en",
    name: "English",
    native_name: "English",
    is_rtl: false,
    is_default: true,
    enabled: true,
};

/// Turkish.
pub const TURKISH_INFO: LanguageInfo = LanguageInfo {
    code: "tr",
    name: "Turkish",
    native_name: "Türkçe",
    is_rtl: false,
    is_default: false,
    enabled: true,
};

/// Global language registry singleton.
///
/// Initialized once on first access and immutable thereafter.
#[derive(Debug)]
pub struct LanguageRegistry {
    languages: Vec<LanguageInfo>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language's metadata by its code.
    ///
    /// # Returns
    /// * `Some(&LanguageInfo)` if the language exists
    /// * `None` if the language is not found
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageInfo> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get all enabled languages, in registry order.
    pub fn list_enabled(&self) -> Vec<&LanguageInfo> {
        self.languages.iter().filter(|lang| lang.enabled).collect()
    }

    /// Get all languages (including disabled ones).
    pub fn list_all(&self) -> Vec<&LanguageInfo> {
        self.languages.iter().collect()
    }

    /// Get the default (fallback) language's metadata.
    ///
    /// If the registry has no entry flagged as default, English is used.
    pub fn default_language(&self) -> &LanguageInfo {
        self.languages
            .iter()
            .find(|lang| lang.is_default && lang.enabled)
            .unwrap_or(&ENGLISH_INFO)
    }

    /// Check if a language code is supported and enabled.
    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|lang| lang.enabled)
            .unwrap_or(false)
    }
}

/// Initial set of supported languages: English (default) and Turkish.
fn default_languages() -> Vec<LanguageInfo> {
    vec![ENGLISH_INFO, TURKISH_INFO]
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Registry Tests ====================

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LanguageRegistry::get();
        let registry2 = LanguageRegistry::get();

        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_get_by_code_english() {
        let config = LanguageRegistry::get().get_by_code("en").unwrap();
        assert_eq!(config.code, "en");
        assert_eq!(config.name, "English");
        assert_eq!(config.native_name, "English");
        assert!(config.is_default);
        assert!(config.enabled);
        assert!(!config.is_rtl);
    }

    #[test]
    fn test_get_by_code_turkish() {
        let config = LanguageRegistry::get().get_by_code("tr").unwrap();
        assert_eq!(config.code, "tr");
        assert_eq!(config.name, "Turkish");
        assert_eq!(config.native_name, "Türkçe");
        assert!(!config.is_default);
        assert!(config.enabled);
    }

    #[test]
    fn test_get_by_code_nonexistent() {
        assert!(LanguageRegistry::get().get_by_code("fr").is_none());
    }

    #[test]
    fn test_list_enabled_order() {
        let codes: Vec<_> = LanguageRegistry::get()
            .list_enabled()
            .iter()
            .map(|lang| lang.code)
            .collect();
        assert_eq!(codes, vec!["en", "tr"]);
    }

    #[test]
    fn test_list_all_contains_both() {
        assert_eq!(LanguageRegistry::get().list_all().len(), 2);
    }

    #[test]
    fn test_default_language_is_english() {
        assert_eq!(LanguageRegistry::get().default_language().code, "en");
    }

    #[test]
    fn test_is_enabled() {
        let registry = LanguageRegistry::get();
        assert!(registry.is_enabled("en"));
        assert!(registry.is_enabled("tr"));
        assert!(!registry.is_enabled("fr"));
        assert!(!registry.is_enabled(""));
    }

    // ==================== Display Name Tests ====================

    #[test]
    fn test_display_name_turkish_uses_native() {
        assert_eq!(TURKISH_INFO.display_name(), "Türkçe");
    }

    #[test]
    fn test_display_name_english_uses_english() {
        assert_eq!(ENGLISH_INFO.display_name(), "English");
    }

    #[test]
    fn test_display_json_omits_rtl() {
        let json = serde_json::to_value(TURKISH_INFO.display()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"code": "tr", "name": "Türkçe", "nativeName": "Türkçe"})
        );
    }

    #[test]
    fn test_display_with_direction_includes_rtl() {
        let json = serde_json::to_value(ENGLISH_INFO.display_with_direction()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "code": "en",
                "name": "English",
                "nativeName": "English",
                "isRTL": false
            })
        );
    }

    #[test]
    fn test_language_info_serializes_raw_name() {
        let json = serde_json::to_value(&TURKISH_INFO).unwrap();
        assert_eq!(json["name"], "Turkish");
        assert_eq!(json["isRTL"], false);
        assert!(json.get("isDefault").is_none());
    }
}

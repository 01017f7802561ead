//! Small text helpers layered on top of resolved translations.

use crate::i18n::language::Language;
use crate::i18n::resolver::Translator;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Key holding the suffix appended to plural nouns
pub const PLURAL_SUFFIX_KEY: &str = "common.pluralSuffix";

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

/// Replace `{{name}}` placeholders with values from `variables`.
///
/// Placeholders without a matching variable, or whose value is empty, are
/// left as they are.
///
/// # Example
/// ```
/// use std::collections::HashMap;
/// use portfolio_i18n::i18n::interpolate;
///
/// let vars = HashMap::from([("name", "World".to_string())]);
/// assert_eq!(interpolate("Hello {{name}}", &vars), "Hello World");
/// ```
pub fn interpolate(template: &str, variables: &HashMap<&str, String>) -> String {
    let regex = PLACEHOLDER_REGEX.get_or_init(|| {
        Regex::new(r"\{\{(\w+)\}\}").expect("placeholder pattern is valid")
    });

    regex
        .replace_all(template, |caps: &regex::Captures<'_>| {
            match variables.get(&caps[1]) {
                Some(value) if !value.is_empty() => value.clone(),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Pick the singular or plural form of a word.
///
/// An explicit `plural` wins. Otherwise English appends `s` and Turkish
/// keeps the singular, since it does not inflect nouns after numerals.
pub fn pluralize(count: u64, singular: &str, plural: Option<&str>, language: Language) -> String {
    if count == 1 {
        return singular.to_string();
    }
    if let Some(plural) = plural {
        return plural.to_string();
    }
    if language == Language::ENGLISH {
        format!("{}s", singular)
    } else {
        singular.to_string()
    }
}

/// Render `"<count> <word>"` for a translated noun.
///
/// Turkish never takes a suffix; other languages append the translated
/// [`PLURAL_SUFFIX_KEY`] when `count != 1`.
pub fn format_with_count(translator: &Translator, key: &str, count: u64) -> String {
    let word = translator.translate(key);
    if translator.language() == Language::TURKISH || count == 1 {
        return format!("{} {}", count, word);
    }
    let suffix = translator.translate(PLURAL_SUFFIX_KEY);
    format!("{} {}{}", count, word, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::store::{TranslationCatalog, TranslationStore};
    use serde_json::json;
    use std::sync::Arc;

    fn catalog() -> Arc<TranslationCatalog> {
        let en = TranslationStore::load(
            Language::ENGLISH,
            json!({"common": {"year": "year", "pluralSuffix": "s"}}),
        )
        .unwrap();
        let tr = TranslationStore::load(
            Language::TURKISH,
            json!({"common": {"year": "yıl", "pluralSuffix": ""}}),
        )
        .unwrap();
        Arc::new(TranslationCatalog::from_stores([en, tr]))
    }

    // ==================== Interpolation Tests ====================

    #[test]
    fn test_interpolate_replaces_known() {
        let vars = HashMap::from([("count", "3".to_string()), ("name", "Ada".to_string())]);
        assert_eq!(
            interpolate("{{name}} has {{count}} projects", &vars),
            "Ada has 3 projects"
        );
    }

    #[test]
    fn test_interpolate_keeps_unknown() {
        let vars = HashMap::new();
        assert_eq!(interpolate("Hi {{who}}", &vars), "Hi {{who}}");
    }

    #[test]
    fn test_interpolate_keeps_placeholder_for_empty_value() {
        let vars = HashMap::from([("who", String::new()), ("n", "2".to_string())]);
        assert_eq!(interpolate("Hi {{who}} x{{n}}", &vars), "Hi {{who}} x2");
    }

    #[test]
    fn test_interpolate_without_placeholders() {
        let vars = HashMap::from([("x", "1".to_string())]);
        assert_eq!(interpolate("plain", &vars), "plain");
    }

    // ==================== Pluralization Tests ====================

    #[test]
    fn test_pluralize_singular() {
        assert_eq!(pluralize(1, "project", None, Language::ENGLISH), "project");
    }

    #[test]
    fn test_pluralize_english_default_suffix() {
        assert_eq!(pluralize(2, "project", None, Language::ENGLISH), "projects");
        assert_eq!(pluralize(0, "project", None, Language::ENGLISH), "projects");
    }

    #[test]
    fn test_pluralize_explicit_plural() {
        assert_eq!(
            pluralize(3, "activity", Some("activities"), Language::ENGLISH),
            "activities"
        );
    }

    #[test]
    fn test_pluralize_turkish_keeps_singular() {
        assert_eq!(pluralize(5, "proje", None, Language::TURKISH), "proje");
    }

    // ==================== Count Formatting Tests ====================

    #[test]
    fn test_format_with_count_english() {
        let t = Translator::new(catalog(), Language::ENGLISH);
        assert_eq!(format_with_count(&t, "common.year", 1), "1 year");
        assert_eq!(format_with_count(&t, "common.year", 4), "4 years");
    }

    #[test]
    fn test_format_with_count_turkish() {
        let t = Translator::new(catalog(), Language::TURKISH);
        assert_eq!(format_with_count(&t, "common.year", 4), "4 yıl");
        assert!(!t.has_errors());
    }
}

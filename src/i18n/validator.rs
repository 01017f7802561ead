//! Translation completeness validation.
//!
//! Compares a comparison language's tree against a reference language's tree
//! and reports keys that are missing, extra, empty or shaped differently.
//! Used by tests and the `portfolio-i18n` lint binary, never on the lookup path.

use crate::i18n::language::Language;
use crate::i18n::resolver::ResolutionError;
use crate::i18n::store::{KeyPath, TranslationCatalog, TranslationNode, TranslationStore};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// A key whose value has a different shape in the compared language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeMismatch {
    /// Key-path
    pub key: String,
    /// Kind in the reference language
    pub expected: &'static str,
    /// Kind in the compared language
    pub actual: &'static str,
}

/// A list value with a different number of items in the compared language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LengthMismatch {
    /// Key-path
    pub key: String,
    /// Item count in the reference language
    pub expected: usize,
    /// Item count in the compared language
    pub actual: usize,
}

/// Key counts for a comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    /// Leaf keys in the reference language
    pub total_keys: usize,
    /// Keys present, non-empty and of the same kind
    pub valid_keys: usize,
    /// Keys absent from the compared language
    pub missing_keys: usize,
    /// Keys present but blank in the compared language
    pub empty_values: usize,
}

/// Outcome of comparing two translation stores.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    /// Reference language
    pub reference: Language,

    /// Compared language
    pub compared: Language,

    /// No missing keys, no extra keys and no type mismatches
    pub is_valid: bool,

    /// Reference keys the compared language lacks
    pub missing_keys: Vec<String>,

    /// Compared keys the reference language never defined
    pub extra_keys: Vec<String>,

    /// Keys whose compared value is blank (warning only)
    pub empty_values: Vec<String>,

    /// Keys with a different value kind (structural error)
    pub type_mismatches: Vec<TypeMismatch>,

    /// Lists with a different item count (warning only)
    pub length_mismatches: Vec<LengthMismatch>,

    /// Resolution errors synthesized for the missing keys
    pub errors: Vec<ResolutionError>,

    /// Key counts
    pub summary: ValidationSummary,
}

impl ValidationResult {
    /// Whether any warning-level issue was found.
    pub fn has_warnings(&self) -> bool {
        !self.empty_values.is_empty() || !self.length_mismatches.is_empty()
    }

    /// Human-readable error lines.
    pub fn error_messages(&self) -> Vec<String> {
        let mut messages: Vec<String> = self
            .missing_keys
            .iter()
            .map(|key| format!("Missing translation key: {}", key))
            .collect();
        messages.extend(
            self.extra_keys
                .iter()
                .map(|key| format!("Extra translation key not in {}: {}", self.reference, key)),
        );
        messages.extend(self.type_mismatches.iter().map(|m| {
            format!(
                "Type mismatch for key: {}. Expected {}, got {}",
                m.key, m.expected, m.actual
            )
        }));
        messages
    }

    /// Human-readable warning lines.
    pub fn warning_messages(&self) -> Vec<String> {
        let mut messages: Vec<String> = self
            .empty_values
            .iter()
            .map(|key| format!("Empty translation value for key: {}", key))
            .collect();
        messages.extend(self.length_mismatches.iter().map(|m| {
            format!(
                "List length mismatch for key: {}. Expected {} items, got {}",
                m.key, m.expected, m.actual
            )
        }));
        messages
    }
}

/// Coverage figures for one language against the default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TranslationStats {
    /// Leaf keys defined by the language
    pub total_keys: usize,
    /// Default-language keys it lacks
    pub missing_keys: usize,
    /// Keys the default language does not define
    pub extra_keys: usize,
    /// Share of its keys that are not missing, as a percentage (0-100)
    pub completeness: f64,
    /// Whether the comparison was valid
    pub is_complete: bool,
}

/// Validator for translation completeness.
pub struct CompletenessValidator;

impl CompletenessValidator {
    /// Compare `comparison` against `reference`.
    ///
    /// Every reference leaf is looked up in the comparison store: absent keys
    /// are missing, blank strings are empty-value warnings, different kinds
    /// are type mismatches, and lists of different length are warnings.
    /// Comparison leaves unknown to the reference are extra keys.
    pub fn validate(reference: &TranslationStore, comparison: &TranslationStore) -> ValidationResult {
        let reference_leaves = reference.leaves();
        let mut missing_keys = Vec::new();
        let mut empty_values = Vec::new();
        let mut type_mismatches = Vec::new();
        let mut length_mismatches = Vec::new();
        let mut errors = Vec::new();
        let mut valid_keys = 0;

        for (path, expected) in &reference_leaves {
            let actual = KeyPath::parse(path).and_then(|key| comparison.node_at(&key));

            match actual {
                None => {
                    missing_keys.push(path.clone());
                    errors.push(ResolutionError::new(
                        path.as_str(),
                        comparison.language(),
                        expected.as_text().unwrap_or_default(),
                    ));
                }
                Some(actual) if actual.kind() != expected.kind() => {
                    type_mismatches.push(TypeMismatch {
                        key: path.clone(),
                        expected: expected.kind(),
                        actual: actual.kind(),
                    });
                }
                Some(TranslationNode::Text(text)) if text.trim().is_empty() => {
                    empty_values.push(path.clone());
                }
                Some(TranslationNode::List(actual)) => {
                    if let Some(expected) = expected.as_list() {
                        if expected.len() != actual.len() {
                            length_mismatches.push(LengthMismatch {
                                key: path.clone(),
                                expected: expected.len(),
                                actual: actual.len(),
                            });
                        }
                    }
                    valid_keys += 1;
                }
                Some(_) => valid_keys += 1,
            }
        }

        let known: BTreeSet<&str> = reference_leaves.iter().map(|(path, _)| path.as_str()).collect();
        let extra_keys: Vec<String> = comparison
            .leaf_paths()
            .into_iter()
            .filter(|path| !known.contains(path.as_str()))
            .collect();

        let is_valid =
            missing_keys.is_empty() && extra_keys.is_empty() && type_mismatches.is_empty();

        debug!(
            "Validated '{}' against '{}': {} missing, {} extra, {} mismatched",
            comparison.language(),
            reference.language(),
            missing_keys.len(),
            extra_keys.len(),
            type_mismatches.len()
        );

        ValidationResult {
            reference: reference.language(),
            compared: comparison.language(),
            is_valid,
            summary: ValidationSummary {
                total_keys: reference_leaves.len(),
                valid_keys,
                missing_keys: missing_keys.len(),
                empty_values: empty_values.len(),
            },
            missing_keys,
            extra_keys,
            empty_values,
            type_mismatches,
            length_mismatches,
            errors,
        }
    }

    /// Validate every non-default language in a catalog against the default.
    pub fn validate_catalog(catalog: &TranslationCatalog) -> Vec<ValidationResult> {
        let default_language = catalog.default_language();
        let Some(reference) = catalog.store(default_language) else {
            debug!("Catalog has no store for default language '{}'", default_language);
            return Vec::new();
        };

        catalog
            .languages()
            .into_iter()
            .filter(|language| *language != default_language)
            .filter_map(|language| catalog.store(language))
            .map(|store| Self::validate(reference, store))
            .collect()
    }

    /// Coverage of one language relative to the catalog's default.
    ///
    /// Returns `None` if either store is not loaded.
    pub fn stats(catalog: &TranslationCatalog, language: Language) -> Option<TranslationStats> {
        let reference = catalog.store(catalog.default_language())?;
        let store = catalog.store(language)?;
        let result = Self::validate(reference, store);
        let total_keys = store.leaf_paths().len();
        let completeness = if total_keys > 0 {
            (total_keys.saturating_sub(result.missing_keys.len()) as f64 / total_keys as f64)
                * 100.0
        } else {
            0.0
        };

        Some(TranslationStats {
            total_keys,
            missing_keys: result.missing_keys.len(),
            extra_keys: result.extra_keys.len(),
            completeness,
            is_complete: result.is_valid,
        })
    }

    /// Keys defined by `store` that `used_keys` never mentions.
    pub fn find_unused_keys(store: &TranslationStore, used_keys: &[&str]) -> Vec<String> {
        let used: BTreeSet<&str> = used_keys.iter().copied().collect();
        store
            .leaf_paths()
            .into_iter()
            .filter(|key| !used.contains(key.as_str()))
            .collect()
    }

    /// Markdown report covering every language in the catalog.
    pub fn generate_report(catalog: &TranslationCatalog) -> String {
        let results = Self::validate_catalog(catalog);

        let total_keys = results.first().map(|r| r.summary.total_keys).unwrap_or_else(|| {
            catalog
                .store(catalog.default_language())
                .map(|store| store.leaf_paths().len())
                .unwrap_or(0)
        });
        let valid_keys: usize = results.iter().map(|r| r.summary.valid_keys).sum();
        let missing_keys: usize = results.iter().map(|r| r.summary.missing_keys).sum();
        let empty_values: usize = results.iter().map(|r| r.summary.empty_values).sum();
        let is_valid = results.iter().all(|r| r.is_valid);

        let mut report = String::from("# Translation Validation Report\n\n");
        report.push_str("## Summary\n");
        report.push_str(&format!("- Total Keys: {}\n", total_keys));
        report.push_str(&format!("- Valid Keys: {}\n", valid_keys));
        report.push_str(&format!("- Missing Keys: {}\n", missing_keys));
        report.push_str(&format!("- Empty Values: {}\n", empty_values));
        report.push_str(&format!("- Overall Status: {}\n\n", status(is_valid)));

        let errors: Vec<(Language, String)> = results
            .iter()
            .flat_map(|r| r.error_messages().into_iter().map(|m| (r.compared, m)))
            .collect();
        push_section(&mut report, "Errors", &errors);

        let warnings: Vec<(Language, String)> = results
            .iter()
            .flat_map(|r| r.warning_messages().into_iter().map(|m| (r.compared, m)))
            .collect();
        push_section(&mut report, "Warnings", &warnings);

        for result in &results {
            report.push_str(&format!(
                "## {} Language Report\n",
                result.compared.code().to_uppercase()
            ));
            report.push_str(&format!(
                "- Valid Keys: {}/{}\n",
                result.summary.valid_keys, result.summary.total_keys
            ));
            report.push_str(&format!("- Missing Keys: {}\n", result.summary.missing_keys));
            report.push_str(&format!("- Empty Values: {}\n", result.summary.empty_values));
            report.push_str(&format!("- Status: {}\n\n", status(result.is_valid)));
        }

        report
    }
}

/// Append a titled list of per-language messages; nothing when empty.
fn push_section(report: &mut String, title: &str, messages: &[(Language, String)]) {
    if messages.is_empty() {
        return;
    }
    report.push_str(&format!("## {} ({})\n\n", title, messages.len()));
    for (language, message) in messages {
        report.push_str(&format!("- **{}**: {}\n", language, message));
    }
    report.push('\n');
}

fn status(valid: bool) -> &'static str {
    if valid {
        "✅ Valid"
    } else {
        "❌ Invalid"
    }
}

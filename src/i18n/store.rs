//! Translation stores: immutable per-language string trees.
//!
//! A store is built once from JSON source data and only read afterwards.
//! Keys are addressed with dotted key-paths such as `content.contact.email`.

use crate::i18n::error::I18nError;
use crate::i18n::language::Language;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Bundled English translations
const EMBEDDED_EN: &str = include_str!("../../data/translations/en.json");

/// Bundled Turkish translations
const EMBEDDED_TR: &str = include_str!("../../data/translations/tr.json");

/// A dot-delimited address into a translation tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    raw: String,
    segments: Vec<String>,
}

impl KeyPath {
    /// Parse a dotted key.
    ///
    /// Returns `None` for unusable keys: empty or whitespace-only input, or
    /// any empty segment (`"a..b"`, `".a"`, `"a."`).
    pub fn parse(raw: &str) -> Option<KeyPath> {
        if raw.trim().is_empty() {
            return None;
        }
        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return None;
        }
        Some(KeyPath {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The key exactly as given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Path segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// One node of a translation tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationNode {
    /// Leaf string
    Text(String),
    /// Leaf list of strings (e.g. project feature bullets)
    List(Vec<String>),
    /// Nested mapping
    Map(BTreeMap<String, TranslationNode>),
    /// Any other JSON value; kept so shape checks can see it, never resolved
    Opaque(Value),
}

impl TranslationNode {
    /// Convert a JSON value into a node, recursively.
    pub fn from_value(value: Value) -> TranslationNode {
        match value {
            Value::String(text) => TranslationNode::Text(text),
            Value::Object(map) => TranslationNode::Map(
                map.into_iter()
                    .map(|(key, child)| (key, TranslationNode::from_value(child)))
                    .collect(),
            ),
            Value::Array(items) if items.iter().all(Value::is_string) => TranslationNode::List(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(text) => Some(text),
                        _ => None,
                    })
                    .collect(),
            ),
            other => TranslationNode::Opaque(other),
        }
    }

    /// Leaf string, if this node is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TranslationNode::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Leaf list, if this node is one.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            TranslationNode::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the node's kind, used in validation messages.
    ///
    /// Opaque nodes report their JSON type, so a number and a boolean are
    /// different kinds.
    pub fn kind(&self) -> &'static str {
        match self {
            TranslationNode::Text(_) => "string",
            TranslationNode::List(_) => "list",
            TranslationNode::Map(_) => "mapping",
            TranslationNode::Opaque(value) => match value {
                Value::Null => "null",
                Value::Bool(_) => "boolean",
                Value::Number(_) => "number",
                Value::Array(_) => "mixed list",
                Value::String(_) => "string",
                Value::Object(_) => "mapping",
            },
        }
    }
}

/// The complete string tree for one language.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationStore {
    language: Language,
    root: BTreeMap<String, TranslationNode>,
}

impl TranslationStore {
    /// Bind a language to a fully-formed tree.
    ///
    /// Fails when the root is not a JSON object, or when some key could never
    /// be reached by a key-path (blank, or containing `.`).
    pub fn load(language: Language, source: Value) -> Result<Self, I18nError> {
        let root = match TranslationNode::from_value(source) {
            TranslationNode::Map(root) => root,
            other => {
                return Err(I18nError::MalformedSource {
                    language: language.code().to_string(),
                    reason: format!("root must be a mapping, found {}", other.kind()),
                })
            }
        };

        if let Some(reason) = find_unaddressable_key(&root, "") {
            return Err(I18nError::MalformedSource {
                language: language.code().to_string(),
                reason,
            });
        }

        let store = Self { language, root };
        debug!(
            "Loaded {} translation keys for '{}'",
            store.leaf_paths().len(),
            language
        );
        Ok(store)
    }

    /// Parse JSON text and load it.
    pub fn from_json_str(language: Language, source: &str) -> Result<Self, I18nError> {
        let value = serde_json::from_str(source).map_err(|source| I18nError::Parse {
            language: language.code().to_string(),
            source,
        })?;
        Self::load(language, value)
    }

    /// Language this store belongs to.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Top-level entries of the tree.
    pub fn root(&self) -> &BTreeMap<String, TranslationNode> {
        &self.root
    }

    /// Walk a key-path.
    ///
    /// Returns the node at the end of the path (string, list or nested
    /// mapping), or `None` if any segment is missing, the walk hits a
    /// non-mapping before the last segment, or the final node is opaque.
    pub fn lookup(&self, path: &KeyPath) -> Option<&TranslationNode> {
        match self.node_at(path) {
            Some(TranslationNode::Opaque(_)) | None => None,
            Some(node) => Some(node),
        }
    }

    /// Walk a key-path without filtering opaque leaves.
    pub(crate) fn node_at(&self, path: &KeyPath) -> Option<&TranslationNode> {
        let (last, parents) = path.segments().split_last()?;

        let mut current = &self.root;
        for segment in parents {
            match current.get(segment) {
                Some(TranslationNode::Map(children)) => current = children,
                _ => return None,
            }
        }
        current.get(last)
    }

    /// Look up a dotted key given as a string.
    pub fn get(&self, key: &str) -> Option<&TranslationNode> {
        KeyPath::parse(key).and_then(|path| self.lookup(&path))
    }

    /// Look up a dotted key that should end in a string.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(TranslationNode::as_text)
    }

    /// Whether the key resolves to a string in this store.
    pub fn has_key(&self, key: &str) -> bool {
        self.get_text(key).is_some()
    }

    /// Every key-path that ends at a non-mapping value, sorted.
    ///
    /// Intermediate mapping nodes are not listed themselves.
    pub fn leaf_paths(&self) -> Vec<String> {
        self.leaves().into_iter().map(|(path, _)| path).collect()
    }

    /// Every non-mapping node with its key-path, sorted by path.
    pub(crate) fn leaves(&self) -> Vec<(String, &TranslationNode)> {
        let mut leaves = Vec::new();
        collect_leaves(&self.root, "", &mut leaves);
        leaves
    }
}

/// First key in the tree that no key-path can address, described for errors.
fn find_unaddressable_key(map: &BTreeMap<String, TranslationNode>, prefix: &str) -> Option<String> {
    for (key, node) in map {
        if key.trim().is_empty() || key.contains('.') {
            let location = if prefix.is_empty() { "root" } else { prefix };
            return Some(format!(
                "key '{}' under {} cannot be addressed by a key-path",
                key, location
            ));
        }
        if let TranslationNode::Map(children) = node {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            if let Some(reason) = find_unaddressable_key(children, &path) {
                return Some(reason);
            }
        }
    }
    None
}

/// Depth-first walk recording every non-mapping node and its path.
fn collect_leaves<'a>(
    map: &'a BTreeMap<String, TranslationNode>,
    prefix: &str,
    out: &mut Vec<(String, &'a TranslationNode)>,
) {
    for (key, node) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match node {
            TranslationNode::Map(children) => collect_leaves(children, &path, out),
            _ => out.push((path, node)),
        }
    }
}

/// One loaded store per supported language.
#[derive(Debug, Clone)]
pub struct TranslationCatalog {
    stores: BTreeMap<Language, TranslationStore>,
    default_language: Language,
}

impl TranslationCatalog {
    /// Build a catalog from already-loaded stores.
    ///
    /// A later store for the same language replaces an earlier one.
    pub fn from_stores(stores: impl IntoIterator<Item = TranslationStore>) -> Self {
        Self {
            stores: stores
                .into_iter()
                .map(|store| (store.language(), store))
                .collect(),
            default_language: Language::default_language(),
        }
    }

    /// Load the translations bundled into the binary.
    pub fn embedded() -> Result<Self, I18nError> {
        let english = TranslationStore::from_json_str(Language::ENGLISH, EMBEDDED_EN)?;
        let turkish = TranslationStore::from_json_str(Language::TURKISH, EMBEDDED_TR)?;
        Ok(Self::from_stores([english, turkish]))
    }

    /// Load `<code>.json` for every enabled language from a directory.
    ///
    /// Any missing or malformed file fails the whole load.
    pub fn from_dir(dir: &Path) -> Result<Self, I18nError> {
        let mut stores = Vec::new();
        for language in Language::all() {
            let path = dir.join(format!("{}.json", language.code()));
            let source = std::fs::read_to_string(&path).map_err(|source| I18nError::Io {
                path: path.display().to_string(),
                source,
            })?;
            stores.push(TranslationStore::from_json_str(language, &source)?);
        }
        info!(
            "Loaded translations for {} languages from {}",
            stores.len(),
            dir.display()
        );
        Ok(Self::from_stores(stores))
    }

    /// Store for a language, if it was loaded.
    pub fn store(&self, language: Language) -> Option<&TranslationStore> {
        self.stores.get(&language)
    }

    /// Languages with a loaded store.
    pub fn languages(&self) -> Vec<Language> {
        self.stores.keys().copied().collect()
    }

    /// Language used when the active one lacks a key.
    pub fn default_language(&self) -> Language {
        self.default_language
    }
}

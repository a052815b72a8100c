//! # Configuration Tree Model
//!
//! Accessors over the parsed YAML manifests. A configuration tree is a
//! mapping with optional top-level `extensions`, `skins`, `packages`, and
//! `repositories` sections, each an ordered sequence.
//!
//! The `extensions` and `skins` sections use a "list of singleton maps"
//! shape (each list entry is a one-key mapping from item name to its
//! attributes). [`flatten_items`] collapses that shape into a single
//! name-to-attributes map; when a name repeats across entries, the later
//! entry wins, matching the flattening order of the source sequence.
//!
//! Missing sections and missing attribute fields degrade to empty defaults.
//! Nothing here mutates its input.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use serde_yaml::Value;

use crate::diff::format_value;

/// The attribute name listing post-install actions for an item.
pub const ADDITIONAL_STEPS: &str = "additional steps";

/// The step marking an extension as needing a composer package install.
pub const COMPOSER_UPDATE_STEP: &str = "composer update";

/// A composer package entry from Taqasta's `packages` section.
///
/// Entries without a `name` are ignored by the comparison. The version may
/// be any YAML scalar (quoted strings and bare floats both occur in the
/// wild); [`PackageEntry::version_label`] renders it, defaulting to `dev`.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<Value>,
}

impl PackageEntry {
    /// The display form of the package version, defaulting to `dev`.
    pub fn version_label(&self) -> String {
        match &self.version {
            Some(v) if !v.is_null() => format_value(v),
            _ => "dev".to_string(),
        }
    }
}

/// A repository entry from Taqasta's `repositories` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryEntry {
    #[serde(default)]
    pub url: Option<String>,
}

/// A top-level section of the tree as a sequence, empty when absent or not
/// a sequence.
pub fn section<'a>(tree: &'a Value, key: &str) -> &'a [Value] {
    tree.get(key)
        .and_then(Value::as_sequence)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Flatten a sequence of single-key mappings into one name-to-attributes
/// map. Later entries overwrite earlier ones; entries that are not mappings
/// and keys that are not strings are skipped.
pub fn flatten_items(entries: &[Value]) -> BTreeMap<String, Value> {
    let mut items = BTreeMap::new();
    for entry in entries {
        let Some(mapping) = entry.as_mapping() else {
            continue;
        };
        for (name, attrs) in mapping {
            if let Some(name) = name.as_str() {
                items.insert(name.to_string(), attrs.clone());
            }
        }
    }
    items
}

/// A named attribute of an item, when present.
pub fn attr<'a>(attrs: &'a Value, field: &str) -> Option<&'a Value> {
    attrs.get(field)
}

/// A named string attribute of an item, when present and a string.
pub fn attr_str<'a>(attrs: &'a Value, field: &str) -> Option<&'a str> {
    attrs.get(field).and_then(Value::as_str)
}

/// The item's `additional steps` as a set. Order in the source sequence is
/// irrelevant; non-string entries are skipped.
pub fn additional_steps(attrs: &Value) -> BTreeSet<String> {
    attrs
        .get(ADDITIONAL_STEPS)
        .and_then(Value::as_sequence)
        .map(|steps| {
            steps
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// The parsed package entries of the tree's `packages` section. Entries
/// that do not deserialize as package mappings are skipped.
pub fn packages(tree: &Value) -> Vec<PackageEntry> {
    section(tree, "packages")
        .iter()
        .filter_map(|entry| serde_yaml::from_value(entry.clone()).ok())
        .collect()
}

/// The explicit repository URLs of the tree's `repositories` section.
pub fn repository_urls(tree: &Value) -> BTreeSet<String> {
    section(tree, "repositories")
        .iter()
        .filter_map(|entry| serde_yaml::from_value::<RepositoryEntry>(entry.clone()).ok())
        .filter_map(|entry| entry.url)
        .collect()
}

/// The repository URLs referenced by `repository` attributes of the tree's
/// extensions and skins.
pub fn referenced_repository_urls(tree: &Value) -> BTreeSet<String> {
    let mut urls = BTreeSet::new();
    for section_name in ["extensions", "skins"] {
        for attrs in flatten_items(section(tree, section_name)).values() {
            if let Some(url) = attr_str(attrs, "repository") {
                urls.insert(url.to_string());
            }
        }
    }
    urls
}

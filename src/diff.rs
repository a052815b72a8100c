//! # Structural YAML Diff
//!
//! This module provides a dedicated recursive diff over two `serde_yaml`
//! values. It reports changes as a tagged list of [`Change`] records with
//! structured [`Path`]s instead of round-tripping through address strings.
//!
//! ## Semantics
//!
//! - Mappings are compared key-wise and recursively; keys present on only
//!   one side are reported as added/removed.
//! - Sequences are compared order-insensitively: elements with an exact
//!   match on the other side are paired off first, the remaining elements
//!   are paired positionally (recursing into same-kind composites), and any
//!   leftovers are reported as added/removed element counts.
//! - Scalars of the same type compare by value; differing types are
//!   reported as a type change.
//!
//! The legacy string form of diff paths (`root['field'][1]`) and its
//! cleanup rule are retained as [`clean_diff_path`] for exact-output
//! compatibility testing.

use std::fmt;

use serde_yaml::Value;

/// One segment of a structured diff path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A mapping key.
    Key(String),
    /// A sequence index.
    Index(usize),
}

/// A structured path into a YAML document, as a sequence of mapping-key and
/// sequence-index segments.
///
/// The `Display` form is already clean: `field`, `steps[1]`, `0`,
/// `outer['inner']`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The empty path, addressing the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Extend the path with a mapping key.
    pub fn child_key(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(key.to_string()));
        Self { segments }
    }

    /// Extend the path with a sequence index.
    pub fn child_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self { segments }
    }

    /// The leading mapping key, if the path starts with one.
    pub fn head_key(&self) -> Option<&str> {
        match self.segments.first() {
            Some(Segment::Key(key)) => Some(key),
            _ => None,
        }
    }

    /// True if the path addresses exactly the given top-level field.
    pub fn is_field(&self, name: &str) -> bool {
        matches!(self.segments.as_slice(), [Segment::Key(key)] if key == name)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{key}")?,
                Segment::Key(key) => write!(f, "['{key}']")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// A single difference between two YAML documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// A scalar value changed while keeping its type.
    ValueChanged {
        path: Path,
        old: Value,
        new: Value,
    },
    /// The value at a path changed type.
    TypeChanged {
        path: Path,
        old_type: &'static str,
        new_type: &'static str,
    },
    /// A mapping key exists only on the new side.
    KeyAdded { path: Path },
    /// A mapping key exists only on the old side.
    KeyRemoved { path: Path },
    /// A sequence gained elements with no counterpart on the old side.
    ElementsAdded { path: Path, count: usize },
    /// A sequence lost elements with no counterpart on the new side.
    ElementsRemoved { path: Path, count: usize },
}

/// Human-readable YAML type name, used in type-change reports.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}

/// Render a scalar value for display in the report.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .unwrap_or_default()
            .trim_end()
            .to_string(),
    }
}

/// Compute the structural differences between two YAML values.
///
/// Returns an empty list when the values are structurally identical up to
/// sequence ordering.
pub fn diff_values(old: &Value, new: &Value) -> Vec<Change> {
    let mut changes = Vec::new();
    walk(&Path::root(), old, new, &mut changes);
    changes
}

fn walk(path: &Path, old: &Value, new: &Value, out: &mut Vec<Change>) {
    match (old, new) {
        (Value::Mapping(a), Value::Mapping(b)) => {
            for (k, va) in a {
                let child = path.child_key(&key_string(k));
                match b.get(k) {
                    Some(vb) => walk(&child, va, vb, out),
                    None => out.push(Change::KeyRemoved { path: child }),
                }
            }
            for (k, _) in b {
                if !a.contains_key(k) {
                    out.push(Change::KeyAdded {
                        path: path.child_key(&key_string(k)),
                    });
                }
            }
        }
        (Value::Sequence(a), Value::Sequence(b)) => diff_sequences(path, a, b, out),
        _ => {
            let old_type = type_name(old);
            let new_type = type_name(new);
            if old_type != new_type {
                out.push(Change::TypeChanged {
                    path: path.clone(),
                    old_type,
                    new_type,
                });
            } else if old != new {
                out.push(Change::ValueChanged {
                    path: path.clone(),
                    old: old.clone(),
                    new: new.clone(),
                });
            }
        }
    }
}

/// Order-insensitive sequence comparison.
///
/// Exact multiset matches cancel out; the remaining elements are paired in
/// source order and diffed, and any surplus on either side is reported as an
/// element-count change.
fn diff_sequences(path: &Path, a: &[Value], b: &[Value], out: &mut Vec<Change>) {
    let mut used = vec![false; b.len()];
    let mut leftover_a: Vec<(usize, &Value)> = Vec::new();

    for (i, va) in a.iter().enumerate() {
        let matched = b
            .iter()
            .enumerate()
            .find(|(j, vb)| !used[*j] && *vb == va)
            .map(|(j, _)| j);
        match matched {
            Some(j) => used[j] = true,
            None => leftover_a.push((i, va)),
        }
    }

    let leftover_b: Vec<&Value> = b
        .iter()
        .enumerate()
        .filter(|(j, _)| !used[*j])
        .map(|(_, vb)| vb)
        .collect();

    let paired = leftover_a.len().min(leftover_b.len());
    for k in 0..paired {
        let (index, va) = leftover_a[k];
        walk(&path.child_index(index), va, leftover_b[k], out);
    }

    if leftover_b.len() > paired {
        out.push(Change::ElementsAdded {
            path: path.clone(),
            count: leftover_b.len() - paired,
        });
    }
    if leftover_a.len() > paired {
        out.push(Change::ElementsRemoved {
            path: path.clone(),
            count: leftover_a.len() - paired,
        });
    }
}

fn key_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => format_value(other),
    }
}

/// Clean up a legacy string diff path to be user-friendly.
///
/// Handles the `root`-prefixed bracket/dot addressing syntax:
/// `root['field'][1]` becomes `field[1]`, `root[0]` becomes `0`,
/// `root.field` becomes `field`. Strings without the `root` prefix pass
/// through unchanged.
pub fn clean_diff_path(path: &str) -> String {
    if !path.starts_with("root") {
        return path.to_string();
    }
    if let Some(cleaned) = strip_quoted(path, "root['", "']") {
        return cleaned;
    }
    if let Some(cleaned) = strip_quoted(path, "root[\"", "\"]") {
        return cleaned;
    }
    if let Some(rest) = path.strip_prefix("root[") {
        if let Some(index) = rest.strip_suffix(']') {
            if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
                return index.to_string();
            }
        }
    }
    if let Some(rest) = path.strip_prefix("root.") {
        return rest.to_string();
    }
    path[4..].to_string()
}

fn strip_quoted(path: &str, open: &str, close: &str) -> Option<String> {
    let rest = path.strip_prefix(open)?;
    let end = rest.find(close)?;
    let field = &rest[..end];
    let remaining = &rest[end + close.len()..];
    Some(format!("{field}{remaining}"))
}

//! # Comparison Engine
//!
//! The core of `canasta-diff`: a pure function from two parsed
//! configuration trees (plus labeling metadata) to one formatted text
//! report. It performs no I/O and does not mutate its inputs; independent
//! invocations may run concurrently.
//!
//! ## Reconciliation
//!
//! - **Extensions and skins** are flattened to name-to-attributes maps and
//!   classified per name: only-Taqasta, only-Canasta, or common with a
//!   meaningful difference. Common items whose differences are purely
//!   cosmetic are omitted.
//! - **Composer packages** reconcile Taqasta's explicit `packages` list
//!   against Canasta extensions flagged with a `composer update` step.
//!   Package names compare case-insensitively.
//! - **Repositories** reconcile Taqasta's explicit `repositories` URLs
//!   against the `repository` attributes referenced by Canasta's
//!   extensions and skins.
//!
//! ## Equivalence
//!
//! Repository URLs that differ only by a trailing `/` or `.git` denote the
//! same repository. [`repos_are_equivalent`] is the single substitution
//! point for that rule; it is applied to item attributes and to the
//! repository-set reconciliation alike, so cosmetic URL variation never
//! surfaces in the report.

use std::collections::{BTreeMap, BTreeSet};

use serde_yaml::Value;

use crate::config::{
    self, additional_steps, attr, attr_str, PackageEntry, ADDITIONAL_STEPS, COMPOSER_UPDATE_STEP,
};
use crate::diff::{self, format_value, Change};

/// Display label for an absent repository attribute (items default to the
/// wikimedia gerrit/github mirrors).
const DEFAULT_REPO_LABEL: &str = "wikimedia";

/// Display label for an absent branch attribute.
const DEFAULT_BRANCH_LABEL: &str = "REL1_43";

/// Normalize a repository URL to ignore trivial differences: one trailing
/// `/` is stripped, then one trailing `.git`.
pub fn normalize_repo_url(url: &str) -> &str {
    let url = url.strip_suffix('/').unwrap_or(url);
    url.strip_suffix(".git").unwrap_or(url)
}

/// Whether two repository URLs denote the same repository.
///
/// Absent and empty values are treated identically: both absent/empty is
/// equivalent, exactly one absent/empty is not. Otherwise the normalized
/// forms are compared.
pub fn repos_are_equivalent(repo1: Option<&str>, repo2: Option<&str>) -> bool {
    let repo1 = repo1.filter(|url| !url.is_empty());
    let repo2 = repo2.filter(|url| !url.is_empty());
    match (repo1, repo2) {
        (None, None) => true,
        (Some(a), Some(b)) => normalize_repo_url(a) == normalize_repo_url(b),
        _ => false,
    }
}

/// Find the items unique to each set under an equivalence predicate.
///
/// An item is "only in" one set when no item in the other set is equivalent
/// to it. O(n·m), fine for configuration-sized inputs.
pub fn unique_by_equivalence<'a, F>(
    left: &'a BTreeSet<String>,
    right: &'a BTreeSet<String>,
    equivalent: &F,
) -> (Vec<&'a str>, Vec<&'a str>)
where
    F: Fn(&str, &str) -> bool,
{
    let only_left = left
        .iter()
        .filter(|l| !right.iter().any(|r| equivalent(l, r)))
        .map(String::as_str)
        .collect();
    let only_right = right
        .iter()
        .filter(|r| !left.iter().any(|l| equivalent(l, r)))
        .map(String::as_str)
        .collect();
    (only_left, only_right)
}

/// Which item section is being reconciled. Extensions and skins share the
/// reconciliation algorithm but differ in labels, unique-item annotations,
/// and the meaningful-difference rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemKind {
    Extensions,
    Skins,
}

impl ItemKind {
    fn label(self) -> &'static str {
        match self {
            ItemKind::Extensions => "Extensions",
            ItemKind::Skins => "Skins",
        }
    }

    /// Unique extensions are annotated with commit/repository; skins are not.
    fn show_details_for_unique(self) -> bool {
        self == ItemKind::Extensions
    }

    /// Extensions get the full repository/branch/steps handling; skins get
    /// only the commit line.
    fn compare_repos_and_branches(self) -> bool {
        self == ItemKind::Extensions
    }

    /// Fields rendered explicitly, and therefore excluded from the generic
    /// "Other differences" block.
    fn explicit_fields(self) -> &'static [&'static str] {
        match self {
            ItemKind::Extensions => &["commit", "repository", "branch", ADDITIONAL_STEPS],
            ItemKind::Skins => &["commit"],
        }
    }
}

/// Compare two configuration trees and return the formatted diff report.
///
/// `taqasta_ref` and `canasta_ref` label the header; `mw_version` adds an
/// optional `MediaWiki Version:` line. Sections appear in fixed order and
/// only when non-empty; when every section is empty the report ends with
/// `No differences found!`.
pub fn compare(
    taqasta: &Value,
    canasta: &Value,
    taqasta_ref: &str,
    canasta_ref: &str,
    mw_version: Option<&str>,
) -> String {
    let mut output = vec![format!(
        "Comparing Taqasta ({taqasta_ref}) vs Canasta ({canasta_ref})"
    )];
    if let Some(version) = mw_version {
        output.push(format!("MediaWiki Version: {version}"));
    }
    output.push("=".repeat(70));

    let taqasta_exts = config::flatten_items(config::section(taqasta, "extensions"));
    let canasta_exts = config::flatten_items(config::section(canasta, "extensions"));
    let ext_diff = compare_items(&taqasta_exts, &canasta_exts, ItemKind::Extensions);
    if !ext_diff.is_empty() {
        output.push(String::new());
        output.push("EXTENSIONS:".to_string());
        output.push(ext_diff.clone());
    }

    let taqasta_skins = config::flatten_items(config::section(taqasta, "skins"));
    let canasta_skins = config::flatten_items(config::section(canasta, "skins"));
    let skin_diff = compare_items(&taqasta_skins, &canasta_skins, ItemKind::Skins);
    if !skin_diff.is_empty() {
        output.push(String::new());
        output.push("SKINS:".to_string());
        output.push(skin_diff.clone());
    }

    let pkg_diff = compare_packages(&config::packages(taqasta), &canasta_exts);
    if !pkg_diff.is_empty() {
        output.push(String::new());
        output.push("COMPOSER PACKAGES:".to_string());
        output.push(pkg_diff.clone());
    }

    let repo_diff = compare_repositories(
        &config::repository_urls(taqasta),
        &config::referenced_repository_urls(canasta),
    );
    if !repo_diff.is_empty() {
        output.push(String::new());
        output.push("REPOSITORIES:".to_string());
        output.push(repo_diff.clone());
    }

    if ext_diff.is_empty() && skin_diff.is_empty() && pkg_diff.is_empty() && repo_diff.is_empty() {
        output.push(String::new());
        output.push("No differences found!".to_string());
    }

    output.join("\n")
}

/// Reconcile two name-to-attributes maps into a section body, empty when
/// nothing differs.
fn compare_items(
    taqasta: &BTreeMap<String, Value>,
    canasta: &BTreeMap<String, Value>,
    kind: ItemKind,
) -> String {
    let mut out: Vec<String> = Vec::new();

    let only_taqasta: Vec<&String> = taqasta
        .keys()
        .filter(|name| !canasta.contains_key(*name))
        .collect();
    if !only_taqasta.is_empty() {
        out.push(format!("  {} only in Taqasta:", kind.label()));
        for name in only_taqasta {
            out.push(format!("    + {name}"));
            if kind.show_details_for_unique() {
                push_unique_details(&mut out, &taqasta[name]);
            }
        }
    }

    let only_canasta: Vec<&String> = canasta
        .keys()
        .filter(|name| !taqasta.contains_key(*name))
        .collect();
    if !only_canasta.is_empty() {
        out.push(format!("  {} only in Canasta:", kind.label()));
        for name in only_canasta {
            out.push(format!("    - {name}"));
            if kind.show_details_for_unique() {
                push_unique_details(&mut out, &canasta[name]);
            }
        }
    }

    let mut difference_blocks: Vec<String> = Vec::new();
    for (name, taqasta_attrs) in taqasta {
        let Some(canasta_attrs) = canasta.get(name) else {
            continue;
        };
        let changes = diff::diff_values(taqasta_attrs, canasta_attrs);
        if changes.is_empty() {
            continue;
        }
        let meaningful = match kind {
            ItemKind::Extensions => {
                extension_difference_is_meaningful(taqasta_attrs, canasta_attrs, &changes)
            }
            // Any structural difference in a skin is reported.
            ItemKind::Skins => true,
        };
        if meaningful {
            render_item_difference(
                &mut difference_blocks,
                name,
                taqasta_attrs,
                canasta_attrs,
                &changes,
                kind,
            );
        }
    }
    if !difference_blocks.is_empty() {
        out.push(format!("  {} with different configurations:", kind.label()));
        out.extend(difference_blocks);
    }

    out.join("\n")
}

/// Annotate a unique item with its commit and repository, when present.
fn push_unique_details(out: &mut Vec<String>, attrs: &Value) {
    if let Some(commit) = attr(attrs, "commit") {
        out.push(format!("        commit: {}", format_value(commit)));
    }
    if let Some(repository) = attr(attrs, "repository") {
        out.push(format!("        repository: {}", format_value(repository)));
    }
}

/// The meaningful-difference rule for extensions: an exact commit or branch
/// difference, a non-equivalent repository, or a differing steps set always
/// counts; beyond those, any structural change counts except a changed
/// `repository` value whose two forms are equivalent.
fn extension_difference_is_meaningful(
    taqasta_attrs: &Value,
    canasta_attrs: &Value,
    changes: &[Change],
) -> bool {
    if attr(taqasta_attrs, "commit") != attr(canasta_attrs, "commit") {
        return true;
    }
    if !repos_are_equivalent(
        attr_str(taqasta_attrs, "repository"),
        attr_str(canasta_attrs, "repository"),
    ) {
        return true;
    }
    if attr(taqasta_attrs, "branch") != attr(canasta_attrs, "branch") {
        return true;
    }
    if additional_steps(taqasta_attrs) != additional_steps(canasta_attrs) {
        return true;
    }

    changes.iter().any(|change| match change {
        Change::ValueChanged { path, old, new } if path.is_field("repository") => {
            !repos_are_equivalent(old.as_str(), new.as_str())
        }
        _ => true,
    })
}

/// Render one flagged item: commit pair, then (for extensions) repository,
/// branch, and steps-set differences, then the remaining structural-diff
/// entries as an "Other differences" block.
fn render_item_difference(
    out: &mut Vec<String>,
    name: &str,
    taqasta_attrs: &Value,
    canasta_attrs: &Value,
    changes: &[Change],
    kind: ItemKind,
) {
    out.push(format!("    ~ {name}:"));

    let taqasta_commit = attr(taqasta_attrs, "commit");
    let canasta_commit = attr(canasta_attrs, "commit");
    if taqasta_commit != canasta_commit {
        out.push(format!(
            "        Taqasta commit: {}",
            display_optional(taqasta_commit)
        ));
        out.push(format!(
            "        Canasta commit: {}",
            display_optional(canasta_commit)
        ));
    }

    if kind.compare_repos_and_branches() {
        // Empty strings get the same fallback label as absent attributes.
        let taqasta_repo = attr_str(taqasta_attrs, "repository").filter(|url| !url.is_empty());
        let canasta_repo = attr_str(canasta_attrs, "repository").filter(|url| !url.is_empty());
        if !repos_are_equivalent(taqasta_repo, canasta_repo) {
            out.push(format!(
                "        Taqasta repo: {}",
                taqasta_repo.unwrap_or(DEFAULT_REPO_LABEL)
            ));
            out.push(format!(
                "        Canasta repo: {}",
                canasta_repo.unwrap_or(DEFAULT_REPO_LABEL)
            ));
        }

        let taqasta_branch = attr(taqasta_attrs, "branch");
        let canasta_branch = attr(canasta_attrs, "branch");
        if taqasta_branch != canasta_branch {
            out.push(format!(
                "        Taqasta branch: {}",
                taqasta_branch
                    .map(format_value)
                    .unwrap_or_else(|| DEFAULT_BRANCH_LABEL.to_string())
            ));
            out.push(format!(
                "        Canasta branch: {}",
                canasta_branch
                    .map(format_value)
                    .unwrap_or_else(|| DEFAULT_BRANCH_LABEL.to_string())
            ));
        }

        let taqasta_steps = additional_steps(taqasta_attrs);
        let canasta_steps = additional_steps(canasta_attrs);
        if taqasta_steps != canasta_steps {
            let only_taqasta: Vec<&String> = taqasta_steps.difference(&canasta_steps).collect();
            let only_canasta: Vec<&String> = canasta_steps.difference(&taqasta_steps).collect();
            if !only_taqasta.is_empty() {
                out.push(format!("        Only in Taqasta: {only_taqasta:?}"));
            }
            if !only_canasta.is_empty() {
                out.push(format!("        Only in Canasta: {only_canasta:?}"));
            }
        }
    }

    let other = render_other_differences(changes, kind);
    if !other.is_empty() {
        out.push("        Other differences:".to_string());
        out.extend(other);
    }
}

/// Render the structural-diff records not covered by the explicitly
/// rendered fields.
fn render_other_differences(changes: &[Change], kind: ItemKind) -> Vec<String> {
    let explicit = kind.explicit_fields();
    let covered = |path: &diff::Path| {
        path.head_key()
            .is_some_and(|head| explicit.contains(&head))
    };

    let mut lines = Vec::new();
    for change in changes {
        match change {
            Change::ValueChanged { path, old, new } => {
                if covered(path) {
                    continue;
                }
                lines.push(format!(
                    "          {path}: '{}' → '{}'",
                    format_value(old),
                    format_value(new)
                ));
            }
            Change::TypeChanged {
                path,
                old_type,
                new_type,
            } => {
                if covered(path) {
                    continue;
                }
                lines.push(format!(
                    "          {path}: type changed from {old_type} to {new_type}"
                ));
            }
            Change::KeyAdded { path } => {
                if covered(path) {
                    continue;
                }
                lines.push(format!("          Added: {path}"));
            }
            Change::KeyRemoved { path } => {
                if covered(path) {
                    continue;
                }
                lines.push(format!("          Removed: {path}"));
            }
            Change::ElementsAdded { path, count } => {
                if covered(path) {
                    continue;
                }
                lines.push(format!("          Added {count} item(s) to iterable"));
            }
            Change::ElementsRemoved { path, count } => {
                if covered(path) {
                    continue;
                }
                lines.push(format!("          Removed {count} item(s) from iterable"));
            }
        }
    }
    lines
}

fn display_optional(value: Option<&Value>) -> String {
    value.map(format_value).unwrap_or_else(|| "(none)".to_string())
}

/// Reconcile Taqasta's explicit package list against Canasta extensions
/// flagged with a `composer update` step. Names compare lowercased.
fn compare_packages(
    taqasta_packages: &[PackageEntry],
    canasta_exts: &BTreeMap<String, Value>,
) -> String {
    let canasta_packages: BTreeSet<String> = canasta_exts
        .iter()
        .filter(|(_, attrs)| additional_steps(attrs).contains(COMPOSER_UPDATE_STEP))
        .map(|(name, _)| name.to_lowercase())
        .collect();

    let taqasta_names: BTreeSet<String> = taqasta_packages
        .iter()
        .filter_map(|pkg| pkg.name.as_deref())
        .map(str::to_lowercase)
        .collect();

    let mut out: Vec<String> = Vec::new();

    let only_taqasta: Vec<&String> = taqasta_names.difference(&canasta_packages).collect();
    if !only_taqasta.is_empty() {
        out.push("  Composer packages only in Taqasta:".to_string());
        for lowered in only_taqasta {
            // Render with the original-case name and version.
            if let Some(pkg) = taqasta_packages
                .iter()
                .find(|pkg| pkg.name.as_deref().map(str::to_lowercase).as_deref() == Some(lowered))
            {
                let name = pkg.name.as_deref().unwrap_or(lowered);
                out.push(format!("    + {name} @ {}", pkg.version_label()));
            }
        }
    }

    let only_canasta: Vec<&String> = canasta_packages.difference(&taqasta_names).collect();
    if !only_canasta.is_empty() {
        out.push("  Extensions requiring composer update only in Canasta:".to_string());
        for ext in only_canasta {
            out.push(format!("    - {ext}"));
        }
    }

    out.join("\n")
}

/// Reconcile the two repository-URL sets under the equivalence predicate.
fn compare_repositories(
    taqasta_urls: &BTreeSet<String>,
    canasta_urls: &BTreeSet<String>,
) -> String {
    let equivalent = |a: &str, b: &str| repos_are_equivalent(Some(a), Some(b));
    let (only_taqasta, only_canasta) =
        unique_by_equivalence(taqasta_urls, canasta_urls, &equivalent);

    let mut out: Vec<String> = Vec::new();
    if !only_taqasta.is_empty() {
        out.push("  Custom repositories only in Taqasta:".to_string());
        for url in only_taqasta {
            out.push(format!("    + {url}"));
        }
    }
    if !only_canasta.is_empty() {
        out.push("  Custom repositories only in Canasta:".to_string());
        for url in only_canasta {
            out.push(format!("    - {url}"));
        }
    }
    out.join("\n")
}

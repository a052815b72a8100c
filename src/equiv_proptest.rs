//! Property-based tests for the repository-URL equivalence predicate and
//! the legacy diff-path cleanup.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::comparer::{normalize_repo_url, repos_are_equivalent};
    use crate::diff::clean_diff_path;
    use proptest::prelude::*;

    proptest! {
        /// Property: equivalence is symmetric for any pair of URLs.
        #[test]
        fn equivalence_is_symmetric(a in ".*", b in ".*") {
            prop_assert_eq!(
                repos_are_equivalent(Some(&a), Some(&b)),
                repos_are_equivalent(Some(&b), Some(&a))
            );
        }

        /// Property: equivalence is reflexive (including the empty string,
        /// which is equivalent to itself via the absent/empty rule).
        #[test]
        fn equivalence_is_reflexive(url in ".*") {
            prop_assert!(repos_are_equivalent(Some(&url), Some(&url)));
        }

        /// Property: an absent URL is never equivalent to a non-empty one.
        #[test]
        fn absent_never_matches_non_empty(url in ".+") {
            prop_assume!(!url.is_empty());
            prop_assert!(!repos_are_equivalent(None, Some(&url)));
        }

        /// Property: appending `.git` or a trailing slash never changes
        /// which repository a URL denotes.
        #[test]
        fn cosmetic_suffixes_are_equivalent(url in "[a-z0-9:/.]{1,40}") {
            prop_assume!(!url.ends_with('/') && !url.ends_with(".git"));
            let with_git = format!("{url}.git");
            let with_slash = format!("{url}/");
            let with_git_slash = format!("{url}.git/");
            prop_assert!(repos_are_equivalent(Some(&url), Some(&with_git)));
            prop_assert!(repos_are_equivalent(Some(&url), Some(&with_slash)));
            prop_assert!(repos_are_equivalent(Some(&url), Some(&with_git_slash)));
        }

        /// Property: normalization output is always a prefix of its input.
        #[test]
        fn normalization_only_strips_suffixes(url in ".*") {
            let normalized = normalize_repo_url(&url);
            prop_assert!(url.starts_with(normalized));
        }

        /// Property: normalization is deterministic.
        #[test]
        fn normalization_is_deterministic(url in ".*") {
            prop_assert_eq!(normalize_repo_url(&url), normalize_repo_url(&url));
        }

        /// Property: cleaning is deterministic.
        #[test]
        fn cleaning_is_deterministic(path in ".*") {
            prop_assert_eq!(clean_diff_path(&path), clean_diff_path(&path));
        }

        /// Property: strings without the root prefix pass through unchanged.
        #[test]
        fn cleaning_passes_through_non_root_paths(path in ".*") {
            prop_assume!(!path.starts_with("root"));
            prop_assert_eq!(clean_diff_path(&path), path);
        }

        /// Property: a quoted field name round-trips through cleaning.
        #[test]
        fn cleaning_extracts_quoted_fields(field in "[a-zA-Z0-9_ ]+") {
            prop_assert_eq!(clean_diff_path(&format!("root['{field}']")), field);
        }

        /// Property: a pure index round-trips through cleaning.
        #[test]
        fn cleaning_extracts_pure_indices(index in 0usize..10_000) {
            prop_assert_eq!(clean_diff_path(&format!("root[{index}]")), index.to_string());
        }
    }
}

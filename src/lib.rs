//! # Canasta Diff Library
//!
//! This library provides the core functionality for comparing Taqasta's
//! `values.yml` manifest against Canasta's recommended-revisions manifest.
//! It is designed to be used by the `canasta-diff` command-line tool but can
//! also be integrated into other applications that need to reconcile
//! MediaWiki extension/skin bundle definitions.
//!
//! ## Quick Example
//!
//! ```
//! use canasta_diff::comparer;
//!
//! let taqasta: serde_yaml::Value = serde_yaml::from_str(
//!     "extensions:\n  - Ext1:\n      commit: abc123\n",
//! ).unwrap();
//! let canasta: serde_yaml::Value = serde_yaml::from_str(
//!     "extensions:\n  - Ext1:\n      commit: def456\n",
//! ).unwrap();
//!
//! let report = comparer::compare(&taqasta, &canasta, "master", "main", None);
//! assert!(report.contains("~ Ext1:"));
//! assert!(report.contains("Taqasta commit: abc123"));
//! ```
//!
//! ## Core Concepts
//!
//! The library is built around a few key concepts:
//!
//! - **Configuration Model (`config`)**: Accessors over the parsed YAML
//!   trees, including the flattening of the "list of singleton maps" shape
//!   used by the `extensions` and `skins` sections.
//! - **Structural Diff (`diff`)**: A recursive, order-insensitive diff of
//!   two YAML values, producing tagged change records with structured paths.
//! - **Comparer (`comparer`)**: The core reconciliation engine. A pure
//!   function of its inputs: it classifies extensions, skins, composer
//!   packages, and repositories, suppresses cosmetic repository-URL
//!   differences, and assembles the final human-readable report.
//! - **Fetching (`fetcher`, `version`)**: Retrieval of the two manifests
//!   over HTTP with a content-addressed on-disk cache, and the MediaWiki
//!   version heuristic that selects the right recommended-revisions file.
//!
//! ## Execution Flow
//!
//! The CLI drives the pipeline in three steps:
//!
//! 1. **Fetch**: Download (or load from cache) Taqasta's `values.yml` and
//!    the Canasta revisions file matching the detected MediaWiki version.
//! 2. **Compare**: Run the comparer over the two trees. This step performs
//!    no I/O and is a pure function of its arguments.
//! 3. **Output**: Write the report to stdout or a file.

pub mod comparer;
pub mod config;
pub mod diff;
pub mod error;
pub mod fetcher;
pub mod version;

#[cfg(test)]
mod equiv_proptest;

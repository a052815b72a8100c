//! # MediaWiki Version Detection
//!
//! Canasta publishes one recommended-revisions file per MediaWiki
//! major.minor version, so the fetcher needs to know which version a
//! Taqasta manifest targets. This module implements that heuristic; the
//! CLI also uses the result for the report's `MediaWiki Version:` line.
//!
//! The heuristic examines the base configuration for the first present key
//! among `version`, `mediawiki_version`, `mw_version`, and `mediawiki`.
//! String values reduce to their first two dot-separated components
//! (strings with fewer than two components are skipped as unusable);
//! integers become `{n}.0`; floats stringify as-is. When no key yields a
//! usable value the default applies.

use serde_yaml::Value;

/// Keys probed for version information, in priority order.
const VERSION_KEYS: [&str; 4] = ["version", "mediawiki_version", "mw_version", "mediawiki"];

/// The MediaWiki version assumed when the manifest carries none.
pub const DEFAULT_MEDIAWIKI_VERSION: &str = "1.43";

/// Detect the MediaWiki major.minor version targeted by a Taqasta manifest.
pub fn detect_mediawiki_version(tree: &Value) -> String {
    for key in VERSION_KEYS {
        let Some(value) = tree.get(key) else {
            continue;
        };
        match value {
            Value::String(version) => {
                let mut parts = version.split('.');
                if let (Some(major), Some(minor)) = (parts.next(), parts.next()) {
                    return format!("{major}.{minor}");
                }
            }
            Value::Number(version) => {
                let version = version.to_string();
                return if version.contains('.') {
                    version
                } else {
                    format!("{version}.0")
                };
            }
            _ => {}
        }
    }
    DEFAULT_MEDIAWIKI_VERSION.to_string()
}

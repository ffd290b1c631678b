#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Import result types.

use serde::{Deserialize, Serialize};

/// Result of a completed import run.
///
/// Hard failures never produce an outcome; they surface as errors from the
/// import call instead. A run that found nothing to import is reported
/// with `success: false` so callers branch on the flag, not only on the
/// absence of an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    /// Name of the provider that was imported.
    pub source_name: String,
    /// Whether records were imported.
    pub success: bool,
    /// Number of fetched records processed.
    pub processed: u64,
    /// Human-readable summary.
    pub message: String,
}

impl ImportOutcome {
    /// Outcome of a run that processed `processed` fetched records.
    #[must_use]
    pub fn succeeded(source_name: &str, processed: u64) -> Self {
        Self {
            source_name: source_name.to_string(),
            success: true,
            processed,
            message: format!("Successfully imported {processed} products from {source_name}"),
        }
    }

    /// Outcome of a run whose provider returned no records.
    #[must_use]
    pub fn empty(source_name: &str) -> Self {
        Self {
            source_name: source_name.to_string(),
            success: false,
            processed: 0,
            message: format!("No products found from {source_name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_message_names_count_and_source() {
        let outcome = ImportOutcome::succeeded("fakestore", 20);
        assert!(outcome.success);
        assert_eq!(outcome.processed, 20);
        assert_eq!(outcome.message, "Successfully imported 20 products from fakestore");
    }

    #[test]
    fn empty_run_is_not_a_success() {
        let outcome = ImportOutcome::empty("fakestore");
        assert!(!outcome.success);
        assert_eq!(outcome.processed, 0);
        assert_eq!(outcome.message, "No products found from fakestore");
    }

    #[test]
    fn serializes_with_field_names() {
        let json = serde_json::to_value(ImportOutcome::succeeded("dummyjson", 3)).unwrap();
        assert_eq!(json["source_name"], "dummyjson");
        assert_eq!(json["processed"], 3);
        assert_eq!(json["success"], true);
    }
}

//! Provider registry. Loads all provider definitions from embedded TOML.
//!
//! Each `.toml` file in `packages/source/sources/` is baked into the binary
//! at compile time via [`include_str!`]. The [`SourceKind`] in each file
//! picks the importer implementation, so the set of providers is closed
//! and resolved by name.

use storefront_source_models::{SourceDefinition, SourceKind};

use crate::importers::dummy_json::DummyJsonImporter;
use crate::importers::fake_store::FakeStoreImporter;
use crate::{ImporterSettings, SourceError, SourceImporter};

/// Provider used when the caller does not name one.
pub const DEFAULT_SOURCE: &str = "fakestore";

/// TOML configs embedded at compile time.
const SOURCE_TOMLS: &[(&str, &str)] = &[
    ("fakestore", include_str!("../sources/fakestore.toml")),
    ("dummyjson", include_str!("../sources/dummyjson.toml")),
];

/// Total number of configured sources (used in tests).
#[cfg(test)]
const EXPECTED_SOURCE_COUNT: usize = 2;

/// Returns all configured provider definitions, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_sources() -> Vec<SourceDefinition> {
    SOURCE_TOMLS
        .iter()
        .map(|(name, toml)| {
            toml::from_str(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Looks up a provider definition by id.
///
/// Performs no I/O, so an unknown name fails before any network or
/// storage access.
///
/// # Errors
///
/// Returns [`SourceError::UnknownSource`] if no provider has this id.
pub fn find_source(name: &str) -> Result<SourceDefinition, SourceError> {
    all_sources()
        .into_iter()
        .find(|s| s.id() == name)
        .ok_or_else(|| SourceError::UnknownSource {
            name: name.to_string(),
        })
}

/// Builds the importer for `source`, fetching from `api_url_override` when
/// given and from the definition's default URL otherwise.
#[must_use]
pub fn build_importer(
    source: &SourceDefinition,
    client: reqwest::Client,
    api_url_override: Option<&str>,
) -> Box<dyn SourceImporter> {
    let settings = ImporterSettings {
        source_name: source.id.clone(),
        api_url: api_url_override.unwrap_or(&source.api_url).to_string(),
    };

    log::debug!(
        "Resolved source {} ({}) -> {} at {}",
        source.id(),
        source.name(),
        source.kind,
        settings.api_url
    );

    match source.kind {
        SourceKind::FakeStore => Box::new(FakeStoreImporter::new(client, settings)),
        SourceKind::DummyJson => Box::new(DummyJsonImporter::new(client, settings)),
    }
}

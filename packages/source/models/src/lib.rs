#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Catalog provider configuration types.
//!
//! A [`SourceDefinition`] is deserialized from the TOML files embedded in
//! `storefront_source`. Its [`SourceKind`] picks which importer
//! implementation handles the provider's response shape.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The response shape a provider speaks.
///
/// Closed set: adding a provider with a new shape means adding a variant
/// here and an importer in `storefront_source::importers`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceKind {
    /// Fake Store API: bare JSON array of products with a nested rating.
    FakeStore,
    /// `DummyJSON`: products wrapped in `{ "products": [...] }`.
    DummyJson,
}

/// A catalog provider, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDefinition {
    /// Stable identifier, also stored as `external_source` on every record.
    pub id: String,
    /// Human-readable name (e.g., "Fake Store API").
    pub name: String,
    /// Which importer handles this provider.
    pub kind: SourceKind,
    /// Default catalog endpoint. May be overridden by configuration.
    pub api_url: String,
}

impl SourceDefinition {
    /// Returns the source identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable source name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

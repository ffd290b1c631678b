#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Catalog provider importer trait and implementations.
//!
//! Each provider implements the [`SourceImporter`] trait to define how its
//! raw catalog is fetched and mapped into the canonical
//! [`NewCatalogRecord`] shape. Providers are resolved by name through the
//! [`registry`].

pub mod http;
pub mod importers;
pub mod registry;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use storefront_catalog_models::NewCatalogRecord;

/// A provider record exactly as it came off the wire.
pub type RawRecord = serde_json::Value;

/// Errors that can occur during provider operations.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The provider answered with a non-success status.
    #[error("Failed to fetch products from {source_name}: {status}")]
    Fetch {
        /// Provider that was queried.
        source_name: String,
        /// HTTP status code the provider returned.
        status: u16,
    },

    /// The request never produced a response (connect, timeout, body read).
    #[error("Failed to fetch products from {source_name}: {error}")]
    Http {
        /// Provider that was queried.
        source_name: String,
        /// Underlying transport error.
        #[source]
        error: reqwest::Error,
    },

    /// The provider answered successfully but the body was not in the
    /// expected shape.
    #[error("Invalid response from {source_name}: {message}")]
    InvalidResponse {
        /// Provider that was queried.
        source_name: String,
        /// Description of what went wrong.
        message: String,
    },

    /// A raw record could not be mapped to canonical fields.
    #[error("Normalization error: {message}")]
    Normalization {
        /// Description of what went wrong.
        message: String,
    },

    /// No provider is registered under the requested name.
    #[error("Unknown import source: {name}")]
    UnknownSource {
        /// The name that was requested.
        name: String,
    },
}

/// Provider-specific settings every importer is constructed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImporterSettings {
    /// Stable provider identifier, stored as `external_source`.
    pub source_name: String,
    /// Catalog endpoint to GET.
    pub api_url: String,
}

/// Trait that all catalog providers must implement.
///
/// `fetch` is the only operation that performs I/O; `transform` is a pure
/// mapping so the orchestrator can run it over a whole batch before
/// touching storage.
#[async_trait]
pub trait SourceImporter: Send + Sync {
    /// Returns the stable identifier for this provider (e.g.,
    /// `"fakestore"`).
    fn source_name(&self) -> &str;

    /// Downloads the provider's catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Fetch`] if the provider responds with a
    /// non-success status, [`SourceError::Http`] if the request fails, or
    /// [`SourceError::InvalidResponse`] if the body is not a catalog.
    async fn fetch(&self) -> Result<Vec<RawRecord>, SourceError>;

    /// Maps one raw record into canonical fields, stamping both timestamps
    /// with `imported_at`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Normalization`] if a required field is
    /// missing or has the wrong type.
    fn transform(
        &self,
        raw: &RawRecord,
        imported_at: DateTime<Utc>,
    ) -> Result<NewCatalogRecord, SourceError>;
}

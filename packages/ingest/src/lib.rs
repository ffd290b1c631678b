#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Library for importing provider catalogs into the storefront catalog.
//!
//! A run fetches a provider's whole catalog, maps every record to the
//! canonical shape, and writes the batch with a single idempotent upsert
//! keyed by `(external_source, external_id)`. Re-running an import never
//! duplicates records; it refreshes their mutable fields.

pub mod config;

use std::time::Instant;

use chrono::Utc;
use storefront_catalog_models::{NATURAL_KEY, UPDATABLE_COLUMNS};
use storefront_database::{CatalogStore, DbError};
use storefront_ingest_models::ImportOutcome;
use storefront_source::{SourceError, SourceImporter, http, registry};
use storefront_source_models::SourceDefinition;

use crate::config::IngestConfig;

/// Errors that can end an import run.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Resolving, fetching, or transforming provider data failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Writing to the catalog failed.
    #[error(transparent)]
    Database(#[from] DbError),
}

/// Returns all registered providers.
#[must_use]
pub fn all_sources() -> Vec<SourceDefinition> {
    registry::all_sources()
}

/// Resolves `source_name` to an importer configured from `config`.
///
/// Performs no network or storage access, so an unknown provider is
/// rejected before anything else happens.
///
/// # Errors
///
/// Returns [`SourceError::UnknownSource`] if no provider has this id, or
/// [`SourceError::Http`] if the HTTP client cannot be built.
pub fn importer_for(
    source_name: &str,
    config: &IngestConfig,
) -> Result<Box<dyn SourceImporter>, SourceError> {
    let source = registry::find_source(source_name)?;
    let client = http::build_client(&config.user_agent, config.request_timeout()).map_err(
        |error| SourceError::Http {
            source_name: source.id.clone(),
            error,
        },
    )?;

    Ok(registry::build_importer(
        &source,
        client,
        config.source_urls.get(source.id()).map(String::as_str),
    ))
}

/// Runs one import: fetch, transform, and upsert the whole batch.
///
/// An empty catalog yields an unsuccessful [`ImportOutcome`] without
/// touching `store`. Every record in a run is stamped with the same
/// import time. Nothing is written unless every record transforms.
///
/// # Errors
///
/// Returns [`ImportError::Source`] if the fetch or any transform fails
/// and [`ImportError::Database`] if the upsert fails. Errors are not
/// retried.
pub async fn run_import(
    importer: &dyn SourceImporter,
    store: &dyn CatalogStore,
) -> Result<ImportOutcome, ImportError> {
    let start = Instant::now();
    let source_name = importer.source_name();
    log::info!("Importing products from {source_name}");

    let raw = importer.fetch().await?;
    if raw.is_empty() {
        log::warn!("{source_name}: provider returned no products");
        return Ok(ImportOutcome::empty(source_name));
    }

    let imported_at = Utc::now();
    let batch = raw
        .iter()
        .map(|record| importer.transform(record, imported_at))
        .collect::<Result<Vec<_>, _>>()?;

    let written = store.upsert(&batch, NATURAL_KEY, UPDATABLE_COLUMNS)?;

    log::info!(
        "{source_name}: upserted {written} of {} fetched products, took {:.1}s",
        batch.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(ImportOutcome::succeeded(source_name, batch.len() as u64))
}

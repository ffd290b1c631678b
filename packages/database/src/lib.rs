#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Catalog persistence for the storefront.
//!
//! Catalog records live in a single `DuckDB` file (by default
//! `data/catalog.duckdb`). Imports go through the [`CatalogStore`] trait,
//! whose only operation is a bulk idempotent upsert keyed by the record's
//! natural key. Read-side helpers live in [`catalog_db`].

pub mod catalog_db;
pub mod paths;

use std::path::Path;

use duckdb::Connection;
use storefront_catalog_models::{CatalogColumn, NewCatalogRecord};

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// `DuckDB` error.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// I/O error (creating the data directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested upsert shape is not allowed.
    #[error("Invalid upsert: {message}")]
    InvalidUpsert {
        /// Description of what went wrong.
        message: String,
    },

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Persistence for catalog records.
///
/// Implementations must apply a whole batch atomically and rely on a
/// uniqueness constraint over `conflict_keys` so that concurrent writers
/// cannot create two rows for the same natural key.
pub trait CatalogStore {
    /// Inserts every row of `rows`, or, when a stored record already has
    /// the same values at `conflict_keys`, overwrites exactly
    /// `update_columns` on it.
    ///
    /// Returns the number of rows inserted or updated.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidUpsert`] if `conflict_keys` or
    /// `update_columns` is empty, if `update_columns` names a conflict key
    /// or `created_at`, or if a price has more sub-unit digits than the
    /// store keeps. Returns [`DbError::DuckDb`] if the statement fails.
    /// Nothing is written on error.
    fn upsert(
        &self,
        rows: &[NewCatalogRecord],
        conflict_keys: &[CatalogColumn],
        update_columns: &[CatalogColumn],
    ) -> Result<u64, DbError>;
}

/// [`CatalogStore`] backed by a `DuckDB` connection.
pub struct DuckDbCatalogStore {
    conn: Connection,
}

impl DuckDbCatalogStore {
    /// Opens (or creates) the catalog at `path` and ensures the schema
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the directory, connection, or schema
    /// creation fails.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        Ok(Self {
            conn: catalog_db::open(path)?,
        })
    }

    /// Opens a throwaway in-memory catalog.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or schema creation fails.
    pub fn open_in_memory() -> Result<Self, DbError> {
        Ok(Self {
            conn: catalog_db::open_in_memory()?,
        })
    }

    /// Returns the underlying connection for read-side queries.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl CatalogStore for DuckDbCatalogStore {
    fn upsert(
        &self,
        rows: &[NewCatalogRecord],
        conflict_keys: &[CatalogColumn],
        update_columns: &[CatalogColumn],
    ) -> Result<u64, DbError> {
        catalog_db::upsert_records(&self.conn, rows, conflict_keys, update_columns)
    }
}

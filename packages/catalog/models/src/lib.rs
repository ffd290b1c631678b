#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canonical catalog record types.
//!
//! Every provider importer produces [`NewCatalogRecord`] values in this
//! shape, and the catalog store hands back [`CatalogRecord`] rows. The
//! natural key of a record is `(external_source, external_id)`; see
//! [`NATURAL_KEY`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A column of the `catalog_records` table that callers may name in an
/// upsert.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum CatalogColumn {
    /// Name of the provider the record came from.
    ExternalSource,
    /// Provider-assigned identity.
    ExternalId,
    /// Product title.
    Title,
    /// Product price.
    Price,
    /// Long-form description.
    Description,
    /// Provider category label.
    Category,
    /// Image URL.
    Image,
    /// Serialized [`Rating`].
    Rating,
    /// When the record was first inserted.
    CreatedAt,
    /// When the record was last written by an import.
    UpdatedAt,
}

impl CatalogColumn {
    /// Every writable column, in insert order.
    pub const ALL: &[Self] = &[
        Self::ExternalSource,
        Self::ExternalId,
        Self::Title,
        Self::Price,
        Self::Description,
        Self::Category,
        Self::Image,
        Self::Rating,
        Self::CreatedAt,
        Self::UpdatedAt,
    ];
}

/// Columns that identify a record across repeated imports.
pub const NATURAL_KEY: &[CatalogColumn] = &[CatalogColumn::ExternalSource, CatalogColumn::ExternalId];

/// Columns an import overwrites when the natural key already exists.
///
/// Never contains a [`NATURAL_KEY`] column or `created_at`.
pub const UPDATABLE_COLUMNS: &[CatalogColumn] = &[
    CatalogColumn::Title,
    CatalogColumn::Price,
    CatalogColumn::Description,
    CatalogColumn::Category,
    CatalogColumn::Image,
    CatalogColumn::Rating,
    CatalogColumn::UpdatedAt,
];

/// Number of decimal places a stored price keeps. Prices with more
/// significant decimal places are rejected rather than rounded.
pub const PRICE_SCALE: u32 = 2;

/// Returns `true` if `price` can be stored without losing digits.
#[must_use]
pub fn price_fits_scale(price: Decimal) -> bool {
    price.normalize().scale() <= PRICE_SCALE
}

/// Aggregate customer rating for a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average score.
    pub rate: f64,
    /// Number of ratings the average is based on.
    pub count: u32,
}

/// A record ready to be written to the catalog store.
///
/// Produced by a provider importer's transform step. `rating` is already
/// in its storage representation (a JSON document).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCatalogRecord {
    /// Provider name (first half of the natural key).
    pub external_source: String,
    /// Provider-assigned identity (second half of the natural key).
    pub external_id: String,
    /// Product title.
    pub title: String,
    /// Product price.
    pub price: Decimal,
    /// Long-form description.
    pub description: String,
    /// Provider category label.
    pub category: String,
    /// Image URL.
    pub image: String,
    /// JSON-serialized [`Rating`].
    pub rating: String,
    /// Creation timestamp used when the row is inserted.
    pub created_at: DateTime<Utc>,
    /// Write timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A catalog record as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Store-generated surrogate key.
    pub id: i64,
    /// Provider name.
    pub external_source: String,
    /// Provider-assigned identity.
    pub external_id: String,
    /// Product title.
    pub title: String,
    /// Product price.
    pub price: Decimal,
    /// Long-form description.
    pub description: String,
    /// Provider category label.
    pub category: String,
    /// Image URL.
    pub image: String,
    /// Customer rating, if the stored document parsed.
    pub rating: Option<Rating>,
    /// When the record was first inserted.
    pub created_at: DateTime<Utc>,
    /// When the record was last written by an import.
    pub updated_at: DateTime<Utc>,
}

/// Filters and pagination for listing catalog records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Case-insensitive substring match on the title.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Requested page size, clamped to [`CatalogQuery::MAX_PER_PAGE`].
    pub per_page: Option<u32>,
}

impl CatalogQuery {
    /// Page size used when none is requested.
    pub const DEFAULT_PER_PAGE: u32 = 15;
    /// Largest page size a caller may request.
    pub const MAX_PER_PAGE: u32 = 100;

    /// Returns the page size to use, clamped to `1..=MAX_PER_PAGE`.
    #[must_use]
    pub fn effective_per_page(&self) -> u32 {
        self.per_page
            .map_or(Self::DEFAULT_PER_PAGE, |n| n.clamp(1, Self::MAX_PER_PAGE))
    }

    /// Returns the 1-based page number, treating `0` as the first page.
    #[must_use]
    pub fn effective_page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Number of rows to skip for the requested page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.effective_page() - 1) * u64::from(self.effective_per_page())
    }

    /// Returns `search` with surrounding whitespace removed, or `None` if
    /// nothing is left.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Returns `category`, or `None` if it is empty.
    #[must_use]
    pub fn category_filter(&self) -> Option<&str> {
        self.category.as_deref().filter(|s| !s.is_empty())
    }
}

/// One page of catalog records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    /// Records on this page, ordered by `id`.
    pub records: Vec<CatalogRecord>,
    /// Number of records matching the filters across all pages.
    pub total: u64,
    /// 1-based page number.
    pub page: u32,
    /// Page size used.
    pub per_page: u32,
    /// Last page number (at least 1).
    pub last_page: u32,
}

impl CatalogPage {
    /// Computes the last page number for `total` rows at `per_page` rows
    /// per page.
    #[must_use]
    pub fn last_page_for(total: u64, per_page: u32) -> u32 {
        let per_page = u64::from(per_page.max(1));
        u32::try_from(total.div_ceil(per_page).max(1)).unwrap_or(u32::MAX)
    }
}

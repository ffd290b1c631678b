//! `DummyJSON` products importer.
//!
//! Endpoint: <https://dummyjson.com/products>. Products are wrapped in
//! `{ "products": [...], "total", "skip", "limit" }`; the rating is a bare
//! number and the review count is the length of `reviews`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use storefront_catalog_models::{NewCatalogRecord, Rating};

use crate::importers::{checked_price, external_id_from, rating_json, record_error};
use crate::{ImporterSettings, RawRecord, SourceError, SourceImporter, http};

/// Importer for providers speaking the `DummyJSON` response shape.
pub struct DummyJsonImporter {
    client: reqwest::Client,
    settings: ImporterSettings,
}

impl DummyJsonImporter {
    /// Creates a new importer that GETs `settings.api_url` with `client`.
    #[must_use]
    pub const fn new(client: reqwest::Client, settings: ImporterSettings) -> Self {
        Self { client, settings }
    }
}

#[derive(Debug, Deserialize)]
struct Record {
    id: serde_json::Value,
    title: String,
    price: Decimal,
    #[serde(default)]
    description: String,
    category: String,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    rating: f64,
    #[serde(default)]
    reviews: Vec<serde_json::Value>,
}

#[async_trait]
impl SourceImporter for DummyJsonImporter {
    fn source_name(&self) -> &str {
        &self.settings.source_name
    }

    async fn fetch(&self) -> Result<Vec<RawRecord>, SourceError> {
        let body = http::get_json(&self.client, &self.settings.api_url, self.source_name()).await?;

        match body {
            serde_json::Value::Null => Ok(Vec::new()),
            serde_json::Value::Object(mut wrapper) => match wrapper.remove("products") {
                Some(serde_json::Value::Array(records)) => Ok(records),
                Some(other) => Err(SourceError::InvalidResponse {
                    source_name: self.source_name().to_string(),
                    message: format!(
                        "`products` must be an array, got {}",
                        http::json_type_name(&other)
                    ),
                }),
                None => Err(SourceError::InvalidResponse {
                    source_name: self.source_name().to_string(),
                    message: "no `products` array in response".to_string(),
                }),
            },
            other => Err(SourceError::InvalidResponse {
                source_name: self.source_name().to_string(),
                message: format!(
                    "expected a products wrapper object, got {}",
                    http::json_type_name(&other)
                ),
            }),
        }
    }

    fn transform(
        &self,
        raw: &RawRecord,
        imported_at: DateTime<Utc>,
    ) -> Result<NewCatalogRecord, SourceError> {
        let source_name = self.source_name();
        let record =
            Record::deserialize(raw).map_err(|e| record_error(source_name, raw, &e))?;

        let image = record
            .thumbnail
            .filter(|s| !s.is_empty())
            .or_else(|| record.images.into_iter().next())
            .unwrap_or_default();

        let rating = Rating {
            rate: record.rating,
            count: u32::try_from(record.reviews.len()).unwrap_or(u32::MAX),
        };

        Ok(NewCatalogRecord {
            external_source: source_name.to_string(),
            external_id: external_id_from(source_name, &record.id)?,
            title: record.title,
            price: checked_price(source_name, raw, record.price)?,
            description: record.description,
            category: record.category,
            image,
            rating: rating_json(&rating)?,
            created_at: imported_at,
            updated_at: imported_at,
        })
    }
}

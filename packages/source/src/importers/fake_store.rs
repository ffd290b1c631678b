//! Fake Store API importer.
//!
//! Endpoint: <https://fakestoreapi.com/products>. The response is a bare
//! JSON array of
//! `{id, title, price, description, category, image, rating: {rate, count}}`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use storefront_catalog_models::{NewCatalogRecord, Rating};

use crate::importers::{checked_price, external_id_from, rating_json, record_error};
use crate::{ImporterSettings, RawRecord, SourceError, SourceImporter, http};

/// Importer for providers speaking the Fake Store response shape.
pub struct FakeStoreImporter {
    client: reqwest::Client,
    settings: ImporterSettings,
}

impl FakeStoreImporter {
    /// Creates a new importer that GETs `settings.api_url` with `client`.
    #[must_use]
    pub const fn new(client: reqwest::Client, settings: ImporterSettings) -> Self {
        Self { client, settings }
    }
}

/// Raw record from the Fake Store API.
#[derive(Debug, Deserialize)]
struct Record {
    id: serde_json::Value,
    title: String,
    price: Decimal,
    #[serde(default)]
    description: String,
    category: String,
    #[serde(default)]
    image: String,
    rating: Rating,
}

#[async_trait]
impl SourceImporter for FakeStoreImporter {
    fn source_name(&self) -> &str {
        &self.settings.source_name
    }

    async fn fetch(&self) -> Result<Vec<RawRecord>, SourceError> {
        let body = http::get_json(&self.client, &self.settings.api_url, self.source_name()).await?;

        match body {
            serde_json::Value::Array(records) => Ok(records),
            serde_json::Value::Null => Ok(Vec::new()),
            other => Err(SourceError::InvalidResponse {
                source_name: self.source_name().to_string(),
                message: format!(
                    "expected a JSON array of products, got {}",
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

        Ok(NewCatalogRecord {
            external_source: source_name.to_string(),
            external_id: external_id_from(source_name, &record.id)?,
            title: record.title,
            price: checked_price(source_name, raw, record.price)?,
            description: record.description,
            category: record.category,
            image: record.image,
            rating: rating_json(&record.rating)?,
            created_at: imported_at,
            updated_at: imported_at,
        })
    }
}

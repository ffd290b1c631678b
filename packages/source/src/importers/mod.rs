//! Concrete provider importers.
//!
//! Each module implements the [`SourceImporter`](crate::SourceImporter)
//! trait for one response shape. Helpers here are shared by the transform
//! steps.

pub mod dummy_json;
pub mod fake_store;

use rust_decimal::Decimal;
use storefront_catalog_models::{PRICE_SCALE, Rating, price_fits_scale};

use crate::SourceError;

/// Renders a provider id as the canonical `external_id` string.
///
/// Integer ids are written in decimal; string ids are trimmed. Anything
/// else (including an empty string) is rejected.
pub(crate) fn external_id_from(
    source_name: &str,
    id: &serde_json::Value,
) -> Result<String, SourceError> {
    let rendered = match id {
        serde_json::Value::Number(n) if n.is_u64() || n.is_i64() => Some(n.to_string()),
        serde_json::Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        _ => None,
    };

    rendered.ok_or_else(|| SourceError::Normalization {
        message: format!(
            "{source_name}: record id must be an integer or non-empty string, got {id}"
        ),
    })
}

/// Rejects prices with more than [`PRICE_SCALE`] significant decimal
/// places, which the catalog cannot store exactly.
pub(crate) fn checked_price(
    source_name: &str,
    raw: &serde_json::Value,
    price: Decimal,
) -> Result<Decimal, SourceError> {
    if price_fits_scale(price) {
        return Ok(price);
    }

    let id = raw.get("id").map_or_else(|| "?".to_string(), ToString::to_string);
    Err(SourceError::Normalization {
        message: format!(
            "{source_name}: record {id} price {price} has more than {PRICE_SCALE} decimal places"
        ),
    })
}

/// Serializes a rating into its storage representation.
pub(crate) fn rating_json(rating: &Rating) -> Result<String, SourceError> {
    serde_json::to_string(rating).map_err(|e| SourceError::Normalization {
        message: format!("failed to serialize rating: {e}"),
    })
}

/// Wraps a serde error from decoding one raw record.
pub(crate) fn record_error(source_name: &str, raw: &serde_json::Value, e: &serde_json::Error) -> SourceError {
    let id = raw.get("id").map_or_else(|| "?".to_string(), ToString::to_string);
    SourceError::Normalization {
        message: format!("{source_name}: record {id} is malformed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_ids_render_in_decimal() {
        assert_eq!(external_id_from("p", &serde_json::json!(42)).unwrap(), "42");
    }

    #[test]
    fn string_ids_are_trimmed() {
        assert_eq!(
            external_id_from("p", &serde_json::json!("  sku-7 ")).unwrap(),
            "sku-7"
        );
    }

    #[test]
    fn accepts_two_decimal_prices() {
        let raw = serde_json::json!({"id": 1});
        let price = Decimal::new(1999, 2);
        assert_eq!(checked_price("p", &raw, price).unwrap(), price);
    }

    #[test]
    fn rejects_sub_cent_prices() {
        let raw = serde_json::json!({"id": 1});
        let err = checked_price("p", &raw, Decimal::new(19_999, 3)).unwrap_err();
        assert!(matches!(err, SourceError::Normalization { .. }), "{err:?}");
        assert!(err.to_string().contains("19.999"), "{err}");
    }

    #[test]
    fn rejects_unusable_ids() {
        for id in [
            serde_json::json!(""),
            serde_json::json!(1.5),
            serde_json::json!(null),
            serde_json::json!({"id": 1}),
        ] {
            assert!(external_id_from("p", &id).is_err(), "accepted {id}");
        }
    }
}

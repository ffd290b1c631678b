//! `DuckDB` catalog storage.
//!
//! The catalog file holds one `catalog_records` table with a `UNIQUE
//! (external_source, external_id)` constraint. Writes go through
//! [`upsert_records`], which turns a batch into multi-row `INSERT ... ON
//! CONFLICT DO UPDATE` statements inside a single transaction.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use duckdb::Connection;
use rust_decimal::Decimal;
use storefront_catalog_models::{
    CatalogColumn, CatalogPage, CatalogQuery, CatalogRecord, NewCatalogRecord, PRICE_SCALE,
    Rating, price_fits_scale,
};

use crate::DbError;

/// Number of rows per INSERT chunk.
const CHUNK_SIZE: usize = 1_000;

/// SQL type prices are stored as.
const PRICE_TYPE: &str = "DECIMAL(12, 2)";

/// Columns selected for every [`CatalogRecord`] read, in [`read_record`]
/// order. Decimals and timestamps come back as text and are parsed here.
const SELECT_COLUMNS: &str = "id, external_source, external_id, title,
    CAST(price AS VARCHAR), description, category, image, rating,
    CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR)";

/// Opens (or creates) a catalog `DuckDB` database and ensures the schema
/// exists.
///
/// # Errors
///
/// Returns [`DbError`] if the connection or schema creation fails.
pub fn open(path: &Path) -> Result<Connection, DbError> {
    if let Some(parent) = path.parent() {
        crate::paths::ensure_dir(parent)?;
    }

    let conn = Connection::open(path)?;
    create_schema(&conn)?;

    Ok(conn)
}

/// Opens an in-memory catalog with the schema applied.
///
/// # Errors
///
/// Returns [`DbError`] if the connection or schema creation fails.
pub fn open_in_memory() -> Result<Connection, DbError> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

fn create_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(&format!(
        "CREATE SEQUENCE IF NOT EXISTS catalog_records_id_seq START 1;

        CREATE TABLE IF NOT EXISTS catalog_records (
            id BIGINT PRIMARY KEY DEFAULT nextval('catalog_records_id_seq'),
            external_source TEXT NOT NULL,
            external_id TEXT NOT NULL,
            title TEXT NOT NULL,
            price {PRICE_TYPE} NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            image TEXT NOT NULL,
            rating TEXT,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL,
            UNIQUE (external_source, external_id)
        );"
    ))?;

    Ok(())
}

/// Inserts or updates a batch of catalog records.
///
/// Rows are deduplicated on `conflict_keys` first (the last occurrence
/// wins) because a single statement cannot update the same row twice. All
/// chunks run in one transaction; on any error the transaction is rolled
/// back and the catalog is unchanged.
///
/// Returns the number of rows inserted or updated.
///
/// # Errors
///
/// Returns [`DbError::InvalidUpsert`] for a disallowed column layout or a
/// price with more than [`PRICE_SCALE`] decimal places, and
/// [`DbError::DuckDb`] if any statement fails.
pub fn upsert_records(
    conn: &Connection,
    rows: &[NewCatalogRecord],
    conflict_keys: &[CatalogColumn],
    update_columns: &[CatalogColumn],
) -> Result<u64, DbError> {
    validate_upsert(conflict_keys, update_columns)?;

    if rows.is_empty() {
        return Ok(0);
    }

    if let Some(row) = rows.iter().find(|row| !price_fits_scale(row.price)) {
        return Err(DbError::InvalidUpsert {
            message: format!(
                "{}/{}: price {} has more than {PRICE_SCALE} decimal places",
                row.external_source, row.external_id, row.price
            ),
        });
    }

    let deduped = dedup_by_key(rows, conflict_keys);
    if deduped.len() < rows.len() {
        log::info!(
            "Deduplicated upsert batch: {} -> {} rows ({} duplicates removed)",
            rows.len(),
            deduped.len(),
            rows.len() - deduped.len(),
        );
    }

    let conflict_clause = conflict_clause(conflict_keys, update_columns);

    conn.execute_batch("BEGIN TRANSACTION")?;

    match write_chunks(conn, &deduped, &conflict_clause) {
        Ok(total) => {
            conn.execute_batch("COMMIT")?;
            log::debug!("Upserted {total} catalog rows");
            Ok(total)
        }
        Err(e) => {
            if let Err(rollback_err) = conn.execute_batch("ROLLBACK") {
                log::error!("Rollback after failed upsert also failed: {rollback_err}");
            }
            Err(e)
        }
    }
}

fn validate_upsert(
    conflict_keys: &[CatalogColumn],
    update_columns: &[CatalogColumn],
) -> Result<(), DbError> {
    if conflict_keys.is_empty() {
        return Err(DbError::InvalidUpsert {
            message: "at least one conflict key is required".to_string(),
        });
    }

    if update_columns.is_empty() {
        return Err(DbError::InvalidUpsert {
            message: "at least one update column is required".to_string(),
        });
    }

    for column in update_columns {
        if conflict_keys.contains(column) {
            return Err(DbError::InvalidUpsert {
                message: format!("conflict key `{column}` cannot be updated"),
            });
        }
        if *column == CatalogColumn::CreatedAt {
            return Err(DbError::InvalidUpsert {
                message: "`created_at` cannot be updated".to_string(),
            });
        }
    }

    Ok(())
}

fn dedup_by_key<'a>(
    rows: &'a [NewCatalogRecord],
    conflict_keys: &[CatalogColumn],
) -> Vec<&'a NewCatalogRecord> {
    let key_of = |row: &NewCatalogRecord| -> Vec<String> {
        conflict_keys
            .iter()
            .map(|column| column_value(row, *column))
            .collect()
    };

    let mut last_seen: BTreeMap<Vec<String>, usize> = BTreeMap::new();
    for (i, row) in rows.iter().enumerate() {
        last_seen.insert(key_of(row), i);
    }

    rows.iter()
        .enumerate()
        .filter(|(i, row)| last_seen.get(&key_of(row)) == Some(i))
        .map(|(_, row)| row)
        .collect()
}

fn conflict_clause(conflict_keys: &[CatalogColumn], update_columns: &[CatalogColumn]) -> String {
    let target = conflict_keys
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(", ");

    let assignments = update_columns
        .iter()
        .map(|column| format!("{column} = EXCLUDED.{column}"))
        .collect::<Vec<_>>()
        .join(",\n                ");

    format!(" ON CONFLICT ({target}) DO UPDATE SET\n                {assignments}")
}

fn write_chunks(
    conn: &Connection,
    rows: &[&NewCatalogRecord],
    conflict_clause: &str,
) -> Result<u64, DbError> {
    let column_list = CatalogColumn::ALL
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(", ");
    let row_placeholders = format!(
        "({})",
        CatalogColumn::ALL
            .iter()
            .map(|column| placeholder(*column))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut total = 0u64;

    for chunk in rows.chunks(CHUNK_SIZE) {
        let mut sql = format!("INSERT INTO catalog_records ({column_list}) VALUES ");

        for (i, _) in chunk.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&row_placeholders);
        }

        sql.push_str(conflict_clause);

        let mut stmt = conn.prepare(&sql)?;
        let mut param_idx = 1usize;

        for row in chunk {
            for column in CatalogColumn::ALL {
                stmt.raw_bind_parameter(param_idx, column_value(row, *column))?;
                param_idx += 1;
            }
        }

        let affected = stmt.raw_execute()?;
        total += u64::try_from(affected).unwrap_or(0);
    }

    Ok(total)
}

/// Returns the bind placeholder for `column`. Every value is bound as text
/// and cast on the SQL side.
fn placeholder(column: CatalogColumn) -> String {
    match column {
        CatalogColumn::Price => format!("CAST(? AS {PRICE_TYPE})"),
        CatalogColumn::CreatedAt | CatalogColumn::UpdatedAt => "CAST(? AS TIMESTAMP)".to_string(),
        _ => "?".to_string(),
    }
}

fn column_value(row: &NewCatalogRecord, column: CatalogColumn) -> String {
    match column {
        CatalogColumn::ExternalSource => row.external_source.clone(),
        CatalogColumn::ExternalId => row.external_id.clone(),
        CatalogColumn::Title => row.title.clone(),
        CatalogColumn::Price => row.price.to_string(),
        CatalogColumn::Description => row.description.clone(),
        CatalogColumn::Category => row.category.clone(),
        CatalogColumn::Image => row.image.clone(),
        CatalogColumn::Rating => row.rating.clone(),
        CatalogColumn::CreatedAt => format_timestamp(&row.created_at),
        CatalogColumn::UpdatedAt => format_timestamp(&row.updated_at),
    }
}

fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Returns the number of records in the catalog.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn get_record_count(conn: &Connection) -> Result<u64, DbError> {
    let mut stmt = conn.prepare("SELECT COUNT(*) FROM catalog_records")?;
    let count: i64 = stmt.query_row([], |row| row.get(0))?;
    Ok(u64::try_from(count).unwrap_or(0))
}

/// Looks up a record by its natural key.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored value cannot be
/// parsed.
pub fn find_record(
    conn: &Connection,
    external_source: &str,
    external_id: &str,
) -> Result<Option<CatalogRecord>, DbError> {
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM catalog_records
         WHERE external_source = ? AND external_id = ?"
    );
    let mut stmt = conn.prepare(&sql)?;
    stmt.raw_bind_parameter(1, external_source)?;
    stmt.raw_bind_parameter(2, external_id)?;
    stmt.raw_execute()?;

    let mut rows = stmt.raw_query();
    let record = match rows.next()? {
        Some(row) => Some(read_record(row)?),
        None => None,
    };

    Ok(record)
}

/// Lists catalog records matching `query`, one page at a time.
///
/// Search is a case-insensitive substring match on the title, category is
/// an exact match, and both price bounds are inclusive. Records are
/// ordered by `id`.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored value cannot be
/// parsed.
pub fn query_records(conn: &Connection, query: &CatalogQuery) -> Result<CatalogPage, DbError> {
    let mut where_sql = String::new();
    let mut params: Vec<String> = Vec::new();

    let mut push_condition = |condition: &str, param: String| {
        where_sql.push_str(if where_sql.is_empty() { " WHERE " } else { " AND " });
        where_sql.push_str(condition);
        params.push(param);
    };

    if let Some(term) = query.search_term() {
        push_condition("contains(lower(title), lower(?))", term.to_string());
    }
    if let Some(category) = query.category_filter() {
        push_condition("category = ?", category.to_string());
    }
    if let Some(min) = query.min_price {
        push_condition(&format!("price >= CAST(? AS {PRICE_TYPE})"), min.to_string());
    }
    if let Some(max) = query.max_price {
        push_condition(&format!("price <= CAST(? AS {PRICE_TYPE})"), max.to_string());
    }

    let total = {
        let mut stmt = conn.prepare(&format!("SELECT COUNT(*) FROM catalog_records{where_sql}"))?;
        for (i, param) in params.iter().enumerate() {
            stmt.raw_bind_parameter(i + 1, param)?;
        }
        stmt.raw_execute()?;
        let mut rows = stmt.raw_query();
        let count: i64 = match rows.next()? {
            Some(row) => row.get(0)?,
            None => 0,
        };
        u64::try_from(count).unwrap_or(0)
    };

    let per_page = query.effective_per_page();
    let page = query.effective_page();

    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM catalog_records{where_sql}
         ORDER BY id LIMIT {per_page} OFFSET {}",
        query.offset()
    );

    let mut stmt = conn.prepare(&sql)?;
    for (i, param) in params.iter().enumerate() {
        stmt.raw_bind_parameter(i + 1, param)?;
    }
    stmt.raw_execute()?;

    let mut records = Vec::new();
    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        records.push(read_record(row)?);
    }

    Ok(CatalogPage {
        records,
        total,
        page,
        per_page,
        last_page: CatalogPage::last_page_for(total, per_page),
    })
}

/// Converts one row selected with [`SELECT_COLUMNS`] into a record.
fn read_record(row: &duckdb::Row<'_>) -> Result<CatalogRecord, DbError> {
    let id: i64 = row.get(0)?;
    let price_text: String = row.get(4)?;
    let rating_text: Option<String> = row.get(8)?;
    let created_text: String = row.get(9)?;
    let updated_text: String = row.get(10)?;

    let price = Decimal::from_str(&price_text).map_err(|e| DbError::Conversion {
        message: format!("record {id}: invalid price {price_text:?}: {e}"),
    })?;

    let rating = rating_text
        .as_deref()
        .and_then(|text| match serde_json::from_str::<Rating>(text) {
            Ok(rating) => Some(rating),
            Err(e) => {
                log::warn!("record {id}: unreadable rating {text:?}: {e}");
                None
            }
        });

    let timestamp = |text: &str| {
        parse_timestamp(text).ok_or_else(|| DbError::Conversion {
            message: format!("record {id}: invalid timestamp {text:?}"),
        })
    };

    Ok(CatalogRecord {
        id,
        external_source: row.get(1)?,
        external_id: row.get(2)?,
        title: row.get(3)?,
        price,
        description: row.get(5)?,
        category: row.get(6)?,
        image: row.get(7)?,
        rating,
        created_at: timestamp(&created_text)?,
        updated_at: timestamp(&updated_text)?,
    })
}

/// Parses a `DuckDB` timestamp text representation into a UTC `DateTime`.
///
/// `DuckDB`'s `::TEXT` cast can produce several formats depending on the
/// stored precision:
/// - `2024-01-15 10:30:00` (no fractional seconds)
/// - `2024-01-15 10:30:00.123` (fractional seconds)
/// - `2024-01-15 10:30:00+00` (with timezone)
/// - `2024-01-15 10:30:00.123+00` (both)
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    use chrono::NaiveDateTime;

    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%#z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }

    // Naive values are stored as UTC
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    log::warn!("Failed to parse timestamp: {s:?}");
    None
}

#[cfg(test)]
mod tests {
    use storefront_catalog_models::{NATURAL_KEY, UPDATABLE_COLUMNS};

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn record(source: &str, id: &str, title: &str, cents: i64, category: &str) -> NewCatalogRecord {
        NewCatalogRecord {
            external_source: source.to_string(),
            external_id: id.to_string(),
            title: title.to_string(),
            price: Decimal::new(cents, 2),
            description: format!("{title} description"),
            category: category.to_string(),
            image: format!("https://example.com/{id}.jpg"),
            rating: r#"{"rate":4.5,"count":100}"#.to_string(),
            created_at: at(1_700_000_000),
            updated_at: at(1_700_000_000),
        }
    }

    fn upsert(conn: &Connection, rows: &[NewCatalogRecord]) -> Result<u64, DbError> {
        upsert_records(conn, rows, NATURAL_KEY, UPDATABLE_COLUMNS)
    }

    #[test]
    fn inserts_new_records() {
        let conn = open_in_memory().unwrap();
        let rows = vec![
            record("fakestore", "1", "Test Product", 1999, "test"),
            record("fakestore", "2", "Other", 500, "test"),
        ];

        assert_eq!(upsert(&conn, &rows).unwrap(), 2);
        assert_eq!(get_record_count(&conn).unwrap(), 2);

        let stored = find_record(&conn, "fakestore", "1").unwrap().unwrap();
        assert_eq!(stored.title, "Test Product");
        assert_eq!(stored.price, Decimal::new(1999, 2));
        assert_eq!(
            stored.rating,
            Some(Rating {
                rate: 4.5,
                count: 100
            })
        );
        assert_eq!(stored.created_at, at(1_700_000_000));
    }

    #[test]
    fn repeated_upsert_is_idempotent() {
        let conn = open_in_memory().unwrap();
        let rows = vec![
            record("fakestore", "1", "A", 100, "x"),
            record("fakestore", "2", "B", 200, "y"),
        ];

        upsert(&conn, &rows).unwrap();
        let first = query_records(&conn, &CatalogQuery::default()).unwrap();
        upsert(&conn, &rows).unwrap();
        let second = query_records(&conn, &CatalogQuery::default()).unwrap();

        assert_eq!(get_record_count(&conn).unwrap(), 2);
        assert_eq!(first.records, second.records);
    }

    #[test]
    fn conflict_updates_only_mutable_columns() {
        let conn = open_in_memory().unwrap();
        upsert(&conn, &[record("fakestore", "1", "Test Product", 1999, "test")]).unwrap();
        let before = find_record(&conn, "fakestore", "1").unwrap().unwrap();

        let mut changed = record("fakestore", "1", "Renamed", 2999, "other");
        changed.description = "Updated description".to_string();
        changed.rating = r#"{"rate":3.0,"count":7}"#.to_string();
        changed.created_at = at(1_800_000_000);
        changed.updated_at = at(1_800_000_000);
        upsert(&conn, &[changed]).unwrap();

        let after = find_record(&conn, "fakestore", "1").unwrap().unwrap();
        assert_eq!(get_record_count(&conn).unwrap(), 1);
        assert_eq!(after.id, before.id);
        assert_eq!(after.title, "Renamed");
        assert_eq!(after.price, Decimal::new(2999, 2));
        assert_eq!(after.description, "Updated description");
        assert_eq!(after.category, "other");
        assert_eq!(after.rating, Some(Rating { rate: 3.0, count: 7 }));
        assert_eq!(after.updated_at, at(1_800_000_000));
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn same_external_id_from_different_sources_are_distinct() {
        let conn = open_in_memory().unwrap();
        upsert(
            &conn,
            &[
                record("fakestore", "1", "A", 100, "x"),
                record("dummyjson", "1", "B", 100, "x"),
            ],
        )
        .unwrap();

        assert_eq!(get_record_count(&conn).unwrap(), 2);
    }

    #[test]
    fn duplicate_keys_within_batch_keep_last() {
        let conn = open_in_memory().unwrap();
        upsert(
            &conn,
            &[
                record("fakestore", "1", "First", 100, "x"),
                record("fakestore", "1", "Second", 200, "x"),
            ],
        )
        .unwrap();

        assert_eq!(get_record_count(&conn).unwrap(), 1);
        let stored = find_record(&conn, "fakestore", "1").unwrap().unwrap();
        assert_eq!(stored.title, "Second");
    }

    #[test]
    fn rejects_updating_natural_key() {
        let conn = open_in_memory().unwrap();
        let err = upsert_records(
            &conn,
            &[record("fakestore", "1", "A", 100, "x")],
            NATURAL_KEY,
            &[CatalogColumn::Title, CatalogColumn::ExternalId],
        )
        .unwrap_err();

        assert!(matches!(err, DbError::InvalidUpsert { .. }), "{err:?}");
        assert_eq!(get_record_count(&conn).unwrap(), 0);
    }

    #[test]
    fn rejects_updating_created_at() {
        let conn = open_in_memory().unwrap();
        let err = upsert_records(
            &conn,
            &[record("fakestore", "1", "A", 100, "x")],
            NATURAL_KEY,
            &[CatalogColumn::CreatedAt],
        )
        .unwrap_err();

        assert!(matches!(err, DbError::InvalidUpsert { .. }), "{err:?}");
    }

    #[test]
    fn rejects_empty_update_set() {
        let conn = open_in_memory().unwrap();
        let err = upsert_records(
            &conn,
            &[record("fakestore", "1", "A", 100, "x")],
            NATURAL_KEY,
            &[],
        )
        .unwrap_err();

        assert!(matches!(err, DbError::InvalidUpsert { .. }), "{err:?}");
        assert_eq!(get_record_count(&conn).unwrap(), 0);
    }

    #[test]
    fn rejects_price_that_would_be_rounded() {
        let conn = open_in_memory().unwrap();
        upsert(&conn, &[record("fakestore", "1", "A", 1999, "x")]).unwrap();

        let mut sub_cent = record("fakestore", "1", "A", 0, "x");
        sub_cent.price = Decimal::from_str("19.999").unwrap();
        let err = upsert(&conn, &[sub_cent]).unwrap_err();

        assert!(matches!(err, DbError::InvalidUpsert { .. }), "{err:?}");
        let stored = find_record(&conn, "fakestore", "1").unwrap().unwrap();
        assert_eq!(stored.price, Decimal::new(1999, 2));
    }

    #[test]
    fn trailing_zero_price_round_trips() {
        let conn = open_in_memory().unwrap();
        let mut row = record("fakestore", "1", "A", 0, "x");
        row.price = Decimal::from_str("19.9900").unwrap();
        upsert(&conn, &[row]).unwrap();

        let stored = find_record(&conn, "fakestore", "1").unwrap().unwrap();
        assert_eq!(stored.price, Decimal::new(1999, 2));
    }

    #[test]
    fn failed_batch_leaves_catalog_untouched() {
        let conn = open_in_memory().unwrap();
        upsert(&conn, &[record("fakestore", "1", "A", 100, "x")]).unwrap();

        // 10^12 does not fit DECIMAL(12, 2)
        let mut too_expensive = record("fakestore", "2", "B", 0, "x");
        too_expensive.price = Decimal::from(1_000_000_000_000_i64);

        let result = upsert(
            &conn,
            &[record("fakestore", "1", "A changed", 200, "x"), too_expensive],
        );

        assert!(matches!(result, Err(DbError::DuckDb(_))), "{result:?}");
        assert_eq!(get_record_count(&conn).unwrap(), 1);
        let stored = find_record(&conn, "fakestore", "1").unwrap().unwrap();
        assert_eq!(stored.title, "A");
        assert_eq!(stored.price, Decimal::new(100, 2));
    }

    #[test]
    fn empty_batch_writes_nothing() {
        let conn = open_in_memory().unwrap();
        assert_eq!(upsert(&conn, &[]).unwrap(), 0);
        assert_eq!(get_record_count(&conn).unwrap(), 0);
    }

    #[test]
    fn find_record_misses_unknown_key() {
        let conn = open_in_memory().unwrap();
        assert!(find_record(&conn, "fakestore", "404").unwrap().is_none());
    }

    fn seeded() -> Connection {
        let conn = open_in_memory().unwrap();
        upsert(
            &conn,
            &[
                record("fakestore", "1", "Mens Cotton Jacket", 5599, "men's clothing"),
                record("fakestore", "2", "Womens Rain Jacket", 3999, "women's clothing"),
                record("fakestore", "3", "Solid Gold Ring", 16800, "jewelery"),
                record("fakestore", "4", "SSD 1TB", 10900, "electronics"),
                record("fakestore", "5", "Monitor", 59999, "electronics"),
            ],
        )
        .unwrap();
        conn
    }

    #[test]
    fn search_matches_title_substring_case_insensitively() {
        let conn = seeded();
        let page = query_records(
            &conn,
            &CatalogQuery {
                search: Some("jacket".to_string()),
                ..CatalogQuery::default()
            },
        )
        .unwrap();

        assert_eq!(page.total, 2);
        let ids: Vec<&str> = page.records.iter().map(|r| r.external_id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn filters_by_category_and_price_range() {
        let conn = seeded();
        let page = query_records(
            &conn,
            &CatalogQuery {
                category: Some("electronics".to_string()),
                min_price: Some(Decimal::new(100, 0)),
                max_price: Some(Decimal::new(109, 0)),
                ..CatalogQuery::default()
            },
        )
        .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.records[0].title, "SSD 1TB");
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let conn = seeded();
        let page = query_records(
            &conn,
            &CatalogQuery {
                min_price: Some(Decimal::new(3999, 2)),
                max_price: Some(Decimal::new(5599, 2)),
                ..CatalogQuery::default()
            },
        )
        .unwrap();

        assert_eq!(page.total, 2);
    }

    #[test]
    fn paginates_in_id_order() {
        let conn = seeded();
        let page = query_records(
            &conn,
            &CatalogQuery {
                per_page: Some(2),
                page: Some(3),
                ..CatalogQuery::default()
            },
        )
        .unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.last_page, 3);
        assert_eq!(page.per_page, 2);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].external_id, "5");
    }

    #[test]
    fn parses_duckdb_timestamp_variants() {
        let expected = at(1_705_314_600);
        assert_eq!(parse_timestamp("2024-01-15 10:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-15 10:30:00.000"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-15 10:30:00+00"), Some(expected));
        assert!(parse_timestamp("not a timestamp").is_none());
    }
}

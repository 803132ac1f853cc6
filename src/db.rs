// 🗄️ Record Store
// SQLite persistence that formats records on their way in and out

use crate::dispatcher::RecordFormatDispatcher;
use crate::formatter::Direction;
use crate::record::{row_from_json, Record};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

/// A record together with its identity
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: String,
    pub table: String,
    pub record: Record,
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // Attributes are kept as one JSON document per row
    conn.execute(
        "CREATE TABLE IF NOT EXISTS records (
            id TEXT PRIMARY KEY NOT NULL,
            table_name TEXT NOT NULL,
            attributes TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_records_table ON records(table_name)",
        [],
    )?;

    Ok(())
}

/// Persist a record, formatting its changed attributes toward storage first.
///
/// `id` of `None` inserts a new row under a fresh UUID. After the write the
/// record's current values become its clean baseline.
pub fn save_record(
    conn: &Connection,
    dispatcher: &RecordFormatDispatcher,
    table: &str,
    id: Option<&str>,
    record: &mut Record,
) -> Result<String> {
    let summary = dispatcher.format_record(record, Direction::TowardStorage);

    let id = id
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let attributes = serde_json::to_string(&record.to_json())
        .context("Failed to serialize record attributes")?;
    let now = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO records (id, table_name, attributes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)
         ON CONFLICT(id) DO UPDATE SET
            attributes = excluded.attributes,
            updated_at = excluded.updated_at",
        params![id, table, attributes, now],
    )
    .with_context(|| format!("Failed to save record {} in '{}'", id, table))?;

    record.sync_original();

    info!(
        table,
        id = %id,
        converted = summary.converted,
        "record saved"
    );

    Ok(id)
}

/// Load one record and format it toward presentation.
///
/// The clean baseline is the storage form, so every attribute the
/// presentation pass rewrote reads as changed, and saving the record again
/// converts those attributes back.
pub fn load_record(
    conn: &Connection,
    dispatcher: &RecordFormatDispatcher,
    table: &str,
    id: &str,
) -> Result<Option<Record>> {
    let attributes: Option<String> = conn
        .query_row(
            "SELECT attributes FROM records WHERE table_name = ?1 AND id = ?2",
            params![table, id],
            |row| row.get(0),
        )
        .optional()?;

    attributes
        .map(|json| decode_record(dispatcher, &json))
        .transpose()
}

/// Every record of a table, oldest first, in presentation form
pub fn load_records(
    conn: &Connection,
    dispatcher: &RecordFormatDispatcher,
    table: &str,
) -> Result<Vec<StoredRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, attributes FROM records
         WHERE table_name = ?1
         ORDER BY created_at, rowid",
    )?;

    let rows = stmt
        .query_map(params![table], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let records = rows
        .into_iter()
        .map(|(id, json)| {
            let record = decode_record(dispatcher, &json)
                .with_context(|| format!("Corrupt attributes for record {}", id))?;
            Ok(StoredRecord {
                id,
                table: table.to_string(),
                record,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(table, count = records.len(), "records loaded");

    Ok(records)
}

pub fn count_records(conn: &Connection, table: &str) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM records WHERE table_name = ?1",
        params![table],
        |row| row.get(0),
    )?;

    Ok(count)
}

fn decode_record(dispatcher: &RecordFormatDispatcher, json: &str) -> Result<Record> {
    let document: serde_json::Value =
        serde_json::from_str(json).context("Failed to parse stored attributes")?;

    let mut record = Record::from_storage(row_from_json(&document)?);
    dispatcher.format_toward_presentation(&mut record);

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttributeClassification, AttributeKind};
    use crate::value::AttributeValue;

    fn text(s: &str) -> AttributeValue {
        AttributeValue::String(s.to_string())
    }

    fn product_dispatcher() -> RecordFormatDispatcher {
        let classification = AttributeClassification::new()
            .with("price", AttributeKind::Money)
            .and_then(|c| c.with("active", AttributeKind::Boolean))
            .and_then(|c| c.with("release_date", AttributeKind::Date))
            .and_then(|c| c.with("published_at", AttributeKind::Datetime))
            .unwrap();
        RecordFormatDispatcher::new(classification)
    }

    fn open() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    fn form_input() -> Record {
        Record::from_changes(vec![
            ("name".to_string(), text("Caderno")),
            ("price".to_string(), text("R$ 1.234,50")),
            ("active".to_string(), text("Sim")),
            ("release_date".to_string(), text("15/03/2024")),
            ("published_at".to_string(), text("15/03/2024 14:30")),
        ])
    }

    fn stored_document(conn: &Connection, id: &str) -> serde_json::Value {
        let raw: String = conn
            .query_row("SELECT attributes FROM records WHERE id = ?1", params![id], |row| row.get(0))
            .unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_save_writes_storage_form() {
        let conn = open();
        let dispatcher = product_dispatcher();
        let mut record = form_input();

        let id = save_record(&conn, &dispatcher, "products", None, &mut record).unwrap();

        let document = stored_document(&conn, &id);
        assert_eq!(document["name"], "Caderno");
        assert_eq!(document["price"], "1234.50");
        assert_eq!(document["active"], 1);
        assert_eq!(document["release_date"], "2024-03-15 00:00:00");
        assert_eq!(document["published_at"], "2024-03-15 14:30:00");
        assert!(record.is_clean());
    }

    #[test]
    fn test_load_returns_presentation_form() {
        let conn = open();
        let dispatcher = product_dispatcher();
        let mut record = form_input();
        let id = save_record(&conn, &dispatcher, "products", None, &mut record).unwrap();

        let loaded = load_record(&conn, &dispatcher, "products", &id).unwrap().unwrap();

        assert_eq!(loaded.get("name"), Some(&text("Caderno")));
        assert_eq!(loaded.get("price"), Some(&text("R$ 1.234,50")));
        assert_eq!(loaded.get("active"), Some(&text("Sim")));
        assert_eq!(loaded.get("release_date"), Some(&text("15/03/2024")));
        assert_eq!(loaded.get("published_at"), Some(&text("15/03/2024 14:30")));
    }

    #[test]
    fn test_load_missing_record_is_none() {
        let conn = open();
        let dispatcher = product_dispatcher();

        assert!(load_record(&conn, &dispatcher, "products", "nope").unwrap().is_none());
    }

    #[test]
    fn test_update_after_load_keeps_storage_form() {
        let conn = open();
        let dispatcher = product_dispatcher();
        let mut record = form_input();
        let id = save_record(&conn, &dispatcher, "products", None, &mut record).unwrap();

        let mut loaded = load_record(&conn, &dispatcher, "products", &id).unwrap().unwrap();
        loaded.set("price", "R$ 99,90");
        save_record(&conn, &dispatcher, "products", Some(&id), &mut loaded).unwrap();

        let document = stored_document(&conn, &id);
        assert_eq!(document["price"], "99.90");
        assert_eq!(document["active"], 1);
        assert_eq!(document["release_date"], "2024-03-15 00:00:00");
        assert_eq!(count_records(&conn, "products").unwrap(), 1);
    }

    #[test]
    fn test_load_records_by_table() {
        let conn = open();
        let dispatcher = product_dispatcher();

        for price in ["R$ 1,00", "R$ 2,00"] {
            let mut record = Record::from_changes(vec![("price".to_string(), text(price))]);
            save_record(&conn, &dispatcher, "products", None, &mut record).unwrap();
        }
        let mut other = Record::from_changes(vec![("price".to_string(), text("R$ 3,00"))]);
        save_record(&conn, &dispatcher, "services", None, &mut other).unwrap();

        let records = load_records(&conn, &dispatcher, "products").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].record.get("price"), Some(&text("R$ 1,00")));
        assert_eq!(records[1].record.get("price"), Some(&text("R$ 2,00")));
        assert!(records.iter().all(|r| r.table == "products"));
        assert_eq!(count_records(&conn, "services").unwrap(), 1);
    }
}

// Reading input rows from JSON or CSV files
use crate::record::{row_from_json, Row};
use crate::value::AttributeValue;
use anyhow::{anyhow, Context, Result};
use std::path::Path;

/// Load rows from `path`, choosing the reader by extension (`.csv` or JSON)
pub fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        load_csv(path)
    } else {
        load_json(path)
    }
}

/// CSV with a header line; every cell is text and empty cells are null
pub fn load_csv(csv_path: &Path) -> Result<Vec<Row>> {
    let mut rdr = csv::Reader::from_path(csv_path).context("Failed to open CSV file")?;
    let headers = rdr.headers().context("Failed to read CSV header")?.clone();

    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result.context("Failed to read CSV row")?;

        let row = headers
            .iter()
            .zip(record.iter())
            .map(|(name, cell)| {
                let value = if cell.is_empty() {
                    AttributeValue::Null
                } else {
                    AttributeValue::from(cell)
                };
                (name.to_string(), value)
            })
            .collect();

        rows.push(row);
    }

    Ok(rows)
}

/// A JSON array of objects, or a single object
pub fn load_json(json_path: &Path) -> Result<Vec<Row>> {
    let raw = std::fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read {}", json_path.display()))?;
    let document: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON in {}", json_path.display()))?;

    match document {
        serde_json::Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| row_from_json(item).with_context(|| format!("Row {}", index + 1)))
            .collect(),
        serde_json::Value::Object(_) => Ok(vec![row_from_json(&document)?]),
        other => Err(anyhow!("Expected an array of objects, got: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_input(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_csv_rows() {
        let file = write_input(".csv", "name,price,active\nCaneta,10.5,1\nLápis,,0\n");

        let rows = load_rows(file.path()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][1], ("price".to_string(), AttributeValue::from("10.5")));
        assert_eq!(rows[1][1], ("price".to_string(), AttributeValue::Null));
        assert_eq!(rows[1][0].1, AttributeValue::from("Lápis"));
    }

    #[test]
    fn test_load_json_array() {
        let file = write_input(".json", r#"[{"price": 10.5, "active": 1}, {"price": null}]"#);

        let rows = load_rows(file.path()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0].1, AttributeValue::Float(10.5));
        assert_eq!(rows[0][1].1, AttributeValue::Integer(1));
        assert_eq!(rows[1][0].1, AttributeValue::Null);
    }

    #[test]
    fn test_load_json_single_object() {
        let file = write_input(".json", r#"{"price": "R$ 1,00"}"#);
        assert_eq!(load_rows(file.path()).unwrap().len(), 1);
    }

    #[test]
    fn test_load_json_rejects_scalars() {
        let file = write_input(".json", "42");
        assert!(load_rows(file.path()).is_err());

        let file = write_input(".json", "[1]");
        assert!(load_rows(file.path()).is_err());
    }
}

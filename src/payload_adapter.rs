use crate::catalog::FetchError;
use crate::data::{TablePayload, TableReference};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct DatabaseListing {
    tables: Vec<TableReference>,
}

/// The root listing is an object keyed by database name; keys keep server order.
pub fn convert_databases(json: &Value) -> Result<Vec<String>, FetchError> {
    let object = json.as_object().ok_or_else(|| {
        FetchError::ParseFailure(format!(
            "expected an object of databases, got {}",
            kind_of(json)
        ))
    })?;

    Ok(object.keys().cloned().collect())
}

pub fn convert_tables(json: &Value) -> Result<Vec<TableReference>, FetchError> {
    let listing = DatabaseListing::deserialize(json)
        .map_err(|e| FetchError::ParseFailure(format!("table listing: {}", e)))?;
    Ok(listing.tables)
}

pub fn convert_table(json: &Value) -> Result<TablePayload, FetchError> {
    TablePayload::deserialize(json)
        .map_err(|e| FetchError::ParseFailure(format!("table data: {}", e)))
}

fn kind_of(json: &Value) -> &'static str {
    match json {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CellValue;
    use serde_json::json;

    #[test]
    fn test_databases_keep_server_order() {
        let json = json!({ "zeta": {}, "alpha": {}, "mid": { "hash": null } });
        assert_eq!(
            convert_databases(&json).unwrap(),
            vec!["zeta", "alpha", "mid"]
        );
    }

    #[test]
    fn test_databases_reject_non_object() {
        let error = convert_databases(&json!(["a", "b"])).unwrap_err();
        assert_eq!(
            error,
            FetchError::ParseFailure("expected an object of databases, got an array".to_string())
        );
    }

    #[test]
    fn test_tables_ignore_extra_fields() {
        let json = json!({
            "database": "fixtures",
            "tables": [
                { "name": "facets", "columns": ["id"], "hidden": false, "count": 10 }
            ]
        });
        let tables = convert_tables(&json).unwrap();
        assert_eq!(
            tables,
            vec![TableReference {
                name: "facets".to_string(),
                count: Some(10)
            }]
        );
    }

    #[test]
    fn test_tables_require_names() {
        let json = json!({ "tables": [{ "count": 1 }] });
        assert!(matches!(
            convert_tables(&json),
            Err(FetchError::ParseFailure(_))
        ));
    }

    #[test]
    fn test_table_scalar_cells() {
        let json = json!({
            "database": "fixtures",
            "table": "mixed",
            "columns": ["n", "f", "b", "s", "z"],
            "rows": [[7, 2.5, true, "x", null]]
        });
        let payload = convert_table(&json).unwrap();
        assert_eq!(
            payload.rows[0],
            vec![
                CellValue::Integer(7),
                CellValue::Float(2.5),
                CellValue::Boolean(true),
                CellValue::Text("x".to_string()),
                CellValue::Null,
            ]
        );
    }

    #[test]
    fn test_table_rejects_nested_cells() {
        let json = json!({ "columns": ["a"], "rows": [[{ "nested": 1 }]] });
        assert!(matches!(
            convert_table(&json),
            Err(FetchError::ParseFailure(_))
        ));
    }

    #[test]
    fn test_table_requires_rows() {
        let json = json!({ "columns": ["a"] });
        assert!(convert_table(&json).is_err());
    }
}

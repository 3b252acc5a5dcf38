use sqlx::{sqlite::SqliteRow, Row};

/// Filter empty strings to None — used when DB stores '' instead of NULL
pub fn none_if_empty(opt: Option<String>) -> Option<String> {
    opt.filter(|s| !s.is_empty())
}

/// Parse a JSON array column (e.g. facility_ids) into a Vec<String>
pub fn id_list(row: &SqliteRow, col: &str) -> Vec<String> {
    let raw: String = row.get(col);
    serde_json::from_str(&raw).unwrap_or_default()
}

/// Serialize an id list for storage in a JSON TEXT column
pub fn id_list_json(ids: &[String]) -> String {
    serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
}

/// Parse a JSON object column into the given type, falling back to default
pub fn json_column<T: serde::de::DeserializeOwned + Default>(row: &SqliteRow, col: &str) -> T {
    let raw: String = row.get(col);
    serde_json::from_str(&raw).unwrap_or_default()
}

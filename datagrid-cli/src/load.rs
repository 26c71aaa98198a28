use std::fs;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use datagrid_lib::ColumnSpec;
use datagrid_lib::ViewConfig;
use datagrid_lib::model::Record;

/// Reads a JSON array of objects into records.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read records from {}", path.display()))?;
    let records: Vec<Record> = serde_json::from_str(&json)
        .with_context(|| format!("{} is not a JSON array of objects", path.display()))?;
    log::info!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Loads the view file, or derives a view from the records' fields.
pub fn load_view(path: Option<&Path>, records: &[Record]) -> Result<ViewConfig> {
    match path {
        Some(path) => Ok(ViewConfig::from_path(path)?),
        None => {
            let view = infer_view(records);
            log::info!("no view given, using {} inferred columns", view.columns.len());
            Ok(view)
        }
    }
}

/// A view with one sortable, filterable column per field. Records are
/// scanned in order and each record's fields are read alphabetically, so
/// columns follow the first record that has them. An `id` field, if every
/// record has one, becomes the key.
pub fn infer_view(records: &[Record]) -> ViewConfig {
    let mut fields: Vec<&str> = Vec::new();
    for record in records {
        for field in record.fields().keys() {
            if !fields.contains(&field.as_str()) {
                fields.push(field);
            }
        }
    }

    let key_field = (!records.is_empty() && records.iter().all(|r| r.contains("id")))
        .then(|| "id".to_string());

    ViewConfig {
        grid: Default::default(),
        key_field,
        columns: fields
            .into_iter()
            .map(|field| ColumnSpec {
                field: field.to_string(),
                label: None,
                kind: Default::default(),
                sortable: true,
                filterable: true,
                width: None,
                align: None,
                options: Vec::new(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_view() {
        let records: Vec<Record> = serde_json::from_str(
            r#"[{"name": "Ada", "id": 1}, {"id": 2, "score": 9, "age": 3}]"#,
        )
        .unwrap();
        let view = infer_view(&records);

        let fields: Vec<&str> = view.columns.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, ["id", "name", "age", "score"]);
        assert_eq!(view.key_field.as_deref(), Some("id"));
        assert!(view.columns.iter().all(|c| c.sortable && c.filterable));
    }

    #[test]
    fn test_infer_view_without_common_id() {
        let records: Vec<Record> =
            serde_json::from_str(r#"[{"id": 1}, {"name": "no id"}]"#).unwrap();
        assert_eq!(infer_view(&records).key_field, None);
    }

    #[test]
    fn test_missing_records_file() {
        let err = load_records(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read records"));
    }
}

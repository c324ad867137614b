use serde_json::Value;
use thiserror::Error;

use super::task::Task;

pub const ID_LABEL: &str = "ID";
pub const SOURCE_SHEET_LABEL: &str = "Source Sheet Id";
pub const DESTINATION_SHEET_LABEL: &str = "Destination Sheet Id";
pub const ENABLE_LABEL: &str = "Enable";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigTableError {
    #[error("Configuration sheet returned no values")]
    NoValues,
    #[error("Configuration header is missing the '{0}' column")]
    MissingColumn(&'static str),
}

/// Column positions of the recognized header labels. Resolved once from the
/// header row; a label appearing twice resolves to its rightmost occurrence
/// (last match wins).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnIndexMap {
    pub id: usize,
    pub source_sheet: usize,
    pub destination_sheet: usize,
    pub enable: usize,
}

impl ColumnIndexMap {
    pub fn from_header(header: &[String]) -> Result<Self, ConfigTableError> {
        let mut id = None;
        let mut source_sheet = None;
        let mut destination_sheet = None;
        let mut enable = None;

        for (column, label) in header.iter().enumerate() {
            match label.as_str() {
                ID_LABEL => id = Some(column),
                SOURCE_SHEET_LABEL => source_sheet = Some(column),
                DESTINATION_SHEET_LABEL => destination_sheet = Some(column),
                ENABLE_LABEL => enable = Some(column),
                _ => {}
            }
        }

        Ok(ColumnIndexMap {
            id: id.ok_or(ConfigTableError::MissingColumn(ID_LABEL))?,
            source_sheet: source_sheet
                .ok_or(ConfigTableError::MissingColumn(SOURCE_SHEET_LABEL))?,
            destination_sheet: destination_sheet
                .ok_or(ConfigTableError::MissingColumn(DESTINATION_SHEET_LABEL))?,
            enable: enable.ok_or(ConfigTableError::MissingColumn(ENABLE_LABEL))?,
        })
    }
}

/// Parsed configuration table: the resolved column map plus one task per row
/// below the header.
#[derive(Debug)]
pub struct ConfigTable {
    pub columns: ColumnIndexMap,
    pub tasks: Vec<Task>,
}

impl ConfigTable {
    /// Row 0 is always the header; every following row becomes a task.
    pub fn from_values(rows: Vec<Vec<Value>>) -> Result<Self, ConfigTableError> {
        let mut rows = rows.into_iter().map(row_to_cells);
        let header = rows.next().ok_or(ConfigTableError::NoValues)?;
        let columns = ColumnIndexMap::from_header(&header)?;
        let tasks = rows.map(Task::from_cells).collect();

        Ok(ConfigTable { columns, tasks })
    }
}

fn row_to_cells(row: Vec<Value>) -> Vec<String> {
    row.into_iter().map(cell_to_string).collect()
}

/// Cells arrive as JSON values; anything that is not already a string keeps
/// its JSON display form ("42", "true", ...).
fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn header_row() -> Vec<Value> {
        vec![
            json!("ID"),
            json!("Source Sheet Id"),
            json!("Destination Sheet Id"),
            json!("Enable"),
            json!("Reserved"),
        ]
    }

    #[test]
    fn test_header_resolution() {
        let header: Vec<String> = vec![
            "Enable".into(),
            "ID".into(),
            "Destination Sheet Id".into(),
            "Source Sheet Id".into(),
        ];
        let map = ColumnIndexMap::from_header(&header).unwrap();
        assert_eq!(map.enable, 0);
        assert_eq!(map.id, 1);
        assert_eq!(map.destination_sheet, 2);
        assert_eq!(map.source_sheet, 3);
    }

    #[test]
    fn test_duplicate_label_last_match_wins() {
        let header: Vec<String> = vec![
            "ID".into(),
            "Source Sheet Id".into(),
            "Destination Sheet Id".into(),
            "Enable".into(),
            "ID".into(),
        ];
        let map = ColumnIndexMap::from_header(&header).unwrap();
        assert_eq!(map.id, 4);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let header: Vec<String> = vec!["ID".into(), "Source Sheet Id".into(), "Enable".into()];
        assert_eq!(
            ColumnIndexMap::from_header(&header),
            Err(ConfigTableError::MissingColumn(DESTINATION_SHEET_LABEL))
        );
    }

    #[test]
    fn test_unrecognized_labels_are_ignored() {
        let header: Vec<String> = vec![
            "ID".into(),
            "Comment".into(),
            "Source Sheet Id".into(),
            "Destination Sheet Id".into(),
            "Enable".into(),
        ];
        let map = ColumnIndexMap::from_header(&header).unwrap();
        assert_eq!(map.id, 0);
        assert_eq!(map.source_sheet, 2);
    }

    #[test]
    fn test_empty_table_is_an_error() {
        assert!(matches!(
            ConfigTable::from_values(vec![]),
            Err(ConfigTableError::NoValues)
        ));
    }

    #[test]
    fn test_header_only_table_has_no_tasks() {
        let table = ConfigTable::from_values(vec![header_row()]).unwrap();
        assert!(table.tasks.is_empty());
    }

    #[test]
    fn test_rows_below_header_become_tasks() {
        let table = ConfigTable::from_values(vec![
            header_row(),
            vec![json!("T1"), json!("src"), json!("dst"), json!("TRUE")],
            vec![json!("T2"), json!("src"), json!("dst"), json!("FALSE")],
        ])
        .unwrap();
        assert_eq!(table.tasks.len(), 2);
        assert_eq!(table.tasks[0].field(0), Some("T1"));
    }

    #[test]
    fn test_non_string_cells_keep_json_display_form() {
        let table = ConfigTable::from_values(vec![
            header_row(),
            vec![json!(42), json!("src"), json!("dst"), json!(true), json!(null)],
        ])
        .unwrap();
        let task = &table.tasks[0];
        assert_eq!(task.field(0), Some("42"));
        assert_eq!(task.field(3), Some("true"));
        assert_eq!(task.field(4), Some(""));
    }
}

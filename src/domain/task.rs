use super::config_table::ColumnIndexMap;

/// Leading columns before the range-pair tail: ID, Source Sheet Id,
/// Destination Sheet Id, Enable, and one unnamed reserved column.
pub const RESERVED_FIELDS: usize = 5;

const ENABLED_VALUE: &str = "TRUE";

/// One (source, destination) copy unit within a task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangePair {
    pub source_range: String,
    pub destination_range: String,
}

/// One configuration row. Field positions are meaningful only through a
/// [`ColumnIndexMap`] resolved from the same table's header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    cells: Vec<String>,
}

impl Task {
    pub fn from_cells(cells: Vec<String>) -> Self {
        Task { cells }
    }

    pub fn field(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn id(&self, columns: &ColumnIndexMap) -> &str {
        self.field(columns.id).unwrap_or_default()
    }

    pub fn source_sheet_id(&self, columns: &ColumnIndexMap) -> &str {
        self.field(columns.source_sheet).unwrap_or_default()
    }

    pub fn destination_sheet_id(&self, columns: &ColumnIndexMap) -> &str {
        self.field(columns.destination_sheet).unwrap_or_default()
    }

    /// Exact string comparison; "true", "True" and a missing cell all count
    /// as disabled.
    pub fn is_enabled(&self, columns: &ColumnIndexMap) -> bool {
        self.field(columns.enable) == Some(ENABLED_VALUE)
    }

    /// Invariant: the tail after the reserved columns must pair up. Computed
    /// on the signed difference, so a 4-cell row (tail length -1) is
    /// malformed while a 3-cell row (tail length -2) is not.
    pub fn has_paired_ranges(&self) -> bool {
        (self.cells.len() as i64 - RESERVED_FIELDS as i64).rem_euclid(2) == 0
    }

    /// Lazy sequence of range pairs at positions (5, 6), (7, 8), ... No
    /// bounds validation beyond the caller's [`Task::has_paired_ranges`]
    /// check; a trailing unpaired cell is silently dropped.
    pub fn range_pairs(&self) -> impl Iterator<Item = RangePair> + '_ {
        self.cells
            .get(RESERVED_FIELDS..)
            .unwrap_or_default()
            .chunks_exact(2)
            .map(|pair| RangePair {
                source_range: pair[0].clone(),
                destination_range: pair[1].clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> ColumnIndexMap {
        ColumnIndexMap {
            id: 0,
            source_sheet: 1,
            destination_sheet: 2,
            enable: 3,
        }
    }

    fn task(cells: &[&str]) -> Task {
        Task::from_cells(cells.iter().map(|cell| cell.to_string()).collect())
    }

    #[test]
    fn test_enable_is_exact_string_match() {
        assert!(task(&["T1", "src", "dst", "TRUE"]).is_enabled(&columns()));
        assert!(!task(&["T1", "src", "dst", "FALSE"]).is_enabled(&columns()));
        assert!(!task(&["T1", "src", "dst", "true"]).is_enabled(&columns()));
        assert!(!task(&["T1", "src", "dst", "True"]).is_enabled(&columns()));
    }

    #[test]
    fn test_row_too_short_for_enable_cell_is_disabled() {
        assert!(!task(&["T1", "src"]).is_enabled(&columns()));
    }

    #[test]
    fn test_field_accessors() {
        let task = task(&["T1", "src", "dst", "TRUE", ""]);
        let columns = columns();
        assert_eq!(task.id(&columns), "T1");
        assert_eq!(task.source_sheet_id(&columns), "src");
        assert_eq!(task.destination_sheet_id(&columns), "dst");
    }

    #[test]
    fn test_paired_ranges_check() {
        assert!(task(&["T1", "src", "dst", "TRUE", ""]).has_paired_ranges());
        assert!(task(&["T1", "src", "dst", "TRUE", "", "A1:A2", "B1:B2"]).has_paired_ranges());
        assert!(!task(&["T1", "src", "dst", "TRUE", "", "A1:A2"]).has_paired_ranges());
        // Signed arithmetic: one cell short of the reserved columns is odd.
        assert!(!task(&["T1", "src", "dst", "TRUE"]).has_paired_ranges());
        assert!(task(&["T1", "src", "dst"]).has_paired_ranges());
    }

    #[test]
    fn test_range_pairs_start_after_reserved_fields() {
        let task = task(&["T1", "src", "dst", "TRUE", "", "A1:A2", "B1:B2", "C1", "D1"]);
        let pairs: Vec<RangePair> = task.range_pairs().collect();
        assert_eq!(
            pairs,
            vec![
                RangePair {
                    source_range: "A1:A2".into(),
                    destination_range: "B1:B2".into(),
                },
                RangePair {
                    source_range: "C1".into(),
                    destination_range: "D1".into(),
                },
            ]
        );
    }

    #[test]
    fn test_range_pairs_empty_for_short_rows() {
        assert_eq!(task(&["T1", "src", "dst"]).range_pairs().count(), 0);
        assert_eq!(task(&["T1", "src", "dst", "TRUE", ""]).range_pairs().count(), 0);
    }

    #[test]
    fn test_range_pairs_are_restartable() {
        let task = task(&["T1", "src", "dst", "TRUE", "", "A1:A2", "B1:B2"]);
        let first: Vec<RangePair> = task.range_pairs().collect();
        let second: Vec<RangePair> = task.range_pairs().collect();
        assert_eq!(first, second);
    }
}

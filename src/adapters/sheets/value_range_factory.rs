use google_sheets4::api::ValueRange;
use serde_json::Value;
use std::borrow::Cow;

pub trait ValueRangeFactory {
    fn from_single_column<'a, T: Into<Cow<'a, str>> + Clone>(
        column_values: &[T],
        range: &str,
    ) -> Self;
}

fn wrap_value<'a, T: Into<Cow<'a, str>>>(value: T) -> Value {
    Value::String(value.into().into_owned())
}

impl ValueRangeFactory for ValueRange {
    /// One row per value, ROWS major, targeted at `range`. The shape the
    /// error report is written in.
    fn from_single_column<'a, T: Into<Cow<'a, str>> + Clone>(
        column_values: &[T],
        range: &str,
    ) -> Self {
        ValueRange {
            major_dimension: Some("ROWS".to_string()),
            range: Some(range.to_string()),
            values: Some(
                column_values
                    .iter()
                    .map(|col_item| vec![wrap_value(col_item.clone())])
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test for wrap "1" -> Value::String("1")
    #[test]
    fn test_wrap_value() {
        let value = wrap_value("1");
        assert_eq!(value, Value::String("1".to_string()));
    }

    #[test]
    fn test_from_single_column() {
        let value_range = ValueRange::from_single_column(&["1", "2"], "Errors!A1:A2");
        assert_eq!(
            value_range.major_dimension,
            Some("ROWS".to_string()),
            "Major dimension should be ROWS"
        );
        assert_eq!(value_range.range, Some("Errors!A1:A2".to_string()));
        assert_eq!(
            value_range.values,
            Some(vec![
                vec![Value::String("1".to_string())],
                vec![Value::String("2".to_string())]
            ]),
            "Values should be a single column with Value::String(\"1\") and Value::String(\"2\")"
        );
    }

    #[test]
    fn test_from_empty_column() {
        let value_range = ValueRange::from_single_column::<&str>(&[], "Errors!A1:A0");
        assert_eq!(value_range.values, Some(vec![]));
    }
}

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single table cell: numeric, or the raw string it arrived as.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableValue {
    Number(f64),
    String(String),
}

impl TableValue {
    /// Coerces the cell to a finite float. Blank strings, unparsable strings
    /// and non-finite numbers are all "no data" and yield `None`; they are
    /// excluded from classification and later take the sentinel color.
    pub fn as_numeric(&self) -> Option<f32> {
        match self {
            TableValue::Number(v) => {
                let v = *v as f32;
                v.is_finite().then_some(v)
            }
            TableValue::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f32>().ok().filter(|v| v.is_finite())
            }
        }
    }

    /// Stable text key used to de-duplicate region identifiers.
    pub fn id_key(&self) -> String {
        match self {
            TableValue::Number(v) => format!("{v}"),
            TableValue::String(s) => s.clone(),
        }
    }
}

impl From<f64> for TableValue {
    fn from(v: f64) -> Self {
        TableValue::Number(v)
    }
}

impl From<&str> for TableValue {
    fn from(s: &str) -> Self {
        TableValue::String(s.to_string())
    }
}

impl From<String> for TableValue {
    fn from(s: String) -> Self {
        TableValue::String(s)
    }
}

/// One table record: an ordered field name to value mapping.
pub type Row = IndexMap<String, TableValue>;

/// Extracts the finite numeric values of `field` across all rows, in row
/// order. Rows without a usable value are skipped.
pub fn numeric_values(rows: &[Row], field: &str) -> Vec<f32> {
    rows.iter()
        .filter_map(|row| row.get(field).and_then(TableValue::as_numeric))
        .collect()
}

#[cfg(test)]
pub(crate) fn test_row(pairs: &[(&str, TableValue)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::test_row as row;

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(TableValue::from(3.5).as_numeric(), Some(3.5));
        assert_eq!(TableValue::from("12.25").as_numeric(), Some(12.25));
        assert_eq!(TableValue::from(" 7 ").as_numeric(), Some(7.0));
    }

    #[test]
    fn test_blank_and_unparsable_are_no_data() {
        assert_eq!(TableValue::from("").as_numeric(), None);
        assert_eq!(TableValue::from("   ").as_numeric(), None);
        assert_eq!(TableValue::from("n/a").as_numeric(), None);
        assert_eq!(TableValue::from(f64::NAN).as_numeric(), None);
        assert_eq!(TableValue::from(f64::INFINITY).as_numeric(), None);
    }

    #[test]
    fn test_numeric_values_skips_missing() {
        let rows = vec![
            row(&[("id", "a".into()), ("val", 1.0.into())]),
            row(&[("id", "b".into()), ("val", "".into())]),
            row(&[("id", "c".into())]),
            row(&[("id", "d".into()), ("val", "4.5".into())]),
        ];
        assert_eq!(numeric_values(&rows, "val"), vec![1.0, 4.5]);
    }

    #[test]
    fn test_row_deserializes_from_json() {
        let row: Row =
            serde_json::from_str(r#"{"DivisionNm": "Melbourne", "pct": 52.3}"#).unwrap();
        assert_eq!(row["DivisionNm"], TableValue::from("Melbourne"));
        assert_eq!(row["pct"], TableValue::from(52.3));
    }
}

use crate::error::{Result, SpreadsheetError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

static CELL_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Z])([0-9]+)").unwrap());

/// A row number of any length, kept as its digits without leading zeros.
///
/// Ordered numerically: shorter digit runs sort first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowNumber(String);

impl RowNumber {
    /// Builds a row from a non-empty run of ASCII digits.
    pub(crate) fn from_digits(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            RowNumber(String::from("0"))
        } else {
            RowNumber(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for RowNumber {
    fn from(row: u64) -> Self {
        RowNumber(row.to_string())
    }
}

impl Ord for RowNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for RowNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RowNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A cell key: one column letter A-Z and a row number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    pub column: char,
    pub row: RowNumber,
}

impl CellAddress {
    pub fn new(column: char, row: u64) -> Self {
        Self {
            column,
            row: RowNumber::from(row),
        }
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

impl FromStr for CellAddress {
    type Err = SpreadsheetError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

/// Parses a cell id such as "A1" or "B23" into its column and row.
///
/// The first run of one uppercase letter followed by digits is used, so
/// surrounding text is ignored: `"xA12y"` parses as `A12`.
pub fn parse(cellid: &str) -> Result<CellAddress> {
    let caps = CELL_ID
        .captures(cellid)
        .ok_or_else(|| SpreadsheetError::InvalidCellId(cellid.to_string()))?;

    let column = caps[1]
        .chars()
        .next()
        .ok_or_else(|| SpreadsheetError::InvalidCellId(cellid.to_string()))?;
    let row = RowNumber::from_digits(&caps[2]);

    Ok(CellAddress { column, row })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple() {
        assert_eq!(parse("A1").unwrap(), CellAddress::new('A', 1));
        assert_eq!(parse("B23").unwrap(), CellAddress::new('B', 23));
        assert_eq!(parse("Z0").unwrap(), CellAddress::new('Z', 0));
    }

    #[test]
    fn test_parse_embedded() {
        assert_eq!(parse("xA12y").unwrap(), CellAddress::new('A', 12));
        assert_eq!(parse("cell C7 here").unwrap(), CellAddress::new('C', 7));
        // "A" is not followed by digits, so the match starts at "B"
        assert_eq!(parse("AB12").unwrap(), CellAddress::new('B', 12));
        // first match wins
        assert_eq!(parse("D4E5").unwrap(), CellAddress::new('D', 4));
    }

    #[test]
    fn test_leading_zeros_name_the_same_row() {
        assert_eq!(parse("A01").unwrap(), parse("A1").unwrap());
    }

    #[test]
    fn test_parse_invalid() {
        for id in ["", "X", "1A", "a1", "abc", "99999999999A"] {
            assert_eq!(
                parse(id),
                Err(SpreadsheetError::InvalidCellId(id.to_string())),
                "{id:?}"
            );
        }
    }

    #[test]
    fn test_rows_of_any_length() {
        let addr = parse("A99999999999").unwrap();
        assert_eq!(addr.row.as_str(), "99999999999");
        assert_eq!(addr.to_string(), "A99999999999");

        let long = format!("B{}", "1".repeat(40));
        assert_eq!(parse(&long).unwrap().to_string(), long);
        assert_eq!(parse("C000").unwrap(), CellAddress::new('C', 0));
    }

    #[test]
    fn test_row_ordering_is_numeric() {
        let mut rows: Vec<RowNumber> = ["10", "9", "100", "2"]
            .iter()
            .map(|digits| RowNumber::from_digits(digits))
            .collect();
        rows.sort();
        let sorted: Vec<&str> = rows.iter().map(RowNumber::as_str).collect();
        assert_eq!(sorted, vec!["2", "9", "10", "100"]);
    }

    #[test]
    fn test_display_and_from_str() {
        let addr: CellAddress = "B12".parse().unwrap();
        assert_eq!(addr.to_string(), "B12");
    }
}

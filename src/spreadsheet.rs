use crate::error::{Result, SpreadsheetError};
use crate::function::{evaluate, CellSource};
use crate::parser::{parse, CellAddress, RowNumber};
use log::{debug, trace};
use std::collections::BTreeMap;

/// Value read back for a cell that was never written.
pub const DEFAULT_VALUE: &str = "0";

/// Stored cell text, keyed by column and then by row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellStore {
    columns: BTreeMap<char, BTreeMap<RowNumber, String>>,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the value at `address`.
    pub fn write(&mut self, address: CellAddress, value: String) {
        self.columns
            .entry(address.column)
            .or_default()
            .insert(address.row, value);
    }

    /// Stored value at `address`, or [`DEFAULT_VALUE`] if unset.
    pub fn read(&self, address: &CellAddress) -> &str {
        self.columns
            .get(&address.column)
            .and_then(|rows| rows.get(&address.row))
            .map(String::as_str)
            .unwrap_or(DEFAULT_VALUE)
    }

    /// Number of stored cells.
    pub fn len(&self) -> usize {
        self.columns.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored cells in column-then-row order.
    pub fn iter(&self) -> impl Iterator<Item = (CellAddress, &str)> + '_ {
        self.columns.iter().flat_map(|(&column, rows)| {
            rows.iter().map(move |(row, value)| {
                let address = CellAddress {
                    column,
                    row: row.clone(),
                };
                (address, value.as_str())
            })
        })
    }
}

impl CellSource for CellStore {
    fn cell_value(&self, address: &CellAddress) -> String {
        self.read(address).to_string()
    }
}

/// A single sheet of cells.
#[derive(Debug, Clone, Default)]
pub struct Spreadsheet {
    cells: CellStore,
}

impl Spreadsheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell from a literal numeral or an `=`-prefixed formula.
    ///
    /// Formulas are evaluated against the current contents and only the
    /// numeric result is stored. Nothing is written when this fails.
    pub fn set_cell_value(&mut self, cellid: &str, value: &str) -> Result<()> {
        let stored = match value.strip_prefix('=') {
            Some(expression) => evaluate(expression, &self.cells)?,
            None if is_decimal_numeral(value) => value.to_string(),
            None => return Err(SpreadsheetError::InvalidNumber(value.to_string())),
        };
        let address = parse(cellid)?;
        debug!("set {} = {} (from {:?})", address, stored, value);
        self.cells.write(address, stored);
        Ok(())
    }

    /// Value of a cell, `"0"` if it was never set.
    pub fn get_cell_value(&self, cellid: &str) -> Result<&str> {
        if cellid.is_empty() {
            return Err(SpreadsheetError::InvalidCellId(String::new()));
        }
        let address = parse(cellid)?;
        let value = self.cells.read(&address);
        trace!("get {} -> {}", address, value);
        Ok(value)
    }

    pub fn cells(&self) -> &CellStore {
        &self.cells
    }
}

/// ASCII digits with at most one '.', and at least one digit.
fn is_decimal_numeral(value: &str) -> bool {
    let mut digits = 0;
    let mut dots = 0;
    for ch in value.chars() {
        match ch {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_store_defaults_to_zero() {
        let mut store = CellStore::new();
        assert_eq!(store.read(&CellAddress::new('A', 1)), "0");

        // column exists, row does not
        store.write(CellAddress::new('A', 1), "5".into());
        assert_eq!(store.read(&CellAddress::new('A', 2)), "0");
        assert_eq!(store.read(&CellAddress::new('Q', 1)), "0");
    }

    #[test]
    fn test_store_round_trip_and_overwrite() {
        let mut store = CellStore::new();
        let addr = CellAddress::new('C', 3);
        store.write(addr.clone(), "42".into());
        assert_eq!(store.read(&addr), "42");
        store.write(addr.clone(), "7.5".into());
        assert_eq!(store.read(&addr), "7.5");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_write_is_idempotent() {
        let mut once = CellStore::new();
        once.write(CellAddress::new('B', 2), "42".into());

        let mut twice = CellStore::new();
        twice.write(CellAddress::new('B', 2), "42".into());
        twice.write(CellAddress::new('B', 2), "42".into());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_store_iter_order() {
        let mut store = CellStore::new();
        store.write(CellAddress::new('B', 1), "3".into());
        store.write(CellAddress::new('A', 10), "2".into());
        store.write(CellAddress::new('A', 2), "1".into());

        let cells: Vec<String> = store
            .iter()
            .map(|(addr, value)| format!("{addr}={value}"))
            .collect();
        assert_eq!(cells, vec!["A2=1", "A10=2", "B1=3"]);
    }

    #[test]
    fn test_decimal_numeral() {
        for ok in ["0", "12", "19.10", "42.42", ".5", "5."] {
            assert!(is_decimal_numeral(ok), "{ok:?}");
        }
        for bad in ["", ".", "1.2.3", "-1", "+1", "1e5", "1,000", " 1", "abc", "١٢"] {
            assert!(!is_decimal_numeral(bad), "{bad:?}");
        }
    }

    #[test]
    fn test_set_literal_and_get() {
        let mut sheet = Spreadsheet::new();
        sheet.set_cell_value("A2", "42.42").unwrap();
        assert_eq!(sheet.get_cell_value("A2").unwrap(), "42.42");
    }

    #[test]
    fn test_set_formula_stores_result() {
        let mut sheet = Spreadsheet::new();
        sheet.set_cell_value("A2", "4").unwrap();
        sheet.set_cell_value("A3", "6").unwrap();
        sheet.set_cell_value("A1", "=A2+A3").unwrap();
        assert_eq!(sheet.get_cell_value("A1").unwrap(), "10");

        // not recalculated when a dependency changes
        sheet.set_cell_value("A2", "100").unwrap();
        assert_eq!(sheet.get_cell_value("A1").unwrap(), "10");
    }

    #[test]
    fn test_invalid_number_leaves_cell_unset() {
        let mut sheet = Spreadsheet::new();
        assert_eq!(
            sheet.set_cell_value("C1", "invalid_value"),
            Err(SpreadsheetError::InvalidNumber("invalid_value".into()))
        );
        assert_eq!(sheet.get_cell_value("C1").unwrap(), "0");
        assert!(sheet.cells().is_empty());
    }

    #[test]
    fn test_failed_formula_leaves_cell_unchanged() {
        let mut sheet = Spreadsheet::new();
        sheet.set_cell_value("D1", "3").unwrap();
        let err = sheet.set_cell_value("D1", "=A1+X").unwrap_err();
        assert!(matches!(err, SpreadsheetError::InvalidArithmeticExpression(_)));
        assert_eq!(sheet.get_cell_value("D1").unwrap(), "3");
    }

    #[test]
    fn test_invalid_cell_id_on_write() {
        let mut sheet = Spreadsheet::new();
        assert_eq!(
            sheet.set_cell_value("x", "1"),
            Err(SpreadsheetError::InvalidCellId("x".into()))
        );
        assert!(sheet.cells().is_empty());
    }

    #[test]
    fn test_get_invalid_cell_id() {
        let sheet = Spreadsheet::new();
        assert_eq!(
            sheet.get_cell_value(""),
            Err(SpreadsheetError::InvalidCellId(String::new()))
        );
        assert!(matches!(
            sheet.get_cell_value("invalid_cell"),
            Err(SpreadsheetError::InvalidCellId(_))
        ));
    }
}

//! A minimal in-memory spreadsheet.
//!
//! Cells are addressed as one uppercase column letter followed by a row
//! number (`A1`, `B23`). A cell holds a non-negative decimal literal, or the
//! result of an `=`-prefixed arithmetic formula evaluated when it is written.
//!
//! ```
//! use spreadsheet::Spreadsheet;
//!
//! let mut sheet = Spreadsheet::new();
//! sheet.set_cell_value("A1", "12").unwrap();
//! sheet.set_cell_value("A3", "19.10").unwrap();
//! sheet.set_cell_value("B1", "=A1+A3").unwrap();
//! assert_eq!(sheet.get_cell_value("B1").unwrap(), "31.1");
//! assert_eq!(sheet.get_cell_value("Z9").unwrap(), "0");
//! ```

pub mod error;
pub mod function;
pub mod parser;
pub mod spreadsheet;

pub use error::{Result, SpreadsheetError};
pub use function::{evaluate, CellSource};
pub use parser::{parse, CellAddress, RowNumber};
pub use spreadsheet::{CellStore, Spreadsheet, DEFAULT_VALUE};

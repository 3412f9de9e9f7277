use spreadsheet::Spreadsheet;
use std::io::{self, BufRead, Write};

/// Run the interactive command loop until `q` or end of input.
///
/// `A1=12` and `B1==A1+A3` set cells, `A1` prints a cell, `show` lists
/// every stored cell.
pub fn handle_commands<R: BufRead, W: Write>(
    sheet: &mut Spreadsheet,
    input: R,
    mut output: W,
) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        let command = line.trim();
        let status = if command == "q" {
            break;
        } else if command.is_empty() {
            continue;
        } else if command == "show" {
            for (address, value) in sheet.cells().iter() {
                writeln!(output, "{address} = {value}")?;
            }
            String::from("ok")
        } else if let Some((cellid, value)) = command.split_once('=') {
            match sheet.set_cell_value(cellid.trim(), value.trim()) {
                Ok(()) => String::from("ok"),
                Err(err) => err.to_string(),
            }
        } else {
            match sheet.get_cell_value(command) {
                Ok(value) => {
                    writeln!(output, "{value}")?;
                    String::from("ok")
                }
                Err(err) => err.to_string(),
            }
        };
        log::debug!("{command:?} -> {status}");
        writeln!(output, "({status})")?;
        output.flush()?;
    }
    Ok(())
}

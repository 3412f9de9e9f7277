mod commands;

use anyhow::Result;
use clap::Parser;
use commands::handle_commands;
use spreadsheet::Spreadsheet;
use std::io;

#[derive(Parser)]
#[command(name = "spreadsheet", version, about = "Minimal in-memory spreadsheet")]
struct Cli {
    /// Read commands from stdin instead of running the demo
    #[arg(short, long)]
    interactive: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut sheet = Spreadsheet::new();
    if cli.interactive {
        let stdin = io::stdin();
        handle_commands(&mut sheet, stdin.lock(), io::stdout())?;
        return Ok(());
    }

    sheet.set_cell_value("A3", "19.10")?;
    sheet.set_cell_value("A1", "12")?;
    sheet.set_cell_value("A2", "14")?;
    sheet.set_cell_value("B1", "=A1+A3")?;
    println!("{}", sheet.get_cell_value("B1")?);
    Ok(())
}

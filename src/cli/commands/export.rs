use std::fs;
use std::path::Path;

use anyhow::Result;

use crate::cli::ui;
use crate::store::{DataStore, Table};

/// Export a table as delimited text, to stdout or a file
pub fn execute(store: &DataStore, table: &str, output: Option<&Path>) -> Result<()> {
    let table = Table::parse(table)?;
    let csv = store.export_csv(table)?;

    match output {
        Some(path) => {
            fs::write(path, &csv)?;
            ui::print_success(&format!("Exported to {}", path.display()));
        }
        None => {
            print!("{}", csv);
        }
    }

    Ok(())
}

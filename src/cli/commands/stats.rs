use anyhow::Result;

use crate::cli::ui;
use crate::store::DataStore;

/// Row counts per table plus the approved-formula count
pub fn execute(store: &DataStore) -> Result<()> {
    ui::print_header("Statistics");

    let properties = store.load_properties()?;
    let propositions = store.load_propositions()?;
    let formulas = store.load_formulas()?;
    let approved = formulas.iter().filter(|f| f.approved).count();

    ui::print_result("Properties", &properties.len().to_string());
    ui::print_result("Atomic Propositions", &propositions.len().to_string());
    ui::print_result("LTL Formulas", &formulas.len().to_string());
    ui::print_result("Approved LTL", &approved.to_string());

    Ok(())
}

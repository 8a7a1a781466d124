use anyhow::Result;

use crate::cli::ui;
use crate::store::DataStore;

/// Recompute the complete-formalization join from the durable store
/// and display it. Cumulative across every document ever processed.
pub fn execute(store: &DataStore) -> Result<()> {
    ui::print_header("Complete Formalization Results");

    let records = store.complete_formalization()?;

    if records.is_empty() {
        ui::print_warning("Store is empty; run the pipeline first");
        return Ok(());
    }

    ui::print_success(&format!("{} complete formalizations", records.len()));
    println!();

    for record in &records {
        let status = if record.approved { "approved" } else { "pending" };
        println!(
            "[{}] RFC {} §{} ({}, {})",
            record.property_id, record.rfc_number, record.section, record.property_category, status
        );
        println!("  NL:  {}", ui::truncate(&record.natural_language, 100));
        if !record.atomic_propositions.is_empty() {
            println!("  AP:  {}", record.atomic_propositions);
        }
        if !record.ltl_formula.is_empty() {
            println!("  LTL: {}", record.ltl_formula);
        }
        println!();
    }

    if let Some(sample) = records.first() {
        ui::print_header("Sample Formalization");
        ui::print_result("Natural Language", &sample.natural_language);
        ui::print_result("Atomic Propositions", &sample.atomic_propositions);
        ui::print_result("LTL Formula", &sample.ltl_formula);
        ui::print_result("Explanation", &sample.ltl_explanation);
        ui::print_result("Operators", &sample.ltl_operators);
    }

    Ok(())
}

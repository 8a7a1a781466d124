use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Result;
use dialoguer::Select;
use log::info;

use crate::cli::ui;
use crate::errors::LtlGenError;
use crate::models::Property;
use crate::parser::RfcParser;
use crate::session::WorkflowSession;
use crate::store::DataStore;
use crate::traits::PropertyProcessor;

/// Walk an RFC document through the full pipeline: parse, extract
/// properties, review, extract propositions, approve, generate LTL,
/// approve, then view the cumulative results. Every stage persists its
/// output on success; a failed stage prints a warning and stops
/// without advancing.
pub async fn execute<P: PropertyProcessor>(
    processor: &P,
    store: &DataStore,
    input: &Path,
    approver: &str,
    interactive: bool,
) -> Result<()> {
    ui::print_header("RFC Property Extraction & LTL Generation");

    let mut session = WorkflowSession::new();

    // Stage 1: upload & parse
    let content = read_document(input)?;
    ui::print_info(&format!(
        "{} characters (~{} pages)",
        content.chars().count(),
        content.chars().count() / 3000
    ));

    let document = RfcParser::new().parse(&content);

    ui::print_result("RFC", &document.rfc_number);
    ui::print_result("Title", &document.title);
    ui::print_success(&format!(
        "Found {} property-rich sections",
        document.sections.len()
    ));

    for section in document.top_sections(5) {
        ui::display_section_summary(section);
    }

    if document.sections.is_empty() {
        ui::print_warning("No property-rich sections found; nothing to extract");
        return Ok(());
    }

    let spinner = ui::spinner_with_message("Extracting properties from all sections (1 API call)...");
    let properties = match processor
        .extract_properties(&document.sections, &document.rfc_number)
        .await
    {
        Ok(properties) => {
            spinner.finish_and_clear();
            properties
        }
        Err(e) => {
            spinner.finish_and_clear();
            report_stage_failure("Property extraction", &e);
            return Ok(());
        }
    };

    if properties.is_empty() {
        ui::print_warning("No properties extracted");
        return Ok(());
    }

    ui::print_success(&format!("Extracted {} properties", properties.len()));
    store.upsert_properties(&properties)?;

    session.document = Some(document);
    session.properties = properties;
    session.advance()?;

    // Stage 2: review properties
    ui::print_header(&format!(
        "Step 2: Review {} Extracted Properties",
        session.properties.len()
    ));

    for (i, property) in session.properties.iter().enumerate() {
        ui::display_property(i, property);
    }

    if interactive {
        review_properties(&mut session.properties)?;
        store.upsert_properties(&session.properties)?;

        if !ui::confirm_action("Extract atomic propositions?")? {
            ui::print_info("Stopping here; re-run to continue from a fresh extraction");
            return Ok(());
        }
    }

    let spinner = ui::spinner_with_message(&format!(
        "Extracting propositions for {} properties (1 API call)...",
        session.properties.len()
    ));
    let propositions = match processor.extract_propositions(&session.properties).await {
        Ok(propositions) => {
            spinner.finish_and_clear();
            propositions
        }
        Err(e) => {
            spinner.finish_and_clear();
            report_stage_failure("Proposition extraction", &e);
            return Ok(());
        }
    };

    if propositions.is_empty() {
        ui::print_warning("No propositions extracted");
        return Ok(());
    }

    ui::print_success(&format!("Extracted {} propositions", propositions.len()));
    store.upsert_propositions(&propositions)?;
    session.propositions = propositions;
    session.advance()?;

    // Stage 3: approve propositions, grouped by property
    ui::print_header("Step 3: Review & Approve Atomic Propositions");

    approve_propositions(&mut session, store, approver, interactive)?;

    if interactive && !ui::confirm_action("Generate LTL formulas?")? {
        ui::print_info("Stopping before formula generation");
        return Ok(());
    }

    let items = session.properties_with_propositions();
    let spinner = ui::spinner_with_message(&format!(
        "Generating LTL formulas for {} properties (1 API call)...",
        items.len()
    ));
    let formulas = match processor.generate_formulas(&items).await {
        Ok(formulas) => {
            spinner.finish_and_clear();
            formulas
        }
        Err(e) => {
            spinner.finish_and_clear();
            report_stage_failure("LTL generation", &e);
            return Ok(());
        }
    };

    if formulas.is_empty() {
        ui::print_warning("No LTL formulas generated");
        return Ok(());
    }

    ui::print_success(&format!("Generated {} LTL formulas", formulas.len()));
    store.upsert_formulas(&formulas)?;
    session.formulas = formulas;
    session.advance()?;

    // Stage 4: approve LTL formulas
    ui::print_header("Step 4: Review & Approve LTL Formulas");

    approve_formulas(&mut session, store, approver, interactive)?;
    session.advance()?;

    // Stage 5: view, recomputed from the durable store
    ui::print_header("Complete Formalization Results");

    let records = store.complete_formalization()?;
    ui::print_success(&format!("{} complete formalizations", records.len()));

    if let Some(sample) = records.first() {
        println!();
        ui::print_result("Natural Language", &sample.natural_language);
        ui::print_result("Atomic Propositions", &sample.atomic_propositions);
        ui::print_result("LTL Formula", &sample.ltl_formula);
        ui::print_result(
            "Status",
            if sample.approved {
                "Approved"
            } else {
                "Pending"
            },
        );
    }

    ui::print_info("Use `ltlgen export --table complete` to export the results");
    Ok(())
}

/// Read the document as UTF-8, tolerating invalid bytes
fn read_document(input: &Path) -> Result<String> {
    let bytes = fs::read(input)
        .map_err(|e| LtlGenError::InvalidInput(format!("Failed to read {}: {}", input.display(), e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn report_stage_failure(stage: &str, error: &LtlGenError) {
    info!("{} failed: {}", stage, error);
    ui::print_warning(&format!("{} failed: {}", stage, error));
    ui::print_info("Nothing was produced; fix the cause and re-run this stage");
}

/// Offer an edit pass over each extracted property
fn review_properties(properties: &mut [Property]) -> Result<()> {
    for (i, property) in properties.iter_mut().enumerate() {
        if !dialoguer::Confirm::with_theme(&ui::get_theme())
            .with_prompt(format!("Edit property {}?", i + 1))
            .default(false)
            .interact()?
        {
            continue;
        }

        property.text = ui::input_with_initial("Property text", &property.text)?;
        property.category = ui::select_category(&property.category)?;
    }
    Ok(())
}

fn approve_propositions(
    session: &mut WorkflowSession,
    store: &DataStore,
    approver: &str,
    interactive: bool,
) -> Result<()> {
    let properties: Vec<Property> = session.properties.clone();

    for property in &properties {
        let ids: Vec<String> = session
            .propositions
            .iter()
            .filter(|p| p.property_id == property.id)
            .map(|p| p.id.clone())
            .collect();

        if ids.is_empty() {
            continue;
        }

        println!();
        println!("{}", ui::truncate(&property.text, 80));
        for proposition in session
            .propositions
            .iter()
            .filter(|p| p.property_id == property.id)
        {
            ui::display_proposition(proposition);
        }

        if interactive && !ui::confirm_action("Approve these propositions?")? {
            continue;
        }

        if interactive {
            store.approve_propositions(&ids, approver)?;
            for proposition in session
                .propositions
                .iter_mut()
                .filter(|p| ids.contains(&p.id))
            {
                proposition.approved = true;
                proposition.approved_by = approver.to_string();
            }
            ui::print_success("Approved");
        }
    }

    Ok(())
}

fn approve_formulas(
    session: &mut WorkflowSession,
    store: &DataStore,
    approver: &str,
    interactive: bool,
) -> Result<()> {
    let properties: HashMap<String, Property> = session
        .properties
        .iter()
        .map(|p| (p.id.clone(), p.clone()))
        .collect();

    for formula in session.formulas.iter_mut() {
        let Some(property) = properties.get(&formula.property_id) else {
            continue;
        };

        println!();
        ui::print_result("Property", &ui::truncate(&property.text, 80));
        ui::display_formula(formula);

        if !interactive {
            continue;
        }

        let action = Select::with_theme(&ui::get_theme())
            .with_prompt("Review this formula")
            .items(&["Approve", "Edit and approve", "Skip"])
            .default(0)
            .interact()?;

        match action {
            0 => {
                store.approve_formulas(&[formula.id.clone()], approver)?;
                formula.approved = true;
                formula.approved_by = approver.to_string();
                ui::print_success("LTL approved");
            }
            1 => {
                formula.formula = ui::input_with_initial("LTL formula", &formula.formula)?;
                formula.explanation =
                    ui::input_with_initial("Explanation", &formula.explanation)?;
                store.upsert_formulas(std::slice::from_ref(formula))?;
                store.approve_formulas(&[formula.id.clone()], approver)?;
                formula.approved = true;
                formula.approved_by = approver.to_string();
                ui::print_success("LTL edited and approved");
            }
            _ => {
                ui::print_info("Skipped");
            }
        }
    }

    Ok(())
}

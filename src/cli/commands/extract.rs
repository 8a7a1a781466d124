use std::fs;
use std::path::Path;

use anyhow::{anyhow, Result};

use crate::cli::ui;
use crate::parser::RfcParser;

/// Parse a document and show its property-rich sections without
/// calling the model
pub fn execute(input: &Path, show_content: bool) -> Result<()> {
    ui::print_header("Section Extraction");

    let bytes = fs::read(input).map_err(|e| anyhow!("Failed to read {}: {}", input.display(), e))?;
    let content = String::from_utf8_lossy(&bytes);

    let document = RfcParser::new().parse(&content);

    ui::print_result("RFC", &document.rfc_number);
    ui::print_result("Title", &document.title);
    ui::print_result("Characters", &document.total_chars.to_string());
    ui::print_result(
        "Property-rich sections",
        &document.sections.len().to_string(),
    );

    if document.sections.is_empty() {
        ui::print_warning("No sections passed the keyword-density filter");
        return Ok(());
    }

    println!();
    for section in &document.sections {
        ui::display_section_summary(section);
        if show_content {
            ui::print_text(&section.content);
            println!();
        }
    }

    Ok(())
}

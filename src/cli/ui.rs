use colored::*;
use console::Term;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use textwrap::wrap;

use crate::models::common::PropertyCategory;
use crate::models::document::Section;
use crate::models::{LtlFormula, Property, Proposition};

/// UI theme for consistent appearance
pub fn get_theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

/// Print a section header
pub fn print_header(title: &str) {
    let title = format!(" {} ", title);
    println!("\n{}\n", title.bold().white().on_blue());
}

/// Print text with proper wrapping
pub fn print_text(text: &str) {
    let width = Term::stdout().size().1 as usize;
    for line in text.lines() {
        for wrapped_line in wrap(line, width.saturating_sub(10)) {
            println!("{}", wrapped_line);
        }
    }
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "ERROR:".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "WARNING:".yellow().bold(), message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "SUCCESS:".green().bold(), message);
}

/// Print information
pub fn print_info(message: &str) {
    println!("{} {}", "INFO:".blue().bold(), message);
}

/// Print a formatted result
pub fn print_result(label: &str, value: &str) {
    println!("{}: {}", label.bold(), value);
}

/// Display a spinner while waiting for an operation to complete
pub fn spinner_with_message(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Confirm an action with the user
pub fn confirm_action(prompt: &str) -> std::io::Result<bool> {
    Confirm::with_theme(&get_theme())
        .with_prompt(prompt)
        .default(true)
        .interact()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

/// Prompt for a line of input with an editable initial value
pub fn input_with_initial(prompt: &str, initial: &str) -> std::io::Result<String> {
    Input::with_theme(&get_theme())
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

/// Interactive selection of a property category
pub fn select_category(current: &PropertyCategory) -> std::io::Result<PropertyCategory> {
    let categories = ["Safety", "Liveness", "Ordering", "Timing", "Unknown"];
    let default = categories
        .iter()
        .position(|c| *c == current.to_string())
        .unwrap_or(categories.len() - 1);

    let selection = Select::with_theme(&get_theme())
        .with_prompt("Property category")
        .items(&categories)
        .default(default)
        .interact()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    Ok(PropertyCategory::parse(categories[selection]))
}

/// One summary line per ranked section
pub fn display_section_summary(section: &Section) {
    println!(
        "  {} {} ({} keywords)",
        format!("Section {}:", section.number).bold(),
        section.title,
        section.keyword_count
    );
}

/// Compact property listing used during review
pub fn display_property(index: usize, property: &Property) {
    println!(
        "{} [{}] {}",
        format!("{:>3}.", index + 1).bold(),
        property.category.to_string().cyan(),
        truncate(&property.text, 80)
    );
    println!(
        "     {} {}  {} {}",
        "id:".dimmed(),
        property.id,
        "section:".dimmed(),
        property.section
    );
}

pub fn display_proposition(proposition: &Proposition) {
    let status = if proposition.approved {
        "✓".green()
    } else {
        "•".yellow()
    };
    println!(
        "  {} {} ({}) - {}",
        status,
        proposition.name.bold(),
        proposition.kind,
        truncate(&proposition.description, 60)
    );
}

pub fn display_formula(formula: &LtlFormula) {
    println!("  {}", formula.formula.bold().cyan());
    if !formula.explanation.is_empty() {
        print_text(&format!("  {}", formula.explanation));
    }
    println!("  {} {}", "operators:".dimmed(), formula.operators_joined());
}

pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let cut: String = text.chars().take(limit).collect();
        format!("{}...", cut)
    }
}

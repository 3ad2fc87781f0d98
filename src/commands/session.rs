use anyhow::Result;
use colored::*;
use is_terminal::IsTerminal;
use log::{info, warn};

use super::lookup::report;
use super::{CommandStatus, build_lookup};
use crate::config::Config;
use crate::ui::OutputFormat;
use crate::ui::prompts::{prompt_grade_item, prompt_last6};

/// Keep prompting for lookups until an empty ID is entered.
///
/// Lookups share one loader, so the roster is fetched at most once per
/// cache interval however many submissions are made.
pub async fn session_command(config: &Config, details: bool) -> Result<CommandStatus> {
    if !std::io::stdin().is_terminal() {
        warn!("Session requested without an interactive terminal");
        eprintln!("The session command needs an interactive terminal; use 'lookup --id' instead.");
        return Ok(CommandStatus::InvalidInput);
    }

    let lookup = match build_lookup(config) {
        Ok(lookup) => lookup,
        Err(e) => return Ok(report(&Err(e), OutputFormat::Text, details)),
    };
    let labels: Vec<String> = config.lookup.grades.labels().map(str::to_string).collect();

    println!("{}", "📘 Grades Viewer".bold());
    println!(
        "{}",
        "Enter the last 6 digits of your ID Number, then choose which grade item to view.".dimmed()
    );
    println!("{}", "Leave the ID empty to quit.".dimmed());

    let mut last_label: Option<String> = None;
    let mut lookups = 0usize;

    loop {
        println!();
        let query = prompt_last6(true)?;
        if query.is_empty() {
            break;
        }

        let label = prompt_grade_item(&labels, last_label.as_deref())?;
        let result = lookup.lookup(&query, &label).await;
        report(&result, OutputFormat::Text, details);

        last_label = Some(label);
        lookups += 1;
    }

    info!("Session ended after {} lookups", lookups);
    Ok(CommandStatus::Success)
}

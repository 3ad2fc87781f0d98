use anyhow::Result;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use is_terminal::IsTerminal;
use log::{debug, info, warn};

use super::{CommandStatus, build_lookup};
use crate::config::Config;
use crate::grades::{GradeCatalog, LookupError, LookupOutcome};
use crate::ui::OutputFormat;
use crate::ui::prompts::{prompt_grade_item, prompt_last6};
use crate::ui::render::{error_json, outcome_json, render_error, render_outcome};

#[derive(Debug, Clone, Default)]
pub struct LookupOptions {
    pub id: Option<String>,
    pub grade: Option<String>,
    pub format: OutputFormat,
    pub details: bool,
}

/// Map user input onto a configured grade label: exact, then
/// case-insensitive, then the single best fuzzy match.
pub fn resolve_label(catalog: &GradeCatalog, input: &str) -> Option<String> {
    let input = input.trim();

    if catalog.column_for(input).is_some() {
        return Some(input.to_string());
    }

    if let Some(label) = catalog.labels().find(|l| l.eq_ignore_ascii_case(input)) {
        return Some(label.to_string());
    }

    let matcher = SkimMatcherV2::default();
    let mut scored: Vec<(i64, &str)> = catalog
        .labels()
        .filter_map(|label| matcher.fuzzy_match(label, input).map(|score| (score, label)))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    match scored.as_slice() {
        [(best, label), rest @ ..] if rest.first().is_none_or(|(next, _)| next < best) => {
            debug!("Resolved grade item '{}' to '{}'", input, label);
            Some(label.to_string())
        }
        _ => None,
    }
}

/// Print one lookup result in the requested format.
pub fn report(
    result: &Result<LookupOutcome, LookupError>,
    format: OutputFormat,
    details: bool,
) -> CommandStatus {
    match (format, result) {
        (OutputFormat::Text, Ok(outcome)) => println!("{}", render_outcome(outcome, details)),
        (OutputFormat::Text, Err(e)) => println!("{}", render_error(e)),
        (OutputFormat::Json, Ok(outcome)) => println!("{}", outcome_json(outcome)),
        (OutputFormat::Json, Err(e)) => println!("{}", error_json(e)),
    }
    CommandStatus::from_result(result)
}

/// Look up one grade. Missing arguments are prompted for on a terminal.
pub async fn lookup_command(config: &Config, options: LookupOptions) -> Result<CommandStatus> {
    info!("Executing lookup command");

    let interactive = std::io::stdin().is_terminal() && options.format == OutputFormat::Text;
    run_lookup(config, options, interactive).await
}

async fn run_lookup(
    config: &Config,
    options: LookupOptions,
    interactive: bool,
) -> Result<CommandStatus> {
    let lookup = match build_lookup(config) {
        Ok(lookup) => lookup,
        Err(e) => return Ok(report(&Err(e), options.format, options.details)),
    };

    let labels: Vec<String> = config.lookup.grades.labels().map(str::to_string).collect();

    let query = match options.id {
        Some(id) => id.trim().to_string(),
        None if interactive => prompt_last6(false)?,
        None => {
            warn!("No --id given and stdin is not a terminal");
            if options.format == OutputFormat::Text {
                eprintln!("Pass the last 6 digits of the ID with --id.");
            }
            let missing = Err(LookupError::InvalidQuery {
                query: String::new(),
            });
            return Ok(report(&missing, options.format, options.details));
        }
    };

    let label = match options.grade {
        Some(input) => resolve_label(&config.lookup.grades, &input).unwrap_or_else(|| {
            warn!("No configured grade item matches '{}'", input);
            input
        }),
        None if interactive => prompt_grade_item(&labels, None)?,
        None => labels.first().cloned().unwrap_or_default(),
    };

    let result = lookup.lookup(&query, &label).await;
    Ok(report(&result, options.format, options.details))
}

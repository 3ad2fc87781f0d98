use anyhow::Result;
use dialoguer::{Input, Select};

/// Ask for the last six digits of the student ID.
///
/// # Arguments
/// * `allow_empty` - Accept an empty answer (used to end an interactive session)
///
/// # Returns
/// * `Ok(String)` - The trimmed input, possibly empty when `allow_empty` is set
pub fn prompt_last6(allow_empty: bool) -> Result<String> {
    let input = Input::<String>::new()
        .with_prompt("Last 6 digits of ID (e.g., 123456)")
        .allow_empty(allow_empty)
        .interact_text()?;

    Ok(input.trim().to_string())
}

/// Arrow-key selection of a configured grade item.
///
/// # Arguments
/// * `labels` - Grade labels in configured order
/// * `default_label` - Label to preselect, if any
///
/// # Returns
/// * `Ok(String)` - The selected label
pub fn prompt_grade_item(labels: &[String], default_label: Option<&str>) -> Result<String> {
    let default_index = default_label
        .and_then(|label| labels.iter().position(|l| l == label))
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Select grade item")
        .items(labels)
        .default(default_index)
        .interact()?;

    Ok(labels[selection].clone())
}

/// Yes/No selection before replacing an existing config file; "No" is preselected.
pub fn prompt_overwrite_confirmation(path: &str) -> Result<bool> {
    let selection = Select::new()
        .with_prompt(format!("Config file '{}' already exists. Overwrite?", path))
        .items(&["Yes", "No"])
        .default(1)
        .interact()?;

    Ok(selection == 0)
}

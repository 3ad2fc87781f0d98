use anyhow::Result;
use colored::*;

use crate::config::Config;

/// List configured grade items with their columns and breakdowns.
pub async fn grades_command(config: &Config) -> Result<()> {
    let lookup = &config.lookup;

    println!("Grade Items:");
    println!("============");

    for (label, column) in lookup.grades.iter() {
        println!("\n{}", label.bold());
        println!("  column → {}", column);

        let breakdown = lookup.breakdown.columns_for(label);
        if !breakdown.is_empty() {
            println!("  breakdown → {}", breakdown.join(", "));
        }
    }

    println!("\nID column: {}", lookup.id_column.cyan());
    println!("Total grade items: {}", lookup.grades.len());

    Ok(())
}

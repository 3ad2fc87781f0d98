use anyhow::Result;
use log::{error, info};

use super::lookup::report;
use super::{CommandStatus, build_lookup};
use crate::config::Config;
use crate::ui::OutputFormat;
use crate::ui::render::render_diagnosis;

/// Load the sheet and verify every configured column exists.
pub async fn check_command(config: &Config, format: OutputFormat) -> Result<CommandStatus> {
    info!("Executing check command");

    let diagnosis = match build_lookup(config) {
        Ok(lookup) => lookup.diagnose().await,
        Err(e) => Err(e),
    };

    let diagnosis = match diagnosis {
        Ok(diagnosis) => diagnosis,
        Err(e) => {
            error!("Check failed: {}", e);
            return Ok(report(&Err(e), format, false));
        }
    };

    match format {
        OutputFormat::Text => println!("{}", render_diagnosis(&diagnosis)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&diagnosis)?),
    }

    if diagnosis.is_healthy() {
        info!("All configured columns present");
        Ok(CommandStatus::Success)
    } else {
        Ok(CommandStatus::OperatorError)
    }
}

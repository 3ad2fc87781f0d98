use once_cell::sync::Lazy;
use regex::Regex;

use super::LoadError;

static SHEET_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/spreadsheets/d/([a-zA-Z0-9_-]+)").expect("valid sheet id pattern"));
static GID: Lazy<Regex> = Lazy::new(|| Regex::new(r"gid=([0-9]+)").expect("valid gid pattern"));

/// Turn a regular Google Sheets link into its CSV export link.
///
/// The tab is taken from `gid=` when present, otherwise the first tab (`0`).
/// The sheet must be viewable by link for the export to succeed.
pub fn build_csv_export_url(sheet_url: &str) -> Result<String, LoadError> {
    let sheet_url = sheet_url.trim();

    let sheet_id = SHEET_ID
        .captures(sheet_url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| LoadError::InvalidSheetUrl(sheet_url.to_string()))?;

    let gid = GID
        .captures(sheet_url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or("0");

    Ok(format!(
        "https://docs.google.com/spreadsheets/d/{}/export?format=csv&gid={}",
        sheet_id, gid
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_link_with_gid() {
        let url = "https://docs.google.com/spreadsheets/d/1AbC-d_9/edit#gid=184302";
        assert_eq!(
            build_csv_export_url(url).unwrap(),
            "https://docs.google.com/spreadsheets/d/1AbC-d_9/export?format=csv&gid=184302"
        );
    }

    #[test]
    fn test_defaults_to_first_tab() {
        let url = "  https://docs.google.com/spreadsheets/d/1AbC/edit?usp=sharing ";
        assert_eq!(
            build_csv_export_url(url).unwrap(),
            "https://docs.google.com/spreadsheets/d/1AbC/export?format=csv&gid=0"
        );
    }

    #[test]
    fn test_rejects_non_sheet_links() {
        let err = build_csv_export_url("https://example.com/grades.csv").unwrap_err();
        assert!(matches!(err, LoadError::InvalidSheetUrl(_)));
    }
}

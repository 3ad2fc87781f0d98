use log::debug;

use super::normalize::{NormalizeMode, last6, normalize_id};
use super::roster::{Roster, Row};

/// Rows whose normalized identifier ends in `query`, in roster order.
///
/// Identifiers shorter than six characters never match a six-digit query.
pub fn find_matches<'a>(
    roster: &'a Roster,
    id_column: &str,
    query: &str,
    mode: NormalizeMode,
) -> Vec<&'a Row> {
    let matches: Vec<&Row> = roster
        .rows()
        .iter()
        .filter(|row| last6(&normalize_id(row.get(id_column), mode)) == query)
        .collect();

    debug!(
        "Matched {} of {} rows on column '{}'",
        matches.len(),
        roster.len(),
        id_column
    );
    matches
}

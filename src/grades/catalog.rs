use serde::Serialize;
use std::collections::HashMap;

/// Display label to roster column, in configured order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GradeCatalog {
    entries: Vec<(String, String)>,
}

impl GradeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the column for `label`, keeping its first position.
    pub fn insert(&mut self, label: impl Into<String>, column: impl Into<String>) {
        let label = label.into();
        let column = column.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = column,
            None => self.entries.push((label, column)),
        }
    }

    pub fn column_for(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, c)| c.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, c)| (l.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L: Into<String>, C: Into<String>> FromIterator<(L, C)> for GradeCatalog {
    fn from_iter<I: IntoIterator<Item = (L, C)>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for (label, column) in iter {
            catalog.insert(label, column);
        }
        catalog
    }
}

/// Optional sub-component columns per grade label, shown for transparency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BreakdownCatalog {
    components: HashMap<String, Vec<String>>,
}

impl BreakdownCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, columns: Vec<String>) {
        self.components.insert(label.into(), columns);
    }

    /// Breakdown columns for `label`; empty when none are configured.
    pub fn columns_for(&self, label: &str) -> &[String] {
        self.components.get(label).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_preserves_order_and_replaces_in_place() {
        let mut catalog: GradeCatalog = [("Quiz #1", "Quiz 1 Scores"), ("Midterm", "Midterm Total")]
            .into_iter()
            .collect();
        catalog.insert("Quiz #1", "Quiz 1 (final)");

        assert_eq!(catalog.labels().collect::<Vec<_>>(), ["Quiz #1", "Midterm"]);
        assert_eq!(catalog.column_for("Quiz #1"), Some("Quiz 1 (final)"));
        assert_eq!(catalog.column_for("Final"), None);
    }

    #[test]
    fn test_breakdown_defaults_to_empty() {
        let mut breakdown = BreakdownCatalog::new();
        breakdown.insert("Midterm", vec!["Part A".to_string()]);

        assert_eq!(breakdown.columns_for("Midterm"), ["Part A"]);
        assert!(breakdown.columns_for("Quiz #1").is_empty());
    }
}

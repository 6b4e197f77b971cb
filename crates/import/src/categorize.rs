use cuenta_core::{Category, CategoryTable, DEFAULT_CATEGORY};

/// Keyword categorizer over an ordered [`CategoryTable`].
///
/// Matching is a case-insensitive substring test and the first category in
/// table order wins, so overlapping keyword sets are resolved by position.
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    table: CategoryTable,
}

impl CategoryClassifier {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }

    pub fn find_matching_category(&self, company_name: &str) -> Option<&Category> {
        let name = company_name.to_lowercase();
        self.table
            .iter()
            .find(|category| category.keywords.iter().any(|k| name.contains(k.as_str())))
    }

    /// Category for a normalized company name, `"Otros"` when nothing matches.
    pub fn categorize(&self, company_name: &str) -> &str {
        self.find_matching_category(company_name)
            .map(|c| c.name.as_str())
            .unwrap_or(DEFAULT_CATEGORY)
    }
}

//! Ordered keyword tables loaded from configuration.
//!
//! Both tables are written as maps in the config file, but iteration order is
//! meaningful (first match wins), so they deserialize into vectors that keep
//! the document order.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::config::ConfigError;

/// Built-in alias table used when the configuration has no `common_companies`.
pub const DEFAULT_COMPANIES: &[(&str, &[&str])] = &[
    ("mcdonalds", &["mcdonald's", "mcdonalds"]),
    ("starbucks", &["starbucks"]),
    ("walmart", &["walmart", "wal-mart"]),
    ("netflix", &["netflix"]),
    ("amazon", &["amazon.com", "amazon"]),
    ("don julios", &["don julios", "tst*don julios"]),
    ("square", &["square inc"]),
    ("zelle", &["zelle payment"]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownCompany {
    pub canonical: String,
    pub variants: Vec<String>,
}

/// Category name → keyword substrings, in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    pub fn new<N, K, I>(entries: I) -> Self
    where
        N: Into<String>,
        K: Into<String>,
        I: IntoIterator<Item = (N, Vec<K>)>,
    {
        let categories = entries
            .into_iter()
            .map(|(name, keywords)| Category {
                name: name.into(),
                keywords: keywords.into_iter().map(|k| k.into().to_lowercase()).collect(),
            })
            .collect();
        Self { categories }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Rejects an empty table and blank keywords; a blank keyword would
    /// match every name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.categories.is_empty() {
            return Err(ConfigError::ConfigurationMissing(
                "categorias is empty".to_string(),
            ));
        }
        for category in &self.categories {
            if category.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(ConfigError::ConfigurationMissing(format!(
                    "category '{}' has a blank keyword",
                    category.name
                )));
            }
        }
        Ok(())
    }
}

/// Canonical company name → lowercase textual variants, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyAliasTable {
    companies: Vec<KnownCompany>,
}

impl CompanyAliasTable {
    pub fn new<N, V, I>(entries: I) -> Self
    where
        N: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (N, Vec<V>)>,
    {
        let companies = entries
            .into_iter()
            .map(|(canonical, variants)| KnownCompany {
                canonical: canonical.into(),
                variants: variants.into_iter().map(|v| v.into().to_lowercase()).collect(),
            })
            .collect();
        Self { companies }
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnownCompany> {
        self.companies.iter()
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for company in &self.companies {
            if company.variants.iter().any(|v| v.trim().is_empty()) {
                return Err(ConfigError::ConfigurationMissing(format!(
                    "company '{}' has a blank variant",
                    company.canonical
                )));
            }
        }
        Ok(())
    }
}

impl Default for CompanyAliasTable {
    fn default() -> Self {
        Self::new(
            DEFAULT_COMPANIES
                .iter()
                .map(|(name, variants)| (*name, variants.to_vec())),
        )
    }
}

// ── serde: ordered maps ───────────────────────────────────────────────────────

struct OrderedEntries;

impl<'de> Visitor<'de> for OrderedEntries {
    type Value = Vec<(String, Vec<String>)>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of names to lists of strings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, values)) = map.next_entry::<String, Vec<String>>()? {
            entries.push((key, values));
        }
        Ok(entries)
    }
}

fn ordered_entries<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<(String, Vec<String>)>, D::Error> {
    deserializer.deserialize_map(OrderedEntries)
}

impl<'de> Deserialize<'de> for CategoryTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ordered_entries(deserializer).map(CategoryTable::new)
    }
}

impl<'de> Deserialize<'de> for CompanyAliasTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ordered_entries(deserializer).map(CompanyAliasTable::new)
    }
}

impl Serialize for CategoryTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.categories.iter().map(|c| (&c.name, &c.keywords)))
    }
}

impl Serialize for CompanyAliasTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.companies.iter().map(|c| (&c.canonical, &c.variants)))
    }
}

use serde::{Deserialize, Serialize};

/// Entity classes produced by CoNLL-style token-classification models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityLabel {
    Organization,
    Miscellaneous,
    Person,
    Location,
    Other(String),
}

impl EntityLabel {
    /// Accepts both grouped (`ORG`) and BIO-tagged (`B-ORG`) labels.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag
            .strip_prefix("B-")
            .or_else(|| tag.strip_prefix("I-"))
            .unwrap_or(tag);
        match tag.to_uppercase().as_str() {
            "ORG" => EntityLabel::Organization,
            "MISC" => EntityLabel::Miscellaneous,
            "PER" => EntityLabel::Person,
            "LOC" => EntityLabel::Location,
            other => EntityLabel::Other(other.to_string()),
        }
    }

    /// Whether the entity can stand in for a merchant name.
    pub fn is_company_like(&self) -> bool {
        matches!(self, EntityLabel::Organization | EntityLabel::Miscellaneous)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub label: EntityLabel,
    /// Surface text as returned by the model (may carry `##` word pieces).
    pub text: String,
    /// Model confidence (0.0–1.0).
    pub score: f32,
}

impl Entity {
    pub fn new(label: EntityLabel, text: impl Into<String>, score: f32) -> Self {
        Self { label, text: text.into(), score: score.clamp(0.0, 1.0) }
    }
}

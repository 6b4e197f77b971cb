//! Company-name resolution.
//!
//! A raw description is cleaned once, then handed to an ordered list of
//! strategies; the first one that produces a non-empty name wins. The chain
//! always ends in the heuristic fallback, so `resolve` never fails.

use std::sync::{Arc, OnceLock};

use regex::Regex;

use cuenta_core::{CompanyAliasTable, StatementConfig};
use cuenta_ner::{DisabledRecognizer, EntityRecognizer};

use crate::normalize::normalize_company_name;
use crate::patterns::{self, NamedPattern, PatternError};

fn re_fallback_noise() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"[0-9#*]+").expect("invalid regex"))
}

/// One way of turning cleaned statement text into a company name.
pub trait NameStrategy: Send + Sync {
    /// Short identifier used in logs and resolution reports.
    fn name(&self) -> &'static str;

    /// `cleaned` is uppercased and stripped of discard patterns.
    fn try_resolve(&self, cleaned: &str) -> Option<String>;
}

// ── Cleaning ──────────────────────────────────────────────────────────────────

/// Ordered discard patterns applied before any strategy runs.
#[derive(Debug, Clone)]
pub struct DiscardRules {
    patterns: Vec<Regex>,
}

impl DiscardRules {
    pub fn new(patterns: Vec<Regex>) -> Self {
        Self { patterns }
    }

    /// Uppercase, strip every discard pattern in order, collapse whitespace.
    pub fn clean(&self, text: &str) -> String {
        let upper = text.to_uppercase();
        let stripped = self
            .patterns
            .iter()
            .fold(upper, |acc, re| re.replace_all(&acc, "").into_owned());
        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

// ── Strategies ────────────────────────────────────────────────────────────────

/// Statement-shape patterns. The first pattern that matches decides: its
/// capture is returned, or nothing if it normalizes to an empty name.
pub struct PatternStrategy {
    patterns: Vec<NamedPattern>,
}

impl PatternStrategy {
    pub fn new(patterns: Vec<NamedPattern>) -> Self {
        Self { patterns }
    }
}

impl NameStrategy for PatternStrategy {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn try_resolve(&self, cleaned: &str) -> Option<String> {
        let (pattern, caps) = self
            .patterns
            .iter()
            .find_map(|p| p.regex.captures(cleaned).map(|c| (p, c)))?;
        tracing::trace!(pattern = %pattern.name, "statement pattern matched");
        let name = normalize_company_name(caps.get(1).map_or("", |m| m.as_str()));
        (!name.is_empty()).then_some(name)
    }
}

/// Known-company lookup by substring containment of any variant.
pub struct AliasStrategy {
    table: CompanyAliasTable,
}

impl AliasStrategy {
    pub fn new(table: CompanyAliasTable) -> Self {
        Self { table }
    }
}

impl NameStrategy for AliasStrategy {
    fn name(&self) -> &'static str {
        "alias"
    }

    fn try_resolve(&self, cleaned: &str) -> Option<String> {
        let text = cleaned.to_lowercase();
        self.table
            .iter()
            .find(|company| company.variants.iter().any(|v| text.contains(v.as_str())))
            .map(|company| normalize_company_name(&company.canonical))
            .filter(|name| !name.is_empty())
    }
}

/// Named-entity recognition. Recognizer failures degrade to `None`.
pub struct EntityStrategy {
    recognizer: Arc<dyn EntityRecognizer>,
}

impl EntityStrategy {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self { recognizer }
    }
}

impl NameStrategy for EntityStrategy {
    fn name(&self) -> &'static str {
        "entity"
    }

    fn try_resolve(&self, cleaned: &str) -> Option<String> {
        if cleaned.is_empty() {
            return None;
        }
        let entities = match self.recognizer.recognize(cleaned) {
            Ok(entities) => entities,
            Err(e) => {
                tracing::debug!(error = %e, "entity recognition unavailable, using fallback");
                return None;
            }
        };
        entities
            .iter()
            .filter(|e| e.label.is_company_like())
            .map(|e| normalize_company_name(&e.text.replace(" ##", "")))
            .find(|name| !name.is_empty())
    }
}

/// Last resort: drop digits, `#` and `*`, keep up to four words longer than
/// two characters.
pub fn heuristic_name(cleaned: &str) -> String {
    let spaced = re_fallback_noise().replace_all(cleaned, " ");
    let words: Vec<&str> = spaced
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .take(4)
        .collect();
    normalize_company_name(&words.join(" "))
}

// ── Resolver ──────────────────────────────────────────────────────────────────

/// Which stage produced a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub name: String,
    pub stage: &'static str,
}

pub struct CompanyNameResolver {
    discard: DiscardRules,
    strategies: Vec<Box<dyn NameStrategy>>,
}

impl CompanyNameResolver {
    pub fn new(discard: DiscardRules, strategies: Vec<Box<dyn NameStrategy>>) -> Self {
        Self { discard, strategies }
    }

    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::default()
    }

    /// Default patterns and the built-in alias table, no entity recognizer.
    pub fn with_defaults() -> Result<Self, PatternError> {
        Self::builder().build()
    }

    /// Patterns and aliases from configuration; the recognizer is injected by
    /// the caller so its lifetime stays explicit.
    pub fn from_config(
        config: &StatementConfig,
        recognizer: Arc<dyn EntityRecognizer>,
    ) -> Result<Self, PatternError> {
        let mut builder = Self::builder()
            .aliases(config.companies())
            .recognizer(recognizer);
        if let Some(discard) = &config.discard_patterns {
            builder = builder.discard_patterns(patterns::compile_discard_patterns(discard.as_slice())?);
        }
        if let Some(extraction) = &config.extraction_patterns {
            builder = builder.extraction_patterns(patterns::configured_extraction_patterns(extraction)?);
        }
        builder.build()
    }

    pub fn clean(&self, raw_description: &str) -> String {
        self.discard.clean(raw_description)
    }

    /// Normalized company name for a raw description. Empty only when the
    /// cleaned text leaves nothing to work with.
    pub fn resolve(&self, raw_description: &str) -> String {
        self.resolve_traced(raw_description).name
    }

    pub fn resolve_traced(&self, raw_description: &str) -> Resolution {
        let cleaned = self.clean(raw_description);
        for strategy in &self.strategies {
            if let Some(name) = strategy.try_resolve(&cleaned) {
                return Resolution { name, stage: strategy.name() };
            }
        }
        Resolution { name: heuristic_name(&cleaned), stage: "fallback" }
    }
}

/// Assembles the standard four-stage chain. Anything left unset uses the
/// defaults from [`patterns`] and the built-in alias table.
#[derive(Default)]
pub struct ResolverBuilder {
    discard: Option<Vec<Regex>>,
    extraction: Option<Vec<NamedPattern>>,
    aliases: Option<CompanyAliasTable>,
    recognizer: Option<Arc<dyn EntityRecognizer>>,
}

impl ResolverBuilder {
    pub fn discard_patterns(mut self, patterns: Vec<Regex>) -> Self {
        self.discard = Some(patterns);
        self
    }

    pub fn extraction_patterns(mut self, patterns: Vec<NamedPattern>) -> Self {
        self.extraction = Some(patterns);
        self
    }

    pub fn aliases(mut self, table: CompanyAliasTable) -> Self {
        self.aliases = Some(table);
        self
    }

    pub fn recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn build(self) -> Result<CompanyNameResolver, PatternError> {
        let discard = match self.discard {
            Some(p) => p,
            None => patterns::default_discard_patterns()?,
        };
        let extraction = match self.extraction {
            Some(p) => p,
            None => patterns::default_extraction_patterns()?,
        };
        let recognizer = self
            .recognizer
            .unwrap_or_else(|| Arc::new(DisabledRecognizer));

        let strategies: Vec<Box<dyn NameStrategy>> = vec![
            Box::new(PatternStrategy::new(extraction)),
            Box::new(AliasStrategy::new(self.aliases.unwrap_or_default())),
            Box::new(EntityStrategy::new(recognizer)),
        ];
        Ok(CompanyNameResolver::new(DiscardRules::new(discard), strategies))
    }
}

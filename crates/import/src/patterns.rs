//! Statement-format patterns used by name resolution.
//!
//! Both lists are data: the defaults below are tuned to U.S. checking
//! statements and can be replaced wholesale from configuration.

use regex::Regex;
use thiserror::Error;

use cuenta_core::ExtractionPatternConfig;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Extraction pattern '{0}' has no capture group")]
    MissingCaptureGroup(String),
}

/// Noise removed from the uppercased description, in order. Each pattern runs
/// on the output of the previous one.
pub const DEFAULT_DISCARD_PATTERNS: &[&str] = &[
    // ACH company id
    r"CO ID:\s*\S*",
    // Individual name runs to the end of ACH descriptions
    r"INDN:.*$",
    r"\bID:\s*\S*",
    // Keep the descriptor word, drop the marker
    r"\bDES:\s*",
    r"CONF#\s*\S*",
    // Mixed letter/digit reference codes
    r"\b[#*]?[0-9A-Z]*(?:[A-Z][0-9]|[0-9][A-Z])[0-9A-Z]*\b",
    r"\d{4,}",
    r"\b(?:PPD|WEB|CCD|POS|RECURRING)\b",
];

/// Statement line shapes, highest priority first. Group 1 is the merchant.
pub const DEFAULT_EXTRACTION_PATTERNS: &[(&str, &str)] = &[
    (
        "mobile_purchase",
        r"MOBILE\s*PURCHASE\s*(?:\d{4}\s+)?(?:[A-Z]+\s?\*\s?)?(.+?)(?:\s+\d|\s+[A-Z]{2}$|$)",
    ),
    (
        "card_purchase",
        r"CHECKCARD\s*(?:\d{4}\s+)?(?:[A-Z]+\*)?(.+?)(?:\s*-(?:\s|$)|\s+[A-Z]{2}(?:\s|$)|\s*\d|$)",
    ),
    (
        "purchase",
        r"PURCHASE\s*(?:AUTHORIZED\s+ON\s+\d{1,2}/\d{1,2}\s+)?(?:\d{4}\s+)?(?:[A-Z]+\s?\*\s?)?(.+?)(?:(?:\s+[A-Z])?\s*-(?:\s|$)|\s+\d|\s+[A-Z]{2}(?:\s+CARD\b|$)|\s+CARD\b|$)",
    ),
    (
        "peer_transfer",
        r"ZELLE\s*(?:PAYMENT|TRANSFER)\s*(?:FROM|TO)\s+(.+?)(?:\s*CONF#|\s+FOR\b|\s*;|$)",
    ),
    (
        "payroll_deposit",
        r"^(.+?)\s+(?:PAYROLL|PAYRLL|DIR\s*DEP|DIRECT\s*DEP(?:OSIT)?|SALARY)\b",
    ),
    (
        "store_number",
        r"^([A-Z][A-Z&'./\- ]*?[A-Z.'])\s*(?:#\s*\d*|\b\d{1,3})(?:\s|$)",
    ),
    (
        "business_name",
        r"^([A-Z][A-Z&'.\- ]*?)\s+(?:INC|LLC|LTD|CORP|CO)\b",
    ),
];

/// An extraction pattern and the statement shape it models.
#[derive(Debug, Clone)]
pub struct NamedPattern {
    pub name: String,
    pub regex: Regex,
}

fn compile(pattern: &str) -> Result<Regex, PatternError> {
    Regex::new(pattern).map_err(|source| PatternError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

pub fn compile_discard_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>, PatternError> {
    patterns.iter().map(|p| compile(p.as_ref())).collect()
}

pub fn compile_extraction_patterns<'a, I>(patterns: I) -> Result<Vec<NamedPattern>, PatternError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    patterns
        .into_iter()
        .map(|(name, pattern)| {
            let regex = compile(pattern)?;
            if regex.captures_len() < 2 {
                return Err(PatternError::MissingCaptureGroup(name.to_string()));
            }
            Ok(NamedPattern { name: name.to_string(), regex })
        })
        .collect()
}

pub fn default_discard_patterns() -> Result<Vec<Regex>, PatternError> {
    compile_discard_patterns(DEFAULT_DISCARD_PATTERNS)
}

pub fn default_extraction_patterns() -> Result<Vec<NamedPattern>, PatternError> {
    compile_extraction_patterns(DEFAULT_EXTRACTION_PATTERNS.iter().copied())
}

pub fn configured_extraction_patterns(
    patterns: &[ExtractionPatternConfig],
) -> Result<Vec<NamedPattern>, PatternError> {
    compile_extraction_patterns(patterns.iter().map(|p| (p.name.as_str(), p.pattern.as_str())))
}

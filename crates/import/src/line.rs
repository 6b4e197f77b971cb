//! Line-level parsing: decide whether a line of statement text is a
//! transaction, then split it into date / description / amount.
//!
//! The filter is a heuristic, not a grammar. Header rows that happen to carry
//! a date and two words pass it (and are then usually dropped by the amount
//! check); transactions printed without a `/` in the date never make it in.

use cuenta_core::{Money, ParsedFields};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Malformed transaction line ({reason}): {line}")]
    MalformedLine { line: String, reason: &'static str },
}

/// True when the line has a `/`, at least one digit, and 3+ whitespace tokens.
pub fn is_transaction_line(line: &str) -> bool {
    line.contains('/')
        && line.chars().any(|c| c.is_ascii_digit())
        && line.split_whitespace().nth(2).is_some()
}

/// Split a transaction line into its fields.
///
/// First token is the date (kept verbatim), last token is the amount with
/// comma thousands separators removed, everything in between is the raw
/// description. Two tokens give an empty description.
pub fn extract_fields(line: &str) -> Result<ParsedFields, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let malformed = |reason| ParseError::MalformedLine { line: line.trim().to_string(), reason };

    let (date, rest) = match tokens.split_first() {
        Some((date, rest)) if !rest.is_empty() => (*date, rest),
        _ => return Err(malformed("expected a date and an amount")),
    };
    let (amount_token, middle) = rest
        .split_last()
        .ok_or_else(|| malformed("expected a date and an amount"))?;
    let amount = Money::parse_statement_amount(amount_token)
        .ok_or_else(|| malformed("last token is not a number"))?;

    Ok(ParsedFields {
        date: date.to_string(),
        raw_description: middle.join(" "),
        amount,
    })
}

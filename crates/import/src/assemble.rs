//! Line → record pipeline.
//!
//! Each line goes through the classifier, field extraction, name resolution
//! and categorization in that order. A line either yields a complete
//! [`Transaction`] or is dropped; there are no partial records.

use std::sync::Arc;

use cuenta_core::{AmountSign, ConfigError, RawTransaction, StatementConfig, Transaction};
use cuenta_ner::EntityRecognizer;
use thiserror::Error;
use tracing::{debug, info};

use crate::categorize::CategoryClassifier;
use crate::line::{extract_fields, is_transaction_line, ParseError};
use crate::patterns::PatternError;
use crate::resolver::CompanyNameResolver;

#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Why a single line produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("Not a transaction line")]
    NotTransaction,
    #[error(transparent)]
    Malformed(#[from] ParseError),
}

/// Counters for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub lines_read: usize,
    pub candidates: usize,
    pub emitted: usize,
    pub dropped: usize,
}

pub struct TransactionAssembler {
    resolver: CompanyNameResolver,
    classifier: CategoryClassifier,
    sign: AmountSign,
}

impl TransactionAssembler {
    pub fn new(resolver: CompanyNameResolver, classifier: CategoryClassifier, sign: AmountSign) -> Self {
        Self { resolver, classifier, sign }
    }

    /// Build the whole pipeline once. Configuration and pattern problems are
    /// reported here, before any line is read.
    pub fn from_config(
        config: &StatementConfig,
        recognizer: Arc<dyn EntityRecognizer>,
    ) -> Result<Self, AssemblerError> {
        config.validate()?;
        let classifier = CategoryClassifier::new(config.categories()?.clone());
        let resolver = CompanyNameResolver::from_config(config, recognizer)?;
        Ok(Self::new(resolver, classifier, config.amount_sign))
    }

    pub fn try_assemble(&self, line: &str) -> Result<Transaction, LineError> {
        if !is_transaction_line(line) {
            return Err(LineError::NotTransaction);
        }
        let fields = extract_fields(line)?;
        let name = self.resolver.resolve(&fields.raw_description);
        let category = self.classifier.categorize(&name).to_string();
        Ok(Transaction::new(fields, name, category, self.sign))
    }

    pub fn assemble(&self, line: &str) -> Option<Transaction> {
        match self.try_assemble(line) {
            Ok(tx) => Some(tx),
            Err(LineError::NotTransaction) => None,
            Err(e) => {
                debug!(line = line.trim(), "Dropping line: {e}");
                None
            }
        }
    }

    pub fn assemble_batch<I, S>(&self, lines: I) -> Vec<Transaction>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.assemble_batch_with_report(lines).0
    }

    /// Like [`assemble_batch`](Self::assemble_batch), also returning the counters.
    pub fn assemble_batch_with_report<I, S>(&self, lines: I) -> (Vec<Transaction>, BatchReport)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = BatchReport::default();
        let mut transactions = Vec::new();
        for line in lines {
            let line = line.as_ref();
            report.lines_read += 1;
            if !is_transaction_line(line) {
                continue;
            }
            report.candidates += 1;
            match self.assemble(line) {
                Some(tx) => transactions.push(tx),
                None => report.dropped += 1,
            }
        }
        report.emitted = transactions.len();
        info!(
            lines_read = report.lines_read,
            candidates = report.candidates,
            emitted = report.emitted,
            dropped = report.dropped,
            "Statement processed"
        );
        (transactions, report)
    }
}

/// Date, untouched description and amount, without name resolution.
pub fn extract_raw(line: &str) -> Option<RawTransaction> {
    if !is_transaction_line(line) {
        return None;
    }
    match extract_fields(line) {
        Ok(fields) => Some(fields.into()),
        Err(e) => {
            debug!("Dropping line: {e}");
            None
        }
    }
}

pub fn extract_raw_batch<I, S>(lines: I) -> Vec<RawTransaction>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let raw: Vec<RawTransaction> = lines
        .into_iter()
        .filter_map(|line| extract_raw(line.as_ref()))
        .collect();
    info!(count = raw.len(), "Raw transactions extracted");
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuenta_core::{CategoryTable, Money, TransactionType, DEFAULT_CATEGORY};
    use cuenta_ner::{DisabledRecognizer, MockRecognizer};

    const DON_JULIOS: &str = "03/14 CHECKCARD 1224 TST*DON JULIOS- T TAMPA FL 45.20";
    const ZELLE: &str = "03/15 ZELLE PAYMENT FROM ANGIE MENESES BUSTAMANTE 100.00";

    fn config(sign: AmountSign) -> StatementConfig {
        StatementConfig {
            categorias: Some(CategoryTable::new(vec![
                ("Comida", vec!["julios", "starbucks", "mcdonald"]),
                ("Transferencias", vec!["zelle", "transfer"]),
                ("Supermercado", vec!["walmart"]),
            ])),
            amount_sign: sign,
            ..StatementConfig::default()
        }
    }

    fn assembler(sign: AmountSign) -> TransactionAssembler {
        TransactionAssembler::from_config(&config(sign), Arc::new(DisabledRecognizer)).unwrap()
    }

    fn money(s: &str) -> Money {
        Money::parse_statement_amount(s).unwrap()
    }

    #[test]
    fn card_purchase_end_to_end() {
        let tx = assembler(AmountSign::PositiveExpense).assemble(DON_JULIOS).unwrap();
        assert_eq!(tx.date, "03/14");
        assert_eq!(tx.description, "Don Julios");
        assert_eq!(tx.category, "Comida");
        assert_eq!(tx.amount, money("45.20"));
        assert_eq!(tx.amount.to_string(), "45.20");
        assert_eq!(tx.kind, TransactionType::Expense);
    }

    #[test]
    fn default_sign_treats_positive_as_income() {
        let tx = assembler(AmountSign::default()).assemble(DON_JULIOS).unwrap();
        assert_eq!(tx.kind, TransactionType::Income);
        assert_eq!(tx.amount, money("45.20"));
    }

    #[test]
    fn peer_transfer_resolves_to_counterparty() {
        let tx = assembler(AmountSign::default()).assemble(ZELLE).unwrap();
        assert_eq!(tx.description, "Angie Meneses Bustamante");
        assert_eq!(tx.category, DEFAULT_CATEGORY);
        assert_eq!(tx.amount, money("100.00"));
    }

    #[test]
    fn non_transaction_lines_yield_nothing() {
        let a = assembler(AmountSign::default());
        assert!(a.assemble("Beginning balance on 03/01").is_none());
        assert_eq!(a.try_assemble("03/14 5.00"), Err(LineError::NotTransaction));
    }

    #[test]
    fn malformed_candidate_is_dropped() {
        let a = assembler(AmountSign::default());
        let line = "03/14 DON JULIOS TAMPA FL";
        assert!(matches!(a.try_assemble(line), Err(LineError::Malformed(_))));
        assert!(a.assemble(line).is_none());
    }

    #[test]
    fn batch_preserves_order_and_counts() {
        let lines = [
            "Account summary for 03/01 - 03/31",
            ZELLE,
            "Page 1 of 4 and/or",
            DON_JULIOS,
            "",
            "03/20 WALMART SUPERCENTER # TAMPA FL -82.11",
        ];
        let (txs, report) = assembler(AmountSign::default()).assemble_batch_with_report(lines);

        let names: Vec<&str> = txs.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(names, ["Angie Meneses Bustamante", "Don Julios", "Walmart Supercenter"]);
        assert_eq!(txs[2].category, "Supermercado");
        assert_eq!(txs[2].kind, TransactionType::Expense);
        assert_eq!(
            report,
            BatchReport { lines_read: 6, candidates: 5, emitted: 3, dropped: 2 }
        );
    }

    #[test]
    fn batch_accepts_owned_lines() {
        let lines: Vec<String> = vec![DON_JULIOS.to_string()];
        assert_eq!(assembler(AmountSign::default()).assemble_batch(lines).len(), 1);
    }

    #[test]
    fn recognizer_is_consulted_for_unshaped_descriptions() {
        let recognizer = MockRecognizer::new(vec![cuenta_ner::Entity::new(
            cuenta_ner::EntityLabel::Organization,
            "Blue Bottle",
            0.97,
        )]);
        let a = TransactionAssembler::from_config(&config(AmountSign::default()), Arc::new(recognizer))
            .unwrap();
        let tx = a.assemble("03/18 BLUE BOTTLE COFFEE OAKLAND CA -6.50").unwrap();
        assert_eq!(tx.description, "Blue Bottle");
    }

    #[test]
    fn missing_categories_fail_before_processing() {
        let err = TransactionAssembler::from_config(&StatementConfig::default(), Arc::new(DisabledRecognizer))
            .err()
            .unwrap();
        assert!(matches!(err, AssemblerError::Config(ConfigError::ConfigurationMissing(_))));
    }

    #[test]
    fn invalid_pattern_fails_before_processing() {
        let mut cfg = config(AmountSign::default());
        cfg.discard_patterns = Some(vec!["(unclosed".to_string()]);
        let err = TransactionAssembler::from_config(&cfg, Arc::new(DisabledRecognizer))
            .err()
            .unwrap();
        assert!(matches!(err, AssemblerError::Pattern(PatternError::InvalidPattern { .. })));
    }

    #[test]
    fn raw_extraction_keeps_description() {
        let raw = extract_raw_batch([DON_JULIOS, "Total 1,000.00", ZELLE]);
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].description, "CHECKCARD 1224 TST*DON JULIOS- T TAMPA FL");
        assert_eq!(raw[1].amount, money("100.00"));
    }

    #[test]
    fn assembler_is_shared_across_threads() {
        let a = &assembler(AmountSign::PositiveExpense);
        let lines = [DON_JULIOS, ZELLE];
        let results: Vec<Option<Transaction>> = std::thread::scope(|s| {
            let handles: Vec<_> = lines.iter().map(|line| s.spawn(move || a.assemble(line))).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(results[0].as_ref().unwrap().description, "Don Julios");
        assert_eq!(results[1].as_ref().unwrap().description, "Angie Meneses Bustamante");
    }
}

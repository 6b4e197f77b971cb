pub mod config;
pub mod money;
pub mod tables;
pub mod transaction;

pub use config::{ConfigError, ExtractionPatternConfig, NerSettings, OutputPaths, StatementConfig};
pub use money::Money;
pub use tables::{Category, CategoryTable, CompanyAliasTable, KnownCompany, DEFAULT_COMPANIES};
pub use transaction::{
    AmountSign, ParsedFields, RawTransaction, Transaction, TransactionType, DEFAULT_CATEGORY,
};

pub mod assemble;
pub mod categorize;
pub mod export;
pub mod line;
pub mod normalize;
pub mod patterns;
pub mod resolver;

pub use assemble::{
    extract_raw, extract_raw_batch, AssemblerError, BatchReport, LineError, TransactionAssembler,
};
pub use categorize::CategoryClassifier;
pub use export::{
    export_grouped, split_by_type, write_raw_file, write_raw_transactions, write_transactions,
    write_transactions_file, ExportError,
};
pub use line::{extract_fields, is_transaction_line, ParseError};
pub use normalize::normalize_company_name;
pub use patterns::{NamedPattern, PatternError, DEFAULT_DISCARD_PATTERNS, DEFAULT_EXTRACTION_PATTERNS};
pub use resolver::{
    AliasStrategy, CompanyNameResolver, DiscardRules, EntityStrategy, NameStrategy, PatternStrategy,
    Resolution, ResolverBuilder,
};

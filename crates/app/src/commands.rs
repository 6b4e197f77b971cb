use anyhow::{bail, Context, Result};
use cuenta_core::{Money, NerSettings, StatementConfig};
use cuenta_import::{
    export_grouped, extract_raw_batch, split_by_type, write_raw_file, TransactionAssembler,
};
use cuenta_ner::{DisabledRecognizer, EntityRecognizer};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

pub fn load_config(path: &Path) -> Result<StatementConfig> {
    StatementConfig::load(path).with_context(|| format!("Failed to load config {}", path.display()))
}

/// Statement text from a file, or stdin when the path is `-`. PDFs are
/// rejected: the text has to be extracted first, one statement line per row.
pub fn read_input(path: &Path) -> Result<String> {
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("pdf")) {
        bail!(
            "{} is a PDF; extract its text first (one statement line per row) and pass the text file",
            path.display()
        );
    }
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read statement text from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// The recognizer named by `ner`, bounded by its timeout. Disabled when the
/// section is absent.
pub fn build_recognizer(settings: Option<&NerSettings>) -> Result<Arc<dyn EntityRecognizer>> {
    match settings {
        Some(settings) => remote_recognizer(settings),
        None => Ok(Arc::new(DisabledRecognizer)),
    }
}

#[cfg(feature = "remote-ner")]
fn remote_recognizer(settings: &NerSettings) -> Result<Arc<dyn EntityRecognizer>> {
    use cuenta_ner::{DeadlineRecognizer, HttpRecognizer};
    use std::time::Duration;

    let token = settings
        .token_env
        .as_deref()
        .and_then(|var| std::env::var(var).ok());
    let timeout = Duration::from_millis(settings.timeout_ms);
    let http = HttpRecognizer::new(&settings.endpoint, token, timeout)
        .context("Failed to set up the entity recognizer")?;
    tracing::info!(endpoint = %settings.endpoint, ?timeout, "Entity recognition enabled");
    Ok(Arc::new(DeadlineRecognizer::new(http, timeout)))
}

#[cfg(not(feature = "remote-ner"))]
fn remote_recognizer(settings: &NerSettings) -> Result<Arc<dyn EntityRecognizer>> {
    warn!(
        endpoint = %settings.endpoint,
        "ner is configured but this build has no remote-ner support; names use patterns and aliases only"
    );
    Ok(Arc::new(DisabledRecognizer))
}

pub fn process(input: Option<&Path>, config_path: &Path, raw: bool) -> Result<()> {
    let config = if raw {
        StatementConfig::read(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else {
        load_config(config_path)?
    };
    let Some(input) = input.or(config.pdf_path.as_deref()) else {
        bail!("No statement input: pass INPUT or set pdf_path in {}", config_path.display());
    };
    let text = read_input(input)?;

    if raw {
        let records = extract_raw_batch(text.lines());
        if records.is_empty() {
            warn!("No transactions found, nothing written");
            return Ok(());
        }
        let path = config.outputs.raw();
        write_raw_file(&path, &records)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{} raw transactions written to {}", records.len(), path.display());
        return Ok(());
    }

    let recognizer = build_recognizer(config.ner.as_ref())?;
    let assembler = TransactionAssembler::from_config(&config, recognizer)
        .context("Invalid statement configuration")?;
    let (transactions, report) = assembler.assemble_batch_with_report(text.lines());
    export_grouped(&transactions, &config.outputs).context("Failed to write CSV output")?;

    let (expenses, incomes) = split_by_type(&transactions);
    let expense_total: Money = expenses.iter().map(|tx| tx.amount).sum();
    let income_total: Money = incomes.iter().map(|tx| tx.amount).sum();
    println!(
        "{} transactions ({} expenses totalling {expense_total}, {} incomes totalling {income_total}), {} lines dropped",
        report.emitted,
        expenses.len(),
        incomes.len(),
        report.dropped
    );
    println!(
        "Wrote {}, {} and {}",
        config.outputs.expenses().display(),
        config.outputs.incomes().display(),
        config.outputs.all().display()
    );
    Ok(())
}

pub fn line(text: &str, config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let recognizer = build_recognizer(config.ner.as_ref())?;
    let assembler = TransactionAssembler::from_config(&config, recognizer)
        .context("Invalid statement configuration")?;

    match assembler.try_assemble(text) {
        Ok(tx) => println!("{}", serde_json::to_string_pretty(&tx)?),
        Err(e) => println!("Line dropped: {e}"),
    }
    Ok(())
}

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::core::errors::FintrackError;
use crate::core::models::{GroupMember, Transaction};
use crate::core::reports::resolve_member_name;

const PERSONAL_HEADER: [&str; 6] = ["Date", "Description", "Category", "Type", "Amount", "Currency"];
const GROUP_HEADER: [&str; 7] = ["Date", "Description", "Category", "Type", "Amount", "Currency", "Added By"];

/// Which columns an export carries. Group exports add the `Added By` column.
#[derive(Clone, Copy, Debug)]
pub enum ExportVariant<'a> {
    Personal,
    Group(&'a [GroupMember]),
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn quote_if_needed(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        quoted(value)
    } else {
        value.to_string()
    }
}

/// Renders one header line plus one line per transaction, each terminated by `\n`.
/// The description column is always double-quoted.
pub fn export_csv(transactions: &[Transaction], variant: ExportVariant<'_>) -> Result<String, FintrackError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let header: &[&str] = match variant {
        ExportVariant::Personal => &PERSONAL_HEADER,
        ExportVariant::Group(_) => &GROUP_HEADER,
    };
    writer
        .write_record(header)
        .map_err(|e| FintrackError::InternalServerError(format!("CSV write error: {}", e)))?;

    for t in transactions {
        let mut record = vec![
            t.date.format("%Y-%m-%d").to_string(),
            quoted(&t.description),
            t.category.as_str().to_string(),
            t.kind.as_str().to_string(),
            t.amount.to_string(),
            t.currency.code().to_string(),
        ];
        if let ExportVariant::Group(members) = variant {
            record.push(quote_if_needed(&resolve_member_name(t, members)));
        }
        writer
            .write_record(&record)
            .map_err(|e| FintrackError::InternalServerError(format!("CSV write error: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| FintrackError::InternalServerError(format!("CSV flush error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| FintrackError::InternalServerError(format!("CSV encoding error: {}", e)))
}

/// `{slug}-report-{from}-to-{to}.csv`, where the slug lowercases `name` and
/// collapses whitespace runs into `-`. Characters that could break a
/// `Content-Disposition` parameter are dropped. Personal exports pass `None`.
pub fn export_file_name(name: Option<&str>, from: NaiveDate, to: NaiveDate) -> String {
    let slug = match name {
        Some(name) => name
            .split_whitespace()
            .map(|word| {
                word.chars()
                    .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
                    .collect::<String>()
                    .to_lowercase()
            })
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join("-"),
        None => "transactions".to_string(),
    };
    let slug = if slug.is_empty() { "transactions".to_string() } else { slug };
    format!(
        "{}-report-{}-to-{}.csv",
        slug,
        from.format("%Y-%m-%d"),
        to.format("%Y-%m-%d")
    )
}

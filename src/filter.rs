use crate::column::Column;
use crate::error::PipelineError;
use crate::number::parse_score;
use crate::open_table;

use csv::{StringRecord, Terminator, WriterBuilder};
use log::{info, warn};
use serde::Serialize;
use std::path::Path;
use tempfile::NamedTempFile;

pub const DEFAULT_THRESHOLD: f64 = 50.0;
pub const DEFAULT_SCORE_COLUMN: usize = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    pub threshold: f64,
    pub score_column: Column,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            score_column: Column::Index(DEFAULT_SCORE_COLUMN),
        }
    }
}

/// Counts exclude the header. Unparseable and malformed rows are tracked on
/// their own and never show up in `rows_kept` or `rows_filtered_out`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub rows_kept: usize,
    pub rows_filtered_out: usize,
    pub rows_unparseable: usize,
    pub rows_malformed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDecision {
    Keep,
    FilteredOut,
    Unparseable,
    Malformed,
}

#[derive(Debug, Default)]
pub struct FilteredTable {
    pub header: Option<StringRecord>,
    pub rows: Vec<StringRecord>,
    pub summary: FilterSummary,
}

pub fn classify(record: &StringRecord, score_index: usize, threshold: f64) -> RowDecision {
    let Some(raw) = record.get(score_index) else {
        return RowDecision::Malformed;
    };

    match parse_score(raw) {
        // NaN fails the comparison and lands in FilteredOut
        Some(score) if score >= threshold => RowDecision::Keep,
        Some(_) => RowDecision::FilteredOut,
        None => RowDecision::Unparseable,
    }
}

/// Splits the header off and keeps every row whose score meets the threshold.
pub fn filter_records<I>(records: I, config: &FilterConfig) -> Result<FilteredTable, PipelineError>
where
    I: IntoIterator<Item = Result<StringRecord, csv::Error>>,
{
    let mut records = records.into_iter();
    let mut table = FilteredTable {
        header: records.next().transpose()?,
        ..FilteredTable::default()
    };

    // No header means no rows either
    if table.header.is_none() {
        return Ok(table);
    }

    let score_index = config.score_column.resolve(table.header.as_ref())?;

    for result in records {
        let record = result?;

        match classify(&record, score_index, config.threshold) {
            RowDecision::Keep => {
                table.rows.push(record);
                table.summary.rows_kept += 1;
            }
            RowDecision::FilteredOut => table.summary.rows_filtered_out += 1,
            RowDecision::Unparseable => {
                warn!(
                    "Non-numeric value '{}' in column {} on line {}. Skipping row.",
                    record.get(score_index).unwrap_or_default(),
                    config.score_column,
                    record.position().map_or(0, |p| p.line())
                );
                table.summary.rows_unparseable += 1;
            }
            RowDecision::Malformed => table.summary.rows_malformed += 1,
        }
    }

    Ok(table)
}

/// Writes the table to `path`, replacing whatever is there. Rows go to a
/// temporary file next to the target first so a failed write leaves the
/// previous file untouched.
pub fn write_table(path: &Path, table: &FilteredTable) -> Result<(), PipelineError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir)?;

    {
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .terminator(Terminator::CRLF)
            .from_writer(tmp.as_file());

        if let Some(header) = &table.header {
            writer.write_record(header)?;
        }
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }

    tmp.persist(path).map_err(|e| PipelineError::Io(e.error))?;

    Ok(())
}

pub fn filter_file(
    input: &Path,
    output: &Path,
    config: &FilterConfig,
) -> Result<FilterSummary, PipelineError> {
    let mut rdr = open_table(input)?;
    info!("Starting filter. Reading from {}...", input.display());

    let table = filter_records(rdr.records(), config)?;
    write_table(output, &table)?;

    Ok(table.summary)
}

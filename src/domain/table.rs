//! Delimited-text table parsing.
//!
//! First ingestion stage: the header line becomes a column-name index and each
//! following line becomes a [`TableRecord`] whose values are still text. Type
//! coercion happens later in [`crate::domain::row`].
//!
//! Quoting is not recognised. A value that contains the delimiter is split like
//! any other text, so such tables parse with shifted columns.

use std::collections::HashMap;
use std::sync::Arc;

pub const DELIMITER: u8 = b',';

/// One data line of the table, keyed by header name.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRecord {
    columns: Arc<HashMap<String, usize>>,
    values: Vec<String>,
    line: u64,
}

impl TableRecord {
    /// Value under `column`, or `None` when the header lacks the column or the
    /// line is too short to reach it.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .get(column)
            .and_then(|&idx| self.values.get(idx))
            .map(String::as_str)
    }

    /// 1-based line number in the source text.
    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Splits `text` into header-keyed records.
///
/// Empty or header-only input yields an empty vector. Lines with too many or
/// too few fields are kept; surplus values are unreachable and absent values
/// read as `None`.
pub fn parse(text: &str) -> Vec<TableRecord> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .delimiter(DELIMITER)
        .from_reader(text.as_bytes());

    let columns = match rdr.headers() {
        Ok(headers) => {
            let mut index = HashMap::new();
            // Repeated header names resolve to the right-most column.
            for (idx, name) in headers.iter().enumerate() {
                index.insert(name.to_string(), idx);
            }
            Arc::new(index)
        }
        Err(e) => {
            tracing::warn!("unreadable table header: {e}");
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("skipping unreadable table line: {e}");
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        records.push(TableRecord {
            columns: Arc::clone(&columns),
            values: record.iter().map(str::to_string).collect(),
            line,
        });
    }
    records
}

//! Typed metric rows.
//!
//! Second ingestion stage: each [`TableRecord`] is validated and coerced into a
//! [`RawRow`]. Rows that fail are dropped individually.

use crate::domain::error::RowError;
use crate::domain::table::TableRecord;

/// Drawdown and win rate arrive as fractions and are stored as percentages.
pub const PERCENT_SCALE: f64 = 100.0;

/// Header names of the six required columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub instrument: String,
    pub model: String,
    pub total_return: String,
    pub sharpe: String,
    pub max_drawdown: String,
    pub win_rate: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            instrument: "Ticker".into(),
            model: "Model".into(),
            total_return: "Return".into(),
            sharpe: "Sharpe".into(),
            max_drawdown: "MaxDD".into(),
            win_rate: "WinRate".into(),
        }
    }
}

impl ColumnNames {
    /// `(config key, header name)` pairs, in the order the config lists them.
    pub fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("instrument", &self.instrument),
            ("model", &self.model),
            ("return", &self.total_return),
            ("sharpe", &self.sharpe),
            ("max_drawdown", &self.max_drawdown),
            ("win_rate", &self.win_rate),
        ]
    }
}

/// One backtest result for an (instrument, model) pair, with drawdown and win
/// rate already scaled to percentages.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub instrument: String,
    pub model: String,
    pub total_return: f64,
    pub sharpe: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
}

impl RawRow {
    pub fn from_record(record: &TableRecord, columns: &ColumnNames) -> Result<Self, RowError> {
        Ok(RawRow {
            instrument: text_field(record, &columns.instrument)?.to_string(),
            model: text_field(record, &columns.model)?.to_string(),
            total_return: numeric_field(record, &columns.total_return, 1.0)?,
            sharpe: numeric_field(record, &columns.sharpe, 1.0)?,
            max_drawdown: numeric_field(record, &columns.max_drawdown, PERCENT_SCALE)?,
            win_rate: numeric_field(record, &columns.win_rate, PERCENT_SCALE)?,
        })
    }
}

/// Converts every record that validates, preserving input order.
///
/// Returns the rows together with the number of records dropped.
pub fn normalize(records: &[TableRecord], columns: &ColumnNames) -> (Vec<RawRow>, usize) {
    let mut rows = Vec::with_capacity(records.len());
    let mut dropped = 0;

    for record in records {
        match RawRow::from_record(record, columns) {
            Ok(row) => rows.push(row),
            Err(e) => {
                tracing::warn!(line = record.line(), "dropping row: {e}");
                dropped += 1;
            }
        }
    }

    (rows, dropped)
}

fn text_field<'a>(record: &'a TableRecord, column: &str) -> Result<&'a str, RowError> {
    match record.get(column) {
        None => Err(RowError::MissingField {
            column: column.to_string(),
        }),
        Some("") => Err(RowError::EmptyField {
            column: column.to_string(),
        }),
        Some(value) => Ok(value),
    }
}

/// Parses and scales a number. The scaled value must still be finite.
fn numeric_field(record: &TableRecord, column: &str, scale: f64) -> Result<f64, RowError> {
    let raw = text_field(record, column)?;
    match raw.trim().parse::<f64>().map(|v| v * scale) {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(RowError::NotNumeric {
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::parse;
    use approx::assert_relative_eq;

    const HEADER: &str = "Ticker,Model,Return,Sharpe,MaxDD,WinRate";

    fn single(line: &str) -> Result<RawRow, RowError> {
        let records = parse(&format!("{HEADER}\n{line}\n"));
        RawRow::from_record(&records[0], &ColumnNames::default())
    }

    #[test]
    fn from_record_scales_fractions_to_percentages() {
        let row = single("AAPL,Base RF,107.97,1.9,-0.1234,0.5").unwrap();
        assert_eq!(row.instrument, "AAPL");
        assert_eq!(row.model, "Base RF");
        assert_relative_eq!(row.total_return, 107.97);
        assert_relative_eq!(row.sharpe, 1.9);
        assert_relative_eq!(row.max_drawdown, -12.34, epsilon = 1e-9);
        assert_relative_eq!(row.win_rate, 50.0);
    }

    #[test]
    fn return_and_sharpe_are_not_scaled() {
        let row = single("SPX,ARIMA,-0.5,0.25,0,0").unwrap();
        assert_relative_eq!(row.total_return, -0.5);
        assert_relative_eq!(row.sharpe, 0.25);
    }

    #[test]
    fn non_numeric_return_is_rejected() {
        let err = single("AAPL,Base RF,n/a,1.9,-0.1,0.5").unwrap_err();
        assert_eq!(
            err,
            RowError::NotNumeric {
                column: "Return".into(),
                value: "n/a".into()
            }
        );
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(matches!(
            single("AAPL,Base RF,NaN,1.9,-0.1,0.5"),
            Err(RowError::NotNumeric { .. })
        ));
        assert!(matches!(
            single("AAPL,Base RF,1.0,inf,-0.1,0.5"),
            Err(RowError::NotNumeric { .. })
        ));
    }

    #[test]
    fn values_that_overflow_when_scaled_are_rejected() {
        let err = single("SPX,Base RF,25,1.0,-1e307,0.5").unwrap_err();
        assert_eq!(
            err,
            RowError::NotNumeric {
                column: "MaxDD".into(),
                value: "-1e307".into(),
            }
        );
        assert!(matches!(
            single("SPX,Base RF,25,1.0,-0.1,1e307"),
            Err(RowError::NotNumeric { column, .. }) if column == "WinRate"
        ));
        // Unscaled columns accept the same magnitude.
        assert!(single("SPX,Base RF,1e307,1.0,-0.1,0.5").is_ok());
    }

    #[test]
    fn surrounding_whitespace_in_numbers_is_tolerated() {
        let row = single("AAPL,Base RF, 12.5 ,1,0,0").unwrap();
        assert_relative_eq!(row.total_return, 12.5);
    }

    #[test]
    fn missing_value_is_rejected() {
        let err = single("AAPL,Base RF,1.0,1.0,-0.1").unwrap_err();
        assert_eq!(
            err,
            RowError::MissingField {
                column: "WinRate".into()
            }
        );
    }

    #[test]
    fn empty_instrument_is_rejected() {
        let err = single(",Base RF,1.0,1.0,-0.1,0.5").unwrap_err();
        assert_eq!(
            err,
            RowError::EmptyField {
                column: "Ticker".into()
            }
        );
    }

    #[test]
    fn keys_are_kept_verbatim() {
        let row = single("aapl,base rf ,1,1,0,0").unwrap();
        assert_eq!(row.instrument, "aapl");
        assert_eq!(row.model, "base rf ");
    }

    #[test]
    fn custom_column_names_are_honoured() {
        let text = "sym,strategy,ret,sr,dd,wr\nNVDA,Sent RF,1005.34,2.5,-0.3197,0.4826\n";
        let columns = ColumnNames {
            instrument: "sym".into(),
            model: "strategy".into(),
            total_return: "ret".into(),
            sharpe: "sr".into(),
            max_drawdown: "dd".into(),
            win_rate: "wr".into(),
        };
        let records = parse(text);
        let row = RawRow::from_record(&records[0], &columns).unwrap();
        assert_eq!(row.instrument, "NVDA");
        assert_relative_eq!(row.max_drawdown, -31.97, epsilon = 1e-9);
    }

    #[test]
    fn normalize_drops_bad_rows_and_counts_them() {
        let text = format!(
            "{HEADER}\n\
             AAPL,Base RF,107.97,1.9,-0.0871,0.2073\n\
             AAPL,Sent RF,oops,1.66,-0.0969,0.2735\n\
             AAPL,ARIMA,-12.01,-0.18,-0.3882,0.2369\n"
        );
        let (rows, dropped) = normalize(&parse(&text), &ColumnNames::default());
        assert_eq!(dropped, 1);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].model, "Base RF");
        assert_eq!(rows[1].model, "ARIMA");
    }
}

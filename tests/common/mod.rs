#![allow(dead_code)]

use signaldash::domain::error::SignaldashError;
use signaldash::domain::row::RawRow;
use signaldash::ports::source_port::MetricsSource;
use std::io::Write;

pub const HEADER: &str = "Ticker,Model,Return,Sharpe,MaxDD,WinRate";

/// Source that hands back a fixed body or a fixed retrieval failure.
pub struct MockSource {
    body: Result<Vec<u8>, String>,
}

impl MockSource {
    pub fn ok(body: &str) -> Self {
        Self {
            body: Ok(body.as_bytes().to_vec()),
        }
    }

    pub fn bytes(body: Vec<u8>) -> Self {
        Self { body: Ok(body) }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            body: Err(reason.to_string()),
        }
    }
}

impl MetricsSource for MockSource {
    fn location(&self) -> String {
        "mock://metrics".to_string()
    }

    fn fetch(&self) -> Result<Vec<u8>, SignaldashError> {
        self.body.clone().map_err(|reason| SignaldashError::Retrieval {
            location: self.location(),
            reason,
        })
    }
}

/// Builds a metrics table with the default header, one line per row.
#[derive(Default)]
pub struct TableBuilder {
    lines: Vec<String>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(
        mut self,
        ticker: &str,
        model: &str,
        total_return: f64,
        sharpe: f64,
        max_drawdown: f64,
        win_rate: f64,
    ) -> Self {
        self.lines.push(format!(
            "{ticker},{model},{total_return},{sharpe},{max_drawdown},{win_rate}"
        ));
        self
    }

    /// Appends a line verbatim, for malformed input.
    pub fn raw(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    pub fn build(&self) -> String {
        let mut out = String::from(HEADER);
        out.push('\n');
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// A normalized row; drawdown and win rate are given in percent.
pub fn make_row(
    ticker: &str,
    model: &str,
    total_return: f64,
    sharpe: f64,
    max_drawdown: f64,
) -> RawRow {
    RawRow {
        instrument: ticker.to_string(),
        model: model.to_string(),
        total_return,
        sharpe,
        max_drawdown,
        win_rate: 50.0,
    }
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    write_temp_file(content)
}

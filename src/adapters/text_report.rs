//! Plain-text report adapter implementing ReportPort.

use crate::domain::action::DEFAULT_RULE_DESCRIPTION;
use crate::domain::aggregate::InstrumentRecord;
use crate::domain::error::SignaldashError;
use crate::domain::pipeline::{Snapshot, SnapshotOrigin};
use crate::ports::report_port::ReportPort;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextReport;

impl ReportPort for TextReport {
    fn render(&self, snapshot: &Snapshot) -> Result<String, SignaldashError> {
        let mut out = String::new();
        match &snapshot.origin {
            SnapshotOrigin::Live => out.push_str("Source: live metrics\n"),
            SnapshotOrigin::Fallback { reason } => {
                let _ = writeln!(out, "Source: built-in fallback ({reason})");
            }
        }
        if snapshot.dropped_rows > 0 {
            let _ = writeln!(out, "Dropped rows: {}", snapshot.dropped_rows);
        }
        if !snapshot.undetermined.is_empty() {
            let _ = writeln!(
                out,
                "Undetermined (baseline only): {}",
                snapshot.undetermined.join(", ")
            );
        }

        for record in snapshot.instruments.values() {
            out.push('\n');
            out.push_str(&render_instrument(record));
        }
        Ok(out)
    }
}

/// One instrument block: headline, recommendation, applied rule and the model
/// table.
pub fn render_instrument(record: &InstrumentRecord) -> String {
    let mut out = String::new();
    let rule = record
        .applied_rule()
        .map(|r| r.description)
        .unwrap_or(DEFAULT_RULE_DESCRIPTION);

    let _ = writeln!(out, "{} ({})", record.symbol, record.display_name);
    let _ = writeln!(out, "  Action:     {} ({})", record.action, record.sentiment);
    let _ = writeln!(
        out,
        "  Best model: {} ({:.2}%)",
        record.best_model, record.best_return
    );
    let _ = writeln!(out, "  Rule:       {rule}");
    let _ = writeln!(
        out,
        "  {:<14} {:>10} {:>8} {:>9} {:>9}",
        "Model", "Return%", "Sharpe", "MaxDD%", "WinRate%"
    );
    for (name, m) in &record.models {
        let marker = if *name == record.best_model { "*" } else { " " };
        let _ = writeln!(
            out,
            "{marker} {:<14} {:>10.2} {:>8.2} {:>9.2} {:>9.2}",
            name, m.total_return, m.sharpe, m.max_drawdown, m.win_rate
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fallback::fallback_records;
    use crate::domain::pipeline::{PipelineSettings, build_snapshot};

    #[test]
    fn fallback_header_names_the_reason() {
        let snapshot = Snapshot::fallback(fallback_records(), "file missing");
        let out = TextReport.render(&snapshot).unwrap();
        assert!(out.starts_with("Source: built-in fallback (file missing)\n"));
        assert!(out.contains("NVDA (NVIDIA Corp.)"));
    }

    #[test]
    fn instrument_block_shows_rule_and_marks_best_model() {
        let record = &fallback_records()["AAPL"];
        let out = render_instrument(record);
        assert!(out.contains("Action:     STRONG_BUY (Highly Bullish)"));
        assert!(out.contains("Best model: Base RF (107.97%)"));
        assert!(out.contains("Rule:       Return > 100% AND Sharpe >= 1.5 AND MaxDD >= -30%"));
        assert!(out.lines().any(|l| l.starts_with("* Base RF")));
        assert!(out.lines().any(|l| l.starts_with("  Buy & Hold")));
    }

    #[test]
    fn hold_uses_default_rule_text() {
        let text = "Ticker,Model,Return,Sharpe,MaxDD,WinRate\nDAX,ARIMA,1.0,0.1,-0.05,0.3\n";
        let snapshot = build_snapshot(text, &PipelineSettings::default());
        let out = TextReport.render(&snapshot).unwrap();
        assert!(out.contains("Action:     HOLD (Neutral)"));
        assert!(out.contains(DEFAULT_RULE_DESCRIPTION));
    }

    #[test]
    fn reports_dropped_and_undetermined() {
        let text = "Ticker,Model,Return,Sharpe,MaxDD,WinRate\n\
            DAX,Buy & Hold,44.47,1.14,-0.1641,0.5192\n\
            SPX,Base RF,bad,0.82,-0.1621,0.4652\n\
            SPX,Sent RF,55.73,1.32,-0.1925,0.5314\n";
        let snapshot = build_snapshot(text, &PipelineSettings::default());
        let out = TextReport.render(&snapshot).unwrap();
        assert!(out.contains("Source: live metrics"));
        assert!(out.contains("Dropped rows: 1"));
        assert!(out.contains("Undetermined (baseline only): DAX"));
    }
}

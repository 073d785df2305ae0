//! Property tests for aggregation invariants.
//!
//! Uses proptest to verify:
//! 1. Determinism: the same table always produces the same snapshot
//! 2. Baseline exclusion: the baseline is never the best model
//! 3. Malformed-row tolerance: a bad row changes nothing but the drop count

mod common;

use common::*;
use proptest::prelude::*;
use signaldash::domain::aggregate::BASELINE_MODEL;
use signaldash::domain::pipeline::{PipelineSettings, build_snapshot};

const TICKERS: [&str; 4] = ["AAPL", "SPX", "NKX", "DAX"];
const MODELS: [&str; 5] = [BASELINE_MODEL, "Base RF", "Sent RF", "Base LSTM", "ARIMA"];

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_metric(lo: f64, hi: f64) -> impl Strategy<Value = f64> {
    (lo..hi).prop_map(|v| (v * 100.0).round() / 100.0)
}

type Row = (usize, usize, f64, f64, f64, f64);

fn arb_row() -> impl Strategy<Value = Row> {
    (
        0..TICKERS.len(),
        0..MODELS.len(),
        arb_metric(-60.0, 250.0),
        arb_metric(-1.0, 3.0),
        arb_metric(-0.6, 0.0),
        arb_metric(0.0, 1.0),
    )
}

fn table(rows: &[Row]) -> TableBuilder {
    rows.iter().fold(
        TableBuilder::new(),
        |b, &(t, m, ret, sharpe, dd, wr)| b.row(TICKERS[t], MODELS[m], ret, sharpe, dd, wr),
    )
}

proptest! {
    #[test]
    fn aggregation_is_deterministic(rows in prop::collection::vec(arb_row(), 1..40)) {
        let text = table(&rows).build();
        let settings = PipelineSettings::default();
        let first = build_snapshot(&text, &settings);
        let second = build_snapshot(&text, &settings);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn baseline_is_never_best(rows in prop::collection::vec(arb_row(), 1..40)) {
        let snap = build_snapshot(&table(&rows).build(), &PipelineSettings::default());
        for record in snap.instruments.values() {
            prop_assert_ne!(record.best_model.as_str(), BASELINE_MODEL);
            let best_non_baseline = rows
                .iter()
                .filter(|r| TICKERS[r.0] == record.symbol && MODELS[r.1] != BASELINE_MODEL)
                .map(|r| r.2)
                .fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(record.best_return, best_non_baseline);
        }
    }

    #[test]
    fn malformed_row_is_ignored(
        rows in prop::collection::vec(arb_row(), 1..30),
        at in any::<prop::sample::Index>(),
    ) {
        let clean = table(&rows).build();

        let split = at.index(rows.len() + 1);
        let dirty = table(&rows[..split])
            .raw("SPX,Sent RF,not-a-number,1.0,-0.1,0.5");
        let dirty = rows[split..]
            .iter()
            .fold(dirty, |b, &(t, m, ret, sharpe, dd, wr)| {
                b.row(TICKERS[t], MODELS[m], ret, sharpe, dd, wr)
            })
            .build();

        let settings = PipelineSettings::default();
        let a = build_snapshot(&clean, &settings);
        let b = build_snapshot(&dirty, &settings);
        prop_assert_eq!(a.instruments, b.instruments);
        prop_assert_eq!(a.undetermined, b.undetermined);
        prop_assert_eq!(b.dropped_rows, a.dropped_rows + 1);
    }
}

//! Built-in dataset served when live metrics are unavailable.
//!
//! The table holds the last published backtest results with drawdown and win
//! rate already in percent. Records are derived from it once, with the same
//! aggregation as live data, so the two never differ in shape.

use crate::domain::aggregate::{BASELINE_MODEL, EngineConfig, Records, aggregate};
use crate::domain::row::RawRow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// `(model, return %, sharpe, max drawdown %, win rate %)`
type ModelRow = (&'static str, f64, f64, f64, f64);

struct FallbackInstrument {
    symbol: &'static str,
    name: &'static str,
    models: &'static [ModelRow],
}

const FALLBACK_TABLE: &[FallbackInstrument] = &[
    FallbackInstrument {
        symbol: "AAPL",
        name: "Apple Inc.",
        models: &[
            (BASELINE_MODEL, 50.63, 0.78, -33.87, 52.96),
            ("Base RF", 107.97, 1.9, -8.71, 20.73),
            ("Sent RF", 100.59, 1.66, -9.69, 27.35),
            ("Base LSTM", 59.92, 1.26, -13.44, 29.08),
            ("Sent LSTM", 14.28, 0.38, -31.83, 29.26),
            ("ARIMA", -12.01, -0.18, -38.82, 23.69),
        ],
    },
    FallbackInstrument {
        symbol: "DAX",
        name: "DAX Performance Index",
        models: &[
            (BASELINE_MODEL, 44.47, 1.14, -16.41, 51.92),
            ("Base RF", 22.32, 0.96, -10.33, 22.82),
            ("Sent RF", 3.45, 0.2, -12.91, 21.78),
            ("Base LSTM", 9.93, 0.42, -11.49, 27.84),
            ("Sent LSTM", 28.57, 1.41, -9.94, 14.89),
            ("ARIMA", 24.0, 0.91, -12.66, 28.57),
        ],
    },
    FallbackInstrument {
        symbol: "DJI",
        name: "Dow Jones Industrial",
        models: &[
            (BASELINE_MODEL, 40.17, 1.11, -16.82, 52.26),
            ("Base RF", 59.26, 1.78, -6.02, 41.81),
            ("Sent RF", 40.11, 1.11, -16.82, 52.09),
            ("Base LSTM", 35.84, 1.37, -9.0, 26.95),
            ("Sent LSTM", 17.49, 0.83, -7.59, 21.1),
            ("ARIMA", 15.98, 0.61, -11.88, 25.44),
        ],
    },
    FallbackInstrument {
        symbol: "MSFT",
        name: "Microsoft Corp.",
        models: &[
            (BASELINE_MODEL, 40.04, 0.75, -25.36, 52.44),
            ("Base RF", -77.65, -4.07, -78.32, 22.3),
            ("Sent RF", 114.32, 1.62, -11.48, 49.65),
            ("Base LSTM", 6.13, 0.25, -22.06, 26.95),
            ("Sent LSTM", 12.04, 0.37, -20.34, 37.94),
            ("ARIMA", 29.94, 0.82, -11.75, 23.69),
        ],
    },
    FallbackInstrument {
        symbol: "NDX",
        name: "Nasdaq-100",
        models: &[
            (BASELINE_MODEL, 69.95, 1.21, -23.55, 55.4),
            ("Base RF", 84.55, 1.4, -18.78, 54.01),
            ("Sent RF", 70.69, 1.22, -23.55, 55.23),
            ("Base LSTM", 32.28, 0.98, -12.56, 31.21),
            ("Sent LSTM", 50.12, 1.06, -26.95, 40.25),
            ("ARIMA", 40.24, 1.01, -11.91, 23.52),
        ],
    },
    FallbackInstrument {
        symbol: "NKX",
        name: "Nikkei 225",
        models: &[
            (BASELINE_MODEL, 48.59, 0.83, -28.83, 50.7),
            ("Base RF", -44.7, -1.45, -51.8, 15.16),
            ("Sent RF", -29.94, -0.64, -40.9, 33.1),
            ("Base LSTM", 12.32, 0.41, -17.5, 23.58),
            ("Sent LSTM", 21.13, 0.62, -16.67, 20.92),
            ("ARIMA", 9.02, 0.31, -31.02, 25.26),
        ],
    },
    FallbackInstrument {
        symbol: "NVDA",
        name: "NVIDIA Corp.",
        models: &[
            (BASELINE_MODEL, 246.12, 1.32, -41.33, 51.74),
            ("Base RF", 3957.79, 4.31, -13.21, 43.03),
            ("Sent RF", 1005.34, 2.5, -31.97, 48.26),
            ("Base LSTM", 56.52, 0.73, -33.35, 28.37),
            ("Sent LSTM", 112.73, 1.1, -35.8, 29.96),
            ("ARIMA", 136.33, 1.19, -33.99, 28.57),
        ],
    },
    FallbackInstrument {
        symbol: "SPX",
        name: "S&P 500",
        models: &[
            (BASELINE_MODEL, 57.79, 1.34, -19.36, 54.53),
            ("Base RF", 27.69, 0.82, -16.21, 46.52),
            ("Sent RF", 55.73, 1.32, -19.25, 53.14),
            ("Base LSTM", 9.79, 0.42, -16.37, 28.55),
            ("Sent LSTM", 58.02, 1.62, -14.11, 35.46),
            ("ARIMA", 22.12, 0.75, -11.84, 23.69),
        ],
    },
];

static FALLBACK_RECORDS: LazyLock<Records> = LazyLock::new(build_fallback);

/// The fallback records, built on first use.
pub fn fallback_records() -> &'static Records {
    &FALLBACK_RECORDS
}

/// Full names of the instruments the fallback covers.
pub fn builtin_display_names() -> BTreeMap<String, String> {
    FALLBACK_TABLE
        .iter()
        .map(|inst| (inst.symbol.to_string(), inst.name.to_string()))
        .collect()
}

fn build_fallback() -> Records {
    let rows: Vec<RawRow> = FALLBACK_TABLE
        .iter()
        .flat_map(|inst| {
            inst.models.iter().map(
                move |&(model, total_return, sharpe, max_drawdown, win_rate)| RawRow {
                    instrument: inst.symbol.to_string(),
                    model: model.to_string(),
                    total_return,
                    sharpe,
                    max_drawdown,
                    win_rate,
                },
            )
        })
        .collect();

    let engine = EngineConfig {
        display_names: builtin_display_names(),
        ..EngineConfig::default()
    };
    aggregate(&rows, &engine).records
}

//! Per-instrument aggregation and best-model selection.

use crate::domain::action::{self, Action, ActionRule, RiskProfile};
use crate::domain::row::RawRow;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Reference strategy that is reported but never recommended.
pub const BASELINE_MODEL: &str = "Buy & Hold";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetrics {
    #[serde(rename = "return")]
    pub total_return: f64,
    pub sharpe: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
}

impl ModelMetrics {
    pub fn profile(&self) -> RiskProfile {
        RiskProfile {
            total_return: self.total_return,
            sharpe: self.sharpe,
            max_drawdown: self.max_drawdown,
        }
    }
}

impl From<&RawRow> for ModelMetrics {
    fn from(row: &RawRow) -> Self {
        Self {
            total_return: row.total_return,
            sharpe: row.sharpe,
            max_drawdown: row.max_drawdown,
            win_rate: row.win_rate,
        }
    }
}

/// Everything the dashboard shows for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentRecord {
    pub symbol: String,
    pub display_name: String,
    pub models: BTreeMap<String, ModelMetrics>,
    pub best_model: String,
    pub best_return: f64,
    pub action: Action,
    pub sentiment: String,
}

impl InstrumentRecord {
    pub fn best_metrics(&self) -> Option<&ModelMetrics> {
        self.models.get(&self.best_model)
    }

    /// Profile the action was derived from.
    pub fn profile(&self) -> Option<RiskProfile> {
        self.best_metrics().map(|m| RiskProfile {
            total_return: self.best_return,
            sharpe: m.sharpe,
            max_drawdown: m.max_drawdown,
        })
    }

    /// The rule that produced `action`; `None` means the HOLD default applied.
    pub fn applied_rule(&self) -> Option<&'static ActionRule> {
        self.profile().as_ref().and_then(action::applied_rule)
    }
}

/// Instrument records keyed by symbol; iteration is sorted by symbol.
pub type Records = BTreeMap<String, InstrumentRecord>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub baseline_model: String,
    /// Instruments to aggregate, in order. `None` aggregates every instrument
    /// seen in the input.
    pub universe: Option<Vec<String>>,
    pub display_names: BTreeMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            baseline_model: BASELINE_MODEL.to_string(),
            universe: None,
            display_names: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn display_name(&self, symbol: &str) -> String {
        self.display_names
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| symbol.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestModel<'a> {
    pub model: &'a str,
    pub total_return: f64,
}

/// Highest-return non-baseline row, scanning in input order.
///
/// Comparison is strictly greater, so the earliest row wins a tie. Returns
/// `None` when every row is the baseline.
pub fn select_best<'a>(rows: &[&'a RawRow], baseline: &str) -> Option<BestModel<'a>> {
    let mut best: Option<BestModel<'a>> = None;
    for row in rows {
        if row.model == baseline {
            continue;
        }
        let better = match best {
            None => true,
            Some(current) => row.total_return > current.total_return,
        };
        if better {
            best = Some(BestModel {
                model: &row.model,
                total_return: row.total_return,
            });
        }
    }
    best
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub records: Records,
    /// Instruments with rows but no non-baseline model, in universe order when
    /// one is configured, else first-seen order. They are left out of `records`.
    pub undetermined: Vec<String>,
}

/// Groups rows by instrument and builds one record per instrument.
///
/// Pure and deterministic for a given row order.
pub fn aggregate(rows: &[RawRow], engine: &EngineConfig) -> Aggregation {
    let mut order: Vec<&str> = Vec::new();
    let mut partitions: HashMap<&str, Vec<&RawRow>> = HashMap::new();
    for row in rows {
        partitions
            .entry(row.instrument.as_str())
            .or_insert_with(|| {
                order.push(row.instrument.as_str());
                Vec::new()
            })
            .push(row);
    }

    let symbols: Vec<&str> = match &engine.universe {
        Some(universe) => universe.iter().map(String::as_str).collect(),
        None => order,
    };

    let mut aggregation = Aggregation::default();
    for symbol in symbols {
        let Some(partition) = partitions.get(symbol) else {
            continue;
        };
        match build_record(symbol, partition, engine) {
            Some(record) => {
                aggregation.records.insert(symbol.to_string(), record);
            }
            None => {
                tracing::warn!(
                    symbol,
                    baseline = %engine.baseline_model,
                    "no non-baseline model, instrument left out"
                );
                aggregation.undetermined.push(symbol.to_string());
            }
        }
    }
    aggregation
}

fn build_record(
    symbol: &str,
    partition: &[&RawRow],
    engine: &EngineConfig,
) -> Option<InstrumentRecord> {
    let mut models = BTreeMap::new();
    for row in partition {
        models.insert(row.model.clone(), ModelMetrics::from(*row));
    }

    let best = select_best(partition, &engine.baseline_model)?;
    // Return comes from the winning row; Sharpe and drawdown from the model's
    // final entry, which differs only when the model appears more than once.
    let metrics = models.get(best.model)?;
    let profile = RiskProfile {
        total_return: best.total_return,
        sharpe: metrics.sharpe,
        max_drawdown: metrics.max_drawdown,
    };
    let action = action::classify(&profile);
    tracing::debug!(symbol, model = best.model, %action, "selected best model");

    Some(InstrumentRecord {
        symbol: symbol.to_string(),
        display_name: engine.display_name(symbol),
        models,
        best_model: best.model.to_string(),
        best_return: best.total_return,
        action,
        sentiment: action.sentiment().to_string(),
    })
}

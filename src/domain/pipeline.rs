//! Ingestion pipeline and snapshot lifecycle.
//!
//! One cycle retrieves the table, parses it, normalizes rows and aggregates
//! them into a [`Snapshot`]. Any retrieval or decode failure, and a table that
//! yields no instruments, produces the fallback snapshot instead. Callers never
//! see an error from a cycle.

use crate::domain::aggregate::{EngineConfig, InstrumentRecord, Records, aggregate};
use crate::domain::error::SignaldashError;
use crate::domain::fallback::fallback_records;
use crate::domain::row::{ColumnNames, normalize};
use crate::domain::table::parse;
use crate::ports::source_port::MetricsSource;
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineSettings {
    pub columns: ColumnNames,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapshotOrigin {
    Live,
    Fallback { reason: String },
}

/// A complete, immutable result of one ingestion cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub origin: SnapshotOrigin,
    pub instruments: Records,
    pub undetermined: Vec<String>,
    pub dropped_rows: usize,
}

impl Snapshot {
    pub fn fallback(records: &Records, reason: impl Into<String>) -> Self {
        Self {
            origin: SnapshotOrigin::Fallback {
                reason: reason.into(),
            },
            instruments: records.clone(),
            undetermined: Vec::new(),
            dropped_rows: 0,
        }
    }

    pub fn is_live(&self) -> bool {
        self.origin == SnapshotOrigin::Live
    }

    pub fn get(&self, symbol: &str) -> Option<&InstrumentRecord> {
        self.instruments.get(symbol)
    }
}

/// Parses and aggregates `text` without any fallback handling.
pub fn build_snapshot(text: &str, settings: &PipelineSettings) -> Snapshot {
    let records = parse(text);
    let (rows, dropped_rows) = normalize(&records, &settings.columns);
    let aggregation = aggregate(&rows, &settings.engine);
    Snapshot {
        origin: SnapshotOrigin::Live,
        instruments: aggregation.records,
        undetermined: aggregation.undetermined,
        dropped_rows,
    }
}

/// Runs one ingestion cycle against `source`, substituting `fallback` on
/// failure.
pub fn fetch_and_normalize(
    source: &dyn MetricsSource,
    settings: &PipelineSettings,
    fallback: &Records,
) -> Snapshot {
    let location = source.location();

    let bytes = match source.fetch() {
        Ok(bytes) => bytes,
        Err(e) => return use_fallback(fallback, e.to_string()),
    };

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            let err = SignaldashError::Decode {
                location,
                reason: e.to_string(),
            };
            return use_fallback(fallback, err.to_string());
        }
    };

    let snapshot = build_snapshot(&text, settings);
    if snapshot.instruments.is_empty() {
        return use_fallback(fallback, format!("no usable instruments in {location}"));
    }

    tracing::info!(
        %location,
        instruments = snapshot.instruments.len(),
        dropped_rows = snapshot.dropped_rows,
        undetermined = snapshot.undetermined.len(),
        "loaded live metrics"
    );
    snapshot
}

fn use_fallback(fallback: &Records, reason: String) -> Snapshot {
    tracing::warn!(%reason, "serving fallback metrics");
    Snapshot::fallback(fallback, reason)
}

/// Holds the snapshot readers currently see.
///
/// `refresh` builds a new snapshot completely before swapping it in, so a
/// reader holds either the old or the new one, never a mix.
#[derive(Debug)]
pub struct SnapshotStore {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotStore {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    pub fn current(&self) -> Arc<Snapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let next = Arc::new(snapshot);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&next);
        next
    }

    /// Runs one cycle against the built-in fallback and publishes the result.
    pub fn refresh(&self, source: &dyn MetricsSource, settings: &PipelineSettings) -> Arc<Snapshot> {
        self.replace(fetch_and_normalize(source, settings, fallback_records()))
    }
}

impl Default for SnapshotStore {
    /// Starts out serving the fallback until the first refresh.
    fn default() -> Self {
        Self::new(Snapshot::fallback(fallback_records(), "not loaded yet"))
    }
}

//! JSON report adapter implementing ReportPort.
//!
//! Emits the snapshot as the presentation layer reads it: camelCase keys,
//! instruments keyed by symbol.

use crate::domain::error::SignaldashError;
use crate::domain::pipeline::Snapshot;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReport {
    pub pretty: bool,
}

impl ReportPort for JsonReport {
    fn render(&self, snapshot: &Snapshot) -> Result<String, SignaldashError> {
        let mut out = if self.pretty {
            serde_json::to_string_pretty(snapshot)
        } else {
            serde_json::to_string(snapshot)
        }
        .map_err(|e| SignaldashError::Report {
            reason: format!("JSON serialization failed: {e}"),
        })?;
        out.push('\n');
        Ok(out)
    }
}

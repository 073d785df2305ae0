//! Snapshot rendering port trait.

use crate::domain::error::SignaldashError;
use crate::domain::pipeline::Snapshot;
use std::io::Write;

/// Port for presenting a snapshot.
pub trait ReportPort {
    fn render(&self, snapshot: &Snapshot) -> Result<String, SignaldashError>;

    /// Default implementation: renders to a string and writes it out whole.
    fn write_to(&self, snapshot: &Snapshot, out: &mut dyn Write) -> Result<(), SignaldashError> {
        let text = self.render(snapshot)?;
        out.write_all(text.as_bytes())?;
        Ok(())
    }
}

//! Metrics source port trait.

use crate::domain::error::SignaldashError;

/// Opaque provider of the raw metrics table.
///
/// One call is one retrieval attempt. Implementations bound their own wait
/// time and report a timeout as [`SignaldashError::Retrieval`].
pub trait MetricsSource {
    /// Human-readable location used in log lines and errors.
    fn location(&self) -> String;

    fn fetch(&self) -> Result<Vec<u8>, SignaldashError>;
}

//! Domain error types.

/// Reason a single table row was dropped during normalization.
///
/// Row errors never abort a batch; the offending row is logged and skipped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error("missing value for column {column}")]
    MissingField { column: String },

    #[error("empty value for column {column}")]
    EmptyField { column: String },

    #[error("non-numeric value {value:?} for column {column}")]
    NotNumeric { column: String, value: String },
}

/// Top-level error type for signaldash.
#[derive(Debug, thiserror::Error)]
pub enum SignaldashError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to retrieve {location}: {reason}")]
    Retrieval { location: String, reason: String },

    #[error("failed to decode {location}: {reason}")]
    Decode { location: String, reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SignaldashError> for std::process::ExitCode {
    fn from(err: &SignaldashError) -> Self {
        let code: u8 = match err {
            SignaldashError::Io(_) => 1,
            SignaldashError::ConfigParse { .. }
            | SignaldashError::ConfigMissing { .. }
            | SignaldashError::ConfigInvalid { .. } => 2,
            SignaldashError::Retrieval { .. } | SignaldashError::Decode { .. } => 3,
            SignaldashError::Report { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_error_messages_name_the_column() {
        let err = RowError::NotNumeric {
            column: "Return".into(),
            value: "n/a".into(),
        };
        assert_eq!(err.to_string(), "non-numeric value \"n/a\" for column Return");

        let err = RowError::MissingField {
            column: "MaxDD".into(),
        };
        assert_eq!(err.to_string(), "missing value for column MaxDD");
    }

    #[test]
    fn retrieval_error_message_includes_location() {
        let err = SignaldashError::Retrieval {
            location: "metrics.csv".into(),
            reason: "not found".into(),
        };
        assert_eq!(err.to_string(), "failed to retrieve metrics.csv: not found");
    }

    #[test]
    fn io_error_converts_transparently() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: SignaldashError = io.into();
        assert_eq!(err.to_string(), "gone");
    }
}

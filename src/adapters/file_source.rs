//! Local file metrics source.

use crate::domain::error::SignaldashError;
use crate::ports::source_port::MetricsSource;
use std::fs;
use std::path::PathBuf;

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl MetricsSource for FileSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<u8>, SignaldashError> {
        fs::read(&self.path).map_err(|e| SignaldashError::Retrieval {
            location: self.location(),
            reason: e.to_string(),
        })
    }
}

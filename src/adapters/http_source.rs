//! HTTP metrics source.
//!
//! A single GET per fetch. No retries: the pipeline falls back instead.

use crate::domain::error::SignaldashError;
use crate::ports::source_port::MetricsSource;
use std::time::Duration;

pub struct HttpSource {
    client: reqwest::blocking::Client,
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, SignaldashError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("signaldash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SignaldashError::Retrieval {
                location: url.to_string(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            url: url.to_string(),
            timeout,
        })
    }

    fn error(&self, reason: String) -> SignaldashError {
        SignaldashError::Retrieval {
            location: self.url.clone(),
            reason,
        }
    }
}

impl MetricsSource for HttpSource {
    fn location(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<Vec<u8>, SignaldashError> {
        let resp = self.client.get(&self.url).send().map_err(|e| {
            if e.is_timeout() {
                self.error(format!("timed out after {}s", self.timeout.as_secs()))
            } else {
                self.error(e.to_string())
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(self.error(format!("HTTP {status}")));
        }

        let body = resp.bytes().map_err(|e| self.error(e.to_string()))?;
        Ok(body.to_vec())
    }
}

//! Concrete adapter implementations for ports.

pub mod file_config_adapter;
pub mod file_source;
#[cfg(feature = "http")]
pub mod http_source;
pub mod json_report;
pub mod text_report;

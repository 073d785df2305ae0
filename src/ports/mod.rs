//! Port traits separating the domain from concrete I/O.

pub mod config_port;
pub mod report_port;
pub mod source_port;

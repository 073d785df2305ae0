//! Core domain types and logic.

pub mod table;
pub mod row;
pub mod action;
pub mod aggregate;
pub mod fallback;
pub mod pipeline;
pub mod config_validation;
pub mod error;

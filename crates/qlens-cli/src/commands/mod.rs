//! CLI command implementations.

pub mod analyze;
pub mod common;
pub mod compare;
pub mod rules;
pub mod version;

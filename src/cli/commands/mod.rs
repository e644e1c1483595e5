//! CLI command implementations

pub mod tune;

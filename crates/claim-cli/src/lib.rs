//! CLI library components for the claim checker.

pub mod commands;
pub mod logging;
pub mod render;
pub mod report;

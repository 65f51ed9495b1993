//! CLI command implementations

pub mod api;
pub mod config;
pub mod scenarios;
pub mod ui;

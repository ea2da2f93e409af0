//! Library half of the `tax-regime` command line tool.

pub mod app;
pub mod config;
pub mod logging;
pub mod report;

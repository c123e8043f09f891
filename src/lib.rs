// ABOUTME: Library root for image-retention - exposes the retention engine and adapters.
// ABOUTME: The main binary is in main.rs.

pub mod catalog;
pub mod config;
pub mod error;
pub mod output;
pub mod retention;
pub mod types;

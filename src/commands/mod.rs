// ABOUTME: Command module aggregator for the image-retention CLI.
// ABOUTME: Re-exports plan and run command handlers.

mod catalog_connection;
mod plan;
mod run;

pub use plan::plan;
pub use run::run;

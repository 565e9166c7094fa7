//! CLI command handlers.

mod batch;
mod completions;
mod get;
mod run;

pub use batch::BatchOptions;
pub use completions::run_completions;
pub use get::run_get;
pub use run::run_links;

mod executor;
mod orchestrator;
mod retry;

pub use executor::{PaperResult, PaperStatus};
pub use orchestrator::{Orchestrator, RunReport, RunTotals};

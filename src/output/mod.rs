mod summary;

pub use summary::{build_summary, print_summary, write_summary};

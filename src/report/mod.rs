//! Report module - prediction files, run summaries and the JSON run report

pub mod output;
pub mod predictions;
pub mod run_export;
pub mod summary;

pub use output::*;
pub use predictions::*;
pub use run_export::*;
pub use summary::*;

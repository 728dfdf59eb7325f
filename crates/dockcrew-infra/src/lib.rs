//! Infrastructure layer - tabular file formats

pub mod roster_csv;
pub mod task_log_csv;

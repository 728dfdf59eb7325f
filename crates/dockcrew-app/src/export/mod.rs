//! Tabular export of the task log

pub mod excel;

pub use excel::export_to_excel;

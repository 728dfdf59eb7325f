//! Domain model types

pub mod assignment;
pub mod export_row;
pub mod roster;

pub use assignment::{AssignTask, BatchSelector};
pub use export_row::ExportRow;
pub use roster::LaborRoster;

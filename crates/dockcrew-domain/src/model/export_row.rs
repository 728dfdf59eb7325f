//! Flat task rows for tabular export

use serde::{Deserialize, Serialize};

use dockcrew_types::{join_display, Batch, Task};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One task denormalized with its batch's members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Task ID")]
    pub task_id: String,
    #[serde(rename = "Vehicle ID")]
    pub vehicle_id: String,
    #[serde(rename = "Vehicle Type")]
    pub vehicle_type: String,
    #[serde(rename = "Task Type")]
    pub task_type: String,
    #[serde(rename = "Docks")]
    pub docks: String,
    #[serde(rename = "Batch Members")]
    pub batch_members: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Start Time")]
    pub start_time: String,
    #[serde(rename = "End Time")]
    pub end_time: String,
}

impl ExportRow {
    pub const HEADERS: [&'static str; 9] = [
        "Task ID",
        "Vehicle ID",
        "Vehicle Type",
        "Task Type",
        "Docks",
        "Batch Members",
        "Status",
        "Start Time",
        "End Time",
    ];

    /// Build a row; `batch` is `None` when the batch has since been deleted
    pub fn from_task(task: &Task, batch: Option<&Batch>) -> Self {
        Self {
            task_id: task.id.to_string(),
            vehicle_id: task.vehicle_id.clone(),
            vehicle_type: task.vehicle_type.to_string(),
            task_type: task.task_type.to_string(),
            docks: task.docks_display(),
            batch_members: batch.map(|b| join_display(&b.members)).unwrap_or_default(),
            status: task.status.to_string(),
            start_time: task.start_time.format(TIME_FORMAT).to_string(),
            end_time: task
                .end_time
                .map(|t| t.format(TIME_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }

    /// Cell values in [`ExportRow::HEADERS`] order
    pub fn cells(&self) -> [&str; 9] {
        [
            self.task_id.as_str(),
            self.vehicle_id.as_str(),
            self.vehicle_type.as_str(),
            self.task_type.as_str(),
            self.docks.as_str(),
            self.batch_members.as_str(),
            self.status.as_str(),
            self.start_time.as_str(),
            self.end_time.as_str(),
        ]
    }
}

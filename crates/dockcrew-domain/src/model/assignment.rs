//! Task assignment request

use dockcrew_types::{BatchId, TaskType, VehicleType};

/// Which batch a new task should reserve
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BatchSelector {
    /// Earliest-created batch that is currently available
    #[default]
    FirstAvailable,
    /// A specific batch, which must be available
    Explicit(BatchId),
}

/// Input for [`TaskLedger::assign_task`](crate::service::TaskLedger::assign_task)
#[derive(Debug, Clone)]
pub struct AssignTask {
    pub vehicle_id: String,
    pub vehicle_type: VehicleType,
    pub task_type: TaskType,
    /// Requested dock numbers; duplicates collapse
    pub docks: Vec<u32>,
    pub batch: BatchSelector,
}

impl AssignTask {
    pub fn new(
        vehicle_id: impl Into<String>,
        vehicle_type: VehicleType,
        task_type: TaskType,
        docks: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            vehicle_type,
            task_type,
            docks: docks.into_iter().collect(),
            batch: BatchSelector::FirstAvailable,
        }
    }

    pub fn with_batch(mut self, batch_id: BatchId) -> Self {
        self.batch = BatchSelector::Explicit(batch_id);
        self
    }
}

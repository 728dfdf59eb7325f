//! Batch and task records

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ids::{BatchId, TaskId};
use crate::types::{BatchStatus, TaskStatus, TaskType, VehicleType};

/// Split comma-separated labor names, trimming each and dropping blanks
pub fn parse_member_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Join values for display, e.g. `"Alice, Bob"`
pub fn join_display<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: std::fmt::Display,
{
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A group of laborers allocated as one unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    /// Labor names, in the order given
    pub members: Vec<String>,
    pub status: BatchStatus,
    pub created_at: DateTime<Utc>,
}

impl Batch {
    /// Build a new available batch. Names are trimmed and blanks dropped.
    pub fn new<I, S>(members: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let members: Vec<String> = members
            .into_iter()
            .map(|m| m.as_ref().trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();

        if members.is_empty() {
            return Err(Error::Validation(
                "a batch needs at least one labor name".to_string(),
            ));
        }

        Ok(Self {
            id: BatchId::generate(),
            members,
            status: BatchStatus::Available,
            created_at: Utc::now(),
        })
    }

    pub fn is_available(&self) -> bool {
        self.status == BatchStatus::Available
    }

    pub fn members_display(&self) -> String {
        join_display(&self.members)
    }
}

/// A loading/unloading job bound to one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub vehicle_id: String,
    pub vehicle_type: VehicleType,
    pub task_type: TaskType,
    pub docks: BTreeSet<u32>,
    pub batch_id: BatchId,
    pub status: TaskStatus,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_active(&self) -> bool {
        self.status == TaskStatus::Active
    }

    pub fn docks_display(&self) -> String {
        join_display(&self.docks)
    }

    /// Time spent on the task, once completed
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.end_time.map(|end| end - self.start_time)
    }
}

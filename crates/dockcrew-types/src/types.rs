//! Enumerations and the dock range

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Vehicle size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Small,
    Medium,
    Large,
}

impl VehicleType {
    pub const ALL: [VehicleType; 3] = [VehicleType::Small, VehicleType::Medium, VehicleType::Large];

    pub fn label(&self) -> &'static str {
        match self {
            VehicleType::Small => "Small",
            VehicleType::Medium => "Medium",
            VehicleType::Large => "Large",
        }
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// Kind of dock work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Loading,
    Unloading,
}

impl TaskType {
    pub const ALL: [TaskType; 2] = [TaskType::Loading, TaskType::Unloading];

    pub fn label(&self) -> &'static str {
        match self {
            TaskType::Loading => "Loading",
            TaskType::Unloading => "Unloading",
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// Availability of a labor batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Available,
    Busy,
}

impl BatchStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BatchStatus::Available => "available",
            BatchStatus::Busy => "busy",
        }
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// Lifecycle state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Active,
    Completed,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Active => "active",
            TaskStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// Inclusive range of valid dock numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DockRange {
    min: u32,
    max: u32,
}

impl DockRange {
    pub const DEFAULT_MIN: u32 = 2;
    pub const DEFAULT_MAX: u32 = 17;

    pub fn new(min: u32, max: u32) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidDockRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn contains(&self, dock: u32) -> bool {
        dock >= self.min && dock <= self.max
    }

    /// All selectable dock numbers, ascending
    pub fn docks(&self) -> impl Iterator<Item = u32> {
        self.min..=self.max
    }
}

impl Default for DockRange {
    fn default() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
        }
    }
}

impl std::fmt::Display for DockRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

//! CLI definition using clap

use clap::{Parser, Subcommand};
use dockcrew_types::{OutputFormat, TaskType, VehicleType};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dockcrew")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Assign labor batches to vehicle loading/unloading tasks")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Tenant (login) whose batches and tasks to use. Uses config value if not specified.
    #[arg(long, short = 't', global = true)]
    pub tenant: Option<String>,

    /// Store directory override
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage labor batches
    Batch {
        #[command(subcommand)]
        action: BatchCommand,
    },

    /// Assign, complete and list tasks
    Task {
        #[command(subcommand)]
        action: TaskCommand,
    },

    /// Export the task log (.csv or .xlsx)
    Export {
        /// Output file path
        #[arg(long, short = 'o', default_value = "task_log.csv")]
        output: PathBuf,
    },

    /// Show shift counts
    Status,

    /// Clear all batches and tasks of the tenant
    Reset {
        /// Confirm the reset
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set lowest valid dock number
        #[arg(long)]
        set_dock_min: Option<u32>,

        /// Set highest valid dock number
        #[arg(long)]
        set_dock_max: Option<u32>,

        /// Set store directory
        #[arg(long)]
        set_store_dir: Option<PathBuf>,

        /// Set default tenant
        #[arg(long)]
        set_tenant: Option<String>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Subcommand)]
pub enum BatchCommand {
    /// Add a batch of laborers
    Add {
        /// Labor names
        names: Vec<String>,

        /// Comma-separated labor names (e.g., "Alice, Bob, Carol")
        #[arg(long = "names", short = 'n')]
        names_list: Option<String>,
    },

    /// List batches
    List,

    /// Delete an available batch
    Delete {
        /// Batch ID
        id: String,
    },

    /// Show free and busy laborers
    Roster,

    /// Add batches from a CSV file (one batch per line)
    Import {
        /// Path to CSV file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Assign a task to the next available batch
    Assign {
        /// Vehicle ID
        #[arg(long)]
        vehicle: String,

        /// Vehicle type
        #[arg(long, value_enum)]
        vehicle_type: VehicleType,

        /// Task type
        #[arg(long, value_enum)]
        task_type: TaskType,

        /// Dock numbers (e.g., 3,4)
        #[arg(long, short = 'd', value_delimiter = ',', required = true)]
        docks: Vec<u32>,

        /// Use this batch instead of the first available one
        #[arg(long, short = 'b')]
        batch: Option<String>,
    },

    /// Complete an active task and release its batch
    Complete {
        /// Task ID
        id: String,
    },

    /// List tasks (active by default)
    List {
        /// Show completed tasks
        #[arg(long, conflicts_with = "all")]
        completed: bool,

        /// Show active and completed tasks
        #[arg(long)]
        all: bool,
    },
}

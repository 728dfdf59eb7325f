//! Command handlers

use crate::cli::{BatchCommand, Cli, Commands, TaskCommand};
use crate::output::{
    output_batch, output_batches, output_roster, output_summary, output_task, output_tasks,
};
use dockcrew_app::app::DockService;
use dockcrew_app::config::Config;
use dockcrew_domain::AssignTask;
use dockcrew_infra::roster_csv::load_rosters_from_csv;
use dockcrew_types::{
    parse_member_list, BatchId, Error, OutputFormat, Result, TaskId, TaskType, TenantId,
    VehicleType,
};
use std::collections::HashMap;
use std::path::PathBuf;

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if cli.store_dir.is_some() {
        config.store_dir = cli.store_dir.clone();
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match &cli.command {
        Commands::Config {
            show,
            set_dock_min,
            set_dock_max,
            set_store_dir,
            set_tenant,
            set_output,
            reset,
        } => cmd_config(ConfigChanges {
            show: *show,
            dock_min: *set_dock_min,
            dock_max: *set_dock_max,
            store_dir: set_store_dir.clone(),
            tenant: set_tenant.clone(),
            output: *set_output,
            reset: *reset,
        }),

        command => {
            let tenant = match cli.tenant {
                Some(ref name) => TenantId::new(name.as_str())?,
                None => config.tenant_id()?,
            };
            let service = DockService::open(&config)?;
            tracing::debug!(tenant = %tenant, "store opened");

            match command {
                Commands::Batch { action } => cmd_batch(&service, &tenant, action, output_format),
                Commands::Task { action } => cmd_task(&service, &tenant, action, output_format),
                Commands::Export { output } => cmd_export(&service, &tenant, output),
                Commands::Status => output_summary(output_format, &service.summary(&tenant)?),
                Commands::Reset { yes } => cmd_reset(&service, &tenant, *yes),
                Commands::Config { .. } => unreachable!("handled above"),
            }
        }
    }
}

fn cmd_batch(
    service: &DockService,
    tenant: &TenantId,
    action: &BatchCommand,
    output_format: OutputFormat,
) -> Result<()> {
    let registry = service.registry();

    match action {
        BatchCommand::Add { names, names_list } => {
            let mut members: Vec<String> = names.clone();
            if let Some(list) = names_list {
                members.extend(parse_member_list(list));
            }
            let batch = registry.create_batch(tenant, &members)?;
            output_batch(output_format, &batch)
        }

        BatchCommand::List => output_batches(output_format, &registry.list_batches(tenant)?),

        BatchCommand::Delete { id } => {
            registry.delete_batch(tenant, &BatchId::from(id.as_str()))?;
            println!("Batch deleted: {}", id);
            Ok(())
        }

        BatchCommand::Roster => output_roster(output_format, &registry.labor_roster(tenant)?),

        BatchCommand::Import { file } => {
            let rosters = load_rosters_from_csv(file)?;
            if rosters.is_empty() {
                return Err(Error::Validation(format!(
                    "No batches found in {}",
                    file.display()
                )));
            }
            let batches = service.import_rosters(tenant, &rosters)?;
            if output_format == OutputFormat::Json {
                output_batches(output_format, &batches)
            } else {
                println!("Imported {} batches from {}", batches.len(), file.display());
                Ok(())
            }
        }
    }
}

fn cmd_task(
    service: &DockService,
    tenant: &TenantId,
    action: &TaskCommand,
    output_format: OutputFormat,
) -> Result<()> {
    let ledger = service.ledger();

    // Member names per batch, for display
    let batch_members = || -> Result<HashMap<BatchId, String>> {
        Ok(service
            .registry()
            .list_batches(tenant)?
            .into_iter()
            .map(|b| {
                let members = b.members_display();
                (b.id, members)
            })
            .collect())
    };

    match action {
        TaskCommand::Assign {
            vehicle,
            vehicle_type,
            task_type,
            docks,
            batch,
        } => {
            let request = build_assignment(vehicle, *vehicle_type, *task_type, docks, batch.as_deref());
            let task = ledger.assign_task(tenant, request)?;
            let members = batch_members()?;
            if output_format == OutputFormat::Table {
                println!("Task assigned\n");
            }
            output_task(
                output_format,
                &task,
                members.get(&task.batch_id).map(String::as_str),
            )
        }

        TaskCommand::Complete { id } => {
            let task = ledger.complete_task(tenant, &TaskId::from(id.as_str()))?;
            let members = batch_members()?;
            if output_format == OutputFormat::Table {
                println!("Task completed\n");
            }
            output_task(
                output_format,
                &task,
                members.get(&task.batch_id).map(String::as_str),
            )
        }

        TaskCommand::List { completed, all } => {
            let (title, tasks) = if *all {
                ("All Tasks", ledger.list_tasks(tenant)?)
            } else if *completed {
                ("Completed Tasks", ledger.list_completed_tasks(tenant)?)
            } else {
                ("Active Tasks", ledger.list_active_tasks(tenant)?)
            };
            let members = batch_members()?;
            output_tasks(output_format, title, &tasks, |task| {
                members.get(&task.batch_id).cloned().unwrap_or_else(|| "-".to_string())
            })
        }
    }
}

fn build_assignment(
    vehicle: &str,
    vehicle_type: VehicleType,
    task_type: TaskType,
    docks: &[u32],
    batch: Option<&str>,
) -> AssignTask {
    let request = AssignTask::new(vehicle, vehicle_type, task_type, docks.iter().copied());
    match batch {
        Some(id) => request.with_batch(BatchId::from(id)),
        None => request,
    }
}

fn cmd_export(service: &DockService, tenant: &TenantId, output: &PathBuf) -> Result<()> {
    let count = service.export(tenant, output)?;
    println!("Exported {} tasks to: {}", count, output.display());
    Ok(())
}

fn cmd_reset(service: &DockService, tenant: &TenantId, yes: bool) -> Result<()> {
    if !yes {
        return Err(Error::Validation(format!(
            "Reset clears every batch and task of '{}'. Re-run with --yes to confirm.",
            tenant
        )));
    }

    let cleared = service.reset_shift(tenant)?;
    println!(
        "Shift reset: removed {} batches and {} tasks",
        cleared.total_batches,
        cleared.active_tasks + cleared.completed_tasks
    );
    Ok(())
}

struct ConfigChanges {
    show: bool,
    dock_min: Option<u32>,
    dock_max: Option<u32>,
    store_dir: Option<PathBuf>,
    tenant: Option<String>,
    output: Option<OutputFormat>,
    reset: bool,
}

fn cmd_config(changes: ConfigChanges) -> Result<()> {
    if changes.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(dock_min) = changes.dock_min {
        config.dock_min = dock_min;
        modified = true;
    }

    if let Some(dock_max) = changes.dock_max {
        config.dock_max = dock_max;
        modified = true;
    }

    if let Some(store_dir) = changes.store_dir {
        config.store_dir = Some(store_dir);
        modified = true;
    }

    if let Some(tenant) = changes.tenant {
        config.tenant = TenantId::new(tenant)?.to_string();
        modified = true;
    }

    if let Some(output_format) = changes.output {
        config.output_format = output_format;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if changes.show || !modified {
        println!("{}", config);
        println!(
            "Vehicle types:  {}",
            VehicleType::ALL.map(|v| v.label()).join(", ")
        );
        println!(
            "Task types:     {}",
            TaskType::ALL.map(|t| t.label()).join(", ")
        );
    }

    Ok(())
}

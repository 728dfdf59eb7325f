//! Output formatting module

use chrono::{DateTime, Local, Utc};
use dockcrew_app::app::ShiftSummary;
use dockcrew_domain::LaborRoster;
use dockcrew_types::{Batch, OutputFormat, Result, Task};
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    println!("{}", content);
    Ok(())
}

fn local_time(t: &DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%H:%M:%S").to_string()
}

pub fn output_batch(output_format: OutputFormat, batch: &Batch) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(batch);
    }
    println!("Batch added: {}", batch.members_display());
    println!("ID:          {}", batch.id);
    Ok(())
}

pub fn output_batches(output_format: OutputFormat, batches: &[Batch]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(batches);
    }
    if batches.is_empty() {
        println!("No batches yet.");
        return Ok(());
    }

    println!("\nCurrent Batches");
    println!("===============");
    for (idx, batch) in batches.iter().enumerate() {
        println!(
            "Batch {:<3} {:<10} {}  [{}]",
            idx + 1,
            batch.status,
            batch.members_display(),
            batch.id
        );
    }
    Ok(())
}

pub fn output_task(output_format: OutputFormat, task: &Task, members: Option<&str>) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(task);
    }
    println!("Task:        {}", task.id);
    println!("Vehicle:     {} ({})", task.vehicle_id, task.vehicle_type);
    println!("Operation:   {}", task.task_type);
    println!("Docks:       {}", task.docks_display());
    println!("Batch:       {}", members.unwrap_or("-"));
    println!("Status:      {}", task.status);
    println!("Started:     {}", local_time(&task.start_time));
    if let Some(ref end) = task.end_time {
        println!("Ended:       {}", local_time(end));
    }
    if let Some(duration) = task.duration() {
        println!("Duration:    {} min", duration.num_minutes());
    }
    Ok(())
}

/// Print tasks; `members_of` resolves a task's batch member names
pub fn output_tasks<F>(output_format: OutputFormat, title: &str, tasks: &[Task], members_of: F) -> Result<()>
where
    F: Fn(&Task) -> String,
{
    if output_format == OutputFormat::Json {
        return print_json(tasks);
    }
    if tasks.is_empty() {
        println!("No {} currently.", title.to_lowercase());
        return Ok(());
    }

    println!("\n{}", title);
    println!("{}", "=".repeat(title.chars().count()));
    for task in tasks {
        println!(
            "{:<12} {:<16} docks {:<12} {:<10} {:<24} {}  [{}]",
            task.vehicle_id,
            format!("{} ({})", task.task_type, task.vehicle_type),
            task.docks_display(),
            task.status,
            members_of(task),
            local_time(&task.start_time),
            task.id
        );
    }
    Ok(())
}

pub fn output_roster(output_format: OutputFormat, roster: &LaborRoster) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(roster);
    }

    println!("\nFree Labors");
    println!("===========");
    if roster.free.is_empty() {
        println!("No free labors");
    } else {
        println!("{}", roster.free.join(", "));
    }

    println!("\nBusy Labors");
    println!("===========");
    if roster.busy.is_empty() {
        println!("No busy labors");
    } else {
        println!("{}", roster.busy.join(", "));
    }
    Ok(())
}

pub fn output_summary(output_format: OutputFormat, summary: &ShiftSummary) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(summary);
    }

    println!("\nShift Status");
    println!("============");
    println!("Batches:    {} ({} available, {} busy)", summary.total_batches, summary.available_batches, summary.busy_batches);
    println!("Active:     {}", summary.active_tasks);
    println!("Completed:  {}", summary.completed_tasks);
    Ok(())
}

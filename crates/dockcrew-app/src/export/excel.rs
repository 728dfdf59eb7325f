//! Excel export functionality

use chrono::Utc;
use dockcrew_domain::ExportRow;
use dockcrew_types::{Error, Result, TenantId};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

use crate::app::ShiftSummary;

fn excel_error(e: XlsxError) -> Error {
    Error::Export(e.to_string())
}

/// Export the task log to an Excel file
pub fn export_to_excel(
    tenant: &TenantId,
    summary: &ShiftSummary,
    rows: &[ExportRow],
    output_path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();

    // Add summary sheet
    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, tenant, summary)?;

    // Add tasks sheet
    let tasks_sheet = workbook.add_worksheet();
    write_tasks_sheet(tasks_sheet, rows)?;

    workbook.save(output_path).map_err(excel_error)?;

    tracing::info!(rows = rows.len(), path = %output_path.display(), "task log workbook written");
    Ok(())
}

fn write_summary_sheet(sheet: &mut Worksheet, tenant: &TenantId, summary: &ShiftSummary) -> Result<()> {
    sheet.set_name("Summary").map_err(excel_error)?;

    let header_format = Format::new().set_bold();

    sheet
        .write_string_with_format(0, 0, "Dock Task Log", &header_format)
        .map_err(excel_error)?;

    let exported_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let text_rows = [("Tenant:", tenant.to_string()), ("Exported At:", exported_at)];
    for (i, (label, value)) in text_rows.iter().enumerate() {
        let row = 2 + i as u32;
        sheet.write_string(row, 0, *label).map_err(excel_error)?;
        sheet.write_string(row, 1, value).map_err(excel_error)?;
    }

    let counts = [
        ("Batches:", summary.total_batches),
        ("Available Batches:", summary.available_batches),
        ("Busy Batches:", summary.busy_batches),
        ("Active Tasks:", summary.active_tasks),
        ("Completed Tasks:", summary.completed_tasks),
    ];
    for (i, (label, count)) in counts.iter().enumerate() {
        let row = 5 + i as u32;
        sheet.write_string(row, 0, *label).map_err(excel_error)?;
        sheet.write_number(row, 1, *count as f64).map_err(excel_error)?;
    }

    sheet.set_column_width(0, 20).map_err(excel_error)?;
    sheet.set_column_width(1, 22).map_err(excel_error)?;

    Ok(())
}

fn write_tasks_sheet(sheet: &mut Worksheet, rows: &[ExportRow]) -> Result<()> {
    sheet.set_name("Tasks").map_err(excel_error)?;

    let header_format = Format::new().set_bold();

    for (col, header) in ExportRow::HEADERS.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(excel_error)?;
    }

    for (row_idx, entry) in rows.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        for (col, value) in entry.cells().iter().enumerate() {
            sheet
                .write_string(row, col as u16, *value)
                .map_err(excel_error)?;
        }
    }

    // Approximate auto-fit
    sheet.set_column_width(0, 38).map_err(excel_error)?;
    sheet.set_column_width(4, 16).map_err(excel_error)?;
    sheet.set_column_width(5, 30).map_err(excel_error)?;
    sheet.set_column_width(7, 20).map_err(excel_error)?;
    sheet.set_column_width(8, 20).map_err(excel_error)?;

    Ok(())
}

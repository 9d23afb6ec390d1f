//! Export and report sinks. They only acknowledge; no file is written.

use crate::state::app::AppState;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Excel,
    Pdf,
    Json,
}

impl ExportFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "excel" | "xlsx" => Some(ExportFormat::Excel),
            "pdf" => Some(ExportFormat::Pdf),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Excel => "Excel",
            ExportFormat::Pdf => "PDF",
            ExportFormat::Json => "JSON",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportAck {
    pub format: ExportFormat,
    pub record_count: usize,
    pub message: String,
}

pub async fn export_records(format: ExportFormat, record_count: usize, delay: Duration) -> ExportAck {
    tokio::time::sleep(delay).await;
    log::info!("export acknowledged: {record_count} records as {}", format.label());
    ExportAck {
        format,
        record_count,
        message: format!(
            "Successfully exported {record_count} records as {}",
            format.label()
        ),
    }
}

pub async fn generate_report_ack(
    kind: &str,
    format: ExportFormat,
    record_count: usize,
    delay: Duration,
) -> ExportAck {
    tokio::time::sleep(delay).await;
    log::info!("{kind} report acknowledged: {record_count} records as {}", format.label());
    ExportAck {
        format,
        record_count,
        message: format!(
            "{kind} report generated as {} with {record_count} records",
            format.label()
        ),
    }
}

fn parse_format(raw: &str) -> Result<ExportFormat, String> {
    ExportFormat::parse(raw).ok_or(format!("Unsupported export format: {raw}"))
}

pub async fn export_data_internal(state: &AppState, format: &str, record_count: usize) -> Result<ExportAck, String> {
    let format = parse_format(format)?;
    let delay = state.effective_settings().export_delay;
    Ok(export_records(format, record_count, delay).await)
}

pub async fn generate_report_internal(
    state: &AppState,
    kind: &str,
    format: &str,
    record_count: usize,
) -> Result<ExportAck, String> {
    let format = parse_format(format)?;
    let kind = kind.trim();
    if kind.is_empty() {
        return Err("Report type is required".to_string());
    }
    let delay = state.effective_settings().export_delay;
    Ok(generate_report_ack(kind, format, record_count, delay).await)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn export_data(
    format: String,
    record_count: usize,
    state: tauri::State<'_, AppState>,
) -> Result<ExportAck, String> {
    export_data_internal(state.inner(), &format, record_count).await
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn generate_report(
    kind: String,
    format: String,
    record_count: usize,
    state: tauri::State<'_, AppState>,
) -> Result<ExportAck, String> {
    generate_report_internal(state.inner(), &kind, &format, record_count).await
}

use crate::analysis::associations;
use crate::analysis::health::{self, DashboardSummary, ProjectQaStats};
use crate::models::issue::Issue;
use crate::models::qa_check::QaCheck;
use crate::state::app::AppState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectHealth {
    pub project_id: u32,
    pub score: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueLinks {
    pub issue_id: u32,
    pub qa_checks: Vec<QaCheck>,
    pub dangling: Vec<u32>,
}

pub fn get_project_health_internal(state: &AppState, project_id: u32) -> Result<ProjectHealth, String> {
    let dashboard = state.dashboard()?;
    let score = health::health_score(&dashboard, project_id)
        .ok_or(format!("Project not found: {project_id}"))?;
    Ok(ProjectHealth { project_id, score })
}

/// Scores for every project, in store order.
pub fn get_all_project_health_internal(state: &AppState) -> Result<Vec<ProjectHealth>, String> {
    let dashboard = state.dashboard()?;
    Ok(dashboard
        .projects
        .all()
        .iter()
        .filter_map(|project| {
            health::health_score(&dashboard, project.id).map(|score| ProjectHealth {
                project_id: project.id,
                score,
            })
        })
        .collect())
}

pub fn get_project_qa_stats_internal(state: &AppState) -> Result<Vec<ProjectQaStats>, String> {
    let dashboard = state.dashboard()?;
    Ok(health::project_qa_stats(&dashboard))
}

pub fn get_dashboard_summary_internal(state: &AppState) -> Result<DashboardSummary, String> {
    let dashboard = state.dashboard()?;
    Ok(health::dashboard_summary(&dashboard))
}

pub fn get_project_issues_internal(state: &AppState, project_id: u32) -> Result<Vec<Issue>, String> {
    let dashboard = state.dashboard()?;
    Ok(associations::issues_for_project(&dashboard, project_id)
        .into_iter()
        .cloned()
        .collect())
}

pub fn get_project_qa_checks_internal(state: &AppState, project_id: u32) -> Result<Vec<QaCheck>, String> {
    let dashboard = state.dashboard()?;
    Ok(associations::qa_checks_for_project(&dashboard, project_id)
        .into_iter()
        .cloned()
        .collect())
}

pub fn get_issue_links_internal(state: &AppState, issue_id: u32) -> Result<IssueLinks, String> {
    let dashboard = state.dashboard()?;
    Ok(IssueLinks {
        issue_id,
        qa_checks: associations::linked_qa_checks_for_issue(&dashboard, issue_id)
            .into_iter()
            .cloned()
            .collect(),
        dangling: associations::dangling_qa_check_links(&dashboard, issue_id),
    })
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_project_health(
    project_id: u32,
    state: tauri::State<'_, AppState>,
) -> Result<ProjectHealth, String> {
    get_project_health_internal(state.inner(), project_id)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_all_project_health(state: tauri::State<'_, AppState>) -> Result<Vec<ProjectHealth>, String> {
    get_all_project_health_internal(state.inner())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_project_qa_stats(state: tauri::State<'_, AppState>) -> Result<Vec<ProjectQaStats>, String> {
    get_project_qa_stats_internal(state.inner())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_dashboard_summary(state: tauri::State<'_, AppState>) -> Result<DashboardSummary, String> {
    get_dashboard_summary_internal(state.inner())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_project_issues(project_id: u32, state: tauri::State<'_, AppState>) -> Result<Vec<Issue>, String> {
    get_project_issues_internal(state.inner(), project_id)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_project_qa_checks(project_id: u32, state: tauri::State<'_, AppState>) -> Result<Vec<QaCheck>, String> {
    get_project_qa_checks_internal(state.inner(), project_id)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_issue_links(issue_id: u32, state: tauri::State<'_, AppState>) -> Result<IssueLinks, String> {
    get_issue_links_internal(state.inner(), issue_id)
}

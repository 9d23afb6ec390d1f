use crate::analysis::associations::{issues_for_project, qa_checks_for_project};
use crate::models::issue::{IssueStatus, Priority};
use crate::models::project::ProjectStatus;
use crate::models::qa_check::CheckStatus;
use crate::state::dashboard::Dashboard;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Largest deduction either the issue or the check ratio can make.
const MAX_DEDUCTION: f64 = 50.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthInputs {
    pub total_issues: usize,
    pub open_issues: usize,
    pub total_checks: usize,
    pub failed_checks: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectQaStats {
    pub project: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub in_review: usize,
    pub blocked: usize,
    pub pass_rate: u8, // rounded percentage
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_projects: usize,
    pub active_projects: usize,
    pub open_issues: usize,
    pub high_priority_open_issues: usize,
    pub total_qa_checks: usize,
    pub qa_pass_rate: u8,
    pub average_health: u8,
}

/// Health score (0–100) from the share of open issues and failed checks.
/// Each share deducts at most 50 points.
pub fn compute_health_score(inputs: HealthInputs) -> u8 {
    let mut score = 100.0;

    if inputs.total_issues > 0 {
        let ratio = inputs.open_issues as f64 / inputs.total_issues as f64;
        score -= (ratio * MAX_DEDUCTION).round().min(MAX_DEDUCTION);
    }

    if inputs.total_checks > 0 {
        let ratio = inputs.failed_checks as f64 / inputs.total_checks as f64;
        score -= (ratio * MAX_DEDUCTION).round().min(MAX_DEDUCTION);
    }

    score.clamp(0.0, 100.0) as u8
}

/// None when the project id is unknown.
pub fn health_score(dashboard: &Dashboard, project_id: u32) -> Option<u8> {
    dashboard.projects.get(project_id)?;

    let issues = issues_for_project(dashboard, project_id);
    let checks = qa_checks_for_project(dashboard, project_id);

    Some(compute_health_score(HealthInputs {
        total_issues: issues.len(),
        open_issues: issues
            .iter()
            .filter(|issue| issue.status == IssueStatus::Open)
            .count(),
        total_checks: checks.len(),
        failed_checks: checks
            .iter()
            .filter(|check| check.status == CheckStatus::Failed)
            .count(),
    }))
}

/// Status tallies per project name found on QA checks, sorted by name.
/// Names that match no project are still reported.
pub fn project_qa_stats(dashboard: &Dashboard) -> Vec<ProjectQaStats> {
    let mut grouped: BTreeMap<&str, ProjectQaStats> = BTreeMap::new();

    for check in dashboard.qa_checks.all() {
        let stats = grouped
            .entry(check.project.as_str())
            .or_insert_with(|| ProjectQaStats {
                project: check.project.clone(),
                ..ProjectQaStats::default()
            });

        stats.total += 1;
        match check.status {
            CheckStatus::Passed => stats.passed += 1,
            CheckStatus::Failed => stats.failed += 1,
            CheckStatus::InReview => stats.in_review += 1,
            CheckStatus::Blocked => stats.blocked += 1,
        }
    }

    grouped
        .into_values()
        .map(|mut stats| {
            stats.pass_rate = percentage(stats.passed, stats.total);
            stats
        })
        .collect()
}

pub fn dashboard_summary(dashboard: &Dashboard) -> DashboardSummary {
    let projects = dashboard.projects.all();
    let issues = dashboard.issues.all();
    let checks = dashboard.qa_checks.all();

    let open: Vec<_> = issues
        .iter()
        .filter(|issue| issue.status == IssueStatus::Open)
        .collect();
    let passed = checks
        .iter()
        .filter(|check| check.status == CheckStatus::Passed)
        .count();

    let health: Vec<u32> = projects
        .iter()
        .filter_map(|project| health_score(dashboard, project.id))
        .map(u32::from)
        .collect();
    let average_health = if health.is_empty() {
        100
    } else {
        (health.iter().sum::<u32>() as f64 / health.len() as f64).round() as u8
    };

    DashboardSummary {
        total_projects: projects.len(),
        active_projects: projects
            .iter()
            .filter(|project| project.status == ProjectStatus::Active)
            .count(),
        open_issues: open.len(),
        high_priority_open_issues: open
            .iter()
            .filter(|issue| issue.priority == Priority::High)
            .count(),
        total_qa_checks: checks.len(),
        qa_pass_rate: percentage(passed, checks.len()),
        average_health,
    }
}

fn percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u8
}

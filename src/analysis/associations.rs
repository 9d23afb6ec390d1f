use crate::models::issue::Issue;
use crate::models::qa_check::QaCheck;
use crate::state::dashboard::Dashboard;

/// Issues whose `project` string equals the project's current name (case-sensitive).
/// Unknown project ids resolve to nothing.
pub fn issues_for_project(dashboard: &Dashboard, project_id: u32) -> Vec<&Issue> {
    let Some(project) = dashboard.projects.get(project_id) else {
        return Vec::new();
    };
    dashboard
        .issues
        .all()
        .iter()
        .filter(|issue| issue.project == project.name)
        .collect()
}

pub fn qa_checks_for_project(dashboard: &Dashboard, project_id: u32) -> Vec<&QaCheck> {
    let Some(project) = dashboard.projects.get(project_id) else {
        return Vec::new();
    };
    dashboard
        .qa_checks
        .all()
        .iter()
        .filter(|check| check.project == project.name)
        .collect()
}

/// Checks linked from the issue, in link order. Ids that no longer resolve are skipped.
pub fn linked_qa_checks_for_issue(dashboard: &Dashboard, issue_id: u32) -> Vec<&QaCheck> {
    let Some(issue) = dashboard.issues.get(issue_id) else {
        return Vec::new();
    };
    issue
        .linked_qa_checks
        .iter()
        .filter_map(|id| dashboard.qa_checks.get(*id))
        .collect()
}

/// Linked check ids that point at nothing.
pub fn dangling_qa_check_links(dashboard: &Dashboard, issue_id: u32) -> Vec<u32> {
    let Some(issue) = dashboard.issues.get(issue_id) else {
        return Vec::new();
    };
    issue
        .linked_qa_checks
        .iter()
        .copied()
        .filter(|id| dashboard.qa_checks.get(*id).is_none())
        .collect()
}

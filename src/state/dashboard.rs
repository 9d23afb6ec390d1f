use crate::models::issue::{Assignee, Issue, IssueStatus, Priority};
use crate::models::project::{Project, ProjectStatus};
use crate::models::qa_check::{CheckStatus, CheckType, QaCheck};
use crate::models::user::{Role, User, UserStatus};
use crate::state::store::EntityStore;

/// Canonical entity collections for one running dashboard.
///
/// Constructed once at startup and handed to whoever needs it; callers that
/// share it across threads wrap it in a `Mutex` (see `AppState`).
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub projects: EntityStore<Project>,
    pub issues: EntityStore<Issue>,
    pub qa_checks: EntityStore<QaCheck>,
    pub users: EntityStore<User>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `check_id` to the issue's linked checks. Returns false if the issue
    /// does not exist or the link is already present. The check id is not verified.
    pub fn link_qa_check(&mut self, issue_id: u32, check_id: u32) -> bool {
        let Some(issue) = self.issues.get_mut(issue_id) else {
            return false;
        };
        if issue.linked_qa_checks.contains(&check_id) {
            return false;
        }
        issue.linked_qa_checks.push(check_id);
        true
    }

    pub fn unlink_qa_check(&mut self, issue_id: u32, check_id: u32) -> bool {
        let Some(issue) = self.issues.get_mut(issue_id) else {
            return false;
        };
        let before = issue.linked_qa_checks.len();
        issue.linked_qa_checks.retain(|id| *id != check_id);
        issue.linked_qa_checks.len() != before
    }

    pub fn record_user_activity(&mut self, user_id: u32, action: &str, target: &str) -> bool {
        match self.users.get_mut(user_id) {
            Some(user) => {
                user.record_activity(action, target);
                true
            }
            None => false,
        }
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        let email = email.trim();
        self.users
            .all()
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }

    /// Small realistic data set for first launch and demos.
    pub fn with_demo_data() -> Self {
        let projects = vec![
            project(1, "E-commerce Platform", "Customer storefront and checkout", ProjectStatus::Active, 65, "2026-01-10", Some("https://shop.example.com")),
            project(2, "Mobile Banking App", "iOS and Android banking client", ProjectStatus::Active, 40, "2026-02-03", None),
            project(3, "Analytics Dashboard", "Internal reporting suite", ProjectStatus::Completed, 100, "2025-09-22", Some("https://analytics.example.com")),
        ];

        let issues = vec![
            issue(1, "Checkout fails with saved cards", "E-commerce Platform", IssueStatus::Open, Priority::High, "Alex Kim", vec![1, 2], Some("v2.3.0")),
            issue(2, "Product images load slowly", "E-commerce Platform", IssueStatus::InProgress, Priority::Medium, "Priya Nair", vec![3], None),
            issue(3, "Biometric login ignored on Android 14", "Mobile Banking App", IssueStatus::Open, Priority::High, "Jordan Lee", vec![4], Some("v1.8.2")),
            issue(4, "Export button label truncated", "Analytics Dashboard", IssueStatus::Closed, Priority::Low, "Priya Nair", vec![], Some("v3.1.0")),
        ];

        let qa_checks = vec![
            qa_check(1, "Payment flow regression", "E-commerce Platform", CheckStatus::Failed, CheckType::Functional, "Alex Kim"),
            qa_check(2, "Card tokenization audit", "E-commerce Platform", CheckStatus::InReview, CheckType::Security, "Morgan Diaz"),
            qa_check(3, "Catalog page load budget", "E-commerce Platform", CheckStatus::Passed, CheckType::Performance, "Priya Nair"),
            qa_check(4, "Login screen accessibility", "Mobile Banking App", CheckStatus::Blocked, CheckType::UiUx, "Jordan Lee"),
            qa_check(5, "Report rendering", "Analytics Dashboard", CheckStatus::Passed, CheckType::Functional, "Morgan Diaz"),
        ];

        let users = vec![
            user(1, "Morgan Diaz", "morgan@qatrack.dev", Role::Admin, UserStatus::Active, "Engineering"),
            user(2, "Alex Kim", "alex@qatrack.dev", Role::QaEngineer, UserStatus::Active, "Quality"),
            user(3, "Priya Nair", "priya@qatrack.dev", Role::Developer, UserStatus::Active, "Engineering"),
            user(4, "Jordan Lee", "jordan@qatrack.dev", Role::ProjectManager, UserStatus::Inactive, "Delivery"),
        ];

        Self {
            projects: EntityStore::from_items(projects),
            issues: EntityStore::from_items(issues),
            qa_checks: EntityStore::from_items(qa_checks),
            users: EntityStore::from_items(users),
        }
    }
}

fn project(
    id: u32,
    name: &str,
    description: &str,
    status: ProjectStatus,
    progress: u8,
    start_date: &str,
    app_url: Option<&str>,
) -> Project {
    Project {
        id,
        name: name.to_string(),
        description: description.to_string(),
        status,
        progress,
        team: vec!["/avatars/1.png".to_string(), "/avatars/2.png".to_string()],
        start_date: start_date.to_string(),
        app_url: app_url.map(str::to_string),
    }
}

#[allow(clippy::too_many_arguments)]
fn issue(
    id: u32,
    title: &str,
    project: &str,
    status: IssueStatus,
    priority: Priority,
    assignee: &str,
    linked_qa_checks: Vec<u32>,
    release: Option<&str>,
) -> Issue {
    Issue {
        id,
        title: title.to_string(),
        description: format!("{title}. Reproduced on staging."),
        status,
        priority,
        project: project.to_string(),
        assignee: Assignee {
            name: assignee.to_string(),
            avatar: format!("/avatars/{id}.png"),
        },
        created: "2026-03-02".to_string(),
        comments: id,
        attachments: 0,
        linked_qa_checks,
        release: release.map(str::to_string),
    }
}

fn qa_check(
    id: u32,
    name: &str,
    project: &str,
    status: CheckStatus,
    check_type: CheckType,
    assignee: &str,
) -> QaCheck {
    QaCheck {
        id,
        name: name.to_string(),
        description: format!("{name} for {project}"),
        status,
        project: project.to_string(),
        assignee: assignee.to_string(),
        last_run: "2026-03-05T09:30:00Z".to_string(),
        check_type,
    }
}

fn user(id: u32, name: &str, email: &str, role: Role, status: UserStatus, department: &str) -> User {
    User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        role,
        status,
        avatar: format!("/avatars/{id}.png"),
        phone: None,
        location: None,
        department: Some(department.to_string()),
        two_factor_enabled: Some(false),
        activity: Vec::new(),
    }
}

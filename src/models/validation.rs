use crate::models::issue::Issue;
use crate::models::project::Project;
use crate::models::qa_check::QaCheck;
use crate::models::user::User;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

macro_rules! form_pattern {
    ($name:ident, $regex_str:expr) => {
        static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

form_pattern!(RE_EMAIL, r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$");
form_pattern!(RE_PHONE, r"^\+?(?:[ ().\-]*\d){7,15}[ ().\-]*$");

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Collects field errors for one form. A form is valid when nothing was collected.
#[derive(Debug, Default)]
struct Form {
    errors: Vec<FieldError>,
}

impl Form {
    fn required(&mut self, field: &str, label: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.errors
                .push(FieldError::new(field, format!("{label} is required")));
            return false;
        }
        true
    }

    fn text(&mut self, field: &str, label: &str, value: &str) {
        if self.required(field, label, value) && is_numeric_only(value) {
            self.errors.push(FieldError::new(
                field,
                format!("{label} cannot contain only numbers"),
            ));
        }
    }

    fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

pub fn validate_project(project: &Project) -> Result<(), Vec<FieldError>> {
    let mut form = Form::default();
    form.text("name", "Project name", &project.name);
    form.required("description", "Description", &project.description);

    if project.progress > 100 {
        form.errors.push(FieldError::new(
            "progress",
            "Progress must be between 0 and 100",
        ));
    }

    if form.required("startDate", "Start date", &project.start_date)
        && chrono::NaiveDate::parse_from_str(project.start_date.trim(), "%Y-%m-%d").is_err()
    {
        form.errors.push(FieldError::new(
            "startDate",
            "Start date must be in YYYY-MM-DD format",
        ));
    }

    if let Some(app_url) = project.app_url.as_deref().filter(|u| !u.trim().is_empty()) {
        if url::Url::parse(app_url.trim()).is_err() {
            form.errors
                .push(FieldError::new("appUrl", "Please enter a valid URL"));
        }
    }

    form.finish()
}

pub fn validate_issue(issue: &Issue) -> Result<(), Vec<FieldError>> {
    let mut form = Form::default();
    form.text("title", "Title", &issue.title);
    form.required("description", "Description", &issue.description);
    form.required("project", "Project", &issue.project);
    form.text("assignee", "Assignee", &issue.assignee.name);
    form.finish()
}

pub fn validate_qa_check(check: &QaCheck) -> Result<(), Vec<FieldError>> {
    let mut form = Form::default();
    form.text("name", "Check name", &check.name);
    form.required("description", "Description", &check.description);
    form.required("project", "Project", &check.project);
    form.text("assignee", "Assignee", &check.assignee);
    form.finish()
}

pub fn validate_user(user: &User) -> Result<(), Vec<FieldError>> {
    let mut form = Form::default();
    form.text("name", "Name", &user.name);

    if form.required("email", "Email", &user.email) && !is_valid_email(&user.email) {
        form.errors
            .push(FieldError::new("email", "Please enter a valid email address"));
    }

    if let Some(phone) = user.phone.as_deref().filter(|p| !p.trim().is_empty()) {
        if !is_valid_phone(phone) {
            form.errors
                .push(FieldError::new("phone", "Please enter a valid phone number"));
        }
    }

    if let Some(location) = user.location.as_deref().filter(|l| !l.trim().is_empty()) {
        if is_numeric_only(location) {
            form.errors.push(FieldError::new(
                "location",
                "Location cannot contain only numbers",
            ));
        }
    }

    if let Some(department) = user.department.as_deref().filter(|d| !d.trim().is_empty()) {
        if is_numeric_only(department) {
            form.errors.push(FieldError::new(
                "department",
                "Department cannot contain only numbers",
            ));
        }
    }

    form.finish()
}

pub fn is_valid_email(email: &str) -> bool {
    matches_pattern(&RE_EMAIL, email)
}

/// Digits with optional leading `+` and the usual separators; 7 to 15 digits.
pub fn is_valid_phone(phone: &str) -> bool {
    matches_pattern(&RE_PHONE, phone)
}

fn matches_pattern(pattern: &LazyLock<Option<Regex>>, value: &str) -> bool {
    LazyLock::force(pattern)
        .as_ref()
        .map(|re| re.is_match(value.trim()))
        .unwrap_or(false)
}

fn is_numeric_only(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || c == '.' || c == '-')
        && trimmed.chars().any(|c| c.is_ascii_digit())
}

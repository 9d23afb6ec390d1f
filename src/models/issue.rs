use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Closed,
}

impl IssueStatus {
    pub fn label(self) -> &'static str {
        match self {
            IssueStatus::Open => "Open",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::Closed => "Closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub name: String,
    #[serde(default)]
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub id: u32,
    pub title: String,
    pub description: String,
    pub status: IssueStatus,
    pub priority: Priority,
    /// Project name, not id. Renaming a project does not rewrite this.
    pub project: String,
    pub assignee: Assignee,
    pub created: String,
    #[serde(default)]
    pub comments: u32,
    #[serde(default)]
    pub attachments: u32,
    #[serde(rename = "linkedQAChecks", default)]
    pub linked_qa_checks: Vec<u32>,
    #[serde(default)]
    pub release: Option<String>,
}

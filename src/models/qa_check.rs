use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    Passed,
    Failed,
    #[serde(rename = "In Review")]
    InReview,
    Blocked,
}

impl CheckStatus {
    pub fn label(self) -> &'static str {
        match self {
            CheckStatus::Passed => "Passed",
            CheckStatus::Failed => "Failed",
            CheckStatus::InReview => "In Review",
            CheckStatus::Blocked => "Blocked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckType {
    Functional,
    Performance,
    Security,
    #[serde(rename = "UI/UX")]
    UiUx,
}

impl CheckType {
    pub fn label(self) -> &'static str {
        match self {
            CheckType::Functional => "Functional",
            CheckType::Performance => "Performance",
            CheckType::Security => "Security",
            CheckType::UiUx => "UI/UX",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaCheck {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    pub description: String,
    pub status: CheckStatus,
    /// Project name, matched exactly by the association resolver.
    pub project: String,
    pub assignee: String,
    pub last_run: String,
    #[serde(rename = "type")]
    pub check_type: CheckType,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_camel_case_payload() {
        let check: QaCheck = serde_json::from_value(json!({
            "id": 3,
            "name": "Checkout smoke",
            "description": "Happy-path purchase",
            "status": "In Review",
            "project": "E-commerce Platform",
            "assignee": "Alex Kim",
            "lastRun": "2026-03-05T09:30:00Z",
            "type": "UI/UX"
        }))
        .expect("check payload");

        assert_eq!(check.last_run, "2026-03-05T09:30:00Z");
        assert_eq!(check.check_type, CheckType::UiUx);

        let value = serde_json::to_value(&check).expect("serialize");
        assert_eq!(value["lastRun"], json!("2026-03-05T09:30:00Z"));
        assert_eq!(value["type"], json!("UI/UX"));
    }
}

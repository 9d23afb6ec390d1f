use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Active,
    Completed,
    #[serde(rename = "On Hold")]
    OnHold,
}

impl ProjectStatus {
    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Active => "Active",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::OnHold => "On Hold",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub progress: u8, // 0-100
    #[serde(default)]
    pub team: Vec<String>, // avatar references
    pub start_date: String, // YYYY-MM-DD
    #[serde(default)]
    pub app_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_camel_case_payload() {
        let project: Project = serde_json::from_value(json!({
            "id": 7,
            "name": "Acme Portal",
            "description": "Customer portal rewrite",
            "status": "On Hold",
            "progress": 35,
            "team": ["/avatars/1.png"],
            "startDate": "2026-02-01",
            "appUrl": "https://portal.acme.example"
        }))
        .expect("project payload");

        assert_eq!(project.status, ProjectStatus::OnHold);
        assert_eq!(project.start_date, "2026-02-01");
        assert_eq!(project.app_url.as_deref(), Some("https://portal.acme.example"));

        let value = serde_json::to_value(&project).expect("serialize");
        assert_eq!(value["startDate"], json!("2026-02-01"));
        assert!(value.get("start_date").is_none());
    }
}

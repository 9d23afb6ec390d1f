use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    #[serde(rename = "QA Engineer")]
    QaEngineer,
    Developer,
    #[serde(rename = "Project Manager")]
    ProjectManager,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::QaEngineer => "QA Engineer",
            Role::Developer => "Developer",
            Role::ProjectManager => "Project Manager",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn label(self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Inactive => "Inactive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub action: String,
    pub target: String,
    pub timestamp: String, // RFC 3339
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub two_factor_enabled: Option<bool>,
    #[serde(default)]
    pub activity: Vec<ActivityEntry>,
}

impl User {
    pub fn record_activity(&mut self, action: &str, target: &str) {
        self.activity.push(ActivityEntry {
            action: action.to_string(),
            target: target.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_camel_case_payload() {
        let user: User = serde_json::from_value(json!({
            "id": 2,
            "name": "Alex Kim",
            "email": "alex@qatrack.dev",
            "role": "QA Engineer",
            "status": "Active",
            "avatar": "/avatars/2.png",
            "twoFactorEnabled": true,
            "activity": [{"action": "Closed", "target": "Issue #4", "timestamp": "2026-03-01T10:00:00Z"}]
        }))
        .expect("user payload");

        assert_eq!(user.role, Role::QaEngineer);
        assert_eq!(user.two_factor_enabled, Some(true));
        assert_eq!(user.activity.len(), 1);
        assert!(user.phone.is_none());

        let value = serde_json::to_value(&user).expect("serialize");
        assert_eq!(value["twoFactorEnabled"], json!(true));
    }
}

use crate::models::issue::Issue;
use crate::models::project::Project;
use crate::models::qa_check::QaCheck;
use crate::models::user::User;
use crate::models::validation::{self, FieldError};
use crate::state::app::AppState;
use crate::state::dashboard::Dashboard;
use crate::state::store::{Entity, EntityStore, FilterCriteria};
use serde::Serialize;
use serde_json::{json, Value};

/// Entity types the CRUD commands manage.
pub trait Managed: Entity + Serialize {
    const KIND: &'static str;
    fn store(dashboard: &Dashboard) -> &EntityStore<Self>;
    fn store_mut(dashboard: &mut Dashboard) -> &mut EntityStore<Self>;
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

impl Managed for Project {
    const KIND: &'static str = "project";

    fn store(dashboard: &Dashboard) -> &EntityStore<Self> {
        &dashboard.projects
    }

    fn store_mut(dashboard: &mut Dashboard) -> &mut EntityStore<Self> {
        &mut dashboard.projects
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        validation::validate_project(self)
    }
}

impl Managed for Issue {
    const KIND: &'static str = "issue";

    fn store(dashboard: &Dashboard) -> &EntityStore<Self> {
        &dashboard.issues
    }

    fn store_mut(dashboard: &mut Dashboard) -> &mut EntityStore<Self> {
        &mut dashboard.issues
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        validation::validate_issue(self)
    }
}

impl Managed for QaCheck {
    const KIND: &'static str = "qa_check";

    fn store(dashboard: &Dashboard) -> &EntityStore<Self> {
        &dashboard.qa_checks
    }

    fn store_mut(dashboard: &mut Dashboard) -> &mut EntityStore<Self> {
        &mut dashboard.qa_checks
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        validation::validate_qa_check(self)
    }
}

impl Managed for User {
    const KIND: &'static str = "user";

    fn store(dashboard: &Dashboard) -> &EntityStore<Self> {
        &dashboard.users
    }

    fn store_mut(dashboard: &mut Dashboard) -> &mut EntityStore<Self> {
        &mut dashboard.users
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        validation::validate_user(self)
    }
}

/// `create | read | update | delete | list | filter` over one entity type.
///
/// Validation failures are not errors: they come back as
/// `{"status": "invalid", "errors": [...]}` and leave the store untouched.
pub fn entity_crud_internal<T: Managed>(
    state: &AppState,
    operation: &str,
    item: Option<T>,
    id: Option<u32>,
    filter: Option<FilterCriteria>,
) -> Result<Value, String> {
    match operation {
        "create" => {
            let item = item.ok_or("Item required for create")?;
            if let Err(errors) = item.validate() {
                return Ok(invalid(errors));
            }
            let mut dashboard = state.dashboard()?;
            let created = T::store_mut(&mut dashboard).add(item);
            log::debug!("created {} {}", T::KIND, created.id());
            Ok(json!({"status": "created", "id": created.id(), "item": created}))
        }
        "update" => {
            let item = item.ok_or("Item required for update")?;
            if let Err(errors) = item.validate() {
                return Ok(invalid(errors));
            }
            let id = item.id();
            let mut dashboard = state.dashboard()?;
            if T::store_mut(&mut dashboard).update(item) {
                Ok(json!({"status": "updated", "id": id}))
            } else {
                Ok(json!({"status": "not_found", "id": id}))
            }
        }
        "read" => {
            let id = id.ok_or("ID required for read")?;
            let dashboard = state.dashboard()?;
            Ok(serde_json::to_value(T::store(&dashboard).get(id)).unwrap_or(Value::Null))
        }
        "list" => {
            let dashboard = state.dashboard()?;
            Ok(serde_json::to_value(T::store(&dashboard).all()).unwrap_or_default())
        }
        "filter" => {
            let criteria = filter.unwrap_or_default();
            let dashboard = state.dashboard()?;
            Ok(serde_json::to_value(T::store(&dashboard).filter(&criteria)).unwrap_or_default())
        }
        "delete" => {
            let id = id.ok_or("ID required for delete")?;
            let mut dashboard = state.dashboard()?;
            let removed = T::store_mut(&mut dashboard).delete(id);
            Ok(json!({"status": "deleted", "removed": removed}))
        }
        _ => Err(format!("Unknown operation: {operation}")),
    }
}

fn invalid(errors: Vec<FieldError>) -> Value {
    json!({"status": "invalid", "errors": errors})
}

pub fn link_qa_check_internal(state: &AppState, issue_id: u32, qa_check_id: u32) -> Result<Value, String> {
    let mut dashboard = state.dashboard()?;
    let linked = dashboard.link_qa_check(issue_id, qa_check_id);
    Ok(json!({"status": if linked { "linked" } else { "unchanged" }}))
}

pub fn unlink_qa_check_internal(state: &AppState, issue_id: u32, qa_check_id: u32) -> Result<Value, String> {
    let mut dashboard = state.dashboard()?;
    let unlinked = dashboard.unlink_qa_check(issue_id, qa_check_id);
    Ok(json!({"status": if unlinked { "unlinked" } else { "unchanged" }}))
}

pub fn record_user_activity_internal(
    state: &AppState,
    user_id: u32,
    action: &str,
    target: &str,
) -> Result<Value, String> {
    let mut dashboard = state.dashboard()?;
    if !dashboard.record_user_activity(user_id, action, target) {
        return Err(format!("User not found: {user_id}"));
    }
    Ok(json!({"status": "recorded"}))
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn project_crud(
    operation: String,
    item: Option<Project>,
    id: Option<u32>,
    filter: Option<FilterCriteria>,
    state: tauri::State<'_, AppState>,
) -> Result<Value, String> {
    entity_crud_internal(state.inner(), &operation, item, id, filter)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn issue_crud(
    operation: String,
    item: Option<Issue>,
    id: Option<u32>,
    filter: Option<FilterCriteria>,
    state: tauri::State<'_, AppState>,
) -> Result<Value, String> {
    entity_crud_internal(state.inner(), &operation, item, id, filter)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn qa_check_crud(
    operation: String,
    item: Option<QaCheck>,
    id: Option<u32>,
    filter: Option<FilterCriteria>,
    state: tauri::State<'_, AppState>,
) -> Result<Value, String> {
    entity_crud_internal(state.inner(), &operation, item, id, filter)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn user_crud(
    operation: String,
    item: Option<User>,
    id: Option<u32>,
    filter: Option<FilterCriteria>,
    state: tauri::State<'_, AppState>,
) -> Result<Value, String> {
    entity_crud_internal(state.inner(), &operation, item, id, filter)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn link_qa_check(issue_id: u32, qa_check_id: u32, state: tauri::State<'_, AppState>) -> Result<Value, String> {
    link_qa_check_internal(state.inner(), issue_id, qa_check_id)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn unlink_qa_check(issue_id: u32, qa_check_id: u32, state: tauri::State<'_, AppState>) -> Result<Value, String> {
    unlink_qa_check_internal(state.inner(), issue_id, qa_check_id)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn record_user_activity(
    user_id: u32,
    action: String,
    target: String,
    state: tauri::State<'_, AppState>,
) -> Result<Value, String> {
    record_user_activity_internal(state.inner(), user_id, &action, &target)
}

use crate::auth::AuthUser;
use crate::state::app::AppState;

/// Signs in through the gateway and, when the address belongs to a dashboard
/// user, appends a sign-in entry to that user's activity log.
pub async fn sign_in_internal(state: &AppState, email: &str, password: &str) -> Result<AuthUser, String> {
    let user = state
        .auth()
        .sign_in(email, password)
        .await
        .map_err(|e| e.to_string())?;

    let mut dashboard = state.dashboard()?;
    if let Some(user_id) = dashboard.find_user_by_email(&user.email).map(|u| u.id) {
        dashboard.record_user_activity(user_id, "Signed in", "Dashboard");
    }

    Ok(user)
}

pub async fn sign_out_internal(state: &AppState) -> Result<(), String> {
    state.auth().sign_out().await;
    Ok(())
}

pub async fn reset_password_internal(state: &AppState, email: &str) -> Result<(), String> {
    state
        .auth()
        .reset_password(email)
        .await
        .map_err(|e| e.to_string())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn sign_in(
    email: String,
    password: String,
    state: tauri::State<'_, AppState>,
) -> Result<AuthUser, String> {
    sign_in_internal(state.inner(), &email, &password).await
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn sign_out(state: tauri::State<'_, AppState>) -> Result<(), String> {
    sign_out_internal(state.inner()).await
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn reset_password(email: String, state: tauri::State<'_, AppState>) -> Result<(), String> {
    reset_password_internal(state.inner(), &email).await
}

use async_trait::async_trait;
use qatrack_lib::analysis::performance::{PerformanceAnalyzer, SimulatedAnalyzer};
use qatrack_lib::auth::{AuthProvider, AuthUser, InMemoryAuthProvider, DEMO_EMAIL, DEMO_PASSWORD};
use qatrack_lib::commands::auth::{reset_password_internal, sign_in_internal};
use qatrack_lib::commands::entities::{entity_crud_internal, link_qa_check_internal};
use qatrack_lib::commands::exports::export_data_internal;
use qatrack_lib::commands::insights::{get_dashboard_summary_internal, get_issue_links_internal, get_project_health_internal};
use qatrack_lib::commands::performance::{
    analyze_website_internal, clear_performance_history_internal, compare_websites_internal,
    get_performance_history_internal, get_performance_trend_internal,
};
use qatrack_lib::commands::settings::{get_settings_internal, load_effective_dashboard_settings, save_settings_internal};
use qatrack_lib::error::{AnalysisError, ANALYSIS_FAILED_MESSAGE, INVALID_CREDENTIALS_MESSAGE};
use qatrack_lib::models::metrics::PerformanceMetrics;
use qatrack_lib::models::project::{Project, ProjectStatus};
use qatrack_lib::models::qa_check::QaCheck;
use qatrack_lib::state::app::AppState;
use qatrack_lib::state::store::FilterCriteria;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

struct FailingAnalyzer;

#[async_trait]
impl PerformanceAnalyzer for FailingAnalyzer {
    async fn analyze(&self, _url: &str) -> Result<PerformanceMetrics, AnalysisError> {
        Err(AnalysisError::Backend("lighthouse unavailable".to_string()))
    }
}

fn open_state(tmp: &TempDir, analyzer: Arc<dyn PerformanceAnalyzer>) -> AppState {
    let effective = load_effective_dashboard_settings(tmp.path()).expect("load settings");
    let provider: Arc<dyn AuthProvider> = Arc::new(InMemoryAuthProvider::new());
    AppState::open_with(tmp.path().to_path_buf(), &effective, analyzer, provider).expect("open state")
}

fn fast_state(tmp: &TempDir) -> AppState {
    open_state(tmp, Arc::new(SimulatedAnalyzer::new(Duration::from_millis(1))))
}

fn sample_project(name: &str) -> Project {
    Project {
        id: 0,
        name: name.to_string(),
        description: "Checkout rebuild".to_string(),
        status: ProjectStatus::Active,
        progress: 10,
        team: vec![],
        start_date: "2024-03-01".to_string(),
        app_url: Some("https://acme.example".to_string()),
    }
}

#[test]
fn settings_commands_round_trip_and_merge_partial_updates() {
    let tmp = tempfile::tempdir().expect("temp dir");

    let initial = get_settings_internal(tmp.path()).expect("get settings");
    assert_eq!(initial["analysisDelayMs"], json!(2000));
    assert_eq!(initial["trendPeriod"], json!("week"));

    save_settings_internal(tmp.path(), json!({"trendPeriod": "month", "notifications": {"email": false}}))
        .expect("save settings");

    let reloaded = get_settings_internal(tmp.path()).expect("reload settings");
    assert_eq!(reloaded["trendPeriod"], json!("month"));
    assert_eq!(reloaded["notifications"]["email"], json!(false));
    assert_eq!(reloaded["notifications"]["issueAssigned"], json!(true));

    let effective = load_effective_dashboard_settings(tmp.path()).expect("effective");
    assert_eq!(effective.trend_period.as_str(), "month");
}

#[test]
fn settings_sanitize_out_of_range_values() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let saved = save_settings_internal(
        tmp.path(),
        json!({"analysisDelayMs": 999_999, "trendPeriod": "decade", "itemsPerPage": 1}),
    )
    .expect("save settings");

    assert_eq!(saved["analysisDelayMs"], json!(30_000));
    assert_eq!(saved["trendPeriod"], json!("week"));
    assert_eq!(saved["itemsPerPage"], json!(5));
}

#[test]
fn project_crud_contract() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let state = fast_state(&tmp);

    let created = entity_crud_internal(&state, "create", Some(sample_project("Acme Storefront")), None, None)
        .expect("create");
    assert_eq!(created["status"], json!("created"));
    let id = created["id"].as_u64().expect("id") as u32;
    assert_eq!(id, 4, "demo data holds projects 1..=3");

    let read = entity_crud_internal::<Project>(&state, "read", None, Some(id), None).expect("read");
    assert_eq!(read["name"], json!("Acme Storefront"));

    let mut changed = sample_project("Acme Storefront");
    changed.id = id;
    changed.progress = 80;
    let updated = entity_crud_internal(&state, "update", Some(changed), None, None).expect("update");
    assert_eq!(updated["status"], json!("updated"));

    let deleted = entity_crud_internal::<Project>(&state, "delete", None, Some(id), None).expect("delete");
    assert_eq!(deleted["removed"], json!(true));

    let missing = entity_crud_internal::<Project>(&state, "read", None, Some(id), None).expect("read missing");
    assert!(missing.is_null());

    let recreated = entity_crud_internal(&state, "create", Some(sample_project("Second")), None, None)
        .expect("recreate");
    assert_eq!(recreated["id"], json!(5), "deleted ids are not reused");
}

#[test]
fn invalid_items_are_reported_and_not_stored() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let state = fast_state(&tmp);

    let mut bad = sample_project("");
    bad.progress = 140;
    bad.start_date = "03/01/2024".to_string();

    let result = entity_crud_internal(&state, "create", Some(bad), None, None).expect("create");
    assert_eq!(result["status"], json!("invalid"));
    let fields: Vec<&str> = result["errors"]
        .as_array()
        .expect("errors")
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"progress"));
    assert!(fields.contains(&"startDate"));

    let listed = entity_crud_internal::<Project>(&state, "list", None, None, None).expect("list");
    assert_eq!(listed.as_array().map(Vec::len), Some(3));
}

#[test]
fn update_of_unknown_id_reports_not_found() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let state = fast_state(&tmp);

    let mut ghost = sample_project("Ghost");
    ghost.id = 99;
    let result = entity_crud_internal(&state, "update", Some(ghost), None, None).expect("update");
    assert_eq!(result["status"], json!("not_found"));

    let err = entity_crud_internal::<Project>(&state, "archive", None, None, None).unwrap_err();
    assert!(err.contains("Unknown operation"));
}

#[test]
fn qa_check_filter_combines_search_and_fields() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let state = fast_state(&tmp);

    let criteria = FilterCriteria::default()
        .field("status", "all")
        .field("project", "E-commerce Platform");
    let result = entity_crud_internal::<QaCheck>(&state, "filter", None, None, Some(criteria)).expect("filter");
    assert_eq!(result.as_array().map(Vec::len), Some(3));

    let criteria = FilterCriteria::default().field("status", "Failed");
    let result = entity_crud_internal::<QaCheck>(&state, "filter", None, None, Some(criteria)).expect("filter");
    assert_eq!(result.as_array().map(Vec::len), Some(1));
}

#[test]
fn health_and_links_reflect_demo_data() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let state = fast_state(&tmp);

    assert_eq!(get_project_health_internal(&state, 3).expect("health").score, 100);
    assert!(get_project_health_internal(&state, 42).is_err());

    let summary = get_dashboard_summary_internal(&state).expect("summary");
    assert_eq!(summary.total_projects, 3);

    link_qa_check_internal(&state, 4, 99).expect("link");
    let links = get_issue_links_internal(&state, 4).expect("links");
    assert!(links.qa_checks.is_empty());
    assert_eq!(links.dangling, vec![99]);
}

#[tokio::test]
async fn analysis_is_persisted_and_survives_reopen() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let state = fast_state(&tmp);

    let metrics = analyze_website_internal(&state, "acme.example").await.expect("analyze");
    assert_eq!(metrics.url, "https://acme.example");
    assert!((0.0..100.0).contains(&metrics.performance));
    assert!((0.0..5.0).contains(&metrics.loading_speed));

    let comparison = compare_websites_internal(&state, "https://a.example", "https://b.example")
        .await
        .expect("compare");
    assert_ne!(comparison.first.id, comparison.second.id);

    drop(state);
    let reopened = fast_state(&tmp);
    let history = get_performance_history_internal(&reopened, None).expect("history");
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].id, metrics.id);

    let only_acme = get_performance_history_internal(&reopened, Some("https://ACME.example")).expect("filtered");
    assert_eq!(only_acme.len(), 1);

    clear_performance_history_internal(&reopened).expect("clear");
    drop(reopened);
    let cleared = fast_state(&tmp);
    assert!(get_performance_history_internal(&cleared, None).expect("history").is_empty());
}

#[tokio::test(start_paused = true)]
async fn saved_analysis_delay_applies_without_reopening() {
    let tmp = tempfile::tempdir().expect("temp dir");
    save_settings_internal(tmp.path(), json!({"analysisDelayMs": 3000})).expect("save settings");
    let state = AppState::open(tmp.path()).expect("open state");

    let started = tokio::time::Instant::now();
    analyze_website_internal(&state, "example.com").await.expect("first analysis");
    assert!(started.elapsed() >= Duration::from_secs(3));

    save_settings_internal(tmp.path(), json!({"analysisDelayMs": 0})).expect("save settings");
    let started = tokio::time::Instant::now();
    analyze_website_internal(&state, "example.com").await.expect("second analysis");
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn failed_analysis_surfaces_generic_message_and_records_nothing() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let state = open_state(&tmp, Arc::new(FailingAnalyzer));

    let err = analyze_website_internal(&state, "https://acme.example").await.unwrap_err();
    assert_eq!(err, ANALYSIS_FAILED_MESSAGE);

    let err = compare_websites_internal(&state, "https://a.example", "https://b.example")
        .await
        .unwrap_err();
    assert_eq!(err, ANALYSIS_FAILED_MESSAGE);

    assert!(get_performance_history_internal(&state, None).expect("history").is_empty());
}

#[tokio::test]
async fn trend_has_one_point_per_period_slot() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let state = fast_state(&tmp);

    let err = get_performance_trend_internal(&state, "https://nothing.example", None, None).unwrap_err();
    assert!(err.contains("no metrics recorded"));

    analyze_website_internal(&state, "https://acme.example").await.expect("analyze");

    let week = get_performance_trend_internal(&state, "https://acme.example", None, None).expect("week");
    assert_eq!(week.len(), 7);
    let year = get_performance_trend_internal(&state, "https://acme.example", Some("year"), None).expect("year");
    assert_eq!(year.len(), 12);
    assert!(year.iter().all(|p| p.date.len() == 7));

    assert!(get_performance_trend_internal(&state, "https://acme.example", Some("decade"), None).is_err());
}

#[tokio::test]
async fn scheme_less_url_finds_its_own_history_and_trend() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let state = fast_state(&tmp);

    let mut recorded = Vec::new();
    for _ in 0..5 {
        let metrics = analyze_website_internal(&state, "example.com").await.expect("analyze");
        recorded.push(metrics);
    }

    let history = get_performance_history_internal(&state, Some("example.com")).expect("history");
    assert_eq!(history.len(), 5);

    let trend = get_performance_trend_internal(&state, "example.com", Some("week"), None).expect("trend");
    assert_eq!(trend.len(), 7);
    let last = trend.last().expect("last point");
    let newest = recorded.last().expect("newest");
    assert_eq!(last.performance, newest.performance.round() as u8);
}

#[tokio::test]
async fn demo_credentials_sign_in_without_provider_account() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let state = fast_state(&tmp);

    let user = sign_in_internal(&state, DEMO_EMAIL, DEMO_PASSWORD).await.expect("demo sign in");
    assert_eq!(user.email, DEMO_EMAIL);

    let err = sign_in_internal(&state, DEMO_EMAIL, "wrong").await.unwrap_err();
    assert_eq!(err, INVALID_CREDENTIALS_MESSAGE);

    reset_password_internal(&state, "nobody@qatrack.dev").await.expect("reset is silent");
}

#[tokio::test]
async fn sign_in_records_activity_for_matching_dashboard_user() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let provider = Arc::new(InMemoryAuthProvider::new());
    provider.register(
        AuthUser {
            id: "u-2".to_string(),
            email: "alex@qatrack.dev".to_string(),
            name: "Alex Kim".to_string(),
            role: "QA Engineer".to_string(),
        },
        "s3cret!",
    );
    let effective = load_effective_dashboard_settings(tmp.path()).expect("settings");
    let state = AppState::open_with(
        tmp.path().to_path_buf(),
        &effective,
        Arc::new(SimulatedAnalyzer::new(Duration::from_millis(1))),
        provider.clone(),
    )
    .expect("open state");

    let before = state.dashboard().expect("lock").users.get(2).expect("alex").activity.len();
    sign_in_internal(&state, "Alex@qatrack.dev", "s3cret!").await.expect("sign in");

    let dashboard = state.dashboard().expect("lock");
    let alex = dashboard.users.get(2).expect("alex");
    assert_eq!(alex.activity.len(), before + 1);
    assert_eq!(alex.activity.last().map(|a| a.action.as_str()), Some("Signed in"));
    assert_eq!(provider.current_user().map(|u| u.id), Some("u-2".to_string()));
}

#[tokio::test]
async fn export_acknowledges_format_and_count() {
    let tmp = tempfile::tempdir().expect("temp dir");
    save_settings_internal(tmp.path(), json!({"exportDelayMs": 0})).expect("save settings");
    let state = fast_state(&tmp);

    let ack = export_data_internal(&state, "csv", 12).await.expect("export");
    assert_eq!(ack.record_count, 12);
    assert!(ack.message.contains("CSV"));

    assert!(export_data_internal(&state, "docx", 1).await.is_err());
}

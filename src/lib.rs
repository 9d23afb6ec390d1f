pub mod analysis;
pub mod auth;
pub mod commands;
pub mod error;
pub mod models;
pub mod state;

/// Installs the global logger. `RUST_LOG` overrides the default `info` filter.
/// Calling it twice is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use commands::{
        auth::{reset_password, sign_in, sign_out},
        entities::{
            issue_crud, link_qa_check, project_crud, qa_check_crud, record_user_activity, unlink_qa_check,
            user_crud,
        },
        exports::{export_data, generate_report},
        insights::{
            get_all_project_health, get_dashboard_summary, get_issue_links, get_project_health, get_project_issues,
            get_project_qa_checks, get_project_qa_stats,
        },
        performance::{
            analyze_website, clear_performance_history, compare_websites, get_performance_history,
            get_performance_trend,
        },
        settings::{get_settings, save_settings},
    };
    use state::app::AppState;
    use tauri::Manager;

    init_logging();

    let result = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let data_dir = app.path().app_data_dir()?;
            let state = AppState::open(data_dir)?;
            app.manage(state);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            project_crud,
            issue_crud,
            qa_check_crud,
            user_crud,
            link_qa_check,
            unlink_qa_check,
            record_user_activity,
            get_project_health,
            get_all_project_health,
            get_project_qa_stats,
            get_dashboard_summary,
            get_project_issues,
            get_project_qa_checks,
            get_issue_links,
            analyze_website,
            compare_websites,
            get_performance_history,
            clear_performance_history,
            get_performance_trend,
            export_data,
            generate_report,
            sign_in,
            sign_out,
            reset_password,
            get_settings,
            save_settings,
        ])
        .run(tauri::generate_context!());

    if let Err(e) = result {
        log::error!("error while running tauri application: {e}");
        std::process::exit(1);
    }
}

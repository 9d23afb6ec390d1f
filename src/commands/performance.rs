use crate::analysis::performance::{analyze_with_timeout, compare};
use crate::analysis::trend::{generate_trend, TrendPeriod, TrendPoint, TrendRequest};
use crate::error::AnalysisError;
use crate::models::metrics::PerformanceMetrics;
use crate::state::app::AppState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub first: PerformanceMetrics,
    pub second: PerformanceMetrics,
}

fn surface(url: &str, err: AnalysisError) -> String {
    log::warn!("analysis of {url} failed: {err}");
    err.user_message().to_string()
}

/// Analyzes `url`, appends the result to the persisted history and returns it.
/// Failures leave the history untouched and come back as the user-facing message.
pub async fn analyze_website_internal(state: &AppState, url: &str) -> Result<PerformanceMetrics, String> {
    let timeout = state.effective_settings().analysis_timeout;
    let metrics = analyze_with_timeout(state.analyzer(), url, timeout)
        .await
        .map_err(|e| surface(url, e))?;

    let recorded = metrics.clone();
    state.update_history(move |history| history.push(recorded))?;
    log::info!("recorded analysis {} for {}", metrics.id, metrics.url);

    Ok(metrics)
}

/// Both sites are analyzed concurrently; either failure fails the comparison
/// and nothing is recorded.
pub async fn compare_websites_internal(
    state: &AppState,
    first_url: &str,
    second_url: &str,
) -> Result<ComparisonResult, String> {
    let timeout = state.effective_settings().analysis_timeout;
    let (first, second) = compare(state.analyzer(), first_url, second_url, timeout)
        .await
        .map_err(|e| surface(&format!("{first_url} vs {second_url}"), e))?;

    let recorded = [first.clone(), second.clone()];
    state.update_history(move |history| {
        for metrics in recorded {
            history.push(metrics);
        }
    })?;

    Ok(ComparisonResult { first, second })
}

pub fn get_performance_history_internal(state: &AppState, url: Option<&str>) -> Result<Vec<PerformanceMetrics>, String> {
    let history = state.history()?;
    Ok(match url {
        Some(url) => history.for_url(url).into_iter().cloned().collect(),
        None => history.entries().to_vec(),
    })
}

pub fn clear_performance_history_internal(state: &AppState) -> Result<(), String> {
    state.update_history(|history| history.clear())?;
    log::info!("performance history cleared");
    Ok(())
}

/// Trend for `url`. `period` defaults to the configured one; `current` is the
/// result on screen, used as the baseline when `url` has no history yet.
pub fn get_performance_trend_internal(
    state: &AppState,
    url: &str,
    period: Option<&str>,
    current: Option<PerformanceMetrics>,
) -> Result<Vec<TrendPoint>, String> {
    let settings = state.effective_settings();
    let period = match period {
        Some(raw) => TrendPeriod::parse(raw).ok_or(format!("Unknown trend period: {raw}"))?,
        None => settings.trend_period,
    };

    let history = state.history()?;
    let mut rng = rand::thread_rng();
    generate_trend(
        &mut rng,
        TrendRequest {
            url,
            period,
            history: &history,
            current: current.as_ref(),
            today: chrono::Local::now().date_naive(),
            min_history: settings.trend_min_history,
        },
    )
    .map_err(|e| e.to_string())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn analyze_website(
    url: String,
    state: tauri::State<'_, AppState>,
) -> Result<PerformanceMetrics, String> {
    analyze_website_internal(state.inner(), &url).await
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn compare_websites(
    first_url: String,
    second_url: String,
    state: tauri::State<'_, AppState>,
) -> Result<ComparisonResult, String> {
    compare_websites_internal(state.inner(), &first_url, &second_url).await
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_performance_history(
    url: Option<String>,
    state: tauri::State<'_, AppState>,
) -> Result<Vec<PerformanceMetrics>, String> {
    get_performance_history_internal(state.inner(), url.as_deref())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn clear_performance_history(state: tauri::State<'_, AppState>) -> Result<(), String> {
    clear_performance_history_internal(state.inner())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_performance_trend(
    url: String,
    period: Option<String>,
    current: Option<PerformanceMetrics>,
    state: tauri::State<'_, AppState>,
) -> Result<Vec<TrendPoint>, String> {
    get_performance_trend_internal(state.inner(), &url, period.as_deref(), current)
}

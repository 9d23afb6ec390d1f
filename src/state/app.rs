use crate::analysis::performance::{PerformanceAnalyzer, SimulatedAnalyzer};
use crate::auth::{AuthGateway, AuthProvider, InMemoryAuthProvider};
use crate::commands::db;
use crate::commands::settings::{self, EffectiveDashboardSettings};
use crate::models::metrics::PerformanceHistory;
use crate::state::dashboard::Dashboard;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Everything the command layer works against. One per running app.
///
/// Store mutations go through the dashboard mutex, so each one completes
/// before the next begins. No lock is held across an await.
pub struct AppState {
    data_dir: PathBuf,
    dashboard: Mutex<Dashboard>,
    history: Mutex<PerformanceHistory>,
    analyzer: Arc<dyn PerformanceAnalyzer>,
    auth: AuthGateway,
}

impl AppState {
    /// Loads settings and persisted history from `data_dir`, using the
    /// simulated analyzer and a local auth provider.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, String> {
        let data_dir = data_dir.into();
        let effective = settings::load_effective_dashboard_settings(&data_dir)?;
        let settings_dir = data_dir.clone();
        let analyzer = Arc::new(SimulatedAnalyzer::with_delay_source(move || {
            read_effective_settings(&settings_dir).analysis_delay
        }));
        let provider: Arc<dyn AuthProvider> = Arc::new(InMemoryAuthProvider::new());
        Self::open_with(data_dir, &effective, analyzer, provider)
    }

    pub fn open_with(
        data_dir: PathBuf,
        effective: &EffectiveDashboardSettings,
        analyzer: Arc<dyn PerformanceAnalyzer>,
        auth_provider: Arc<dyn AuthProvider>,
    ) -> Result<Self, String> {
        settings::ensure_qatrack_dir(&data_dir)?;

        let conn = db::get_db_connection(&data_dir)
            .map_err(|e| format!("INIT_FAILED: Could not initialize database: {e}"))?;
        let history = db::load_performance_history(&conn)
            .map_err(|e| format!("INIT_FAILED: Could not read performance history: {e}"))?;

        let dashboard = if effective.seed_demo_data {
            Dashboard::with_demo_data()
        } else {
            Dashboard::new()
        };

        log::info!(
            "opened dashboard at {} ({} projects, {} recorded analyses)",
            data_dir.display(),
            dashboard.projects.len(),
            history.len()
        );

        Ok(Self {
            data_dir,
            dashboard: Mutex::new(dashboard),
            history: Mutex::new(history),
            analyzer,
            auth: AuthGateway::new(auth_provider),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn analyzer(&self) -> &dyn PerformanceAnalyzer {
        self.analyzer.as_ref()
    }

    pub fn auth(&self) -> &AuthGateway {
        &self.auth
    }

    pub fn dashboard(&self) -> Result<MutexGuard<'_, Dashboard>, String> {
        self.dashboard
            .lock()
            .map_err(|_| "Dashboard lock error".to_string())
    }

    pub fn history(&self) -> Result<MutexGuard<'_, PerformanceHistory>, String> {
        self.history
            .lock()
            .map_err(|_| "History lock error".to_string())
    }

    /// Settings are re-read per call so saved changes apply without a restart.
    /// The analyzer built by `open` reads its delay the same way.
    pub fn effective_settings(&self) -> EffectiveDashboardSettings {
        read_effective_settings(&self.data_dir)
    }

    /// Applies `change` to the history and writes the full array back.
    /// Memory is only updated once the write succeeded.
    pub fn update_history<F>(&self, change: F) -> Result<PerformanceHistory, String>
    where
        F: FnOnce(&mut PerformanceHistory),
    {
        let mut history = self.history()?;
        let mut next = history.clone();
        change(&mut next);

        let conn = db::get_db_connection(&self.data_dir)
            .map_err(|e| format!("DB error: {e}"))?;
        db::save_performance_history(&conn, &next)
            .map_err(|e| format!("Failed to persist performance history: {e}"))?;

        *history = next.clone();
        Ok(next)
    }
}

fn read_effective_settings(data_dir: &Path) -> EffectiveDashboardSettings {
    settings::load_effective_dashboard_settings(data_dir).unwrap_or_else(|e| {
        log::warn!("falling back to default settings: {e}");
        EffectiveDashboardSettings::default()
    })
}

use crate::error::AnalysisError;
use crate::models::metrics::PerformanceMetrics;
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Simulated audit latency.
pub const DEFAULT_ANALYSIS_DELAY: Duration = Duration::from_secs(2);

/// Anything that can audit a website. The simulator and a real auditing
/// backend sit behind the same seam.
#[async_trait]
pub trait PerformanceAnalyzer: Send + Sync {
    async fn analyze(&self, url: &str) -> Result<PerformanceMetrics, AnalysisError>;
}

type DelaySource = Arc<dyn Fn() -> Duration + Send + Sync>;

/// Returns random scores after a delay. Never fails for a parsable URL.
#[derive(Clone)]
pub struct SimulatedAnalyzer {
    delay: DelaySource,
}

impl Default for SimulatedAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_ANALYSIS_DELAY)
    }
}

impl SimulatedAnalyzer {
    pub fn new(delay: Duration) -> Self {
        Self::with_delay_source(move || delay)
    }

    /// `source` is asked for the delay before every analysis.
    pub fn with_delay_source<F>(source: F) -> Self
    where
        F: Fn() -> Duration + Send + Sync + 'static,
    {
        Self {
            delay: Arc::new(source),
        }
    }

    pub fn delay(&self) -> Duration {
        (self.delay)()
    }
}

#[async_trait]
impl PerformanceAnalyzer for SimulatedAnalyzer {
    async fn analyze(&self, url: &str) -> Result<PerformanceMetrics, AnalysisError> {
        let url = normalize_url(url)?;
        let delay = self.delay();
        log::debug!("simulating analysis of {url} ({delay:?})");

        tokio::time::sleep(delay).await;

        let mut rng = rand::thread_rng();
        Ok(random_metrics(&mut rng, url))
    }
}

/// Scores uniform in [0, 100), loading speed uniform in [0, 5) seconds, fair coin for mobile.
pub fn random_metrics<R: Rng + ?Sized>(rng: &mut R, url: String) -> PerformanceMetrics {
    PerformanceMetrics {
        id: uuid::Uuid::new_v4().to_string(),
        url,
        timestamp: chrono::Utc::now().timestamp_millis(),
        performance: rng.gen_range(0.0..100.0),
        accessibility: rng.gen_range(0.0..100.0),
        best_practices: rng.gen_range(0.0..100.0),
        seo: rng.gen_range(0.0..100.0),
        loading_speed: rng.gen_range(0.0..5.0),
        mobile_friendly: rng.gen_bool(0.5),
        errors: Vec::new(),
    }
}

/// Trims the input and assumes `https://` when no scheme is given.
pub fn normalize_url(raw: &str) -> Result<String, AnalysisError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::InvalidUrl(raw.to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = url::Url::parse(&candidate)
        .map_err(|_| AnalysisError::InvalidUrl(raw.to_string()))?;

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(candidate),
        _ => Err(AnalysisError::InvalidUrl(raw.to_string())),
    }
}

/// Bounds any analyzer. The underlying call is dropped once the deadline passes.
pub async fn analyze_with_timeout(
    analyzer: &dyn PerformanceAnalyzer,
    url: &str,
    timeout: Duration,
) -> Result<PerformanceMetrics, AnalysisError> {
    match tokio::time::timeout(timeout, analyzer.analyze(url)).await {
        Ok(result) => result,
        Err(_) => {
            log::warn!("analysis of {url} timed out after {timeout:?}");
            Err(AnalysisError::Timeout(timeout))
        }
    }
}

/// Runs both analyses concurrently. The first failure fails the comparison.
pub async fn compare(
    analyzer: &dyn PerformanceAnalyzer,
    first_url: &str,
    second_url: &str,
    timeout: Duration,
) -> Result<(PerformanceMetrics, PerformanceMetrics), AnalysisError> {
    tokio::try_join!(
        analyze_with_timeout(analyzer, first_url, timeout),
        analyze_with_timeout(analyzer, second_url, timeout),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    struct FailingAnalyzer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PerformanceAnalyzer for FailingAnalyzer {
        async fn analyze(&self, url: &str) -> Result<PerformanceMetrics, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if url.contains("broken") {
                return Err(AnalysisError::Backend("connection reset".to_string()));
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
            let mut rng = StdRng::seed_from_u64(3);
            Ok(random_metrics(&mut rng, url.to_string()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn analyze_waits_for_the_simulated_delay() {
        let analyzer = SimulatedAnalyzer::default();
        let started = Instant::now();

        let metrics = analyzer
            .analyze("https://example.com")
            .await
            .expect("analysis succeeds");

        assert!(started.elapsed() >= DEFAULT_ANALYSIS_DELAY);
        assert_eq!(metrics.url, "https://example.com");
        for score in [
            metrics.performance,
            metrics.accessibility,
            metrics.best_practices,
            metrics.seo,
        ] {
            assert!((0.0..100.0).contains(&score), "score {score}");
        }
        assert!((0.0..5.0).contains(&metrics.loading_speed));
        assert!(metrics.errors.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn compare_runs_both_analyses_in_parallel() {
        let analyzer = SimulatedAnalyzer::default();
        let started = Instant::now();

        let (a, b) = compare(&analyzer, "example.com", "https://acme.io", Duration::from_secs(30))
            .await
            .expect("comparison succeeds");

        let elapsed = started.elapsed();
        assert!(elapsed >= DEFAULT_ANALYSIS_DELAY);
        assert!(elapsed < DEFAULT_ANALYSIS_DELAY * 2);
        assert_eq!(a.url, "https://example.com");
        assert_eq!(b.url, "https://acme.io");
        assert_ne!(a.id, b.id);
    }

    #[tokio::test(start_paused = true)]
    async fn compare_fails_when_either_side_fails() {
        let analyzer = FailingAnalyzer {
            calls: AtomicUsize::new(0),
        };

        let result = compare(&analyzer, "https://ok.dev", "https://broken.dev", Duration::from_secs(30)).await;

        assert!(matches!(result, Err(AnalysisError::Backend(_))));
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_analysis_times_out() {
        let analyzer = SimulatedAnalyzer::new(Duration::from_secs(60));

        let err = analyze_with_timeout(&analyzer, "https://example.com", Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Timeout(d) if d == Duration::from_secs(5)));
        assert_eq!(err.user_message(), "Failed to analyze website. Please try again.");
    }

    #[tokio::test(start_paused = true)]
    async fn delay_source_is_consulted_per_analysis() {
        let delay_ms = Arc::new(AtomicUsize::new(3000));
        let source = delay_ms.clone();
        let analyzer = SimulatedAnalyzer::with_delay_source(move || {
            Duration::from_millis(source.load(Ordering::SeqCst) as u64)
        });

        let started = Instant::now();
        analyzer.analyze("example.com").await.expect("first analysis");
        assert!(started.elapsed() >= Duration::from_secs(3));

        delay_ms.store(0, Ordering::SeqCst);
        let started = Instant::now();
        analyzer.analyze("example.com").await.expect("second analysis");
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn normalize_url_adds_scheme_and_rejects_garbage() {
        assert_eq!(normalize_url(" example.com ").unwrap(), "https://example.com");
        assert_eq!(normalize_url("http://example.com/a").unwrap(), "http://example.com/a");
        assert!(normalize_url("").is_err());
        assert!(normalize_url("ftp://example.com").is_err());
        assert!(normalize_url("https://").is_err());
    }

    #[test]
    fn random_metrics_respect_ranges_across_many_draws() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let m = random_metrics(&mut rng, "https://example.com".to_string());
            assert!(m.performance >= 0.0 && m.performance < 100.0);
            assert!(m.seo >= 0.0 && m.seo < 100.0);
            assert!(m.loading_speed >= 0.0 && m.loading_speed < 5.0);
        }
    }
}

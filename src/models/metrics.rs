use crate::analysis::performance::normalize_url;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub id: String,
    pub url: String,
    pub timestamp: i64, // unix millis
    pub performance: f64,
    pub accessibility: f64,
    pub best_practices: f64,
    pub seo: f64,
    pub loading_speed: f64, // seconds
    pub mobile_friendly: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Recorded analyses, oldest first. Unbounded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerformanceHistory {
    entries: Vec<PerformanceMetrics>,
}

impl PerformanceHistory {
    pub fn new(entries: Vec<PerformanceMetrics>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PerformanceMetrics] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, metrics: PerformanceMetrics) {
        self.entries.push(metrics);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries recorded for `url`, in recorded order. Both sides are normalized
    /// the way the analyzer normalizes its input, then compared case-insensitively.
    pub fn for_url(&self, url: &str) -> Vec<&PerformanceMetrics> {
        let wanted = url_key(url);
        self.entries
            .iter()
            .filter(|m| url_key(&m.url) == wanted)
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let entries: Vec<PerformanceMetrics> = serde_json::from_str(raw)?;
        Ok(Self { entries })
    }
}

fn url_key(url: &str) -> String {
    normalize_url(url)
        .unwrap_or_else(|_| url.trim().to_string())
        .to_lowercase()
}

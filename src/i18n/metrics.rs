//! Translation metrics.
//!
//! Counts catalog hits, source-text fallbacks and locale switches. One
//! instance is owned by the [`Translator`](crate::i18n::Translator) and
//! shared with handlers through it.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Lock-free counters for translation activity.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Lookups answered from a catalog
    hits: AtomicUsize,

    /// Lookups that fell back to the source text
    fallbacks: AtomicUsize,

    /// Switch requests that changed (or re-set) a session locale
    switches_accepted: AtomicUsize,

    /// Switch requests ignored because the code was not registered
    switches_ignored: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_switch_accepted(&self) {
        self.switches_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_switch_ignored(&self) {
        self.switches_ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.hits();
        let fallbacks = self.fallbacks();
        let total = hits + fallbacks;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            hits,
            fallbacks,
            hit_rate,
            switches_accepted: self.switches_accepted.load(Ordering::Relaxed),
            switches_ignored: self.switches_ignored.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of translation statistics, served as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub hits: usize,
    pub fallbacks: usize,

    /// Catalog hit rate as a percentage (0-100)
    pub hit_rate: f64,

    pub switches_accepted: usize,
    pub switches_ignored: usize,
}

//! Resolution metrics for a language session.
//!
//! Counts how lookups were satisfied: directly from the active language,
//! via the default language, or not at all.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Lookup counters shared by every translator a controller hands out.
#[derive(Debug, Default)]
pub struct ResolutionMetrics {
    /// Lookups answered by the active language
    direct_hits: AtomicUsize,

    /// Lookups answered by the default language
    fallback_hits: AtomicUsize,

    /// Lookups answered by neither
    misses: AtomicUsize,
}

impl ResolutionMetrics {
    /// Create zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lookup answered by the active language.
    pub fn record_direct_hit(&self) {
        self.direct_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup answered by the default language.
    pub fn record_fallback_hit(&self) {
        self.fallback_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup nobody could answer.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current direct hit count.
    pub fn direct_hits(&self) -> usize {
        self.direct_hits.load(Ordering::Relaxed)
    }

    /// Get the current fallback hit count.
    pub fn fallback_hits(&self) -> usize {
        self.fallback_hits.load(Ordering::Relaxed)
    }

    /// Get the current miss count.
    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let direct = self.direct_hits();
        let fallback = self.fallback_hits();
        let misses = self.misses();
        let total = direct + fallback + misses;
        let direct_hit_rate = if total > 0 {
            (direct as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            lookups: total,
            direct_hits: direct,
            fallback_hits: fallback,
            misses,
            direct_hit_rate,
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.direct_hits.store(0, Ordering::Relaxed);
        self.fallback_hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of resolution statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Total lookups with a usable key
    pub lookups: usize,

    /// Lookups answered by the active language
    pub direct_hits: usize,

    /// Lookups answered by the default language
    pub fallback_hits: usize,

    /// Lookups that fell through to the caller's fallback or the key
    pub misses: usize,

    /// Share of lookups answered directly, as a percentage (0-100)
    pub direct_hit_rate: f64,
}

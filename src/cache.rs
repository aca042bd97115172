use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use crate::models::ReportSummary;

/// Read-through candidate pool for duplicate detection: every report in the
/// system, keyed by id. Primed from the database at startup and kept fresh by
/// the RabbitMQ subscriber. Readers see whatever snapshot is currently held;
/// no writer mutates the cache except through `prime`/`upsert`.
#[derive(Clone)]
pub struct CandidateCache {
    reports: Arc<RwLock<BTreeMap<String, ReportSummary>>>,
}

impl CandidateCache {
    pub fn new() -> Self {
        Self {
            reports: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Replaces the whole pool with a fresh snapshot.
    pub fn prime(&self, summaries: Vec<ReportSummary>) {
        let mut lock = self
            .reports
            .write()
            .unwrap_or_else(|e| panic!("Failed to acquire lock on candidate cache: {}", e));
        lock.clear();
        for summary in summaries {
            lock.insert(summary.id.clone(), summary);
        }
        tracing::info!("Candidate cache primed with {} reports", lock.len());
    }

    pub fn upsert(&self, summary: ReportSummary) {
        let mut lock = self
            .reports
            .write()
            .unwrap_or_else(|e| panic!("Failed to acquire lock on candidate cache: {}", e));
        lock.insert(summary.id.clone(), summary);
    }

    pub fn get_candidates(&self) -> Vec<ReportSummary> {
        let lock = self
            .reports
            .read()
            .unwrap_or_else(|e| panic!("Failed to acquire lock on candidate cache: {}", e));
        lock.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        let lock = self
            .reports
            .read()
            .unwrap_or_else(|e| panic!("Failed to acquire lock on candidate cache: {}", e));
        lock.len()
    }
}

impl Default for CandidateCache {
    fn default() -> Self {
        Self::new()
    }
}

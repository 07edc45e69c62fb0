//! # Recording Backend
//!
//! Keeps submitted jobs in memory instead of printing. Clones share the
//! same history, so a caller can keep a handle while the service owns the
//! backend. Only the most recent jobs are retained; a long-running dry-run
//! server would otherwise hold every rendered raster forever.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::CupomError;

use super::{PrintBackend, PrintJob};

/// Jobs retained by [`RecordingBackend::new`]
pub const DEFAULT_HISTORY: usize = 32;

#[derive(Debug, Default)]
struct History {
    jobs: VecDeque<PrintJob>,
    submitted: u64,
}

#[derive(Debug, Clone)]
pub struct RecordingBackend {
    history: Arc<Mutex<History>>,
    capacity: usize,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::with_history(DEFAULT_HISTORY)
    }
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retain at most `capacity` jobs, dropping the oldest first.
    pub fn with_history(capacity: usize) -> Self {
        Self {
            history: Arc::default(),
            capacity,
        }
    }

    /// Snapshot of retained jobs, oldest first.
    pub fn jobs(&self) -> Vec<PrintJob> {
        self.lock().jobs.iter().cloned().collect()
    }

    /// Number of retained jobs.
    pub fn len(&self) -> usize {
        self.lock().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Jobs submitted over the backend's lifetime, including evicted ones.
    pub fn submitted(&self) -> u64 {
        self.lock().submitted
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PrintBackend for RecordingBackend {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    fn submit(&mut self, job: &PrintJob) -> Result<(), CupomError> {
        log::info!("Dry run: recorded job {} ({})", job.id, job.page_size);
        let mut history = self.lock();
        history.submitted += 1;
        if self.capacity == 0 {
            return Ok(());
        }
        while history.jobs.len() >= self.capacity {
            history.jobs.pop_front();
        }
        history.jobs.push_back(job.clone());
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::{PageSize, PrintOptions};
    use image::GrayImage;

    fn job() -> PrintJob {
        PrintJob::new(
            PrintOptions::default(),
            PageSize {
                width_um: 72_000,
                height_um: 10_000,
            },
            GrayImage::new(8, 8),
            1,
        )
    }

    #[test]
    fn test_clones_share_history() {
        let backend = RecordingBackend::new();
        let mut owned = backend.clone();
        owned.submit(&job()).unwrap();
        assert_eq!(backend.len(), 1);
        assert_eq!(backend.submitted(), 1);
    }

    #[test]
    fn test_oldest_jobs_are_evicted() {
        let backend = RecordingBackend::with_history(2);
        let mut owned = backend.clone();
        let jobs: Vec<PrintJob> = (0..5).map(|_| job()).collect();
        for j in &jobs {
            owned.submit(j).unwrap();
        }

        let ids: Vec<_> = backend.jobs().iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![jobs[3].id, jobs[4].id]);
        assert_eq!(backend.submitted(), 5);
    }

    #[test]
    fn test_zero_history_keeps_count_only() {
        let backend = RecordingBackend::with_history(0);
        let mut owned = backend.clone();
        owned.submit(&job()).unwrap();
        assert!(backend.is_empty());
        assert_eq!(backend.submitted(), 1);
    }
}

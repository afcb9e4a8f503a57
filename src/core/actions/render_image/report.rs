use std::time::Duration;

use crate::core::data::pixel_buffer::PixelBuffer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerStatus {
    Completed,
    /// Stopped between chunks because the cancel token fired.
    Cancelled,
    /// Returned an error or panicked; the reason is kept for reporting.
    Failed(String),
}

/// What one worker did during a render. Owned by the worker and handed back
/// to the coordinator when it joins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker: u32,
    pub chunks_assigned: usize,
    pub chunks_rendered: usize,
    pub rows_rendered: u32,
    pub elapsed: Duration,
    pub status: WorkerStatus,
}

impl WorkerReport {
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.status {
            WorkerStatus::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub workers: Vec<WorkerReport>,
    pub elapsed: Duration,
}

impl RenderReport {
    #[must_use]
    pub fn elapsed_millis(&self) -> u128 {
        self.elapsed.as_millis()
    }

    #[must_use]
    pub fn rows_rendered(&self) -> u32 {
        self.workers.iter().map(|report| report.rows_rendered).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &WorkerReport> {
        self.workers.iter().filter(|report| report.failure_reason().is_some())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.workers
            .iter()
            .all(|report| report.status == WorkerStatus::Completed)
    }
}

#[derive(Debug)]
pub struct RenderOutput {
    pub buffer: PixelBuffer,
    pub report: RenderReport,
}

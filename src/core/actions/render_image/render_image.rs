//! Parallel render of a whole image.
//!
//! Each render gets a fresh rayon pool with one thread per configured worker.
//! The pixel buffer is split into disjoint per-chunk bands up front, the bands
//! are handed to their owning worker, and every worker renders its bands in
//! chunk order. Workers share only read-only state, so the buffer needs no
//! locking.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::core::actions::cancellation::{CancelToken, Cancelled, NeverCancel};
use crate::core::actions::render_chunk::ports::colour_map::ColourMap;
use crate::core::actions::render_chunk::ports::fractal_algorithm::FractalAlgorithm;
use crate::core::actions::render_chunk::render_chunk::{
    EscapeTimeChunkRenderer, RenderChunkError,
};
use crate::core::actions::render_image::ports::chunk_renderer::ChunkRenderer;
use crate::core::actions::render_image::report::{
    RenderOutput, RenderReport, WorkerReport, WorkerStatus,
};
use crate::core::data::pixel_buffer::{ChunkBand, PixelBuffer, PixelBufferError};
use crate::core::data::render_job::{RenderJob, WorkerFailurePolicy};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
    #[error("worker {worker} failed: {reason}")]
    WorkerFailed {
        worker: u32,
        reason: String,
        report: RenderReport,
    },
    #[error("pixel buffer error: {0}")]
    PixelBuffer(#[from] PixelBufferError),
    #[error("chunk render error: {0}")]
    Chunk(#[from] RenderChunkError),
}

struct WorkerAssignment<'a> {
    worker: u32,
    bands: Vec<ChunkBand<'a>>,
}

/// Renders `job` on `job.worker_count()` workers with no way to cancel.
///
/// Returns the finished buffer together with a per-worker [`RenderReport`].
pub fn render_image(job: &RenderJob) -> Result<RenderOutput, RenderError> {
    render_image_cancelable(job, &NeverCancel)
}

/// Like [`render_image`], but workers poll `cancel` before each chunk and
/// the render fails with [`RenderError::Cancelled`] once it fires.
pub fn render_image_cancelable<C: CancelToken>(
    job: &RenderJob,
    cancel: &C,
) -> Result<RenderOutput, RenderError> {
    render_image_with(job, &EscapeTimeChunkRenderer::for_job(job), cancel)
}

/// Renders `job` with a caller-supplied chunk renderer.
///
/// Builds a fresh pool of `job.worker_count()` threads, splits the buffer into
/// one band per non-empty chunk and gives each worker the bands it owns. Every
/// worker runs inside `catch_unwind`, so a panic is reported as a failed
/// worker rather than unwinding through the pool. Once all workers have
/// joined, any cancellation yields [`RenderError::Cancelled`]; failed workers
/// are handled according to [`RenderJob::failure_policy`].
#[tracing::instrument(
    skip_all,
    fields(
        width = job.geometry().width(),
        height = job.geometry().height(),
        workers = job.worker_count(),
        chunks = job.chunk_plan().chunk_count(),
    )
)]
pub fn render_image_with<R, C>(
    job: &RenderJob,
    renderer: &R,
    cancel: &C,
) -> Result<RenderOutput, RenderError>
where
    R: ChunkRenderer,
    C: CancelToken,
{
    let plan = job.chunk_plan();
    let quiet = job.quiet();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(plan.worker_count() as usize)
        .thread_name(|index| format!("render-worker-{index}"))
        .build()?;

    debug!(
        chunk_height = plan.chunk_height(),
        palette = job.palette().display_name(),
        max_steps = job.algorithm().max_steps(),
        "render job ready"
    );

    let mut buffer = PixelBuffer::new(job.geometry());
    let start = Instant::now();

    let workers: Vec<WorkerReport> = {
        let assignments = assign_bands(buffer.bands_mut(plan)?, job);

        pool.install(|| {
            assignments
                .into_par_iter()
                .with_max_len(1)
                .map(|assignment| run_worker(assignment, renderer, cancel, quiet))
                .collect()
        })
    };

    let report = RenderReport {
        workers,
        elapsed: start.elapsed(),
    };

    debug!(elapsed_ms = report.elapsed.as_millis() as u64, "all workers joined");

    settle(buffer, report, job.failure_policy())
}

/// Renders every row of `job` on the calling thread.
///
/// Produces the same pixels as [`render_image`] for any worker count and
/// granularity. Ignores the chunk plan and the failure policy.
pub fn render_image_serial(job: &RenderJob) -> Result<PixelBuffer, RenderError> {
    let mut buffer = PixelBuffer::new(job.geometry());

    EscapeTimeChunkRenderer::for_job(job)
        .render_rows(0..job.geometry().height(), buffer.pixels_mut())?;

    Ok(buffer)
}

fn assign_bands<'a>(bands: Vec<ChunkBand<'a>>, job: &RenderJob) -> Vec<WorkerAssignment<'a>> {
    let plan = job.chunk_plan();
    let mut assignments: Vec<WorkerAssignment<'a>> = (0..plan.worker_count())
        .map(|worker| WorkerAssignment {
            worker,
            bands: Vec::new(),
        })
        .collect();

    for band in bands {
        let owner = plan.owner_of(band.chunk.index()) as usize;
        assignments[owner].bands.push(band);
    }

    assignments
}

fn run_worker<R, C>(
    assignment: WorkerAssignment<'_>,
    renderer: &R,
    cancel: &C,
    quiet: bool,
) -> WorkerReport
where
    R: ChunkRenderer,
    C: CancelToken,
{
    let WorkerAssignment { worker, bands } = assignment;
    let chunks_assigned = bands.len();
    let mut chunks_rendered = 0;
    let mut rows_rendered = 0;
    let start = Instant::now();

    if !quiet {
        info!(worker, chunks = chunks_assigned, "worker started");
    }

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        for ChunkBand { chunk, pixels } in bands {
            if let Err(Cancelled) = cancel.check() {
                return WorkerStatus::Cancelled;
            }

            if let Err(err) = renderer.render_rows(chunk.rows(), pixels) {
                return WorkerStatus::Failed(err.to_string());
            }

            chunks_rendered += 1;
            rows_rendered += chunk.row_count();
        }

        WorkerStatus::Completed
    }));

    let status =
        outcome.unwrap_or_else(|payload| WorkerStatus::Failed(panic_reason(payload.as_ref())));
    let elapsed = start.elapsed();

    if !quiet {
        info!(worker, elapsed_ms = elapsed.as_millis() as u64, "worker stopped");
    }

    WorkerReport {
        worker,
        chunks_assigned,
        chunks_rendered,
        rows_rendered,
        elapsed,
        status,
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}

fn settle(
    buffer: PixelBuffer,
    report: RenderReport,
    policy: WorkerFailurePolicy,
) -> Result<RenderOutput, RenderError> {
    if report
        .workers
        .iter()
        .any(|worker| worker.status == WorkerStatus::Cancelled)
    {
        return Err(RenderError::Cancelled(Cancelled));
    }

    for failed in report.failures() {
        error!(
            worker = failed.worker,
            reason = failed.failure_reason().unwrap_or_default(),
            rows_rendered = failed.rows_rendered,
            "worker did not complete"
        );
    }

    let first_failure = report
        .failures()
        .next()
        .map(|failed| (failed.worker, failed.failure_reason().unwrap_or_default().to_string()));

    if let Some((worker, reason)) = first_failure {
        match policy {
            WorkerFailurePolicy::Abort => {
                return Err(RenderError::WorkerFailed {
                    worker,
                    reason,
                    report,
                });
            }
            WorkerFailurePolicy::BestEffort => {
                warn!(
                    failed_workers = report.failures().count(),
                    "keeping partially rendered image"
                );
            }
        }
    }

    Ok(RenderOutput { buffer, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::point::Point;
    use crate::core::data::render_config::RenderConfig;
    use std::ops::Range;
    use crate::core::actions::cancellation::CancelFlag;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn job(width: u32, height: u32, workers: u32, granularity: u32) -> RenderJob {
        RenderConfig {
            width,
            height,
            workers,
            granularity,
            quiet: true,
            ..RenderConfig::default()
        }
        .build_job()
        .unwrap()
    }

    /// Writes `row + 1` into every byte, and fails or panics on one row.
    #[derive(Debug, Default)]
    struct StubRenderer {
        fail_on_row: Option<u32>,
        panic_on_row: Option<u32>,
    }

    impl ChunkRenderer for StubRenderer {
        fn render_rows(&self, rows: Range<u32>, pixels: &mut [u8]) -> Result<(), RenderChunkError> {
            let stride = if rows.is_empty() { 0 } else { pixels.len() / rows.len() };

            for (row, line) in rows.clone().zip(pixels.chunks_mut(stride.max(1))) {
                if self.panic_on_row == Some(row) {
                    panic!("stub panic on row {row}");
                }

                if self.fail_on_row == Some(row) {
                    return Err(RenderChunkError::BandSizeMismatch {
                        start: rows.start,
                        end: rows.end,
                        expected: 0,
                        actual: line.len(),
                    });
                }

                line.fill(row as u8 + 1);
            }

            Ok(())
        }
    }

    #[test]
    fn test_two_by_two_same_colours_with_one_or_two_workers() {
        let single = render_image(&job(2, 2, 1, 1)).unwrap();
        let double = render_image(&job(2, 2, 2, 1)).unwrap();

        assert_eq!(single.buffer.buffer(), double.buffer.buffer());
    }

    #[test]
    fn test_parallel_matches_serial_for_any_chunking() {
        let serial = render_image_serial(&job(23, 17, 1, 1)).unwrap();

        for workers in 1..=4 {
            for granularity in 1..=3 {
                let parallel = render_image(&job(23, 17, workers, granularity)).unwrap();

                assert_eq!(
                    parallel.buffer, serial,
                    "workers {workers}, granularity {granularity}"
                );
            }
        }
    }

    #[test]
    fn test_origin_pixel_gets_first_palette_colour() {
        let job = job(4, 4, 2, 2);

        let output = render_image(&job).unwrap();

        assert_eq!(
            output.buffer.pixel(Point { x: 2, y: 2 }).unwrap(),
            job.palette().colours()[0]
        );
    }

    #[test]
    fn test_report_has_one_entry_per_worker() {
        let output = render_image(&job(8, 9, 3, 2)).unwrap();
        let workers: Vec<u32> = output.report.workers.iter().map(|w| w.worker).collect();

        assert_eq!(workers, vec![0, 1, 2]);
        assert_eq!(output.report.rows_rendered(), 9);
        assert!(output.report.is_complete());
        // 6 chunks of 2 rows: chunk 6 lies past row 8, so worker 0 only gets chunk 3
        let assigned: Vec<usize> =
            output.report.workers.iter().map(|w| w.chunks_assigned).collect();
        assert_eq!(assigned, vec![1, 2, 2]);
        assert!(
            output
                .report
                .workers
                .iter()
                .all(|w| w.chunks_rendered == w.chunks_assigned)
        );
    }

    #[test]
    fn test_workers_without_rows_finish_immediately() {
        // 2 rows, 4 workers: workers 0 and 3 only own chunks past the last row
        let output =
            render_image_with(&job(3, 2, 4, 1), &StubRenderer::default(), &NeverCancel).unwrap();

        let idle: Vec<&WorkerReport> = output
            .report
            .workers
            .iter()
            .filter(|w| w.rows_rendered == 0)
            .collect();

        assert_eq!(idle.len(), 2);
        assert!(
            idle.iter()
                .all(|w| w.status == WorkerStatus::Completed && w.chunks_assigned == 0)
        );
        assert_eq!(output.buffer.buffer(), &[1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2]);
    }

    #[test]
    fn test_granularity_far_beyond_height_renders_quickly() {
        let job = job(4, 4, 1, 1_000_000_000);
        let start = Instant::now();

        let output = render_image(&job).unwrap();

        assert!(start.elapsed() < std::time::Duration::from_secs(5));
        assert_eq!(output.buffer, render_image_serial(&job).unwrap());

        let worker = &output.report.workers[0];
        assert_eq!(worker.chunks_assigned, 4);
        assert_eq!(worker.chunks_rendered, 4);
        assert_eq!(worker.rows_rendered, 4);
    }

    #[test]
    fn test_idle_workers_under_huge_granularity_report_completed() {
        // 3 rows, 5 workers: only chunks 1..=3 hold rows, owned by workers 1, 2 and 3
        let output = render_image(&job(2, 3, 5, 10_000_000)).unwrap();

        for report in &output.report.workers {
            let expected_chunks = usize::from(matches!(report.worker, 1..=3));

            assert_eq!(report.status, WorkerStatus::Completed, "worker {}", report.worker);
            assert_eq!(report.chunks_assigned, expected_chunks, "worker {}", report.worker);
            assert_eq!(report.rows_rendered, expected_chunks as u32);
        }
        assert_eq!(output.report.rows_rendered(), 3);
    }

    #[test]
    fn test_cancel_before_start() {
        let flag = CancelFlag::new();
        flag.cancel();

        let result = render_image_cancelable(&job(4, 4, 2, 1), &flag);

        assert!(matches!(result, Err(RenderError::Cancelled(_))));
    }

    #[test]
    fn test_cancel_is_polled_between_chunks() {
        let polls = AtomicUsize::new(0);
        let token = || polls.fetch_add(1, Ordering::Relaxed) >= 2;

        let result = render_image_with(&job(2, 8, 1, 4), &StubRenderer::default(), &token);

        assert!(matches!(result, Err(RenderError::Cancelled(_))));
        assert_eq!(polls.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_failed_worker_aborts_render_by_default() {
        let renderer = StubRenderer {
            fail_on_row: Some(5),
            ..StubRenderer::default()
        };

        // 8 rows in 4 chunks of 2, 2 workers: row 5 is in chunk 3, owned by worker 1
        let result = render_image_with(&job(2, 8, 2, 2), &renderer, &NeverCancel);

        match result {
            Err(RenderError::WorkerFailed { worker, report, .. }) => {
                assert_eq!(worker, 1);
                assert_eq!(report.failures().count(), 1);
                assert_eq!(report.workers[0].status, WorkerStatus::Completed);
            }
            other => panic!("expected WorkerFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_best_effort_keeps_partial_image() {
        let job = RenderConfig {
            width: 1,
            height: 4,
            workers: 2,
            quiet: true,
            failure_policy: WorkerFailurePolicy::BestEffort,
            ..RenderConfig::default()
        }
        .build_job()
        .unwrap();
        let renderer = StubRenderer {
            fail_on_row: Some(0),
            ..StubRenderer::default()
        };

        let output = render_image_with(&job, &renderer, &NeverCancel).unwrap();

        // chunk 1 (rows 0..2) failed on its first row, chunk 2 (rows 2..4) rendered
        assert_eq!(output.buffer.buffer(), &[0, 0, 0, 0, 0, 0, 3, 3, 3, 4, 4, 4]);
        assert!(!output.report.is_complete());
        assert_eq!(output.report.failures().map(|w| w.worker).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_panicking_worker_is_reported_not_propagated() {
        let renderer = StubRenderer {
            panic_on_row: Some(1),
            ..StubRenderer::default()
        };

        let result = render_image_with(&job(2, 4, 2, 1), &renderer, &NeverCancel);

        match result {
            Err(RenderError::WorkerFailed { worker, reason, .. }) => {
                assert_eq!(worker, 1);
                assert!(reason.contains("stub panic on row 1"), "{reason}");
            }
            other => panic!("expected WorkerFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_serial_render_fills_every_pixel_through_palette() {
        let job = job(5, 3, 1, 1);
        let buffer = render_image_serial(&job).unwrap();
        let palette = job.palette().colours();

        for y in 0..3 {
            for x in 0..5 {
                let colour = buffer.pixel(Point { x, y }).unwrap();
                assert!(palette.contains(&colour));
            }
        }
    }
}

//! Division of image rows into chunks and round-robin chunk ownership.
//!
//! Chunks are numbered from 1. Chunk `k` covers rows
//! `[(k - 1) * chunk_height, k * chunk_height)` clipped to the image height
//! and belongs to worker `k % worker_count`.

use std::ops::Range;

use thiserror::Error;

pub const DEFAULT_WORKER_COUNT: u32 = 1;
pub const DEFAULT_GRANULARITY: u32 = 1;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ChunkPlanError {
    #[error("worker count must be greater than zero")]
    ZeroWorkers,
    #[error("granularity must be greater than zero")]
    ZeroGranularity,
    #[error("image height must be greater than zero")]
    ZeroHeight,
    #[error("chunk count overflows: {workers} workers x {granularity} granularity")]
    ChunkCountOverflow { workers: u32, granularity: u32 },
}

/// A contiguous band of image rows.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Chunk {
    index: u32,
    start_row: u32,
    end_row: u32,
}

impl Chunk {
    /// 1-based chunk number.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[must_use]
    pub fn rows(&self) -> Range<u32> {
        self.start_row..self.end_row
    }

    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.end_row - self.start_row
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start_row == self.end_row
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChunkPlan {
    image_height: u32,
    chunk_height: u32,
    chunk_count: u32,
    worker_count: u32,
}

impl ChunkPlan {
    pub fn new(
        image_height: u32,
        worker_count: u32,
        granularity: u32,
    ) -> Result<Self, ChunkPlanError> {
        if worker_count == 0 {
            return Err(ChunkPlanError::ZeroWorkers);
        }

        if granularity == 0 {
            return Err(ChunkPlanError::ZeroGranularity);
        }

        if image_height == 0 {
            return Err(ChunkPlanError::ZeroHeight);
        }

        let chunk_count =
            worker_count
                .checked_mul(granularity)
                .ok_or(ChunkPlanError::ChunkCountOverflow {
                    workers: worker_count,
                    granularity,
                })?;

        // Rounded up so that the chunks always cover every row.
        let chunk_height = image_height.div_ceil(chunk_count);

        Ok(Self {
            image_height,
            chunk_height,
            chunk_count,
            worker_count,
        })
    }

    #[must_use]
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    #[must_use]
    pub fn chunk_height(&self) -> u32 {
        self.chunk_height
    }

    #[must_use]
    pub fn chunk_count(&self) -> u32 {
        self.chunk_count
    }

    #[must_use]
    pub fn worker_count(&self) -> u32 {
        self.worker_count
    }

    /// Returns chunk `index` (1-based), or `None` when out of range.
    #[must_use]
    pub fn chunk(&self, index: u32) -> Option<Chunk> {
        if index == 0 || index > self.chunk_count {
            return None;
        }

        let start = (u64::from(index) - 1) * u64::from(self.chunk_height);
        let end = u64::from(index) * u64::from(self.chunk_height);
        let clip = |row: u64| row.min(u64::from(self.image_height)) as u32;

        Some(Chunk {
            index,
            start_row: clip(start),
            end_row: clip(end),
        })
    }

    /// All chunks in ascending order, including empty trailing ones.
    pub fn chunks(&self) -> impl Iterator<Item = Chunk> + '_ {
        (1..=self.chunk_count).filter_map(|index| self.chunk(index))
    }

    /// Number of chunks holding at least one row. Chunks past this index lie
    /// entirely below the image.
    #[must_use]
    pub fn non_empty_chunk_count(&self) -> u32 {
        self.image_height
            .div_ceil(self.chunk_height)
            .min(self.chunk_count)
    }

    /// Chunks `1..=non_empty_chunk_count()` in ascending order.
    pub fn non_empty_chunks(&self) -> impl Iterator<Item = Chunk> + '_ {
        (1..=self.non_empty_chunk_count()).filter_map(|index| self.chunk(index))
    }

    #[must_use]
    pub fn owner_of(&self, chunk_index: u32) -> u32 {
        chunk_index % self.worker_count
    }

    /// Non-empty chunks owned by `worker`, in ascending order.
    pub fn chunks_owned_by(&self, worker: u32) -> impl Iterator<Item = Chunk> + '_ {
        let first = if worker == 0 { self.worker_count } else { worker };
        let last = if worker < self.worker_count {
            self.non_empty_chunk_count()
        } else {
            0
        };

        (first..=last)
            .step_by(self.worker_count as usize)
            .filter_map(|index| self.chunk(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_covered(plan: &ChunkPlan) -> Vec<u32> {
        let mut rows: Vec<u32> = (0..plan.worker_count())
            .flat_map(|worker| plan.chunks_owned_by(worker).collect::<Vec<_>>())
            .flat_map(|chunk| chunk.rows())
            .collect();
        rows.sort_unstable();
        rows
    }

    #[test]
    fn test_chunk_count_is_workers_times_granularity() {
        let plan = ChunkPlan::new(480, 4, 3).unwrap();

        assert_eq!(plan.chunk_count(), 12);
        assert_eq!(plan.chunk_height(), 40);
        assert_eq!(plan.worker_count(), 4);
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert_eq!(ChunkPlan::new(10, 0, 1), Err(ChunkPlanError::ZeroWorkers));
    }

    #[test]
    fn test_zero_granularity_rejected() {
        assert_eq!(
            ChunkPlan::new(10, 1, 0),
            Err(ChunkPlanError::ZeroGranularity)
        );
    }

    #[test]
    fn test_chunk_count_overflow_rejected() {
        assert_eq!(
            ChunkPlan::new(10, u32::MAX, 2),
            Err(ChunkPlanError::ChunkCountOverflow {
                workers: u32::MAX,
                granularity: 2
            })
        );
    }

    #[test]
    fn test_chunk_height_rounds_up_and_last_chunk_is_partial() {
        let plan = ChunkPlan::new(10, 3, 1).unwrap();

        assert_eq!(plan.chunk_height(), 4);
        assert_eq!(plan.chunk(1).unwrap().rows(), 0..4);
        assert_eq!(plan.chunk(2).unwrap().rows(), 4..8);
        assert_eq!(plan.chunk(3).unwrap().rows(), 8..10);
        assert!(plan.chunk_height() * plan.chunk_count() >= plan.image_height());
    }

    #[test]
    fn test_chunks_past_last_row_are_empty() {
        let plan = ChunkPlan::new(3, 2, 3).unwrap();

        let empty: Vec<u32> = plan
            .chunks()
            .filter(Chunk::is_empty)
            .map(|chunk| chunk.index())
            .collect();

        assert_eq!(plan.chunk_height(), 1);
        assert_eq!(empty, vec![4, 5, 6]);
    }

    #[test]
    fn test_chunk_index_out_of_range() {
        let plan = ChunkPlan::new(10, 2, 2).unwrap();

        assert_eq!(plan.chunk(0), None);
        assert_eq!(plan.chunk(5), None);
    }

    #[test]
    fn test_ownership_is_round_robin_by_index_mod_workers() {
        let plan = ChunkPlan::new(60, 3, 2).unwrap();

        let owned = |worker| {
            plan.chunks_owned_by(worker)
                .map(|chunk| chunk.index())
                .collect::<Vec<_>>()
        };

        assert_eq!(owned(0), vec![3, 6]);
        assert_eq!(owned(1), vec![1, 4]);
        assert_eq!(owned(2), vec![2, 5]);
    }

    #[test]
    fn test_single_worker_owns_everything() {
        let plan = ChunkPlan::new(7, 1, 4).unwrap();

        assert_eq!(plan.chunks_owned_by(0).count(), 4);
        assert_eq!(rows_covered(&plan), (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_every_row_owned_exactly_once() {
        for height in 1..=40 {
            for workers in 1..=5 {
                for granularity in 1..=4 {
                    let plan = ChunkPlan::new(height, workers, granularity).unwrap();

                    assert_eq!(
                        rows_covered(&plan),
                        (0..height).collect::<Vec<_>>(),
                        "height {height}, workers {workers}, granularity {granularity}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_workers_without_rows_own_no_chunks() {
        // 2 rows, 4 workers: chunks 3 and 4 fall past the image.
        let plan = ChunkPlan::new(2, 4, 1).unwrap();

        assert_eq!(plan.non_empty_chunk_count(), 2);
        assert_eq!(plan.chunks_owned_by(3).count(), 0);
        assert_eq!(plan.chunks_owned_by(0).count(), 0);
        assert_eq!(plan.chunks_owned_by(1).map(|c| c.row_count()).sum::<u32>(), 1);
        assert_eq!(plan.chunks_owned_by(2).map(|c| c.row_count()).sum::<u32>(), 1);
    }

    #[test]
    fn test_unknown_worker_owns_nothing() {
        let plan = ChunkPlan::new(10, 2, 2).unwrap();

        assert_eq!(plan.chunks_owned_by(2).count(), 0);
    }

    #[test]
    fn test_huge_granularity_only_walks_chunks_with_rows() {
        let plan = ChunkPlan::new(4, 1, 1_000_000_000).unwrap();

        assert_eq!(plan.chunk_count(), 1_000_000_000);
        assert_eq!(plan.chunk_height(), 1);
        assert_eq!(plan.non_empty_chunk_count(), 4);
        assert_eq!(
            plan.chunks_owned_by(0).map(|c| c.index()).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert_eq!(rows_covered(&plan), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_huge_granularity_with_many_workers() {
        let plan = ChunkPlan::new(5, 3, 100_000_000).unwrap();

        let owned = |worker| {
            plan.chunks_owned_by(worker)
                .map(|chunk| chunk.index())
                .collect::<Vec<_>>()
        };

        assert_eq!(owned(0), vec![3]);
        assert_eq!(owned(1), vec![1, 4]);
        assert_eq!(owned(2), vec![2, 5]);
        assert_eq!(rows_covered(&plan), (0..5).collect::<Vec<_>>());
    }

    #[test]
    fn test_non_empty_chunk_count_when_every_chunk_has_rows() {
        let plan = ChunkPlan::new(10, 3, 1).unwrap();

        assert_eq!(plan.non_empty_chunk_count(), 3);
        assert_eq!(plan.non_empty_chunks().count(), 3);
    }
}

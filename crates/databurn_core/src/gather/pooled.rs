//! Frames spread over a rayon thread pool.

use rayon::prelude::*;

use super::{read_frame, GatherContext, GatherStrategy, ProgressCounter, ReadingGatherer};
use crate::frames::FrameFile;
use crate::models::FrameReading;

/// Runs OCR on a dedicated rayon pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct PooledGatherer {
    /// Pool size; `None` uses rayon's default (one per core).
    threads: Option<usize>,
}

impl PooledGatherer {
    pub fn new(threads: Option<usize>) -> Self {
        Self { threads }
    }

    pub fn threads(&self) -> Option<usize> {
        self.threads
    }

    fn build_pool(&self) -> Option<rayon::ThreadPool> {
        let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|idx| format!("ocr-{}", idx));
        if let Some(threads) = self.threads {
            builder = builder.num_threads(threads);
        }
        match builder.build() {
            Ok(pool) => Some(pool),
            Err(e) => {
                tracing::warn!("[Gather] Could not build OCR pool ({}); using global pool", e);
                None
            }
        }
    }
}

impl ReadingGatherer for PooledGatherer {
    fn strategy(&self) -> GatherStrategy {
        GatherStrategy::Pooled
    }

    fn gather(&self, frames: &[FrameFile], ctx: &GatherContext<'_>) -> Vec<FrameReading> {
        let progress = ProgressCounter::new(frames.len(), ctx.progress);

        let run = || {
            frames
                .par_iter()
                .filter_map(|frame| {
                    let reading = read_frame(frame, ctx)?;
                    progress.frame_done(frame.index);
                    Some(reading)
                })
                .collect::<Vec<_>>()
        };

        let mut readings = match self.build_pool() {
            Some(pool) => {
                tracing::debug!("[Gather] OCR pool with {} threads", pool.current_num_threads());
                pool.install(run)
            }
            None => run(),
        };

        if readings.len() < frames.len() {
            tracing::info!(
                "[Gather] Cancelled: {} of {} frames read",
                readings.len(),
                frames.len()
            );
        }

        readings.sort_by_key(|r| r.frame_index);
        readings
    }
}

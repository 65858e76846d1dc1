//! One frame at a time on the calling thread.

use super::{read_frame, GatherContext, GatherStrategy, ProgressCounter, ReadingGatherer};
use crate::frames::FrameFile;
use crate::models::FrameReading;

/// Processes frames in order on the calling thread.
///
/// Required for engines that are not safe to call concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialGatherer;

impl ReadingGatherer for SequentialGatherer {
    fn strategy(&self) -> GatherStrategy {
        GatherStrategy::Sequential
    }

    fn gather(&self, frames: &[FrameFile], ctx: &GatherContext<'_>) -> Vec<FrameReading> {
        let progress = ProgressCounter::new(frames.len(), ctx.progress);
        let mut readings = Vec::with_capacity(frames.len());

        for frame in frames {
            let Some(reading) = read_frame(frame, ctx) else {
                tracing::info!("[Gather] Cancelled after {} frames", readings.len());
                break;
            };
            progress.frame_done(frame.index);
            readings.push(reading);
        }

        readings.sort_by_key(|r| r.frame_index);
        readings
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::TableEngine;
    use super::super::{CancelToken, GatherProgress, GatherProgressCallback};
    use super::*;
    use crate::burnin::TextParser;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn reads_every_frame_in_order() {
        let (engine, frames) = TableEngine::new(&[
            "TC: 01:00:00:00 Filename: A.mov",
            "garbage",
            "TC: 01:00:00:02 Filename: A.mov",
        ]);
        let parser = TextParser::default();
        let cancel = CancelToken::new();
        let ctx = GatherContext::new(&engine, &parser, &cancel);

        let readings = SequentialGatherer.gather(&frames, &ctx);
        assert_eq!(readings.len(), 3);
        assert!(readings[0].is_complete());
        assert!(readings[1].parsed_timecode.is_none());
        assert_eq!(readings[1].raw_text, "garbage");
        assert_eq!(readings[2].frame_index, 2);
    }

    #[test]
    fn emits_one_progress_event_per_frame() {
        let (engine, frames) = TableEngine::new(&["a", "b", "c"]);
        let parser = TextParser::default();
        let cancel = CancelToken::new();
        let events: Arc<Mutex<Vec<GatherProgress>>> = Arc::default();
        let sink = events.clone();
        let callback: GatherProgressCallback = Box::new(move |p| sink.lock().push(p));
        let ctx = GatherContext::new(&engine, &parser, &cancel).with_progress(&callback);

        SequentialGatherer.gather(&frames, &ctx);

        let events = events.lock();
        let completed: Vec<usize> = events.iter().map(|e| e.completed).collect();
        assert_eq!(completed, [1, 2, 3]);
        assert!(events.iter().all(|e| e.total == 3));
    }

    #[test]
    fn stops_when_cancelled_mid_run() {
        let (engine, frames) = TableEngine::new(&["a", "b", "c", "d"]);
        let parser = TextParser::default();
        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        let callback: GatherProgressCallback = Box::new(move |p| {
            if p.completed == 2 {
                trigger.cancel();
            }
        });
        let ctx = GatherContext::new(&engine, &parser, &cancel).with_progress(&callback);

        let readings = SequentialGatherer.gather(&frames, &ctx);
        assert_eq!(readings.len(), 2);
        assert_eq!(engine.calls.lock().len(), 2);
    }
}

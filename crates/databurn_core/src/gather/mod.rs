//! Gathering one reading per frame.
//!
//! A [`ReadingGatherer`] runs the OCR engine over the extracted frames and
//! parses each text into a [`FrameReading`]. Two strategies exist:
//! [`PooledGatherer`] (rayon thread pool) and [`SequentialGatherer`]. Both
//! return readings ordered by `frame_index`, whatever order frames finished
//! in.
//!
//! Per-frame OCR failures are noise, not errors: the frame gets a blank
//! reading and a warning. Cancellation is checked before every frame;
//! frames skipped that way produce no reading.

mod pooled;
mod sequential;

pub use pooled::PooledGatherer;
pub use sequential::SequentialGatherer;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::burnin::TextParser;
use crate::frames::FrameFile;
use crate::logging::RunLogger;
use crate::models::FrameReading;
use crate::ocr::OcrEngine;

/// Which gatherer to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatherStrategy {
    #[default]
    Pooled,
    Sequential,
}

impl std::fmt::Display for GatherStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatherStrategy::Pooled => write!(f, "pooled"),
            GatherStrategy::Sequential => write!(f, "sequential"),
        }
    }
}

/// Shared cancellation flag.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Emitted once per processed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatherProgress {
    /// Frames finished so far, this one included.
    pub completed: usize,
    pub total: usize,
    pub frame_index: u64,
}

impl GatherProgress {
    /// Completion in whole percent.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        ((self.completed * 100) / self.total) as u32
    }
}

/// Owned subscriber for gather progress events.
///
/// [`GatherContext`] borrows any `Fn(GatherProgress)`, so closures over
/// local state work too.
pub type GatherProgressCallback = Box<dyn Fn(GatherProgress) + Send + Sync>;

/// Everything a gatherer needs besides the frame list.
pub struct GatherContext<'a> {
    pub engine: &'a dyn OcrEngine,
    pub parser: &'a TextParser,
    pub cancel: &'a CancelToken,
    pub progress: Option<&'a (dyn Fn(GatherProgress) + Send + Sync)>,
    /// Receives every frame's raw text.
    pub logger: Option<&'a RunLogger>,
}

impl<'a> GatherContext<'a> {
    pub fn new(engine: &'a dyn OcrEngine, parser: &'a TextParser, cancel: &'a CancelToken) -> Self {
        Self {
            engine,
            parser,
            cancel,
            progress: None,
            logger: None,
        }
    }

    pub fn with_progress(mut self, progress: &'a (dyn Fn(GatherProgress) + Send + Sync)) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_logger(mut self, logger: &'a RunLogger) -> Self {
        self.logger = Some(logger);
        self
    }
}

/// Produces one reading per frame, ordered by frame index.
pub trait ReadingGatherer: Send + Sync {
    fn strategy(&self) -> GatherStrategy;

    /// Recognize and parse `frames`. Cancelled frames are left out.
    fn gather(&self, frames: &[FrameFile], ctx: &GatherContext<'_>) -> Vec<FrameReading>;
}

/// Pick a gatherer for `strategy`.
///
/// Engines that cannot run concurrently are always gathered sequentially.
pub fn gatherer_for(
    strategy: GatherStrategy,
    threads: Option<usize>,
    engine: &dyn OcrEngine,
) -> Box<dyn ReadingGatherer> {
    match strategy {
        GatherStrategy::Pooled if engine.supports_concurrency() => {
            Box::new(PooledGatherer::new(threads))
        }
        GatherStrategy::Pooled => {
            tracing::warn!(
                "[Gather] {} does not support concurrent use; gathering sequentially",
                engine.name()
            );
            Box::new(SequentialGatherer)
        }
        GatherStrategy::Sequential => Box::new(SequentialGatherer),
    }
}

/// Recognize and parse one frame, unless cancelled.
fn read_frame(frame: &FrameFile, ctx: &GatherContext<'_>) -> Option<FrameReading> {
    if ctx.cancel.is_cancelled() {
        return None;
    }

    let reading = match ctx.engine.recognize(&frame.path) {
        Ok(text) => {
            if let Some(logger) = ctx.logger {
                logger.frame_text(frame.index, &text);
            }
            ctx.parser.read(frame.index, text)
        }
        Err(e) => {
            tracing::warn!("[Gather] Frame {}: {}", frame.index, e);
            if let Some(logger) = ctx.logger {
                logger.warn(&format!("Frame {}: {}", frame.index, e));
            }
            FrameReading::blank(frame.index)
        }
    };
    Some(reading)
}

/// Thread-safe completion counter feeding the progress callback.
struct ProgressCounter<'a> {
    completed: AtomicUsize,
    total: usize,
    callback: Option<&'a (dyn Fn(GatherProgress) + Send + Sync)>,
}

impl<'a> ProgressCounter<'a> {
    fn new(total: usize, callback: Option<&'a (dyn Fn(GatherProgress) + Send + Sync)>) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
            callback,
        }
    }

    fn frame_done(&self, frame_index: u64) {
        let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(callback) = self.callback {
            callback(GatherProgress {
                completed,
                total: self.total,
                frame_index,
            });
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    use parking_lot::Mutex;

    use crate::frames::FrameFile;
    use crate::ocr::{OcrEngine, OcrError, OcrResult};

    /// Engine answering from a fixed table; unknown paths fail.
    pub struct TableEngine {
        texts: HashMap<PathBuf, String>,
        pub calls: Mutex<Vec<PathBuf>>,
        pub concurrent: bool,
    }

    impl TableEngine {
        pub fn new(texts: &[&str]) -> (Self, Vec<FrameFile>) {
            let frames: Vec<FrameFile> = (0..texts.len() as u64)
                .map(|index| FrameFile {
                    index,
                    path: PathBuf::from(format!("frame_{:06}.png", index + 1)),
                })
                .collect();
            let texts = frames
                .iter()
                .zip(texts)
                .filter(|(_, text)| **text != "<fail>")
                .map(|(f, text)| (f.path.clone(), text.to_string()))
                .collect();
            let engine = Self {
                texts,
                calls: Mutex::new(Vec::new()),
                concurrent: true,
            };
            (engine, frames)
        }
    }

    impl OcrEngine for TableEngine {
        fn name(&self) -> &str {
            "table"
        }

        fn recognize(&self, image: &Path) -> OcrResult<String> {
            self.calls.lock().push(image.to_path_buf());
            self.texts
                .get(image)
                .cloned()
                .ok_or_else(|| OcrError::recognition(image, "no text"))
        }

        fn supports_concurrency(&self) -> bool {
            self.concurrent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::TableEngine;
    use super::*;

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn progress_percent() {
        let p = GatherProgress {
            completed: 1,
            total: 3,
            frame_index: 0,
        };
        assert_eq!(p.percent(), 33);
        let empty = GatherProgress {
            completed: 0,
            total: 0,
            frame_index: 0,
        };
        assert_eq!(empty.percent(), 100);
    }

    #[test]
    fn failed_recognition_gives_blank_reading() {
        let (engine, frames) = TableEngine::new(&["<fail>"]);
        let parser = TextParser::default();
        let cancel = CancelToken::new();
        let ctx = GatherContext::new(&engine, &parser, &cancel);

        let reading = read_frame(&frames[0], &ctx).unwrap();
        assert_eq!(reading, FrameReading::blank(0));
    }

    #[test]
    fn cancelled_frame_is_skipped_without_ocr() {
        let (engine, frames) = TableEngine::new(&["TC: 01:00:00:00"]);
        let parser = TextParser::default();
        let cancel = CancelToken::new();
        cancel.cancel();
        let ctx = GatherContext::new(&engine, &parser, &cancel);

        assert!(read_frame(&frames[0], &ctx).is_none());
        assert!(engine.calls.lock().is_empty());
    }

    #[test]
    fn non_concurrent_engine_downgrades_to_sequential() {
        let (mut engine, _) = TableEngine::new(&[]);
        engine.concurrent = false;
        let gatherer = gatherer_for(GatherStrategy::Pooled, None, &engine);
        assert_eq!(gatherer.strategy(), GatherStrategy::Sequential);

        engine.concurrent = true;
        let gatherer = gatherer_for(GatherStrategy::Pooled, Some(2), &engine);
        assert_eq!(gatherer.strategy(), GatherStrategy::Pooled);
    }

    #[test]
    fn strategy_serde_names() {
        assert_eq!(serde_json::to_string(&GatherStrategy::Pooled).unwrap(), "\"pooled\"");
        assert_eq!(GatherStrategy::Sequential.to_string(), "sequential");
    }
}

//! `databurn run` - OCR a video.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use databurn_core::gather::GatherStrategy;
use databurn_core::orchestrator::{JobRunner, RunRequest};

use super::{execute_request, OutputArgs};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StrategyArg {
    /// Recognize frames on a thread pool
    Pooled,
    /// One frame at a time
    Sequential,
}

impl From<StrategyArg> for GatherStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Pooled => GatherStrategy::Pooled,
            StrategyArg::Sequential => GatherStrategy::Sequential,
        }
    }
}

/// OCR a video and write its timeline.
#[derive(Args, Debug)]
pub struct CmdRun {
    /// Video with burned-in timecode and filename
    pub video: PathBuf,

    #[command(flatten)]
    pub outputs: OutputArgs,

    /// Override the configured gathering strategy
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// OCR worker threads (0 = one per core)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Keep extracted frames after the run
    #[arg(long)]
    pub keep_frames: bool,
}

impl CmdRun {
    pub fn execute(self, verbose: u8) -> anyhow::Result<()> {
        if !self.video.exists() {
            anyhow::bail!("Video not found: {}", self.video.display());
        }

        let mut config = self.outputs.load_config()?;
        let settings = config.settings_mut();
        if let Some(strategy) = self.strategy {
            settings.ocr.strategy = strategy.into();
        }
        if let Some(threads) = self.threads {
            settings.ocr.threads = threads;
        }
        if self.keep_frames {
            settings.extraction.keep_frames = true;
        }
        if verbose > 0 {
            settings.logging.compact = false;
        }

        let request = RunRequest::video(&self.video, Vec::new());
        let targets = self.outputs.targets(&request.name, &config.output_folder());
        let request = RunRequest {
            outputs: targets,
            ..request
        };

        tracing::info!("Running {} ({})", self.video.display(), config.settings().ocr.strategy);
        execute_request(&JobRunner::from_config(&config), request)
    }
}

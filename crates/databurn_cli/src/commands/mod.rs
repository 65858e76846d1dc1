//! CLI subcommand implementations.

pub mod assemble;
pub mod config;
pub mod run;

pub use assemble::CmdAssemble;
pub use config::CmdConfig;
pub use run::CmdRun;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Args;
use databurn_core::config::ConfigManager;
use databurn_core::gather::CancelToken;
use databurn_core::orchestrator::{JobRunner, OutputTarget, RunReport, RunRequest};
use databurn_core::writers::ExportFormat;

use crate::progress::RunProgress;

/// Settings file name inside the app config directory.
pub const CONFIG_FILE_NAME: &str = "settings.toml";

/// Settings file used when `--config` is not given.
///
/// Lives in the platform config directory (`~/.config/databurn` on Linux)
/// so every working directory shares one file. Falls back to the current
/// directory when the platform has none.
pub fn default_config_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("databurn").join(CONFIG_FILE_NAME),
        None => PathBuf::from(CONFIG_FILE_NAME),
    }
}

/// `--config` if given, otherwise [`default_config_path`].
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path)
}

/// Output and config options shared by `run` and `assemble`.
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Main output path; `.fcpxml`/`.xml` writes FCPXML instead of EDL
    /// [default: <output_folder>/<name>.edl]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write an FCPXML timeline to this path
    #[arg(long)]
    pub fcpxml: Option<PathBuf>,

    /// Settings file [default: <config dir>/databurn/settings.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl OutputArgs {
    /// Load settings, creating the file and folders on first use.
    pub fn load_config(&self) -> anyhow::Result<ConfigManager> {
        let path = resolve_config_path(self.config.as_deref());
        let mut config = ConfigManager::new(&path);
        config
            .load_or_create()
            .with_context(|| format!("loading {}", path.display()))?;
        config
            .ensure_dirs_exist()
            .context("creating output, temp and log folders")?;
        Ok(config)
    }

    /// Requested targets; the main output defaults to an EDL in the output
    /// folder.
    pub fn targets(&self, name: &str, output_folder: &Path) -> Vec<OutputTarget> {
        let main = match &self.output {
            Some(path) => OutputTarget::new(
                ExportFormat::from_extension(path).unwrap_or(ExportFormat::Edl),
                path.clone(),
            ),
            None => OutputTarget::new(
                ExportFormat::Edl,
                output_folder.join(format!("{}.edl", name)),
            ),
        };
        let mut targets = vec![main];
        if let Some(path) = &self.fcpxml {
            targets.push(OutputTarget::new(ExportFormat::Fcpxml, path.clone()));
        }
        targets
    }
}

/// Run one request with a progress bar and print the outcome.
pub fn execute_request(runner: &JobRunner, request: RunRequest) -> anyhow::Result<()> {
    let progress = RunProgress::new();
    let result = runner.run(
        request,
        Some(progress.log_callback()),
        Some(progress.progress_callback()),
        CancelToken::new(),
    );

    match result {
        Ok(report) => {
            progress.finish("done");
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            progress.abandon("failed");
            Err(e.into())
        }
    }
}

fn print_report(report: &RunReport) {
    println!();
    println!("Segments: {}", report.segments.len());
    if let Some(summary) = &report.summary {
        println!(
            "Frames:   {} ({} timecodes filled in, {} unknown filenames)",
            summary.frames,
            summary.interpolated(),
            summary.filenames_unknown
        );
    }
    for target in &report.outputs {
        println!("Wrote:    {}", target.path.display());
    }
    println!("Log:      {}", report.log_path.display());
}

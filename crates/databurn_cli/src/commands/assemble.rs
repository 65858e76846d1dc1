//! `databurn assemble` - timeline from recognized frame texts.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Args;
use databurn_core::models::FrameText;
use databurn_core::orchestrator::{JobRunner, RunRequest};

use super::{execute_request, OutputArgs};

/// Build a timeline from a JSON array of `{"frame_index", "raw_text"}`.
#[derive(Args, Debug)]
pub struct CmdAssemble {
    /// JSON file of frame texts
    pub readings: PathBuf,

    #[command(flatten)]
    pub outputs: OutputArgs,
}

impl CmdAssemble {
    pub fn execute(self, verbose: u8) -> anyhow::Result<()> {
        let texts = read_texts(&self.readings)?;
        tracing::info!("Loaded {} frame texts", texts.len());

        let mut config = self.outputs.load_config()?;
        if verbose > 0 {
            config.settings_mut().logging.compact = false;
        }

        let name = self
            .readings
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "readings".to_string());
        let targets = self.outputs.targets(&name, &config.output_folder());

        execute_request(
            &JobRunner::from_config(&config),
            RunRequest::texts(name, texts, targets),
        )
    }
}

fn read_texts(path: &Path) -> anyhow::Result<Vec<FrameText>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_frame_text_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("texts.json");
        fs::write(
            &path,
            r#"[{"frame_index": 3, "raw_text": "TC: 01:00:00:00 Filename: A.mov"}]"#,
        )
        .unwrap();

        let texts = read_texts(&path).unwrap();
        assert_eq!(texts, vec![FrameText::new(3, "TC: 01:00:00:00 Filename: A.mov")]);
    }

    #[test]
    fn malformed_json_names_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();

        let err = read_texts(&path).unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }
}

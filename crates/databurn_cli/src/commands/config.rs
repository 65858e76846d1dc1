//! `databurn config` - create and show the settings file.

use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use databurn_core::config::ConfigManager;

use super::resolve_config_path;

/// Create the settings file if needed and print it.
#[derive(Args, Debug)]
pub struct CmdConfig {
    /// Settings file [default: <config dir>/databurn/settings.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl CmdConfig {
    pub fn execute(self) -> anyhow::Result<()> {
        let path = resolve_config_path(self.config.as_deref());
        let mut manager = ConfigManager::new(&path);
        manager
            .load_or_create()
            .with_context(|| format!("loading {}", path.display()))?;

        let content = fs::read_to_string(manager.path())
            .with_context(|| format!("reading {}", manager.path().display()))?;
        println!("# {}", manager.path().display());
        print!("{}", content);
        Ok(())
    }
}

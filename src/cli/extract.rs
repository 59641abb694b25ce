//! Extract command implementation

use clap::Args;
use std::path::PathBuf;

use crate::config::Config;
use crate::extract::Extractor;

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Input directory override
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Output directory override
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write per-match diagnostic artifacts
    #[arg(long)]
    pub debug_artifacts: bool,
}

impl ExtractArgs {
    pub async fn execute(&self, mut config: Config) -> anyhow::Result<()> {
        if let Some(input) = &self.input {
            config.input.dir = input.clone();
        }
        if let Some(output) = &self.output {
            config.report.output_dir = output.clone();
        }
        if self.debug_artifacts {
            config.report.debug_artifacts = true;
        }
        config.normalize_windows();

        let stats = Extractor::new(config).run().await?;
        if stats.read_errors > 0 {
            tracing::warn!(errors = stats.read_errors, "run finished with file errors");
        }
        Ok(())
    }
}

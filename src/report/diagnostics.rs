//! Per-match diagnostic artifacts
//!
//! When debug artifacts are enabled, each processed match gets a JSON
//! file holding the windowed series, every candidate triad from both
//! phases, and the final selection. The output tree mirrors the input
//! tree so an artifact sits next to the market file it explains.

use std::path::{Path, PathBuf};

use super::types::{MatchDiagnostics, ReportError};

pub struct DiagnosticsWriter {
    input_root: PathBuf,
    out_dir: PathBuf,
}

impl DiagnosticsWriter {
    pub fn new(
        input_root: &Path,
        output_dir: &Path,
        time_from_min: i64,
        time_to_min: i64,
    ) -> Self {
        Self {
            input_root: input_root.to_path_buf(),
            out_dir: output_dir.join(format!("diagnostics_{time_from_min}_{time_to_min}")),
        }
    }

    /// Write one match's artifact next to its mirrored source path
    pub fn write(&self, source: &Path, diagnostics: &MatchDiagnostics) -> Result<(), ReportError> {
        let relative = source.strip_prefix(&self.input_root).unwrap_or(source);
        let file_name = match relative.file_name().and_then(|n| n.to_str()) {
            Some(name) => format!("{name}_triads.json"),
            None => format!("{}_triads.json", diagnostics.market_id),
        };
        let target = match relative.parent() {
            Some(parent) => self.out_dir.join(parent).join(file_name),
            None => self.out_dir.join(file_name),
        };

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ReportError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(diagnostics).map_err(|source| {
            ReportError::Serialize {
                market_id: diagnostics.market_id.clone(),
                source,
            }
        })?;
        std::fs::write(&target, json).map_err(|source| ReportError::Io {
            path: target.clone(),
            source,
        })?;

        tracing::debug!(path = %target.display(), "diagnostic artifact written");
        Ok(())
    }
}

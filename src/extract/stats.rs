//! Run statistics

/// Counters accumulated over one extraction run
#[derive(Debug, Default, Clone)]
pub struct RunStats {
    pub files_found: usize,
    pub matches_processed: usize,
    pub exact_triads: usize,
    pub relaxed_triads: usize,
    pub without_triads: usize,
    pub malformed_markets: usize,
    pub kickoff_corrected: usize,
    pub read_errors: usize,
    pub skipped_files: usize,
}

impl RunStats {
    pub fn with_triads(&self) -> usize {
        self.exact_triads + self.relaxed_triads
    }

    /// Share of processed matches that produced a triad, in percent
    pub fn coverage_pct(&self) -> f64 {
        if self.matches_processed == 0 {
            return 0.0;
        }
        self.with_triads() as f64 * 100.0 / self.matches_processed as f64
    }

    pub fn log_summary(&self) {
        tracing::info!(
            files = self.files_found,
            processed = self.matches_processed,
            skipped = self.skipped_files,
            "processing complete"
        );
        tracing::info!(
            with_triads = self.with_triads(),
            exact = self.exact_triads,
            relaxed = self.relaxed_triads,
            without = self.without_triads,
            coverage_pct = self.coverage_pct(),
            "triad coverage"
        );
        tracing::info!(
            kickoff_corrected = self.kickoff_corrected,
            malformed_markets = self.malformed_markets,
            read_errors = self.read_errors,
            "data quality"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage() {
        let stats = RunStats {
            matches_processed: 8,
            exact_triads: 5,
            relaxed_triads: 1,
            without_triads: 2,
            ..Default::default()
        };
        assert_eq!(stats.with_triads(), 6);
        assert_eq!(stats.coverage_pct(), 75.0);
    }

    #[test]
    fn test_coverage_empty_run() {
        assert_eq!(RunStats::default().coverage_pct(), 0.0);
    }
}

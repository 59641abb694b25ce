//! Market file discovery
//!
//! Walks the input directory tree for unpacked market files. Archives
//! and previously generated outputs are skipped by extension; the result
//! is sorted so repeated runs process matches in the same order.

use std::io;
use std::path::{Path, PathBuf};

const SKIP_EXTENSIONS: [&str; 5] = ["bz2", "xlsx", "log", "txt", "csv"];

/// Recursively list candidate market files under `root`, sorted by path.
pub fn discover_market_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            walk(&path, out)?;
        } else if !skipped(&path) {
            out.push(path);
        }
    }
    Ok(())
}

fn skipped(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SKIP_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
}

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Returns a path in `directory` for the transcript of `base_file_name` that
/// does not exist yet, creating `directory` if needed.
///
/// The first candidate is `<base>.txt`, followed by `<base> (2).txt`,
/// `<base> (3).txt` and so on.
pub fn resolve_output_path(directory: &Path, base_file_name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create output directory {}", directory.display()))?;

    let mut candidate = directory.join(format!("{base_file_name}.txt"));
    let mut counter = 2;
    while candidate
        .try_exists()
        .with_context(|| format!("Failed to check {}", candidate.display()))?
    {
        candidate = directory.join(format!("{base_file_name} ({counter}).txt"));
        counter += 1;
    }
    Ok(candidate)
}

/// Writes `content` to a path that must not exist yet.
pub fn write_transcript(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_context(|| format!("Failed to create transcript file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write transcript file {}", path.display()))?;
    Ok(())
}

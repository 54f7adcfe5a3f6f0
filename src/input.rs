//! Transcript input: files, stdin and directory scans

use crate::parser::BYTE_ORDER_MARK;
use anyhow::{Context, Result};
use globset::GlobSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Display name used for transcripts read from stdin
pub const STDIN_NAME: &str = "<stdin>";

/// Read a transcript file. Invalid UTF-8 is replaced rather than rejected so
/// that broken encodings surface as gibberish in the report.
pub fn read_transcript(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read transcript: {}", path.display()))?;
    Ok(decode(&bytes))
}

/// Read a transcript from stdin
pub fn read_stdin() -> Result<String> {
    let mut bytes = Vec::new();
    std::io::stdin()
        .read_to_end(&mut bytes)
        .context("Failed to read transcript from stdin")?;
    Ok(decode(&bytes))
}

/// Lossy UTF-8 decode without a leading byte order mark
fn decode(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(&text).to_string()
}

/// Collect transcript files under `path`.
///
/// A file path is returned as-is unless ignored. Directories are walked
/// recursively; entries are matched against `include` and `ignore` relative
/// to `path`. Results are sorted for stable output.
pub fn collect_transcripts(
    path: &Path,
    include: &GlobSet,
    ignore: Option<&GlobSet>,
) -> Result<Vec<PathBuf>> {
    let is_ignored = |p: &Path| ignore.is_some_and(|set| set.is_match(p));

    if path.is_file() {
        if is_ignored(path) {
            return Ok(vec![]);
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let full = entry.path();
            let relative = full.strip_prefix(path).unwrap_or(full);
            (include.is_match(relative) && !is_ignored(relative) && !is_ignored(full))
                .then(|| full.to_path_buf())
        })
        .collect();

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::build_glob_set;
    use tempfile::TempDir;

    fn globs(patterns: &[&str]) -> GlobSet {
        build_glob_set(&patterns.iter().map(|p| p.to_string()).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn reads_invalid_utf8_lossily() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.txt");
        fs::write(&path, [0xE6, 0x88, b'\n', 0xFF, 0xFE]).unwrap();
        let text = read_transcript(&path).unwrap();
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn strips_leading_byte_order_mark() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notepad.txt");
        fs::write(&path, "\u{FEFF}我: 你好\n对方: 在").unwrap();
        let text = read_transcript(&path).unwrap();
        assert!(text.starts_with("我: 你好"));
    }

    #[test]
    fn missing_file_has_context() {
        let err = read_transcript(Path::new("/nonexistent/chat.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to read transcript"));
    }

    #[test]
    fn collects_matching_files_sorted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();
        fs::create_dir_all(dir.path().join("drafts")).unwrap();
        fs::write(dir.path().join("b/two.txt"), "我: hi").unwrap();
        fs::write(dir.path().join("a.txt"), "我: hi").unwrap();
        fs::write(dir.path().join("notes.md"), "# notes").unwrap();
        fs::write(dir.path().join("drafts/wip.txt"), "我: wip").unwrap();

        let files = collect_transcripts(
            dir.path(),
            &globs(&["**/*.txt"]),
            Some(&globs(&["drafts/**"])),
        )
        .unwrap();

        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["a.txt".to_string(), "b/two.txt".to_string()]);
    }

    #[test]
    fn single_file_is_returned_regardless_of_include() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat.log");
        fs::write(&path, "我: hi").unwrap();
        let files = collect_transcripts(&path, &globs(&["**/*.txt"]), None).unwrap();
        assert_eq!(files, vec![path]);
    }

    #[test]
    fn missing_path_is_error() {
        let result = collect_transcripts(Path::new("/nonexistent/dir"), &globs(&["**/*.txt"]), None);
        assert!(result.is_err());
    }
}

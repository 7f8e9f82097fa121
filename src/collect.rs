//! Resolve upload arguments into an ordered list of files.
//!
//! Explicit file arguments are kept in the order given. Directory arguments
//! are walked and filtered through `upload.include_globs` /
//! `upload.exclude_globs`, with matches sorted by relative path.

use anyhow::{bail, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::UploadConfig;

pub fn collect_files(paths: &[PathBuf], config: &UploadConfig) -> Result<Vec<PathBuf>> {
    let include_set = build_globset(&config.include_globs)?;

    let mut default_excludes = vec![
        "**/.git/**".to_string(),
        "**/target/**".to_string(),
        "**/node_modules/**".to_string(),
    ];
    default_excludes.extend(config.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            files.extend(walk_dir(path, config.follow_symlinks, &include_set, &exclude_set)?);
        } else {
            bail!("No such file or directory: {}", path.display());
        }
    }

    Ok(files)
}

fn walk_dir(
    root: &Path,
    follow_symlinks: bool,
    include_set: &GlobSet,
    exclude_set: &GlobSet,
) -> Result<Vec<PathBuf>> {
    let mut found: Vec<(String, PathBuf)> = Vec::new();

    for entry in WalkDir::new(root).follow_links(follow_symlinks) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
            continue;
        }

        found.push((rel_str, path.to_path_buf()));
    }

    found.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(found.into_iter().map(|(_, p)| p).collect())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_directory_is_filtered_and_sorted() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("week2")).unwrap();
        fs::create_dir_all(root.join("node_modules")).unwrap();
        fs::write(root.join("week2/b.pdf"), b"%PDF").unwrap();
        fs::write(root.join("a.txt"), "alpha").unwrap();
        fs::write(root.join("image.png"), b"png").unwrap();
        fs::write(root.join("node_modules/dep.txt"), "skip").unwrap();

        let files = collect_files(&[root.to_path_buf()], &UploadConfig::default()).unwrap();
        assert_eq!(names(&files), vec!["a.txt", "b.pdf"]);
    }

    #[test]
    fn test_explicit_files_keep_argument_order() {
        let tmp = TempDir::new().unwrap();
        let z = tmp.path().join("z.md");
        let a = tmp.path().join("a.txt");
        fs::write(&z, "zeta").unwrap();
        fs::write(&a, "alpha").unwrap();

        // Explicit files bypass include globs.
        let files = collect_files(&[z.clone(), a.clone()], &UploadConfig::default()).unwrap();
        assert_eq!(files, vec![z, a]);
    }

    #[test]
    fn test_exclude_globs() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("keep.txt"), "k").unwrap();
        fs::write(tmp.path().join("draft.txt"), "d").unwrap();
        let config = UploadConfig {
            exclude_globs: vec!["draft*".to_string()],
            ..UploadConfig::default()
        };
        let files = collect_files(&[tmp.path().to_path_buf()], &config).unwrap();
        assert_eq!(names(&files), vec!["keep.txt"]);
    }

    #[test]
    fn test_missing_path_errors() {
        let err = collect_files(&[PathBuf::from("/no/such/dir")], &UploadConfig::default());
        assert!(err.is_err());
    }
}

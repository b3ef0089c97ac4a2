//! Scanner for answer export files.
//!
//! Walks a directory for store documents and answer exports, respecting
//! the configured extensions, excludes and size limit, and merges what it
//! finds into a single document.

use crate::analysis::dedupe_answers;
use crate::store::StoreDocument;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Configuration for export scanning.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions to include (e.g., ["json"])
    pub extensions: Vec<String>,
    /// Names to skip (directories or files)
    pub excludes: Vec<String>,
    /// Maximum file size in bytes
    pub max_file_size: u64,
    /// Maximum number of files to read
    pub max_files: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["json".to_string()],
            excludes: vec!["node_modules".to_string(), "target".to_string()],
            max_file_size: 10 * 1024 * 1024, // 10MB
            max_files: None,
        }
    }
}

impl From<&crate::config::ScannerConfig> for ScanConfig {
    fn from(config: &crate::config::ScannerConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            excludes: config.excludes.clone(),
            max_file_size: config.max_file_size,
            max_files: Some(config.max_files),
        }
    }
}

/// Export file found by the scanner.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// Absolute or root-joined path
    pub path: PathBuf,
    /// Path relative to the scan root
    pub relative_path: String,
    /// File size in bytes
    pub size: u64,
}

/// Merged result of reading several export files.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Combined document; answers deduplicated with the last file winning.
    pub document: StoreDocument,
    /// Files that were read successfully.
    pub files_read: usize,
    /// Files that could not be read or parsed.
    pub files_failed: Vec<(String, String)>,
}

/// Scanner for discovering answer exports.
pub struct ExportScanner {
    config: ScanConfig,
    root: PathBuf,
}

impl ExportScanner {
    /// Create a new scanner rooted at `root`.
    pub fn new(root: PathBuf, config: ScanConfig) -> Self {
        Self { config, root }
    }

    /// Scan for matching files, sorted by relative path.
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        if !self.root.is_dir() {
            return Err(anyhow::anyhow!(
                "Not a directory: {}",
                self.root.display()
            ));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.is_excluded(e));

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!("Cannot read entry under {}: {}", self.root.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.matches(entry.path()) {
                continue;
            }

            let size = match entry.metadata() {
                Ok(m) => m.len(),
                Err(_) => continue,
            };
            if size > self.config.max_file_size {
                debug!("Skipping oversized file {}", entry.path().display());
                continue;
            }

            let rel_path = entry
                .path()
                .strip_prefix(&self.root)
                .unwrap_or(entry.path());

            files.push(ScannedFile {
                path: entry.path().to_path_buf(),
                relative_path: rel_path.to_string_lossy().to_string(),
                size,
            });

            if let Some(max) = self.config.max_files {
                if files.len() >= max {
                    break;
                }
            }
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(files)
    }

    /// Read every matching file and merge the results.
    ///
    /// Files that fail to parse are reported, not fatal.
    pub fn collect(&self, show_progress: bool) -> Result<ScanResult> {
        let files = self.scan()?;
        let progress = if show_progress {
            let pb = ProgressBar::new(files.len() as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            Some(pb)
        } else {
            None
        };

        let mut result = ScanResult::default();
        let mut answers = Vec::new();

        for file in &files {
            if let Some(pb) = &progress {
                pb.set_message(file.relative_path.clone());
            }
            debug!("Reading {} ({} bytes)", file.relative_path, file.size);

            match StoreDocument::from_file(&file.path) {
                Ok(doc) => {
                    result.files_read += 1;
                    answers.extend(doc.answers);
                    for project in doc.projects {
                        if !result.document.projects.iter().any(|p| p.id == project.id) {
                            result.document.projects.push(project);
                        }
                    }
                    for assessment in doc.assessments {
                        if !result
                            .document
                            .assessments
                            .iter()
                            .any(|a| a.id == assessment.id)
                        {
                            result.document.assessments.push(assessment);
                        }
                    }
                }
                Err(e) => {
                    warn!("Failed to read {}: {}", file.relative_path, e);
                    result
                        .files_failed
                        .push((file.relative_path.clone(), e.to_string()));
                }
            }

            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        result.document.answers = dedupe_answers(answers);
        Ok(result)
    }

    /// Check if a file has an accepted extension.
    pub fn matches(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        self.config.extensions.iter().any(|e| e == ext)
    }

    /// Check if an entry matches exclusion patterns.
    fn is_excluded(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();

        // Hidden files
        if name.starts_with('.') {
            return true;
        }

        self.config.excludes.iter().any(|pattern| name == pattern.as_str())
    }
}

/// Load answers from a file or a directory of exports.
pub fn load_source(path: &Path, config: &ScanConfig, show_progress: bool) -> Result<ScanResult> {
    if path.is_dir() {
        let scanner = ExportScanner::new(path.to_path_buf(), config.clone());
        return scanner.collect(show_progress);
    }

    let mut document = StoreDocument::from_file(path)
        .with_context(|| format!("Failed to load answers from {}", path.display()))?;
    document.answers = dedupe_answers(document.answers);

    Ok(ScanResult {
        document,
        files_read: 1,
        files_failed: Vec::new(),
    })
}

//! Input collection: files, directories, and zip archives.
//!
//! Turns the paths given on the command line into an ordered list of
//! [`InputFile`]s. Directories are walked recursively in file-name order,
//! zip archives are expanded in memory (every `.pdf` entry becomes an input,
//! in archive order), and names are sanitized to a safe basename.
//!
//! Per-file problems (unreadable, oversized, corrupt archive) are carried as
//! an `Err` content so the batch keeps going; only a missing input path or
//! an empty result fails the whole intake.

use anyhow::{bail, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::IntakeConfig;
use crate::extract::ExtractError;

/// One document waiting for text extraction.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    pub content: Result<Vec<u8>, ExtractError>,
}

pub fn collect_inputs(paths: &[PathBuf], config: &IntakeConfig) -> Result<Vec<InputFile>> {
    let allowed = build_extension_set(&config.allowed_extensions)?;
    let mut inputs = Vec::new();

    for path in paths {
        if !path.exists() {
            bail!("Input path does not exist: {}", path.display());
        }
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry?;
                if !entry.file_type().is_file() {
                    continue;
                }
                add_file(entry.path(), &allowed, config, &mut inputs);
            }
        } else {
            add_file(path, &allowed, config, &mut inputs);
        }
    }

    if inputs.is_empty() {
        bail!("No PDF files found");
    }

    tracing::info!(count = inputs.len(), "collected input documents");
    Ok(inputs)
}

fn add_file(path: &Path, allowed: &GlobSet, config: &IntakeConfig, inputs: &mut Vec<InputFile>) {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if !allowed.is_match(&file_name) {
        tracing::warn!(path = %path.display(), "skipping file with unsupported extension");
        return;
    }

    let name = sanitize_filename(&file_name);
    let content = read_bounded(path, config.max_file_bytes);

    if file_name.to_ascii_lowercase().ends_with(".zip") {
        match content {
            Ok(bytes) => expand_zip(&name, &bytes, config.max_file_bytes, inputs),
            Err(e) => inputs.push(InputFile {
                name,
                content: Err(e),
            }),
        }
    } else {
        inputs.push(InputFile { name, content });
    }
}

fn read_bounded(path: &Path, limit: u64) -> Result<Vec<u8>, ExtractError> {
    let size = std::fs::metadata(path)
        .map_err(|e| ExtractError::Io(e.to_string()))?
        .len();
    if size > limit {
        return Err(ExtractError::TooLarge { size, limit });
    }
    std::fs::read(path).map_err(|e| ExtractError::Io(e.to_string()))
}

/// Append every PDF entry of the archive. A corrupt archive becomes a single
/// failed input named after the archive.
pub fn expand_zip(archive_name: &str, bytes: &[u8], limit: u64, inputs: &mut Vec<InputFile>) {
    let mut archive = match zip::ZipArchive::new(Cursor::new(bytes)) {
        Ok(a) => a,
        Err(e) => {
            inputs.push(InputFile {
                name: archive_name.to_string(),
                content: Err(ExtractError::Archive(e.to_string())),
            });
            return;
        }
    };

    let before = inputs.len();
    for i in 0..archive.len() {
        let entry = match archive.by_index(i) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(archive = archive_name, index = i, error = %e, "skipping unreadable archive entry");
                continue;
            }
        };
        let entry_name = entry.name().to_string();
        if entry.is_dir()
            || entry_name.contains("__MACOSX/")
            || !entry_name.to_ascii_lowercase().ends_with(".pdf")
        {
            continue;
        }

        let base = entry_name
            .rsplit(&['/', '\\'][..])
            .next()
            .unwrap_or(entry_name.as_str());
        let name = sanitize_filename(base);
        let declared = entry.size();
        let content = if declared > limit {
            Err(ExtractError::TooLarge {
                size: declared,
                limit,
            })
        } else {
            read_entry_bounded(entry, limit)
        };
        inputs.push(InputFile { name, content });
    }

    if inputs.len() == before {
        tracing::warn!(archive = archive_name, "archive contains no PDF files");
    }
}

fn read_entry_bounded(entry: impl Read, limit: u64) -> Result<Vec<u8>, ExtractError> {
    let mut out = Vec::new();
    entry
        .take(limit.saturating_add(1))
        .read_to_end(&mut out)
        .map_err(|e| ExtractError::Archive(e.to_string()))?;
    if out.len() as u64 > limit {
        return Err(ExtractError::TooLarge {
            size: out.len() as u64,
            limit,
        });
    }
    Ok(out)
}

fn build_extension_set(extensions: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for ext in extensions {
        let pattern = format!("*.{}", ext.trim_start_matches('.'));
        builder.add(GlobBuilder::new(&pattern).case_insensitive(true).build()?);
    }
    Ok(builder.build()?)
}

/// Reduce a file name to a safe ASCII basename: whitespace runs become `_`,
/// anything outside `[A-Za-z0-9_.-]` is dropped, and leading/trailing `.`
/// and `_` are trimmed. Distinct inputs may sanitize to the same name.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(&['/', '\\'][..]).next().unwrap_or(name);
    let joined = base.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        "unnamed.pdf".to_string()
    } else {
        trimmed.to_string()
    }
}

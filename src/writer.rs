// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Writing composed pages to the output directory.
//!
//! Each page is written with a plain overwrite. A page that fails to write
//! is logged and reported, and the remaining pages are still attempted.

use crate::pages::Page;
use snafu::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Error type for output failures.
#[derive(Debug, Snafu)]
pub enum WriteError {
    /// The output directory could not be created.
    #[snafu(display("failed to create output directory {}: {source}", path.display()))]
    CreateOutputDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A single page could not be written.
    #[snafu(display("failed to write {}: {source}", path.display()))]
    WriteFile {
        /// The page that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// The outcome of writing a set of pages.
#[derive(Debug, Default)]
pub struct WriteReport {
    /// Paths written successfully, in write order.
    pub written: Vec<PathBuf>,
    /// Pages that failed.
    pub failures: Vec<WriteError>,
}

/// Writes every page into `out_dir`, creating the directory if needed.
///
/// Existing files are overwritten. Pages sharing a filename are written in
/// order, so the last one wins.
///
/// # Errors
///
/// Returns [`WriteError::CreateOutputDir`] if the directory cannot be
/// created. Failures of individual pages are collected in the report
/// instead.
pub fn write_pages(out_dir: &Path, pages: &[Page]) -> Result<WriteReport, WriteError> {
    std::fs::create_dir_all(out_dir).context(CreateOutputDirSnafu { path: out_dir })?;

    let mut report = WriteReport::default();
    for page in pages {
        let path = out_dir.join(&page.filename);
        match std::fs::write(&path, &page.content).context(WriteFileSnafu { path: &path }) {
            Ok(()) => {
                debug!("Wrote {}", path.display());
                report.written.push(path);
            }
            Err(err) => {
                error!("{err}");
                report.failures.push(err);
            }
        }
    }

    info!(
        "Wrote {} pages to {}",
        report.written.len(),
        out_dir.display()
    );
    Ok(report)
}

/// Logs what [`write_pages`] would write, without touching the filesystem.
pub fn preview_pages(out_dir: &Path, pages: &[Page]) {
    for page in pages {
        info!("Would write {}", out_dir.join(&page.filename).display());
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod layout;
mod render;

pub use layout::{
    A4_HEIGHT_PT, A4_WIDTH_PT, LaidOutLine, LineStyle, PAGE_MARGIN_PT, PageGeometry, TextRun,
    layout_report, paginate, pdf_safe_text, text_width_pt, wrap_text,
};
pub use render::{placeholder_document, render_pages};

use anyhow::{Context, Result};
use homecert_app::HomeReport;
use std::fs;
use std::path::{Path, PathBuf};

const FILENAME_PREFIX: &str = "HomeCert_";
const FALLBACK_STEM: &str = "Home";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub pages: usize,
    /// True when the placeholder document was written instead of the report.
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exporter {
    output_dir: PathBuf,
    geometry: PageGeometry,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            geometry: PageGeometry::default(),
        }
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes the report as a PDF. Any failure to build or write the real
    /// document falls back to a placeholder; only a failure to write that
    /// placeholder is returned as an error.
    pub fn export(&self, report: &HomeReport) -> Result<ExportOutcome> {
        let path = self.output_dir.join(report_filename(&report.address));
        tracing::info!(home = %report.home_id, path = %path.display(), "exporting report");

        match self.write_report(report, &path) {
            Ok(pages) => {
                tracing::info!(home = %report.home_id, pages, "report exported");
                Ok(ExportOutcome {
                    path,
                    pages,
                    degraded: false,
                })
            }
            Err(error) => {
                let detail = format!("{error:#}");
                tracing::warn!(
                    home = %report.home_id,
                    error = %detail,
                    "report export failed; writing placeholder"
                );
                let bytes = placeholder_document(&self.geometry)?;
                write_file(&path, &bytes)?;
                Ok(ExportOutcome {
                    path,
                    pages: 1,
                    degraded: true,
                })
            }
        }
    }

    fn write_report(&self, report: &HomeReport, path: &Path) -> Result<usize> {
        let lines = layout_report(report, &self.geometry)?;
        let pages = paginate(lines, self.geometry.usable_height());
        let bytes = render_pages(&report.title, &pages, &self.geometry)?;
        write_file(path, &bytes)?;
        Ok(pages.len())
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create export directory {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("write pdf {}", path.display()))
}

/// `HomeCert_<address>.pdf` with every non-alphanumeric run collapsed to a
/// single underscore and no leading or trailing underscore.
pub fn report_filename(address: &str) -> String {
    let mut stem = String::with_capacity(address.len());
    for ch in address.chars() {
        if ch.is_ascii_alphanumeric() {
            stem.push(ch);
        } else if !stem.is_empty() && !stem.ends_with('_') {
            stem.push('_');
        }
    }
    let stem = stem.trim_end_matches('_');
    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem };
    format!("{FILENAME_PREFIX}{stem}.pdf")
}

/// Platform download directory, else home, else the working directory.
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use homecert_app::{HealthWeights, Home, HomeReport};
use homecert_data::Catalog;
use homecert_export::Exporter;
use homecert_tui::{ExportEvent, ExportSummary, InternalEvent};
use std::sync::mpsc::Sender;
use std::thread;

pub struct CatalogRuntime {
    catalog: Catalog,
    weights: HealthWeights,
    exporter: Exporter,
}

impl CatalogRuntime {
    pub fn new(catalog: Catalog, weights: HealthWeights, exporter: Exporter) -> Self {
        Self {
            catalog,
            weights,
            exporter,
        }
    }
}

/// Shared by the blocking path and the export worker.
fn run_export(exporter: &Exporter, report: &HomeReport) -> Result<ExportSummary> {
    let outcome = exporter.export(report)?;
    Ok(ExportSummary {
        path: outcome.path,
        pages: outcome.pages,
        degraded: outcome.degraded,
    })
}

impl homecert_tui::AppRuntime for CatalogRuntime {
    fn homes(&self) -> &[Home] {
        self.catalog.homes()
    }

    fn current_year(&self) -> i32 {
        self.catalog.current_year()
    }

    fn weights(&self) -> &HealthWeights {
        &self.weights
    }

    fn export_report(&mut self, report: &HomeReport) -> Result<ExportSummary> {
        run_export(&self.exporter, report)
    }

    // Exports are independent; a second request for the same home simply
    // writes the file again.
    fn spawn_export(&mut self, report: HomeReport, tx: Sender<InternalEvent>) -> Result<()> {
        let exporter = self.exporter.clone();
        thread::Builder::new()
            .name(format!("export-home-{}", report.home_id))
            .spawn(move || {
                let home_id = report.home_id;
                let event = match run_export(&exporter, &report) {
                    Ok(summary) => ExportEvent::Completed { home_id, summary },
                    Err(error) => {
                        let detail = format!("{error:#}");
                        tracing::error!(home = %home_id, error = %detail, "export failed");
                        ExportEvent::Failed {
                            home_id,
                            error: detail,
                        }
                    }
                };
                let _ = tx.send(InternalEvent::Export(event));
            })
            .context("spawn export worker")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CatalogRuntime;
    use anyhow::Result;
    use homecert_app::{HealthWeights, HomeId, build_report};
    use homecert_data::Catalog;
    use homecert_export::Exporter;
    use homecert_testkit::{FIXTURE_YEAR, sample_homes, temp_output_dir};
    use homecert_tui::{AppRuntime, ExportEvent, InternalEvent};
    use std::sync::mpsc;
    use std::time::Duration;

    fn runtime(dir: &std::path::Path) -> Result<CatalogRuntime> {
        let catalog = Catalog::from_homes(sample_homes(), FIXTURE_YEAR)?;
        Ok(CatalogRuntime::new(
            catalog,
            HealthWeights::default(),
            Exporter::new(dir),
        ))
    }

    #[test]
    fn runtime_exposes_catalog() -> Result<()> {
        let dir = temp_output_dir()?;
        let runtime = runtime(dir.path())?;
        assert_eq!(runtime.homes().len(), 3);
        assert_eq!(runtime.current_year(), FIXTURE_YEAR);
        assert_eq!(runtime.weights(), &HealthWeights::default());
        Ok(())
    }

    #[test]
    fn export_report_writes_pdf_and_summarises_it() -> Result<()> {
        let dir = temp_output_dir()?;
        let mut runtime = runtime(dir.path())?;
        let report = build_report(&sample_homes()[1], &HealthWeights::default(), FIXTURE_YEAR);

        let summary = runtime.export_report(&report)?;
        assert!(!summary.degraded);
        assert!(summary.pages >= 1);
        assert!(summary.path.starts_with(dir.path()));
        assert!(std::fs::read(&summary.path)?.starts_with(b"%PDF"));
        Ok(())
    }

    #[test]
    fn export_report_surfaces_write_failures() -> Result<()> {
        let dir = temp_output_dir()?;
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory")?;
        let mut runtime = runtime(&blocker)?;
        let report = build_report(&sample_homes()[0], &HealthWeights::default(), FIXTURE_YEAR);

        assert!(runtime.export_report(&report).is_err());
        Ok(())
    }

    #[test]
    fn spawned_export_reports_completion_on_channel() -> Result<()> {
        let dir = temp_output_dir()?;
        let mut runtime = runtime(dir.path())?;
        let report = build_report(&sample_homes()[0], &HealthWeights::default(), FIXTURE_YEAR);

        let (tx, rx) = mpsc::channel();
        runtime.spawn_export(report, tx)?;
        let event = rx.recv_timeout(Duration::from_secs(30))?;

        let InternalEvent::Export(ExportEvent::Completed { home_id, summary }) = event else {
            panic!("unexpected event {event:?}");
        };
        assert_eq!(home_id, HomeId::new(1));
        assert!(!summary.degraded);
        assert!(summary.path.starts_with(dir.path()));
        assert!(summary.path.exists());
        Ok(())
    }

    #[test]
    fn spawned_export_reports_write_failures() -> Result<()> {
        let dir = temp_output_dir()?;
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory")?;
        let mut runtime = runtime(&blocker)?;
        let report = build_report(&sample_homes()[2], &HealthWeights::default(), FIXTURE_YEAR);

        let (tx, rx) = mpsc::channel();
        runtime.spawn_export(report, tx)?;
        let event = rx.recv_timeout(Duration::from_secs(30))?;
        assert!(matches!(
            event,
            InternalEvent::Export(ExportEvent::Failed { home_id, .. }) if home_id == HomeId::new(3)
        ));
        Ok(())
    }
}

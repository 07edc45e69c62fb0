//! # Print Service
//!
//! The two operations the UI calls:
//!
//! - [`PrintService::print_base64_pdf`]: decode a data-URL payload, render
//!   it, size the page from the rendered content and submit one silent job.
//! - [`PrintService::preview_receipt`]: write the receipt template as a PDF
//!   to the temp directory and open it with the default viewer.
//!
//! ## Print Pipeline
//!
//! ```text
//! data URL ─▶ Payload ─▶ Surface::load ─▶ wait_ready (≤ ceiling)
//!                                            │
//!                              Measurement ◀─┘
//!                                   │
//!                     PageSize::for_content ─▶ PrintJob ─▶ backend.submit
//! ```
//!
//! Rejected payloads never reach the backend.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

use crate::error::CupomError;
use crate::payload::Payload;
use crate::printer::{Measurement, PageSize, PrintOptions, PrinterGeometry};
use crate::receipt::Receipt;
use crate::render::surface::{DEFAULT_READY_TIMEOUT, Surface};
use crate::render::RasterizeOptions;
use crate::transport::{PrintBackend, PrintJob};

/// Service configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceConfig {
    pub geometry: PrinterGeometry,
    pub options: PrintOptions,
    pub rasterize: RasterizeOptions,
    /// Ceiling for the rendering readiness wait
    pub ready_timeout: Duration,
    /// Open previews with the default viewer
    pub open_preview: bool,
    /// Where preview PDFs are written
    pub preview_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            geometry: PrinterGeometry::default(),
            options: PrintOptions::default(),
            rasterize: RasterizeOptions::default(),
            ready_timeout: DEFAULT_READY_TIMEOUT,
            open_preview: true,
            preview_dir: std::env::temp_dir(),
        }
    }
}

/// Opens a file with the desktop's default handler.
pub type Opener = Arc<dyn Fn(&Path) -> io::Result<()> + Send + Sync>;

/// Outcome of a successful print.
#[derive(Debug, Clone, Serialize)]
pub struct PrintReport {
    pub job_id: Uuid,
    pub backend: &'static str,
    pub pages: usize,
    pub measurement: Measurement,
    pub page_size: PageSize,
}

pub struct PrintService {
    config: ServiceConfig,
    backend: Arc<Mutex<Box<dyn PrintBackend>>>,
    backend_name: &'static str,
    opener: Opener,
}

impl fmt::Debug for PrintService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintService")
            .field("config", &self.config)
            .field("backend", &self.backend_name)
            .finish()
    }
}

impl PrintService {
    pub fn new<B: PrintBackend + 'static>(config: ServiceConfig, backend: B) -> Self {
        let backend_name = backend.name();
        Self {
            config,
            backend: Arc::new(Mutex::new(Box::new(backend))),
            backend_name,
            opener: Arc::new(|path: &Path| open::that(path)),
        }
    }

    /// Replace the default-viewer launcher.
    pub fn with_opener<F>(mut self, opener: F) -> Self
    where
        F: Fn(&Path) -> io::Result<()> + Send + Sync + 'static,
    {
        self.opener = Arc::new(opener);
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend_name
    }

    /// Print a data-URL payload, reporting success as a boolean.
    ///
    /// Failures are logged; use [`PrintService::print_payload`] for the cause.
    pub async fn print_base64_pdf(&self, payload: &str) -> bool {
        match self.print_payload(payload).await {
            Ok(_) => true,
            Err(e) => {
                log::error!("Print failed: {}", e);
                false
            }
        }
    }

    /// Print a data-URL payload.
    pub async fn print_payload(&self, data_url: &str) -> Result<PrintReport, CupomError> {
        let payload = Payload::from_data_url(data_url).inspect_err(|e| {
            log::warn!("Rejected payload: {}", e);
        })?;
        log::info!(
            "Received {} payload ({} bytes)",
            payload.kind().name(),
            payload.len()
        );

        let geometry = self.config.geometry;
        let mut surface = Surface::load(
            payload,
            geometry.width_dots(),
            geometry.max_height_dots(),
            self.config.rasterize,
        );
        let measurement = surface.wait_ready(self.config.ready_timeout).await?;
        let page_size = PageSize::for_content(measurement, &geometry);
        let content = surface.into_content().await?;

        let job = PrintJob::new(self.config.options.clone(), page_size, content.image, content.pages);
        log::info!(
            "Printing job {} on {}: {} ({} page(s))",
            job.id,
            self.backend_name,
            page_size,
            job.pages
        );

        let report = PrintReport {
            job_id: job.id,
            backend: self.backend_name,
            pages: job.pages,
            measurement,
            page_size,
        };

        let backend = Arc::clone(&self.backend);
        tokio::task::spawn_blocking(move || {
            let mut backend = backend.lock().unwrap_or_else(|e| e.into_inner());
            backend.submit(&job)
        })
        .await
        .map_err(|e| CupomError::Transport(format!("Print task error: {}", e)))??;

        log::info!("Job {} submitted", report.job_id);
        Ok(report)
    }

    /// Write the demo receipt as a PDF and open it.
    pub fn preview_receipt(&self) -> Result<PathBuf, CupomError> {
        self.preview(&Receipt::demo())
    }

    /// Write `receipt` as a PDF in the preview directory and open it.
    pub fn preview(&self, receipt: &Receipt) -> Result<PathBuf, CupomError> {
        let page_size = receipt.page_size()?;
        let bytes = receipt.to_pdf()?;
        if bytes.is_empty() {
            return Err(CupomError::Pdf("generated PDF is empty".to_string()));
        }

        let path = self.config.preview_dir.join(preview_file_name(Local::now()));
        std::fs::write(&path, &bytes)?;
        log::info!(
            "Wrote preview {} ({}, {} bytes)",
            path.display(),
            page_size,
            bytes.len()
        );

        if self.config.open_preview {
            (self.opener)(&path)?;
        }

        Ok(path)
    }
}

/// Timestamp-based preview file name, unique to the millisecond.
pub fn preview_file_name(now: DateTime<Local>) -> String {
    format!("receipt-{}.pdf", now.format("%Y%m%d-%H%M%S-%3f"))
}

// ============================================================================
// TESTS
// ============================================================================

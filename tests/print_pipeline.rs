//! # Print Pipeline Tests
//!
//! End-to-end checks of the two service operations against an in-memory
//! backend:
//!
//! - image payloads produce exactly one job, backgrounds on
//! - unrecognised payloads are rejected before any job exists
//! - previews are valid PDFs handed to the viewer
//! - PDF payloads go through rasterization and page sizing
//! - slow or oversized renders fail without a job

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use pretty_assertions::assert_eq;

use cupom::error::CupomError;
use cupom::printer::{Measurement, PageSize, PrinterGeometry};
use cupom::receipt::{LineItem, Receipt};
use cupom::service::{PrintService, ServiceConfig};
use cupom::transport::RecordingBackend;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn png_data_url(width: u32, height: u32) -> String {
    let mut png = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([40])))
        .write_to(&mut png, ImageFormat::Png)
        .unwrap();
    format!("data:image/png;base64,{}", STANDARD.encode(png.into_inner()))
}

fn service(config: ServiceConfig) -> (PrintService, RecordingBackend) {
    let backend = RecordingBackend::new();
    (PrintService::new(config, backend.clone()), backend)
}

// ============================================================================
// PRINTING
// ============================================================================

#[tokio::test]
async fn test_image_payload_prints_one_job_with_background() {
    let (service, backend) = service(ServiceConfig::default());

    let report = service.print_payload(&png_data_url(288, 400)).await.unwrap();

    let jobs = backend.jobs();
    assert_eq!(jobs.len(), 1);
    let job = &jobs[0];
    assert!(job.options.print_background);
    assert!(job.options.silent);
    assert_eq!(job.id, report.job_id);

    // 288 wide scaled to 576 doubles the height
    assert_eq!(report.measurement, Measurement::new(576, 800));
    assert_eq!(job.image.dimensions(), (576, 800));
    assert_eq!(
        job.page_size,
        PageSize::for_content(report.measurement, &PrinterGeometry::THERMAL_80MM)
    );
    assert_eq!(job.page_size.width_um, 72_000);
    assert_eq!(job.page_size.height_um, 106_000);
}

#[tokio::test]
async fn test_bool_wrapper_reports_success() {
    let (service, backend) = service(ServiceConfig::default());
    assert!(service.print_base64_pdf(&png_data_url(10, 10)).await);
    assert_eq!(backend.len(), 1);
}

#[tokio::test]
async fn test_unrecognised_payload_is_rejected_before_printing() {
    let (service, backend) = service(ServiceConfig::default());

    let text = format!("data:text/plain;base64,{}", STANDARD.encode("not a receipt"));
    assert!(!service.print_base64_pdf(&text).await);
    assert!(!service.print_base64_pdf("").await);
    assert!(!service.print_base64_pdf("data:image/png;base64,????").await);

    assert!(backend.is_empty());
}

#[tokio::test]
async fn test_pdf_payload_is_rasterized_and_sized() {
    let (service, backend) = service(ServiceConfig::default());

    let pdf = Receipt::demo().to_pdf().unwrap();
    let url = format!("data:application/pdf;base64,{}", STANDARD.encode(pdf));
    let report = service.print_payload(&url).await.unwrap();

    assert_eq!(report.pages, 1);
    assert_eq!(report.measurement.width_px, 576);
    assert!(report.measurement.height_px > 0);
    assert_eq!(report.page_size.width_um, 72_000);
    assert_eq!(backend.len(), 1);
}

#[tokio::test]
async fn test_render_past_ceiling_prints_nothing() {
    let config = ServiceConfig {
        ready_timeout: Duration::ZERO,
        ..ServiceConfig::default()
    };
    let (service, backend) = service(config);
    let url = png_data_url(2000, 3000);

    let err = service.print_payload(&url).await.unwrap_err();
    assert!(matches!(err, CupomError::NotReady(d) if d == Duration::ZERO), "{}", err);
    assert!(!service.print_base64_pdf(&url).await);

    assert!(backend.is_empty());
    assert_eq!(backend.submitted(), 0);
}

#[tokio::test]
async fn test_narrow_tall_image_is_refused() {
    let (service, backend) = service(ServiceConfig::default());

    // 1 pixel wide scales 576x, far past the page length limit
    let err = service.print_payload(&png_data_url(1, 100)).await.unwrap_err();
    assert!(matches!(err, CupomError::Render(ref r) if r.contains("too long")), "{}", err);
    assert!(backend.is_empty());
}

#[tokio::test]
async fn test_page_length_limit_follows_geometry() {
    let config = ServiceConfig {
        geometry: PrinterGeometry {
            max_length_mm: 50.0,
            ..PrinterGeometry::THERMAL_80MM
        },
        ..ServiceConfig::default()
    };
    let (service, backend) = service(config);

    // 800 dots is about 100mm
    assert!(!service.print_base64_pdf(&png_data_url(288, 400)).await);
    assert!(service.print_base64_pdf(&png_data_url(288, 100)).await);
    assert_eq!(backend.len(), 1);
}

// ============================================================================
// PREVIEW
// ============================================================================

#[test]
fn test_preview_writes_pdf_and_opens_it() {
    let dir = tempfile::tempdir().unwrap();
    let opened: Arc<Mutex<Vec<PathBuf>>> = Arc::default();
    let recorder = Arc::clone(&opened);

    let config = ServiceConfig {
        preview_dir: dir.path().to_path_buf(),
        ..ServiceConfig::default()
    };
    let (service, backend) = service(config);
    let service = service.with_opener(move |path| {
        recorder.lock().unwrap().push(path.to_path_buf());
        Ok(())
    });

    let path = service.preview_receipt().unwrap();

    assert!(path.starts_with(dir.path()));
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("receipt-") && name.ends_with(".pdf"), "{}", name);

    let bytes = std::fs::read(&path).unwrap();
    assert!(!bytes.is_empty());
    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);

    assert_eq!(*opened.lock().unwrap(), vec![path]);
    assert!(backend.is_empty());
}

#[test]
fn test_preview_without_viewer() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServiceConfig {
        preview_dir: dir.path().to_path_buf(),
        open_preview: false,
        ..ServiceConfig::default()
    };
    let (service, _) = service(config);
    let service = service.with_opener(|_| panic!("viewer must not be launched"));

    let path = service.preview_receipt().unwrap();
    assert!(path.exists());
}

#[test]
fn test_preview_viewer_failure_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServiceConfig {
        preview_dir: dir.path().to_path_buf(),
        ..ServiceConfig::default()
    };
    let (service, _) = service(config);
    let service = service.with_opener(|_| {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no viewer"))
    });

    assert!(service.preview_receipt().is_err());
}

#[test]
fn test_preview_rejects_invalid_receipt() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServiceConfig {
        preview_dir: dir.path().to_path_buf(),
        ..ServiceConfig::default()
    };
    let (service, _) = service(config);
    let service = service.with_opener(|_| panic!("viewer must not be launched"));

    let overflow = Receipt {
        items: vec![LineItem::new("Caixa", 4_000_000_000, 9_000_000_000_000_000_000)],
        ..Receipt::demo()
    };
    assert!(matches!(service.preview(&overflow), Err(CupomError::Receipt(_))));

    let wide = Receipt {
        columns: 2_000_000_000,
        ..Receipt::demo()
    };
    assert!(matches!(service.preview(&wide), Err(CupomError::Receipt(_))));

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

//! # Cupom - Receipt Preview and Silent Printing
//!
//! Cupom takes the receipts a point-of-sale UI produces (a PDF or an image,
//! shipped as a base64 data URL) and prints them on a thermal roll or any
//! spooled printer without a dialog. It provides:
//!
//! - **Payload decoding**: data URLs and bare base64, PDF or image
//! - **Rendering**: PDF rasterization and a fixed-width content column
//! - **Page sizing**: pixel height to a physical page in micrometers
//! - **Backends**: raw StarPRNT devices and the system spooler
//! - **Previews**: receipt templates written as PDFs and opened locally
//!
//! ## Quick Start
//!
//! ```no_run
//! use cupom::{
//!     service::{PrintService, ServiceConfig},
//!     transport::SpoolerBackend,
//! };
//!
//! # async fn example() -> Result<(), cupom::CupomError> {
//! let service = PrintService::new(ServiceConfig::default(), SpoolerBackend::new());
//!
//! let report = service
//!     .print_payload("data:application/pdf;base64,JVBERi0xLjcK...")
//!     .await?;
//! println!("printed {} at {}", report.job_id, report.page_size);
//!
//! let preview = service.preview_receipt()?;
//! println!("preview at {}", preview.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`payload`] | Data URL decoding and content detection |
//! | [`render`] | Rasterization, readiness wait, dithering |
//! | [`printer`] | Geometry, print options, page size |
//! | [`protocol`] | StarPRNT command builders |
//! | [`transport`] | Print backends |
//! | [`receipt`] | Receipt template and PDF output |
//! | [`service`] | Print and preview operations |
//! | [`server`] | Local HTTP interface |
//! | [`error`] | Error types |

pub mod error;
pub mod payload;
pub mod printer;
pub mod protocol;
pub mod receipt;
pub mod render;
pub mod server;
pub mod service;
pub mod transport;

// Re-exports for convenience
pub use error::CupomError;
pub use printer::{PageSize, PrintOptions, PrinterGeometry};
pub use service::PrintService;

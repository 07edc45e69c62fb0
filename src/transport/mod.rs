//! # Print Backends
//!
//! A backend takes a finished [`PrintJob`] and gets it onto paper.
//!
//! ## Available Backends
//!
//! - [`device`]: Raw StarPRNT over a serial/USB/RFCOMM device file
//! - [`spooler`]: The system print spooler via `lp`
//! - [`recording`]: Keeps jobs in memory (dry runs and tests)

pub mod device;
pub mod recording;
pub mod spooler;

use image::GrayImage;
use uuid::Uuid;

use crate::error::CupomError;
use crate::printer::{PageSize, PrintOptions};

pub use device::DeviceBackend;
pub use recording::RecordingBackend;
pub use spooler::SpoolerBackend;

/// One rendered receipt ready for submission.
#[derive(Debug, Clone)]
pub struct PrintJob {
    pub id: Uuid,
    pub options: PrintOptions,
    pub page_size: PageSize,
    /// Content at the printer's dot width, white = paper
    pub image: GrayImage,
    /// Number of source pages the content was built from
    pub pages: usize,
}

impl PrintJob {
    pub fn new(options: PrintOptions, page_size: PageSize, image: GrayImage, pages: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            options,
            page_size,
            image,
            pages,
        }
    }
}

/// Something that can print a [`PrintJob`].
///
/// Submission is blocking; callers on an async runtime should run it on the
/// blocking pool.
pub trait PrintBackend: Send {
    /// Short name for logs and reports.
    fn name(&self) -> &'static str;

    /// Print the job. Exactly one physical job per successful call.
    fn submit(&mut self, job: &PrintJob) -> Result<(), CupomError>;
}

impl<B: PrintBackend + ?Sized> PrintBackend for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn submit(&mut self, job: &PrintJob) -> Result<(), CupomError> {
        (**self).submit(job)
    }
}

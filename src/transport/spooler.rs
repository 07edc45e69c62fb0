//! # System Spooler Backend
//!
//! Hands jobs to the system print service through CUPS' `lp` command. The
//! content is written as a PNG sized exactly to the computed page and
//! submitted with an explicit custom media size, so the spooler neither
//! scales nor paginates it.
//!
//! ```text
//! lp -s -d <printer> -t cupom-<id> \
//!    -o media=Custom.72x106mm \
//!    -o page-left=0 -o page-right=0 -o page-top=0 -o page-bottom=0 \
//!    -o scaling=100 /tmp/cupom-<id>.png
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;

use image::ImageFormat;

use crate::error::CupomError;
use crate::printer::MarginType;
use crate::render::dither;

use super::{PrintBackend, PrintJob};

/// Default spooler command
pub const DEFAULT_PROGRAM: &str = "lp";

/// Page margin in points used for [`MarginType::Minimum`].
const MINIMUM_MARGIN_PT: u32 = 4;

pub struct SpoolerBackend {
    program: String,
    spool_dir: PathBuf,
}

impl SpoolerBackend {
    pub fn new() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }

    /// Use a different `lp`-compatible command.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            spool_dir: std::env::temp_dir(),
        }
    }

    /// Directory where job images are staged before submission.
    pub fn spool_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.spool_dir = dir.into();
        self
    }

    fn stage(&self, job: &PrintJob) -> Result<PathBuf, CupomError> {
        let path = self.spool_dir.join(format!("cupom-{}.png", job.id));

        let mut image = job.image.clone();
        if !job.options.print_background {
            for pixel in image.pixels_mut() {
                if pixel[0] >= dither::BACKGROUND_CUTOFF {
                    pixel[0] = 255;
                }
            }
        }

        image.save_with_format(&path, ImageFormat::Png)?;
        Ok(path)
    }

    fn run(&self, job: &PrintJob, file: &Path) -> Result<(), CupomError> {
        let output = Command::new(&self.program)
            .args(lp_args(job))
            .arg(file)
            .output()
            .map_err(|e| CupomError::Spooler(format!("Failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CupomError::Spooler(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            log::info!("{}", stdout.trim());
        }
        Ok(())
    }
}

impl Default for SpoolerBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PrintBackend for SpoolerBackend {
    fn name(&self) -> &'static str {
        "spooler"
    }

    fn submit(&mut self, job: &PrintJob) -> Result<(), CupomError> {
        let file = self.stage(job)?;
        let result = self.run(job, &file);
        if let Err(e) = std::fs::remove_file(&file) {
            log::warn!("Could not remove spooled file {}: {}", file.display(), e);
        }
        result
    }
}

/// Build `lp` arguments (without the file) for a job.
pub fn lp_args(job: &PrintJob) -> Vec<String> {
    let options = &job.options;
    let mut args = Vec::new();

    if options.silent {
        args.push("-s".to_string());
    }
    if let Some(destination) = &options.destination {
        args.push("-d".to_string());
        args.push(destination.clone());
    }
    args.push("-t".to_string());
    args.push(format!("cupom-{}", job.id));

    let mut push_option = |value: String| {
        args.push("-o".to_string());
        args.push(value);
    };

    push_option(format!(
        "media=Custom.{}x{}mm",
        job.page_size.width_mm(),
        job.page_size.height_mm()
    ));

    let margin = match options.margins {
        MarginType::None => Some(0),
        MarginType::Minimum => Some(MINIMUM_MARGIN_PT),
        MarginType::Default => None,
    };
    if let Some(pt) = margin {
        for side in ["left", "right", "top", "bottom"] {
            push_option(format!("page-{}={}", side, pt));
        }
    }

    push_option("scaling=100".to_string());
    args
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::{PageSize, PrintOptions};
    use image::{GrayImage, Luma};
    use pretty_assertions::assert_eq;

    fn job(options: PrintOptions) -> PrintJob {
        PrintJob::new(
            options,
            PageSize {
                width_um: 72_000,
                height_um: 106_000,
            },
            GrayImage::from_pixel(576, 20, Luma([230])),
            1,
        )
    }

    #[test]
    fn test_lp_args_silent_no_margins() {
        let options = PrintOptions {
            destination: Some("Thermal_80".to_string()),
            ..PrintOptions::default()
        };
        let job = job(options);
        let title = format!("cupom-{}", job.id);

        assert_eq!(
            lp_args(&job),
            vec![
                "-s",
                "-d",
                "Thermal_80",
                "-t",
                title.as_str(),
                "-o",
                "media=Custom.72x106mm",
                "-o",
                "page-left=0",
                "-o",
                "page-right=0",
                "-o",
                "page-top=0",
                "-o",
                "page-bottom=0",
                "-o",
                "scaling=100",
            ]
        );
    }

    #[test]
    fn test_lp_args_default_margins_not_silent() {
        let options = PrintOptions {
            silent: false,
            margins: MarginType::Default,
            ..PrintOptions::default()
        };
        let args = lp_args(&job(options));
        assert!(!args.contains(&"-s".to_string()));
        assert!(!args.contains(&"-d".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("page-")));
    }

    #[test]
    fn test_submit_runs_program_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = SpoolerBackend::with_program("true").spool_dir(dir.path());
        backend.submit(&job(PrintOptions::default())).unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failing_spooler_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = SpoolerBackend::with_program("false").spool_dir(dir.path());
        let err = backend.submit(&job(PrintOptions::default())).unwrap_err();
        assert!(matches!(err, CupomError::Spooler(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_staged_background_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let backend = SpoolerBackend::new().spool_dir(dir.path());
        let options = PrintOptions {
            print_background: false,
            ..PrintOptions::default()
        };
        let path = backend.stage(&job(options)).unwrap();
        let staged = image::open(&path).unwrap().to_luma8();
        assert!(staged.pixels().all(|p| p[0] == 255));
    }
}

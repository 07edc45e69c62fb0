//! # Raw Device Backend
//!
//! Writes StarPRNT raster jobs straight to a printer device file such as
//! `/dev/rfcomm0`, `/dev/usb/lp0` or `/dev/ttyUSB0`.
//!
//! ## TTY Configuration
//!
//! When the device is a TTY it is switched to raw mode so binary raster data
//! passes through unmodified:
//!
//! - **No input processing**, including XON/XOFF flow control
//! - **No output processing**: OPOST off (no CR/LF translation)
//! - **8-bit characters**: CS8, no parity
//! - **Non-canonical, no echo**
//!
//! Plain files and non-TTY character devices are written as-is.
//!
//! ## Chunked Writes
//!
//! Large jobs are written in 4096-byte chunks with a short pause between
//! them so small printer buffers are not overrun.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::error::CupomError;
use crate::printer::PrinterGeometry;
use crate::protocol::job::{self, Cut};
use crate::render::dither::{self, Dithering};

use super::{PrintBackend, PrintJob};

/// Default device path
pub const DEFAULT_DEVICE: &str = "/dev/rfcomm0";

/// Default chunk size for writes (bytes)
const CHUNK_SIZE: usize = 4096;

/// Delay between chunks (milliseconds)
const CHUNK_DELAY_MS: u64 = 2;

/// # Raw Device Backend
///
/// ## Example
///
/// ```no_run
/// use cupom::printer::PrinterGeometry;
/// use cupom::transport::DeviceBackend;
///
/// let backend = DeviceBackend::new("/dev/usb/lp0", PrinterGeometry::THERMAL_80MM);
/// ```
pub struct DeviceBackend {
    path: PathBuf,
    geometry: PrinterGeometry,
    dithering: Dithering,
    cut: Cut,
    chunk_size: usize,
    chunk_delay: Duration,
}

impl DeviceBackend {
    pub fn new<P: AsRef<Path>>(path: P, geometry: PrinterGeometry) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            geometry,
            dithering: Dithering::default(),
            cut: Cut::Full,
            chunk_size: CHUNK_SIZE,
            chunk_delay: Duration::from_millis(CHUNK_DELAY_MS),
        }
    }

    pub fn with_dithering(mut self, dithering: Dithering) -> Self {
        self.dithering = dithering;
        self
    }

    pub fn with_cut(mut self, cut: Cut) -> Self {
        self.cut = cut;
        self
    }

    /// Set the delay between chunks. Default is 2ms.
    pub fn set_chunk_delay(&mut self, delay: Duration) {
        self.chunk_delay = delay;
    }

    /// Encode a job into the bytes that would be sent to the device.
    pub fn encode(&self, job: &PrintJob) -> Result<Vec<u8>, CupomError> {
        let raster = dither::to_raster(&job.image, self.dithering, job.options.print_background);
        job::encode(
            &raster,
            self.geometry.max_chunk_rows,
            self.geometry.safety_margin_mm,
            self.cut,
        )
    }

    fn open(&self) -> Result<File, CupomError> {
        let file = OpenOptions::new().write(true).open(&self.path).map_err(|e| {
            CupomError::Transport(format!("Failed to open {}: {}", self.path.display(), e))
        })?;

        let fd = file.as_raw_fd();
        // SAFETY: fd belongs to `file`, which is alive for this call.
        if unsafe { libc::isatty(fd) } == 1 {
            configure_tty_raw(fd)?;
        }

        Ok(file)
    }

    fn write_chunked(&self, file: &mut File, data: &[u8]) -> Result<(), CupomError> {
        for chunk in data.chunks(self.chunk_size.max(1)) {
            file.write_all(chunk)
                .map_err(|e| CupomError::Transport(format!("Write failed: {}", e)))?;

            if data.len() > self.chunk_size && !self.chunk_delay.is_zero() {
                thread::sleep(self.chunk_delay);
            }
        }

        file.flush()
            .map_err(|e| CupomError::Transport(format!("Flush failed: {}", e)))
    }
}

impl PrintBackend for DeviceBackend {
    fn name(&self) -> &'static str {
        "device"
    }

    fn submit(&mut self, job: &PrintJob) -> Result<(), CupomError> {
        let data = self.encode(job)?;
        let mut file = self.open()?;
        log::debug!(
            "Writing {} bytes for job {} to {}",
            data.len(),
            job.id,
            self.path.display()
        );
        self.write_chunked(&mut file, &data)
    }
}

/// Configure a file descriptor for raw TTY mode.
///
/// IXON/IXOFF/IXANY must be off: 0x11 and 0x13 appear in raster data.
fn configure_tty_raw(fd: i32) -> Result<(), CupomError> {
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    // SAFETY: tcgetattr fully initializes termios on success.
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(CupomError::Transport(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);
    termios.c_oflag &= !libc::OPOST;
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(CupomError::Transport(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

//! # Cupom CLI
//!
//! Command-line interface for receipt printing and previews.
//!
//! ## Usage
//!
//! ```bash
//! # Serve the local print API for the UI
//! cupom serve --backend spooler --destination Thermal_80
//!
//! # Print a PDF or image file
//! cupom print receipt.pdf
//!
//! # Print a data URL from stdin on a raw thermal device
//! echo "data:image/png;base64,..." | cupom --backend device --device /dev/usb/lp0 print -
//!
//! # Write and open the demo receipt
//! cupom preview
//! ```

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::{Parser, Subcommand, ValueEnum};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use cupom::{
    CupomError,
    printer::{MarginType, PrintOptions, PrinterGeometry},
    protocol::job::Cut,
    render::{Dithering, RasterizeOptions},
    server::{self, ServerConfig},
    service::{PrintService, ServiceConfig},
    transport::{DeviceBackend, PrintBackend, RecordingBackend, SpoolerBackend},
};

/// Cupom - receipt preview and silent printing
#[derive(Parser, Debug)]
#[command(name = "cupom")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Where jobs go
    #[arg(long, value_enum, default_value = "spooler", global = true)]
    backend: BackendKind,

    /// Spooler printer name (system default when omitted)
    #[arg(long, global = true)]
    destination: Option<String>,

    /// Device path for the raw device backend
    #[arg(long, default_value = cupom::transport::device::DEFAULT_DEVICE, global = true)]
    device: PathBuf,

    /// Paper roll width in millimeters
    #[arg(long, default_value = "80", global = true)]
    paper_mm: f32,

    /// Printable width in millimeters
    #[arg(long, default_value = "72", global = true)]
    width_mm: f32,

    /// Printer resolution in dots per inch
    #[arg(long, default_value = "203", global = true)]
    dpi: u16,

    /// Extra paper below the content in millimeters
    #[arg(long, default_value = "5", global = true)]
    safety_mm: f32,

    /// Longest content accepted for one job, in millimeters
    #[arg(long, default_value = "2000", global = true)]
    max_length_mm: f32,

    /// PDF render scale relative to 72 DPI
    #[arg(long, default_value = "4.0", global = true)]
    render_scale: f32,

    /// Readiness ceiling for rendering, in seconds
    #[arg(long, default_value = "10", global = true)]
    timeout_secs: u64,

    /// Drop light background tones
    #[arg(long, global = true)]
    no_background: bool,

    /// Margin handling: none, default or minimum
    #[arg(long, default_value = "none", global = true)]
    margins: MarginType,

    /// Dithering for the device backend: bayer or threshold
    #[arg(long, default_value = "bayer", global = true)]
    dither: Dithering,

    /// Partial instead of full cut (device backend)
    #[arg(long, global = true)]
    partial_cut: bool,

    /// Let the spooler report job ids
    #[arg(long, global = true)]
    verbose_spooler: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the local print API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = cupom::server::DEFAULT_LISTEN_ADDR)]
        listen: String,

        /// Do not open previews with the default viewer
        #[arg(long)]
        no_open: bool,
    },

    /// Print a PDF/image file, or a data URL read from stdin with `-`
    Print {
        input: String,
    },

    /// Write the demo receipt as a PDF and open it
    Preview {
        /// Only write the file
        #[arg(long)]
        no_open: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum BackendKind {
    /// System print spooler (lp)
    Spooler,
    /// Raw StarPRNT over a device file
    Device,
    /// Render and size the job without printing
    DryRun,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CupomError> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);

    let runtime = tokio::runtime::Runtime::new()?;

    match &cli.command {
        Commands::Serve { listen, no_open } => {
            let service = build_service(&cli, !no_open)?;
            let config = ServerConfig {
                listen_addr: listen.clone(),
            };
            runtime.block_on(server::serve(config, service))
        }
        Commands::Print { input } => {
            let payload = read_payload(input)?;
            let service = build_service(&cli, false)?;
            let report = runtime.block_on(service.print_payload(&payload))?;
            println!(
                "Printed job {} ({} page(s), {}) via {}",
                report.job_id, report.pages, report.page_size, report.backend
            );
            Ok(())
        }
        Commands::Preview { no_open } => {
            let service = build_service(&cli, !no_open)?;
            let path = service.preview_receipt()?;
            println!("Preview written to {}", path.display());
            Ok(())
        }
    }
}

fn build_service(cli: &Cli, open_preview: bool) -> Result<PrintService, CupomError> {
    let geometry = PrinterGeometry {
        paper_width_mm: cli.paper_mm,
        printable_width_mm: cli.width_mm,
        dpi: cli.dpi,
        safety_margin_mm: cli.safety_mm,
        max_length_mm: cli.max_length_mm,
        ..PrinterGeometry::default()
    };
    if geometry.dpi == 0 || geometry.width_dots() == 0 {
        return Err(CupomError::Transport(format!(
            "Invalid printable area: {}mm at {} DPI",
            cli.width_mm, cli.dpi
        )));
    }

    let config = ServiceConfig {
        geometry,
        options: PrintOptions {
            silent: !cli.verbose_spooler,
            print_background: !cli.no_background,
            margins: cli.margins,
            destination: cli.destination.clone(),
        },
        rasterize: RasterizeOptions {
            scale: cli.render_scale,
        },
        ready_timeout: Duration::from_secs(cli.timeout_secs),
        open_preview,
        ..ServiceConfig::default()
    };

    let backend: Box<dyn PrintBackend> = match cli.backend {
        BackendKind::Spooler => Box::new(SpoolerBackend::new()),
        BackendKind::Device => {
            let cut = if cli.partial_cut { Cut::Partial } else { Cut::Full };
            Box::new(
                DeviceBackend::new(&cli.device, geometry)
                    .with_dithering(cli.dither)
                    .with_cut(cut),
            )
        }
        BackendKind::DryRun => Box::new(RecordingBackend::new()),
    };

    Ok(PrintService::new(config, backend))
}

/// Read a payload argument: `-` for a data URL on stdin, otherwise a file.
///
/// Files that already hold a data URL are passed through; binary files are
/// base64-encoded.
fn read_payload(input: &str) -> Result<String, CupomError> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    let bytes = std::fs::read(input)?;
    if bytes.starts_with(b"data:") {
        return String::from_utf8(bytes)
            .map_err(|_| CupomError::Payload(format!("{} is not valid UTF-8", input)));
    }
    Ok(STANDARD.encode(bytes))
}

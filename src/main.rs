//! # Etiqueta CLI
//!
//! Command-line interface for label printing.
//!
//! ## Usage
//!
//! ```bash
//! # Start the designer API server
//! etiqueta serve --device file:///dev/usb/lp0 --model QL-800
//!
//! # Print a text label
//! etiqueta print --text "Hello" --font /usr/share/fonts/DejaVuSans.ttf
//!
//! # Print three copies, cutting only after the last
//! etiqueta print --text "Box 7" --font DejaVuSans.ttf --copies 3 --cut-once
//!
//! # Render a QR label to PNG without a printer
//! etiqueta preview --text "https://example.net" --qr --out label.png
//!
//! # List supported label media
//! etiqueta profiles
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use etiqueta::{
    EtiquetaError,
    fonts::FontCatalog,
    label::{
        CorrectionLevel, ForeColor, LabelContent, LabelSpec, Margins, Orientation, QrStyle,
        TextAlign, TextStyle,
    },
    layout::LayoutEngine,
    printer::{MediaProfile, PrintQueue, PrinterModel},
    server::{self, ServerConfig},
    transport::DeviceSpecifier,
};

/// Etiqueta - label printer utility
#[derive(Parser, Debug)]
#[command(name = "etiqueta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Shared label description flags for `print` and `preview`.
#[derive(Args, Debug)]
struct LabelArgs {
    /// Label text (or QR payload with --qr)
    #[arg(long)]
    text: String,

    /// Encode the text as a QR symbol instead of drawing it
    #[arg(long)]
    qr: bool,

    /// Label media id (see `etiqueta profiles`)
    #[arg(long, default_value = "62")]
    label_size: String,

    /// Label orientation: standard or rotated
    #[arg(long, default_value = "standard")]
    orientation: String,

    /// Path to a TTF/OTF font (required unless --qr)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Font size in pixels
    #[arg(long, default_value_t = 70)]
    font_size: u32,

    /// Line spacing percent (100 = single-spaced)
    #[arg(long, default_value_t = 100)]
    line_spacing: u32,

    /// Text alignment: left, center or right
    #[arg(long, default_value = "center")]
    align: String,

    /// Margins in dots
    #[arg(long, default_value_t = 20)]
    margin_left: u32,
    #[arg(long, default_value_t = 20)]
    margin_right: u32,
    #[arg(long, default_value_t = 12)]
    margin_top: u32,
    #[arg(long, default_value_t = 12)]
    margin_bottom: u32,

    /// Draw in red (two-color media only)
    #[arg(long)]
    red: bool,

    /// QR module size in dots
    #[arg(long, default_value_t = 10)]
    qr_size: u32,

    /// QR error correction level: L, M, Q or H
    #[arg(long, default_value = "L")]
    qr_correction: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the label designer API server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8013")]
        listen: String,

        /// Printer device (file:///dev/usb/lp0 or tcp://host[:port])
        #[arg(long, default_value = "file:///dev/usb/lp0")]
        device: String,

        /// Printer model name
        #[arg(long, default_value = "QL-700")]
        model: String,

        /// Default label media id
        #[arg(long, default_value = "62")]
        label_size: String,

        /// Font directories to scan (repeatable)
        #[arg(long = "font-dir", default_values = ["/usr/share/fonts", "/usr/local/share/fonts"])]
        font_dirs: Vec<PathBuf>,

        /// Default font family
        #[arg(long)]
        default_font: Option<String>,

        /// Device write timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
    },

    /// Print a label
    Print {
        #[command(flatten)]
        label: LabelArgs,

        /// Printer device
        #[arg(long, default_value = "file:///dev/usb/lp0")]
        device: String,

        /// Printer model name
        #[arg(long, default_value = "QL-700")]
        model: String,

        /// Number of copies
        #[arg(long, default_value_t = 1)]
        copies: u32,

        /// Cut only after the last copy
        #[arg(long)]
        cut_once: bool,

        /// Device write timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
    },

    /// Render a label preview to a PNG file
    Preview {
        #[command(flatten)]
        label: LabelArgs,

        /// Output file
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },

    /// List supported label media
    Profiles,
}

impl LabelArgs {
    fn to_spec(&self) -> Result<LabelSpec, EtiquetaError> {
        let media = MediaProfile::lookup(&self.label_size)?;
        let orientation = match self.orientation.as_str() {
            "rotated" => Orientation::Rotated,
            _ => Orientation::Standard,
        };
        let (width, height) = media.canvas_dots(orientation);

        let content = if self.qr {
            LabelContent::QrOnly(self.text.clone())
        } else {
            LabelContent::TextOnly(self.text.clone())
        };

        let mut text_style = TextStyle {
            size: self.font_size,
            line_spacing: self.line_spacing,
            align: match self.align.as_str() {
                "left" => TextAlign::Left,
                "right" => TextAlign::Right,
                _ => TextAlign::Center,
            },
            ..Default::default()
        };
        if !self.qr {
            text_style.font_path = self
                .font
                .clone()
                .ok_or_else(|| EtiquetaError::Config("--font is required for text labels".to_string()))?;
        }

        Ok(LabelSpec {
            width,
            height,
            content,
            orientation,
            kind: media.kind,
            margin: Margins::new(
                self.margin_left,
                self.margin_right,
                self.margin_top,
                self.margin_bottom,
            ),
            fore_color: if self.red {
                ForeColor::Red
            } else {
                ForeColor::Black
            },
            text_style,
            qr_style: QrStyle {
                module_size: self.qr_size,
                correction: CorrectionLevel::parse_lenient(&self.qr_correction),
            },
            image_fit: true,
        })
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), EtiquetaError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            listen,
            device,
            model,
            label_size,
            font_dirs,
            default_font,
            timeout_secs,
        } => {
            let config = ServerConfig {
                listen_addr: listen,
                device: DeviceSpecifier::parse(&device)?,
                model: PrinterModel::parse(&model)?,
                default_media: MediaProfile::lookup(&label_size)?,
                default_font_family: default_font,
                write_timeout: Duration::from_secs(timeout_secs),
            };
            let fonts = FontCatalog::scan(&font_dirs);
            if fonts.is_empty() {
                eprintln!("Warning: no fonts found; text labels will fail");
            }

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config, fonts))
        }

        Commands::Print {
            label,
            device,
            model,
            copies,
            cut_once,
            timeout_secs,
        } => {
            let spec = label.to_spec()?;
            let media = MediaProfile::lookup(&label.label_size)?;
            let engine = LayoutEngine::new();

            let mut queue = PrintQueue::new(PrinterModel::parse(&model)?, media);
            queue.enqueue(spec, copies, cut_once);

            let mut transport = DeviceSpecifier::parse(&device)?.open();
            let status = queue.flush(
                &engine,
                transport.as_mut(),
                Duration::from_secs(timeout_secs),
            )?;
            println!("Sent {} bytes to {}", status.bytes_written, device);
            Ok(())
        }

        Commands::Preview { label, out } => {
            let spec = label.to_spec()?;
            let engine = LayoutEngine::new();
            let bitmap = engine.generate(&spec, true)?;
            bitmap
                .save(&out)
                .map_err(|e| EtiquetaError::Render(format!("Failed to save {}: {}", out.display(), e)))?;
            println!("Wrote {} ({}x{})", out.display(), bitmap.width(), bitmap.height());
            Ok(())
        }

        Commands::Profiles => {
            println!("{:<10} {:<34} {:>12} {:>7}", "ID", "NAME", "PRINTABLE", "COLORS");
            for media in MediaProfile::all() {
                let dots = match media.dots_printable {
                    (w, 0) => format!("{} x cont.", w),
                    (w, l) => format!("{} x {}", w, l),
                };
                println!(
                    "{:<10} {:<34} {:>12} {:>7}",
                    media.id,
                    media.name,
                    dots,
                    if media.two_color { "bk/rd" } else { "bk" }
                );
            }
            Ok(())
        }
    }
}

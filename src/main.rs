use clap::{Args, Parser, Subcommand, ValueEnum};
use emvqr::application::engine::QrEngine;
use emvqr::application::session::QrSession;
use emvqr::domain::payload::{AdditionalData, AssemblerOptions, decode_payload};
use emvqr::domain::ports::{RenderOptions, Rgb};
use emvqr::error::RenderError;
use emvqr::infrastructure::svg::SvgRenderer;
use emvqr::infrastructure::terminal::TerminalRenderer;
use emvqr::interfaces::csv::merchant_reader::MerchantReader;
use emvqr::interfaces::csv::payload_writer::{PayloadRow, PayloadWriter};
use emvqr::interfaces::export::ImageExporter;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::{Level, error, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode merchant records from a CSV file into EMV payloads
    Encode {
        /// Input merchants CSV file
        input: PathBuf,

        /// Directory to write one SVG QR code per merchant into
        #[arg(long)]
        out_dir: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,

        #[command(flatten)]
        render: RenderArgs,
    },
    /// Verify a payload's checksum and print its fields as JSON
    Decode {
        /// The EMV payload string
        payload: String,
    },
    /// Print each merchant's payload followed by a QR code drawn in text
    Show {
        /// Input merchants CSV file
        input: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Draw dark modules as blocks (for light terminal backgrounds)
        #[arg(long)]
        no_invert: bool,
    },
}

#[derive(Args)]
struct LayoutArgs {
    /// How to fill the additional data field (tag 62)
    #[arg(long, value_enum, default_value_t = AdditionalDataArg::Placeholder)]
    additional_data: AdditionalDataArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum AdditionalDataArg {
    /// Subtags 01-09 carrying their own number
    Placeholder,
    /// Bill reference, terminal id and note from the record
    Record,
}

impl From<&LayoutArgs> for AssemblerOptions {
    fn from(args: &LayoutArgs) -> Self {
        let additional_data = match args.additional_data {
            AdditionalDataArg::Placeholder => AdditionalData::Placeholder,
            AdditionalDataArg::Record => AdditionalData::FromRecord,
        };
        Self { additional_data }
    }
}

#[derive(Args)]
struct RenderArgs {
    /// Image width in pixels
    #[arg(long, default_value_t = 400)]
    width: u32,

    /// Quiet zone in modules
    #[arg(long, default_value_t = 2)]
    margin: u32,

    /// Foreground color (#RRGGBB)
    #[arg(long, default_value = "#000000", value_parser = parse_color)]
    fg: Rgb,

    /// Background color (#RRGGBB)
    #[arg(long, default_value = "#FFFFFF", value_parser = parse_color)]
    bg: Rgb,
}

impl From<&RenderArgs> for RenderOptions {
    fn from(args: &RenderArgs) -> Self {
        Self {
            target_width: args.width,
            margin_modules: args.margin,
            foreground: args.fg,
            background: args.bg,
            ..Default::default()
        }
    }
}

fn parse_color(s: &str) -> std::result::Result<Rgb, RenderError> {
    s.parse()
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

async fn encode(input: PathBuf, out_dir: Option<PathBuf>, layout: LayoutArgs, render: RenderArgs) -> Result<()> {
    let engine = QrEngine::new(Box::new(SvgRenderer::new()), (&layout).into(), (&render).into());

    let mut exporter = out_dir
        .map(|dir| ImageExporter::create(dir, "svg"))
        .transpose()
        .into_diagnostic()?;

    let file = File::open(input).into_diagnostic()?;
    let reader = MerchantReader::new(file);
    let stdout = io::stdout();
    let mut writer = PayloadWriter::new(stdout.lock());

    for (index, result) in reader.records().enumerate() {
        let row = index + 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                error!("Error reading merchant record {row}: {e}");
                continue;
            }
        };

        let payload = match &mut exporter {
            None => engine.encode(&record),
            Some(exporter) => match engine.generate(&record).await {
                Ok(generated) => {
                    match &generated.image {
                        Ok(image) => {
                            if let Err(e) = exporter.export(row, &record, image) {
                                error!("{e}");
                            }
                        }
                        Err(e) => warn!("No QR image for merchant record {row}: {e}"),
                    }
                    Ok(generated.payload)
                }
                Err(e) => Err(e),
            },
        };

        match payload {
            Ok(payload) => writer
                .write(&PayloadRow {
                    merchant_name: &record.merchant_name,
                    payload: &payload,
                })
                .into_diagnostic()?,
            Err(e) => error!("Error encoding merchant record {row}: {e}"),
        }
    }

    writer.flush().into_diagnostic()?;
    Ok(())
}

fn decode(payload: &str) -> Result<()> {
    let decoded = decode_payload(payload).into_diagnostic()?;
    let merchant_guid = decoded.merchant_guid().into_diagnostic()?;
    let out = serde_json::json!({
        "merchant_guid": merchant_guid,
        "checksum": decoded.checksum,
        "fields": decoded.fields,
    });
    println!("{}", serde_json::to_string_pretty(&out).into_diagnostic()?);
    Ok(())
}

async fn show(input: PathBuf, layout: LayoutArgs, no_invert: bool) -> Result<()> {
    let engine = QrEngine::new(
        Box::new(TerminalRenderer::new(!no_invert)),
        (&layout).into(),
        RenderOptions::default(),
    );
    let session = QrSession::new(engine);

    let file = File::open(input).into_diagnostic()?;
    for (index, result) in MerchantReader::new(file).records().enumerate() {
        let row = index + 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                error!("Error reading merchant record {row}: {e}");
                continue;
            }
        };
        if let Err(e) = session.update(&record).await {
            error!("Error encoding merchant record {row}: {e}");
            continue;
        }

        let state = session.current().await;
        println!("{}", state.payload.unwrap_or_default());
        match (state.image, state.render_error) {
            (Some(image), _) => println!("{}", image.data),
            (None, Some(e)) => warn!("No QR image for merchant record {row}: {e}"),
            (None, None) => {}
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Encode {
            input,
            out_dir,
            layout,
            render,
        } => encode(input, out_dir, layout, render).await,
        Command::Decode { payload } => decode(&payload),
        Command::Show {
            input,
            layout,
            no_invert,
        } => show(input, layout, no_invert).await,
    }
}

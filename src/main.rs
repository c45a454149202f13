use anyhow::{Context, Result};
use cfnf_decoder::sink::output_dir_for;
use cfnf_decoder::{with_capture, CaptureConverter, CaptureDecoder, DecodeOptions};
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use polars::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Decoder for critical-FPGA telemetry captures
///
/// Without a subcommand, `-i FILE` decodes the capture as `decode -i FILE` does.
#[derive(Parser)]
#[command(name = "cfnf-decoder")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Log per-frame details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    target: DecodeTarget,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a capture into one file per field plus an aggregated log
    Decode {
        #[command(flatten)]
        target: DecodeTarget,
    },

    /// Show frame statistics for a capture without writing any file
    Info {
        /// Input capture file
        #[arg(short = 'i', long = "ifile", value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        decode: DecodeArgs,
    },

    /// Export decoded frames as a table
    Export {
        /// Input capture file
        #[arg(short = 'i', long = "ifile", value_name = "FILE")]
        input: PathBuf,

        /// Output file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Output format (auto-detected from extension if not specified)
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,

        #[command(flatten)]
        decode: DecodeArgs,
    },
}

#[derive(Args, Debug, Clone)]
struct DecodeTarget {
    /// Input capture file
    #[arg(short = 'i', long = "ifile", value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory (default: input path without its extension)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    #[command(flatten)]
    decode: DecodeArgs,
}

#[derive(Args, Debug, Clone, Copy)]
struct DecodeArgs {
    /// Abort on the first frame that fails to decode
    #[arg(long)]
    strict: bool,

    /// Remove line breaks from the capture before splitting it into frames
    #[arg(long)]
    strip_line_breaks: bool,
}

impl From<DecodeArgs> for DecodeOptions {
    fn from(args: DecodeArgs) -> Self {
        DecodeOptions {
            strict: args.strict,
            strip_line_breaks: args.strip_line_breaks,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum ExportFormat {
    Csv,
    Parquet,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        None => decode_command(cli.target)?,

        Some(Commands::Decode { target }) => decode_command(target)?,

        Some(Commands::Info { input, decode }) => info_command(input, decode.into())?,

        Some(Commands::Export {
            input,
            output,
            format,
            decode,
        }) => export_command(input, output, format, decode.into())?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Best-effort; a subscriber may already be installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn decode_command(target: DecodeTarget) -> Result<()> {
    let Some(input) = target.input else {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "the input capture is required: -i/--ifile <FILE>",
            )
            .exit();
    };
    let options = DecodeOptions::from(target.decode);
    let out_dir = target.output.unwrap_or_else(|| output_dir_for(&input));
    println!("Decoding {} into {}/...", input.display(), out_dir.display());

    let start = Instant::now();
    let stats = CaptureDecoder::decode_to_dir(&input, &out_dir, &options)
        .with_context(|| format!("Failed to decode capture: {}", input.display()))?;

    println!(
        "Decoded {} frames ({:.3}s)",
        stats.accepted,
        start.elapsed().as_secs_f64()
    );
    if stats.dropped() > 0 {
        println!(
            "Dropped {} segments: {} with unexpected length, {} undecodable",
            stats.dropped(),
            stats.rejected_length,
            stats.failed_decode
        );
    }

    Ok(())
}

fn info_command(input: PathBuf, options: DecodeOptions) -> Result<()> {
    println!("Analyzing {}...\n", input.display());

    let file_size = std::fs::metadata(&input)
        .with_context(|| format!("Cannot read capture: {}", input.display()))?
        .len();
    let stats = with_capture(&input, |data| CaptureConverter::scan(data, &options))
        .with_context(|| format!("Failed to decode capture: {}", input.display()))?;

    println!("File Information:");
    println!("  Path:            {}", input.display());
    println!("  Size:            {} bytes", file_size);
    println!("\nFrame Information:");
    println!("  Segments:        {}", stats.segments);
    println!("  Empty:           {}", stats.empty);
    println!("  Decoded:         {}", stats.accepted);
    println!("  Wrong length:    {}", stats.rejected_length);
    println!("  Undecodable:     {}", stats.failed_decode);

    Ok(())
}

fn export_command(
    input: PathBuf,
    output: PathBuf,
    format: Option<ExportFormat>,
    options: DecodeOptions,
) -> Result<()> {
    println!("Exporting {} to {}...", input.display(), output.display());

    let out_format = if let Some(f) = format {
        f
    } else {
        match output.extension().and_then(|s| s.to_str()) {
            Some("csv") => ExportFormat::Csv,
            Some("parquet") => ExportFormat::Parquet,
            _ => anyhow::bail!(
                "Cannot determine output format from extension. Use --format to specify."
            ),
        }
    };

    let mut df = CaptureDecoder::to_dataframe(&input, &options)
        .with_context(|| format!("Failed to decode capture: {}", input.display()))?;
    println!("Decoded {} frames into {} columns", df.height(), df.width());

    let file = std::fs::File::create(&output)
        .with_context(|| format!("Cannot create {}", output.display()))?;
    match out_format {
        ExportFormat::Csv => {
            let mut file = file;
            CsvWriter::new(&mut file).finish(&mut df)?;
            println!("Exported to CSV: {}", output.display());
        }
        ExportFormat::Parquet => {
            ParquetWriter::new(file).finish(&mut df)?;
            println!("Exported to Parquet: {}", output.display());
        }
    }

    Ok(())
}

//! linecast CLI
//!
//! Encode a file into erasure-coded transport lines and decode a
//! packet-list file back into the original bytes.

mod config;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use config::Config;
use linecast_core::{
    CodingParameters, DecodeError, DecodePipeline, EncodeError, EncodePipeline, PlanError,
    StreamHeader, TaggingMode,
};
use linecast_engine::{RaptorqCatalog, RaptorqDecoder, RaptorqEncoder};

// Fatal failure classes map to distinct exit codes; everything else
// (usage, file I/O) exits 1.
const EXIT_PLAN: u8 = 2;
const EXIT_INSUFFICIENT: u8 = 3;
const EXIT_ENGINE: u8 = 4;
const EXIT_LENGTH: u8 = 5;

/// linecast - erasure-coded file transfer as text lines
#[derive(Parser)]
#[command(name = "linecast")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a file into a packet-list text file
    Encode {
        /// File to encode
        input: PathBuf,

        /// Output packet-list file
        #[arg(short, long)]
        out: PathBuf,

        /// Strip the per-packet identifier (positional mode)
        #[arg(long)]
        untagged: bool,

        /// Symbol size in bytes
        #[arg(long)]
        symbol_size: Option<u16>,

        /// Repair overhead in basis points (1000 = 10%)
        #[arg(long)]
        overhead_bps: Option<u16>,

        /// Write the legacy headerless stream
        #[arg(long)]
        bare: bool,
    },

    /// Decode a packet-list text file back into the original bytes
    Decode {
        /// Packet-list file to decode
        input: PathBuf,

        /// Output file for the restored bytes
        #[arg(short, long)]
        out: PathBuf,

        /// Packets carry no identifier (positional mode)
        #[arg(long)]
        untagged: bool,

        /// Symbol size in bytes (bare streams only)
        #[arg(long)]
        symbol_size: Option<u16>,

        /// Repair overhead in basis points (bare streams only)
        #[arg(long)]
        overhead_bps: Option<u16>,

        /// Treat the input as headerless; requires --length
        #[arg(long)]
        bare: bool,

        /// Original byte length (bare streams only)
        #[arg(long)]
        length: Option<u64>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose { "debug" } else { "info" })
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.validate()?;

    match cli.command {
        Commands::Encode {
            input,
            out,
            untagged,
            symbol_size,
            overhead_bps,
            bare,
        } => encode_file(
            &input,
            &out,
            tagging(untagged || config.framing.untagged),
            symbol_size.unwrap_or(config.coding.symbol_size),
            overhead_bps.unwrap_or(config.coding.overhead_bps),
            bare || config.framing.bare,
        ),
        Commands::Decode {
            input,
            out,
            untagged,
            symbol_size,
            overhead_bps,
            bare,
            length,
        } => decode_file(
            &input,
            &out,
            tagging(untagged || config.framing.untagged),
            symbol_size.unwrap_or(config.coding.symbol_size),
            overhead_bps.unwrap_or(config.coding.overhead_bps),
            bare || config.framing.bare,
            length,
        ),
    }
}

fn tagging(untagged: bool) -> TaggingMode {
    if untagged {
        TaggingMode::Untagged
    } else {
        TaggingMode::Tagged
    }
}

/// Encode `input` into one packet line per symbol.
fn encode_file(
    input: &PathBuf,
    out: &PathBuf,
    mode: TaggingMode,
    symbol_size: u16,
    overhead_bps: u16,
    bare: bool,
) -> anyhow::Result<()> {
    let data =
        fs::read(input).with_context(|| format!("cannot open source file {}", input.display()))?;

    let params =
        CodingParameters::plan(data.len() as u64, symbol_size, overhead_bps, &RaptorqCatalog)
            .map_err(EncodeError::Plan)?;
    tracing::info!(
        bytes = data.len(),
        min_symbols = params.min_symbols(),
        block_size = params.block_size,
        repair = params.repair_count,
        "planned block"
    );

    let mut engine = RaptorqEncoder::new(&params, &data).map_err(EncodeError::Engine)?;
    let pipeline = EncodePipeline {
        params,
        mode,
        write_header: !bare,
    };

    let file =
        File::create(out).with_context(|| format!("cannot create output {}", out.display()))?;
    let mut writer = BufWriter::new(file);
    let report = pipeline.run(&mut engine, &mut writer)?;

    tracing::info!(
        lines = report.lines_written,
        path = %out.display(),
        "packet list saved"
    );
    Ok(())
}

/// Decode a packet-list file; the output is written only after a fully
/// successful reconstruction.
fn decode_file(
    input: &PathBuf,
    out: &PathBuf,
    mode: TaggingMode,
    symbol_size: u16,
    overhead_bps: u16,
    bare: bool,
    length: Option<u64>,
) -> anyhow::Result<()> {
    let file =
        File::open(input).with_context(|| format!("cannot open input file {}", input.display()))?;
    let mut reader = BufReader::new(file);

    // Header streams carry their own parameters; bare streams fall back
    // to the out-of-band values, recomputing the block size the same way
    // the encoder did.
    let (params, mode) = if bare {
        let length = length.context("--length is required for a bare stream")?;
        let params = CodingParameters::plan(length, symbol_size, overhead_bps, &RaptorqCatalog)
            .map_err(DecodeError::Plan)?;
        (params, mode)
    } else {
        let header = StreamHeader::read_line(&mut reader)?;
        let params = CodingParameters::plan(
            header.source_len,
            header.symbol_size,
            header.overhead_bps,
            &RaptorqCatalog,
        )
        .map_err(DecodeError::Plan)?;
        (params, header.tagging)
    };
    tracing::info!(
        source_len = params.source_len,
        block_size = params.block_size,
        "expecting block"
    );

    let mut engine = RaptorqDecoder::new(&params);
    let pipeline = DecodePipeline { params, mode };
    let output = pipeline.run(&mut engine, reader)?;

    fs::write(out, &output.data)
        .with_context(|| format!("cannot write output {}", out.display()))?;
    tracing::info!(
        bytes = output.data.len(),
        valid = output.report.accepted,
        path = %out.display(),
        "restored"
    );
    Ok(())
}

fn exit_code(err: &anyhow::Error) -> u8 {
    if let Some(decode) = err.downcast_ref::<DecodeError>() {
        return match decode {
            DecodeError::Plan(_) | DecodeError::Header(_) | DecodeError::MissingHeader => EXIT_PLAN,
            DecodeError::InsufficientSymbols { .. } => EXIT_INSUFFICIENT,
            DecodeError::Engine(_) => EXIT_ENGINE,
            DecodeError::LengthMismatch { .. } => EXIT_LENGTH,
            DecodeError::Io(_) => 1,
        };
    }
    if let Some(encode) = err.downcast_ref::<EncodeError>() {
        return match encode {
            EncodeError::Plan(_) => EXIT_PLAN,
            EncodeError::Engine(_) => EXIT_ENGINE,
            EncodeError::Io(_) => 1,
        };
    }
    if err.downcast_ref::<PlanError>().is_some() {
        return EXIT_PLAN;
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 31 % 253) as u8).collect()
    }

    #[test]
    fn encode_decode_roundtrip_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("input.bin");
        let packets = dir.path().join("packets.txt");
        let restored = dir.path().join("restored.bin");

        let data = sample(660);
        fs::write(&src, &data).unwrap();

        encode_file(&src, &packets, TaggingMode::Tagged, 32, 1000, false).unwrap();
        decode_file(&packets, &restored, TaggingMode::Tagged, 32, 1000, false, None).unwrap();

        assert_eq!(fs::read(&restored).unwrap(), data);
    }

    #[test]
    fn encode_decode_roundtrip_bare_untagged() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("input.bin");
        let packets = dir.path().join("packets.txt");
        let restored = dir.path().join("restored.bin");

        let data = sample(660);
        fs::write(&src, &data).unwrap();

        encode_file(&src, &packets, TaggingMode::Untagged, 32, 1000, true).unwrap();
        decode_file(
            &packets,
            &restored,
            TaggingMode::Untagged,
            32,
            1000,
            true,
            Some(660),
        )
        .unwrap();

        assert_eq!(fs::read(&restored).unwrap(), data);
    }

    #[test]
    fn bare_decode_requires_length() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("input.bin");
        let packets = dir.path().join("packets.txt");
        let restored = dir.path().join("restored.bin");

        fs::write(&src, sample(100)).unwrap();
        encode_file(&src, &packets, TaggingMode::Tagged, 32, 1000, true).unwrap();

        let err = decode_file(
            &packets,
            &restored,
            TaggingMode::Tagged,
            32,
            1000,
            true,
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("--length"));
        assert!(!restored.exists());
    }

    #[test]
    fn failed_decode_writes_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let packets = dir.path().join("packets.txt");
        let restored = dir.path().join("restored.bin");

        // Too few packet lines for the claimed length.
        fs::write(&packets, "").unwrap();
        let err = decode_file(
            &packets,
            &restored,
            TaggingMode::Tagged,
            32,
            1000,
            true,
            Some(660),
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DecodeError>(),
            Some(DecodeError::InsufficientSymbols { .. })
        ));
        assert!(!restored.exists());
    }

    #[test]
    fn exit_codes_by_failure_class() {
        let err = anyhow::Error::new(DecodeError::InsufficientSymbols {
            valid: 25,
            required: 26,
        });
        assert_eq!(exit_code(&err), EXIT_INSUFFICIENT);

        let err = anyhow::Error::new(DecodeError::LengthMismatch {
            written: 655,
            expected: 660,
        });
        assert_eq!(exit_code(&err), EXIT_LENGTH);

        let err = anyhow::Error::new(PlanError::ZeroSymbolSize);
        assert_eq!(exit_code(&err), EXIT_PLAN);

        let err = anyhow::anyhow!("anything else");
        assert_eq!(exit_code(&err), 1);
    }
}

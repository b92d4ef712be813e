//! Decode pipeline: parse transport lines, validate packets, feed the
//! engine and reassemble the original bytes.
//!
//! Per-line problems are logged with their 1-based line number and
//! skipped; the read loop stops early the moment the engine reports
//! readiness, so trailing lines may never be touched.

use std::io::BufRead;

use tracing::{debug, info, trace, warn};

use crate::engine::{IngestOutcome, ReceivedSymbol, SymbolDecoder};
use crate::error::DecodeError;
use crate::line;
use crate::packet::{Packet, SymbolId, TaggingMode};
use crate::plan::CodingParameters;

/// Classifies raw packet bytes into validated symbols.
#[derive(Debug, Clone, Copy)]
pub struct PacketValidator {
    mode: TaggingMode,
    symbol_size: u16,
}

impl PacketValidator {
    /// Validator for the given mode and symbol size.
    pub fn new(mode: TaggingMode, symbol_size: u16) -> Self {
        Self { mode, symbol_size }
    }

    /// Classify one parsed line. `line_number` is 1-based over packet
    /// lines; in untagged mode it doubles as the identifier source
    /// (`line_number - 1`).
    ///
    /// Returns `None` for a size mismatch, which is reported and skipped.
    pub fn validate(&self, raw: &[u8], line_number: u64) -> Option<ReceivedSymbol> {
        let Some(packet) = Packet::from_bytes(self.mode, self.symbol_size, raw) else {
            warn!(
                line = line_number,
                size = raw.len(),
                expected = self.mode.packet_len(self.symbol_size),
                "unexpected packet size, ignoring line"
            );
            return None;
        };

        match packet {
            Packet::Tagged { id, payload } => Some(ReceivedSymbol { id, payload }),
            Packet::Untagged { payload } => {
                // Positional identifier: correct only while the channel
                // preserves order with at most trailing loss.
                let id = SymbolId::try_from(line_number - 1).ok()?;
                Some(ReceivedSymbol { id, payload })
            }
        }
    }
}

/// Feeds validated symbols to the engine and tracks progress.
pub struct SymbolIngester<'a, D: SymbolDecoder> {
    engine: &'a mut D,
    accepted: u32,
    redundant: u32,
    rejected: u32,
}

impl<'a, D: SymbolDecoder> SymbolIngester<'a, D> {
    /// Ingester submitting into `engine`.
    pub fn new(engine: &'a mut D) -> Self {
        Self {
            engine,
            accepted: 0,
            redundant: 0,
            rejected: 0,
        }
    }

    /// Submit one symbol; returns `true` once the engine is ready and
    /// ingestion should stop.
    pub fn ingest(&mut self, symbol: ReceivedSymbol, line_number: u64) -> bool {
        let id = symbol.id;
        match self.engine.add_symbol(symbol) {
            IngestOutcome::Accepted => {
                self.accepted += 1;
                trace!(line = line_number, id, valid = self.accepted, "symbol accepted");
                if self.engine.is_ready() {
                    debug!(valid = self.accepted, "engine ready, stopping ingestion");
                    return true;
                }
            }
            IngestOutcome::Redundant => {
                self.redundant += 1;
            }
            IngestOutcome::Rejected => {
                self.rejected += 1;
                warn!(line = line_number, id, "engine rejected symbol");
            }
        }
        false
    }

    /// Symbols the engine accepted so far.
    pub fn accepted(&self) -> u32 {
        self.accepted
    }
}

/// Extracts the original bytes once ingestion has stopped.
pub struct Reassembler;

impl Reassembler {
    /// Run the engine's decode and cut the output to the source length.
    ///
    /// # Errors
    ///
    /// [`DecodeError::InsufficientSymbols`] when the engine never became
    /// ready, [`DecodeError::Engine`] when its decode step fails, and
    /// [`DecodeError::LengthMismatch`] when it reconstructs fewer bytes
    /// than the source length - nothing is emitted in any failure case.
    pub fn reassemble<D: SymbolDecoder>(
        engine: &mut D,
        params: &CodingParameters,
        valid: u32,
    ) -> Result<Vec<u8>, DecodeError> {
        if !engine.is_ready() {
            return Err(DecodeError::InsufficientSymbols {
                valid,
                required: params.block_size,
            });
        }

        let mut block = engine.finish()?;

        let expected = params.source_len;
        let written = block.len() as u64;
        if written < expected {
            return Err(DecodeError::LengthMismatch { written, expected });
        }

        // The engine decodes whole symbols; drop the block padding.
        block.truncate(expected as usize);
        Ok(block)
    }
}

/// Counters for one decode run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// Packet lines read before ingestion stopped.
    pub lines_read: u64,
    /// Symbols the engine accepted.
    pub accepted: u32,
    /// Symbols the engine already had.
    pub redundant: u32,
    /// Symbols the engine rejected.
    pub rejected: u32,
    /// Lines skipped for transport or size problems.
    pub skipped: u64,
}

/// The reconstructed stream plus its run counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedOutput {
    /// Exactly `source_len` reconstructed bytes.
    pub data: Vec<u8>,
    /// Run counters.
    pub report: DecodeReport,
}

/// One-shot decode run over a line stream.
#[derive(Debug, Clone, Copy)]
pub struct DecodePipeline {
    /// The planned coding parameters (recomputed or taken from a header).
    pub params: CodingParameters,
    /// Tagging mode of the packet lines.
    pub mode: TaggingMode,
}

impl DecodePipeline {
    /// Read packet lines from `input`, stop as soon as the engine is
    /// ready, and reassemble the original bytes.
    ///
    /// A header line, if any, must have been consumed already: every line
    /// seen here counts as a packet line.
    ///
    /// # Errors
    ///
    /// Fatal kinds only; corrupt or wrong-sized lines are skipped.
    pub fn run<D: SymbolDecoder, R: BufRead>(
        &self,
        engine: &mut D,
        input: R,
    ) -> Result<DecodedOutput, DecodeError> {
        let validator = PacketValidator::new(self.mode, self.params.symbol_size);
        let mut ingester = SymbolIngester::new(engine);
        let mut report = DecodeReport::default();

        for (index, read) in input.lines().enumerate() {
            let line_number = index as u64 + 1;
            let text = read?;
            report.lines_read = line_number;

            let raw = match line::parse(&text) {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(line = line_number, %err, "transport decode failed, ignoring line");
                    report.skipped += 1;
                    continue;
                }
            };

            let Some(symbol) = validator.validate(&raw, line_number) else {
                report.skipped += 1;
                continue;
            };

            if ingester.ingest(symbol, line_number) {
                break;
            }
        }

        report.accepted = ingester.accepted;
        report.redundant = ingester.redundant;
        report.rejected = ingester.rejected;

        let valid = report.accepted;
        let data = Reassembler::reassemble(engine, &self.params, valid)?;

        info!(
            valid,
            skipped = report.skipped,
            bytes = data.len(),
            "decoded block"
        );

        Ok(DecodedOutput { data, report })
    }
}

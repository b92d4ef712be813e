//! Encode pipeline: frame every symbol of the block and serialize each
//! one as a transport line.

use std::io::Write;

use tracing::{debug, info};

use crate::engine::SymbolEncoder;
use crate::error::{EncodeError, EngineError};
use crate::header::StreamHeader;
use crate::line;
use crate::packet::{Packet, TaggingMode};
use crate::plan::CodingParameters;

/// Produces the block's packets in generation order: all source symbols,
/// then all repair symbols, exactly as the engine yields them.
pub struct SymbolFramer<'a, E: SymbolEncoder> {
    engine: &'a mut E,
    mode: TaggingMode,
    remaining_source: u32,
    remaining_repair: u32,
}

impl<'a, E: SymbolEncoder> SymbolFramer<'a, E> {
    /// Frame the block described by `params` under the given tagging mode.
    pub fn new(engine: &'a mut E, params: &CodingParameters, mode: TaggingMode) -> Self {
        Self {
            engine,
            mode,
            remaining_source: params.block_size,
            remaining_repair: params.repair_count,
        }
    }

    /// Next packet, or `None` once the block is fully framed.
    ///
    /// # Errors
    ///
    /// Propagates the engine's error if it cannot yield a symbol.
    pub fn next_packet(&mut self) -> Option<Result<Packet, EngineError>> {
        let symbol = if self.remaining_source > 0 {
            self.remaining_source -= 1;
            self.engine.next_source()
        } else if self.remaining_repair > 0 {
            self.remaining_repair -= 1;
            self.engine.next_repair()
        } else {
            return None;
        };

        Some(symbol.map(|s| Packet::from_symbol(self.mode, s.id, s.payload)))
    }
}

impl<E: SymbolEncoder> Iterator for SymbolFramer<'_, E> {
    type Item = Result<Packet, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_packet()
    }
}

/// Summary of one encode run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeReport {
    /// Source packets written.
    pub source_packets: u32,
    /// Repair packets written.
    pub repair_packets: u32,
    /// Total lines written, the header included when one was sent.
    pub lines_written: u64,
}

/// One-shot encode run over a planned block.
#[derive(Debug, Clone, Copy)]
pub struct EncodePipeline {
    /// The planned coding parameters.
    pub params: CodingParameters,
    /// Tagging mode for the packet lines.
    pub mode: TaggingMode,
    /// Whether to prepend the in-band parameter header.
    pub write_header: bool,
}

impl EncodePipeline {
    /// Frame the whole block through `engine` and write one line per
    /// packet to `out`.
    ///
    /// # Errors
    ///
    /// Fatal on engine failure or I/O failure; there are no recoverable
    /// conditions on the encode side.
    pub fn run<E: SymbolEncoder, W: Write>(
        &self,
        engine: &mut E,
        out: &mut W,
    ) -> Result<EncodeReport, EncodeError> {
        let params = &self.params;
        debug!(
            block_size = params.block_size,
            repair_count = params.repair_count,
            symbol_size = params.symbol_size,
            "planned block"
        );

        let mut lines_written = 0u64;

        if self.write_header {
            StreamHeader::new(params, self.mode).write_line(out)?;
            lines_written += 1;
        }

        let mut framer = SymbolFramer::new(engine, params, self.mode);
        while let Some(packet) = framer.next_packet() {
            let packet = packet?;
            writeln!(out, "{}", line::serialize(&packet.to_bytes()))?;
            lines_written += 1;
        }
        out.flush()?;

        info!(
            source = params.block_size,
            repair = params.repair_count,
            lines = lines_written,
            "encoded block"
        );

        Ok(EncodeReport {
            source_packets: params.block_size,
            repair_packets: params.repair_count,
            lines_written,
        })
    }
}

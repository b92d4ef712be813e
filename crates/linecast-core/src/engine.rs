//! The coding-engine seam.
//!
//! The erasure code is an external collaborator. These traits describe
//! exactly the capabilities the framing core needs from it and nothing
//! more: symbol generation in order on the send side, accumulation with a
//! readiness predicate and a blocking decode on the receive side.

use crate::error::EngineError;
use crate::packet::SymbolId;

/// One encoding symbol as the engine yields it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSymbol {
    /// Encoding symbol identifier, assigned by the engine.
    pub id: SymbolId,
    /// Symbol payload, exactly the session's symbol size.
    pub payload: Vec<u8>,
}

/// A validated symbol handed over to the engine.
///
/// Ownership transfers to the engine once accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedSymbol {
    /// Encoding symbol identifier, explicit or assumed from position.
    pub id: SymbolId,
    /// Symbol payload.
    pub payload: Vec<u8>,
}

/// Engine verdict for one submitted symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// New information, counted toward readiness.
    Accepted,
    /// The engine already has what this identifier contributes.
    Redundant,
    /// Identifier or size inconsistent with the engine's state.
    Rejected,
}

/// Encode-side engine for one precomputed block.
///
/// Implementations perform the synchronous compute step at construction
/// and then serve symbols in generation order: the framer pulls
/// `block_size` source symbols followed by `repair_count` repair symbols,
/// and untagged transport depends on that order reaching the wire intact.
pub trait SymbolEncoder {
    /// Next source symbol in generation order.
    ///
    /// # Errors
    ///
    /// [`EngineError::SymbolsExhausted`] once all source symbols were taken.
    fn next_source(&mut self) -> Result<EncodedSymbol, EngineError>;

    /// Next repair symbol in generation order.
    ///
    /// # Errors
    ///
    /// [`EngineError::SymbolsExhausted`] once all repair symbols were taken.
    fn next_repair(&mut self) -> Result<EncodedSymbol, EngineError>;
}

/// Decode-side engine accumulating symbols for one block.
pub trait SymbolDecoder {
    /// Submit one validated symbol.
    fn add_symbol(&mut self, symbol: ReceivedSymbol) -> IngestOutcome;

    /// True once enough distinct symbols were accepted to guarantee a
    /// successful decode.
    fn is_ready(&self) -> bool;

    /// Signal end of input (missing tail data is not zero-filled) and run
    /// the blocking decode, returning the reconstructed block bytes.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotReady`] when called before [`Self::is_ready`],
    /// [`EngineError::DecodeFailed`] when the engine's compute step fails.
    fn finish(&mut self) -> Result<Vec<u8>, EngineError>;
}

//! Error types for the linecast framing core.
//!
//! Per-line problems (a corrupt line, a wrong-sized packet, an engine
//! rejection) are warnings logged with their 1-based line number and never
//! abort a run; only the fatal kinds below stop a pipeline.

use thiserror::Error;

/// Block planning errors. Fatal, raised before any I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlanError {
    /// No catalog entry can cover the source data.
    #[error("no supported block size covers {min_symbols} symbols (largest is {largest})")]
    CatalogExhausted {
        /// Minimum number of source symbols the data requires.
        min_symbols: u64,
        /// Largest block size the catalog offers.
        largest: u32,
    },

    /// Symbol size must be nonzero.
    #[error("symbol size must be nonzero")]
    ZeroSymbolSize,
}

/// Transport line decode errors. Recoverable: the line is skipped.
#[derive(Debug, Error)]
pub enum LineError {
    /// The line is not valid transport-safe text.
    #[error("invalid transport encoding: {0}")]
    Malformed(#[from] base64::DecodeError),
}

/// Stream header errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// Header record shorter than the fixed layout.
    #[error("header too short: expected {expected} bytes, got {actual}")]
    TooShort {
        /// Fixed header length.
        expected: usize,
        /// Bytes actually present.
        actual: usize,
    },

    /// Magic bytes did not match.
    #[error("bad header magic")]
    BadMagic,

    /// The header line is not valid transport text.
    #[error("header line is not transport text")]
    Unreadable,

    /// Unknown tagging flag value.
    #[error("unknown tagging flag: 0x{0:02X}")]
    UnknownTagging(u8),
}

/// Failures reported by the external coding engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine's synchronous compute step reported an error code.
    #[error("engine decode failed with code {0}")]
    DecodeFailed(i32),

    /// The encoder could not precompute the block's symbols.
    #[error("encoder precomputation failed")]
    ComputeFailed,

    /// More symbols were requested than the block provides.
    #[error("symbol iterator exhausted")]
    SymbolsExhausted,

    /// Decode was requested before the engine reported readiness.
    #[error("engine is not ready to decode")]
    NotReady,
}

/// Fatal encode-pipeline errors.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Block planning failed.
    #[error("plan error: {0}")]
    Plan(#[from] PlanError),

    /// The coding engine failed.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// Writing the packet list failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal decode-pipeline errors.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Block planning failed.
    #[error("plan error: {0}")]
    Plan(#[from] PlanError),

    /// The stream header was missing or malformed.
    #[error("header error: {0}")]
    Header(#[from] HeaderError),

    /// A header line was expected but the stream ended.
    #[error("missing stream header")]
    MissingHeader,

    /// Ingestion ended before the engine reported readiness.
    #[error("insufficient symbols: received {valid} valid, need {required}")]
    InsufficientSymbols {
        /// Symbols the engine accepted.
        valid: u32,
        /// Source symbols the block requires.
        required: u32,
    },

    /// The coding engine's decode step failed.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// The engine reconstructed fewer bytes than the source length.
    #[error("length mismatch: wrote {written} bytes, expected {expected}")]
    LengthMismatch {
        /// Bytes the engine produced.
        written: u64,
        /// Bytes the original stream had.
        expected: u64,
    },

    /// Reading the packet list failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_error_display() {
        let err = PlanError::CatalogExhausted {
            min_symbols: 60000,
            largest: 56403,
        };
        assert_eq!(
            err.to_string(),
            "no supported block size covers 60000 symbols (largest is 56403)"
        );
    }

    #[test]
    fn decode_error_display() {
        let err = DecodeError::InsufficientSymbols {
            valid: 25,
            required: 26,
        };
        assert_eq!(
            err.to_string(),
            "insufficient symbols: received 25 valid, need 26"
        );

        let err = DecodeError::LengthMismatch {
            written: 655,
            expected: 660,
        };
        assert_eq!(err.to_string(), "length mismatch: wrote 655 bytes, expected 660");
    }

    #[test]
    fn errors_are_clone_and_eq() {
        let err1 = PlanError::ZeroSymbolSize;
        let err2 = err1;
        assert_eq!(err1, err2);

        let err1 = EngineError::DecodeFailed(3);
        let err2 = err1;
        assert_eq!(err1, err2);
    }
}

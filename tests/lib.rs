//! Shared helpers for the linecast integration test suites.

use linecast_core::{CodingParameters, DecodePipeline, DecodedOutput, EncodePipeline, TaggingMode};
use linecast_core::error::DecodeError;
use linecast_engine::{RaptorqCatalog, RaptorqDecoder, RaptorqEncoder};

/// Deterministic pseudo-random payload.
pub fn sample_data(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 131 + 17) % 256) as u8).collect()
}

/// Plan a block with the engine's real catalog.
pub fn plan(source_len: u64, symbol_size: u16, overhead_bps: u16) -> CodingParameters {
    CodingParameters::plan(source_len, symbol_size, overhead_bps, &RaptorqCatalog)
        .expect("plan fits the catalog")
}

/// Encode `data` into a packet-list string (no header line).
pub fn encode_to_string(data: &[u8], params: &CodingParameters, mode: TaggingMode) -> String {
    let mut engine = RaptorqEncoder::new(params, data).expect("encoder precompute");
    let pipeline = EncodePipeline {
        params: *params,
        mode,
        write_header: false,
    };
    let mut out = Vec::new();
    pipeline.run(&mut engine, &mut out).expect("encode run");
    String::from_utf8(out).expect("lines are ascii")
}

/// Decode a packet-list string (no header line).
pub fn decode_from_str(
    text: &str,
    params: &CodingParameters,
    mode: TaggingMode,
) -> Result<DecodedOutput, DecodeError> {
    let mut engine = RaptorqDecoder::new(params);
    let pipeline = DecodePipeline {
        params: *params,
        mode,
    };
    pipeline.run(&mut engine, text.as_bytes())
}

//! Encode side of the RaptorQ engine.

use std::collections::VecDeque;

use raptorq::{Encoder, ObjectTransmissionInformation};
use tracing::debug;

use linecast_core::engine::{EncodedSymbol, SymbolEncoder};
use linecast_core::error::EngineError;
use linecast_core::plan::CodingParameters;

/// Systematic RaptorQ encoder for a single block.
///
/// All symbols are precomputed synchronously at construction; the framer
/// then drains them in generation order. The source data is zero-padded
/// to a whole number of symbols, the receiver trims the padding away.
pub struct RaptorqEncoder {
    source: VecDeque<EncodedSymbol>,
    repair: VecDeque<EncodedSymbol>,
}

impl RaptorqEncoder {
    /// Precompute the block for `data`, which must be the stream the
    /// parameters were planned for (`data.len() == params.source_len`).
    ///
    /// # Errors
    ///
    /// [`EngineError::ComputeFailed`] when the engine yields a different
    /// symbol split than the plan calls for.
    pub fn new(params: &CodingParameters, data: &[u8]) -> Result<Self, EngineError> {
        debug_assert_eq!(data.len() as u64, params.source_len);

        let padded_len = params.padded_len();
        let mut padded = data.to_vec();
        padded.resize(padded_len as usize, 0);

        let oti = ObjectTransmissionInformation::new(padded_len, params.symbol_size, 1, 1, 1);
        let encoder = Encoder::new(&padded, oti);

        let mut source = VecDeque::with_capacity(params.block_size as usize);
        let mut repair = VecDeque::with_capacity(params.repair_count as usize);
        for packet in encoder.get_encoded_packets(params.repair_count) {
            let id = packet.payload_id().encoding_symbol_id();
            let symbol = EncodedSymbol {
                id,
                payload: packet.data().to_vec(),
            };
            if id < params.block_size {
                source.push_back(symbol);
            } else {
                repair.push_back(symbol);
            }
        }

        if source.len() as u32 != params.block_size || repair.len() as u32 != params.repair_count {
            return Err(EngineError::ComputeFailed);
        }

        debug!(
            source = source.len(),
            repair = repair.len(),
            symbol_size = params.symbol_size,
            "precomputed block"
        );

        Ok(Self { source, repair })
    }
}

impl SymbolEncoder for RaptorqEncoder {
    fn next_source(&mut self) -> Result<EncodedSymbol, EngineError> {
        self.source.pop_front().ok_or(EngineError::SymbolsExhausted)
    }

    fn next_repair(&mut self) -> Result<EncodedSymbol, EngineError> {
        self.repair.pop_front().ok_or(EngineError::SymbolsExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RaptorqCatalog;

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 7 % 251) as u8).collect()
    }

    fn plan(len: u64) -> CodingParameters {
        CodingParameters::plan(len, 32, 1000, &RaptorqCatalog).unwrap()
    }

    #[test]
    fn yields_planned_symbol_counts() {
        let params = plan(660);
        let data = sample(660);
        let mut engine = RaptorqEncoder::new(&params, &data).unwrap();

        for i in 0..params.block_size {
            let symbol = engine.next_source().unwrap();
            assert_eq!(symbol.id, i);
            assert_eq!(symbol.payload.len(), 32);
        }
        for i in 0..params.repair_count {
            let symbol = engine.next_repair().unwrap();
            assert_eq!(symbol.id, params.block_size + i);
        }

        assert_eq!(engine.next_source().unwrap_err(), EngineError::SymbolsExhausted);
        assert_eq!(engine.next_repair().unwrap_err(), EngineError::SymbolsExhausted);
    }

    #[test]
    fn source_symbols_are_systematic() {
        // The first source symbols must be the data itself.
        let params = plan(660);
        let data = sample(660);
        let mut engine = RaptorqEncoder::new(&params, &data).unwrap();

        let mut recovered = Vec::new();
        for _ in 0..params.block_size {
            recovered.extend_from_slice(&engine.next_source().unwrap().payload);
        }
        assert_eq!(&recovered[..660], &data[..]);
        // The padding tail is all zeros.
        assert!(recovered[660..].iter().all(|&b| b == 0));
    }

    #[test]
    fn empty_source_still_fills_a_block() {
        let params = plan(0);
        let mut engine = RaptorqEncoder::new(&params, &[]).unwrap();
        let symbol = engine.next_source().unwrap();
        assert_eq!(symbol.payload, vec![0u8; 32]);
    }
}

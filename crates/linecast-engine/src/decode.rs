//! Decode side of the RaptorQ engine.

use std::collections::HashSet;

use raptorq::{Decoder, EncodingPacket, ObjectTransmissionInformation, PayloadId};
use tracing::debug;

use linecast_core::engine::{IngestOutcome, ReceivedSymbol, SymbolDecoder};
use linecast_core::error::EngineError;
use linecast_core::packet::SymbolId;
use linecast_core::plan::CodingParameters;

/// Incremental RaptorQ decoder for a single block.
///
/// Built from the same parameters the sender planned with; readiness
/// means the code has reconstructed the padded block.
pub struct RaptorqDecoder {
    inner: Decoder,
    received: HashSet<SymbolId>,
    symbol_size: u16,
    decoded: Option<Vec<u8>>,
}

impl RaptorqDecoder {
    /// Decoder expecting the block described by `params`.
    pub fn new(params: &CodingParameters) -> Self {
        let oti =
            ObjectTransmissionInformation::new(params.padded_len(), params.symbol_size, 1, 1, 1);
        Self {
            inner: Decoder::new(oti),
            received: HashSet::new(),
            symbol_size: params.symbol_size,
            decoded: None,
        }
    }
}

impl SymbolDecoder for RaptorqDecoder {
    fn add_symbol(&mut self, symbol: ReceivedSymbol) -> IngestOutcome {
        if symbol.payload.len() != usize::from(self.symbol_size) {
            return IngestOutcome::Rejected;
        }
        if self.decoded.is_some() || !self.received.insert(symbol.id) {
            return IngestOutcome::Redundant;
        }

        let packet = EncodingPacket::new(PayloadId::new(0, symbol.id), symbol.payload);
        if let Some(block) = self.inner.decode(packet) {
            debug!(symbols = self.received.len(), "block reconstructed");
            self.decoded = Some(block);
        }
        IngestOutcome::Accepted
    }

    fn is_ready(&self) -> bool {
        self.decoded.is_some()
    }

    fn finish(&mut self) -> Result<Vec<u8>, EngineError> {
        self.decoded.take().ok_or(EngineError::NotReady)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RaptorqCatalog;
    use crate::encode::RaptorqEncoder;
    use linecast_core::engine::SymbolEncoder;

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 13 % 241) as u8).collect()
    }

    fn plan(len: u64) -> CodingParameters {
        CodingParameters::plan(len, 32, 1000, &RaptorqCatalog).unwrap()
    }

    fn all_symbols(params: &CodingParameters, data: &[u8]) -> Vec<ReceivedSymbol> {
        let mut engine = RaptorqEncoder::new(params, data).unwrap();
        let mut symbols = Vec::new();
        for _ in 0..params.block_size {
            let s = engine.next_source().unwrap();
            symbols.push(ReceivedSymbol {
                id: s.id,
                payload: s.payload,
            });
        }
        for _ in 0..params.repair_count {
            let s = engine.next_repair().unwrap();
            symbols.push(ReceivedSymbol {
                id: s.id,
                payload: s.payload,
            });
        }
        symbols
    }

    #[test]
    fn source_only_roundtrip() {
        let params = plan(660);
        let data = sample(660);
        let symbols = all_symbols(&params, &data);

        let mut decoder = RaptorqDecoder::new(&params);
        for symbol in symbols.into_iter().take(params.block_size as usize) {
            assert_eq!(decoder.add_symbol(symbol), IngestOutcome::Accepted);
        }
        assert!(decoder.is_ready());

        let block = decoder.finish().unwrap();
        assert_eq!(&block[..660], &data[..]);
    }

    #[test]
    fn repair_symbols_cover_missing_source() {
        let params = plan(660);
        let data = sample(660);
        let symbols = all_symbols(&params, &data);

        // Drop two source symbols; all repair symbols are present.
        let mut decoder = RaptorqDecoder::new(&params);
        for (i, symbol) in symbols.into_iter().enumerate() {
            if i == 3 || i == 17 {
                continue;
            }
            decoder.add_symbol(symbol);
            if decoder.is_ready() {
                break;
            }
        }

        assert!(decoder.is_ready());
        let block = decoder.finish().unwrap();
        assert_eq!(&block[..660], &data[..]);
    }

    #[test]
    fn duplicate_ids_are_redundant() {
        let params = plan(660);
        let data = sample(660);
        let symbols = all_symbols(&params, &data);

        let mut decoder = RaptorqDecoder::new(&params);
        assert_eq!(
            decoder.add_symbol(symbols[0].clone()),
            IngestOutcome::Accepted
        );
        assert_eq!(
            decoder.add_symbol(symbols[0].clone()),
            IngestOutcome::Redundant
        );
    }

    #[test]
    fn wrong_payload_size_is_rejected() {
        let params = plan(660);
        let mut decoder = RaptorqDecoder::new(&params);
        let outcome = decoder.add_symbol(ReceivedSymbol {
            id: 0,
            payload: vec![0u8; 31],
        });
        assert_eq!(outcome, IngestOutcome::Rejected);
    }

    #[test]
    fn finish_before_ready_fails() {
        let params = plan(660);
        let mut decoder = RaptorqDecoder::new(&params);
        assert_eq!(decoder.finish().unwrap_err(), EngineError::NotReady);
    }

    #[test]
    fn too_few_symbols_never_ready() {
        let params = plan(660);
        let data = sample(660);
        let symbols = all_symbols(&params, &data);

        let mut decoder = RaptorqDecoder::new(&params);
        // One fewer than the block size, repair included.
        for symbol in symbols.into_iter().take(params.block_size as usize - 1) {
            decoder.add_symbol(symbol);
        }
        assert!(!decoder.is_ready());
    }
}

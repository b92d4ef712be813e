//! Block planning: derive coding parameters from the source length.
//!
//! The planner picks the smallest block size the engine supports that
//! covers the data, then budgets repair symbols from the overhead ratio.
//! When the block size is inferred rather than carried by a header, the
//! identical computation must run on both sides of the link.

use crate::error::PlanError;

/// Default symbol size in bytes, sized for short radio frames.
pub const DEFAULT_SYMBOL_SIZE: u16 = 32;

/// Default repair overhead in basis points (10%).
pub const DEFAULT_OVERHEAD_BPS: u16 = 1000;

/// Ascending catalog of block sizes a coding engine supports.
pub trait BlockCatalog {
    /// Smallest supported block size that is at least `min_symbols`.
    ///
    /// `None` means the catalog is exhausted: the input needs more
    /// symbols than the largest supported block.
    fn smallest_at_least(&self, min_symbols: u64) -> Option<u32>;

    /// Largest block size the catalog offers.
    fn largest(&self) -> u32;
}

/// Plain ascending slice of supported block sizes.
impl BlockCatalog for [u32] {
    fn smallest_at_least(&self, min_symbols: u64) -> Option<u32> {
        self.iter()
            .copied()
            .find(|&k| u64::from(k) >= min_symbols)
    }

    fn largest(&self) -> u32 {
        self.last().copied().unwrap_or(0)
    }
}

/// Parameters fixed for one coding block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodingParameters {
    /// Bytes per symbol, fixed for the session.
    pub symbol_size: u16,
    /// Original byte length of the source data.
    pub source_len: u64,
    /// Number of source symbols (K), always a catalog value.
    pub block_size: u32,
    /// Number of repair symbols appended after the source symbols.
    pub repair_count: u32,
    /// Overhead ratio in basis points the repair count was derived from.
    pub overhead_bps: u16,
}

impl CodingParameters {
    /// Plan a block for `source_len` bytes of data.
    ///
    /// Selects the first catalog entry covering
    /// `ceil(source_len / symbol_size)` symbols and budgets
    /// `ceil(block_size * overhead_bps / 10000)` repair symbols.
    ///
    /// # Errors
    ///
    /// [`PlanError::ZeroSymbolSize`] for a zero symbol size,
    /// [`PlanError::CatalogExhausted`] when even the largest supported
    /// block cannot cover the data.
    pub fn plan<C: BlockCatalog + ?Sized>(
        source_len: u64,
        symbol_size: u16,
        overhead_bps: u16,
        catalog: &C,
    ) -> Result<Self, PlanError> {
        if symbol_size == 0 {
            return Err(PlanError::ZeroSymbolSize);
        }

        let min_symbols = source_len.div_ceil(u64::from(symbol_size));
        let block_size =
            catalog
                .smallest_at_least(min_symbols)
                .ok_or(PlanError::CatalogExhausted {
                    min_symbols,
                    largest: catalog.largest(),
                })?;

        let repair_count = (u64::from(block_size) * u64::from(overhead_bps)).div_ceil(10_000);

        Ok(Self {
            symbol_size,
            source_len,
            block_size,
            repair_count: repair_count as u32,
            overhead_bps,
        })
    }

    /// Minimum symbols needed to cover the source data.
    pub fn min_symbols(&self) -> u64 {
        self.source_len.div_ceil(u64::from(self.symbol_size))
    }

    /// Total packets one encode run emits.
    pub fn total_packets(&self) -> u32 {
        self.block_size + self.repair_count
    }

    /// Block length in bytes once padded to a whole number of symbols.
    pub fn padded_len(&self) -> u64 {
        u64::from(self.block_size) * u64::from(self.symbol_size)
    }
}

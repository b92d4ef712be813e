//! The block sizes the RaptorQ code supports.
//!
//! RFC 6330 defines a discrete ascending table of systematic block sizes
//! (K'); a block is always padded up to the next table entry. The planner
//! scans this catalog for the smallest entry covering the data.

use linecast_core::plan::BlockCatalog;

/// Largest source-block size RFC 6330 supports.
pub const MAX_BLOCK_SYMBOLS: u32 = 56_403;

/// Catalog backed by the engine's own systematic-constants table.
#[derive(Debug, Clone, Copy, Default)]
pub struct RaptorqCatalog;

impl BlockCatalog for RaptorqCatalog {
    fn smallest_at_least(&self, min_symbols: u64) -> Option<u32> {
        if min_symbols > u64::from(MAX_BLOCK_SYMBOLS) {
            return None;
        }
        // The table starts at K' = 10; zero symbols still plan the
        // smallest block.
        let wanted = u32::try_from(min_symbols.max(1)).expect("bounded by MAX_BLOCK_SYMBOLS");
        Some(raptorq::extended_source_block_symbols(wanted))
    }

    fn largest(&self) -> u32 {
        MAX_BLOCK_SYMBOLS
    }
}

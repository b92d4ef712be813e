//! # linecast core
//!
//! Packet framing, transport encoding and reassembly for erasure-coded
//! file transfer over lossy line-oriented links.
//!
//! This crate provides:
//! - The packet model (tagged and untagged symbol framing)
//! - The transport line codec (packet bytes to printable text and back)
//! - Block planning (catalog-driven block sizing and repair budgeting)
//! - The encode and decode pipelines
//! - The traits the external coding engine must satisfy
//!
//! ## Architecture
//!
//! ```text
//! encode:  BlockPlanner -> SymbolFramer -> LineSerializer -> lines
//! decode:  lines -> LineParser -> PacketValidator -> SymbolIngester
//!                                                      -> Reassembler
//! ```
//!
//! The erasure code itself lives behind the [`engine`] traits; this crate
//! never computes a symbol, it only frames, ships and collects them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod decode;
pub mod encode;
pub mod engine;
pub mod error;
pub mod header;
pub mod line;
pub mod packet;
pub mod plan;

pub use decode::{DecodePipeline, DecodeReport, DecodedOutput, PacketValidator, SymbolIngester};
pub use encode::{EncodePipeline, EncodeReport, SymbolFramer};
pub use engine::{EncodedSymbol, IngestOutcome, ReceivedSymbol, SymbolDecoder, SymbolEncoder};
pub use error::{DecodeError, EncodeError, EngineError, HeaderError, LineError, PlanError};
pub use header::{StreamHeader, HEADER_LEN};
pub use packet::{Packet, SymbolId, TaggingMode, ID_PREFIX_LEN};
pub use plan::{BlockCatalog, CodingParameters, DEFAULT_OVERHEAD_BPS, DEFAULT_SYMBOL_SIZE};

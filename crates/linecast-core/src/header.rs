//! Stream header: the coding parameters carried in-band.
//!
//! The legacy wire format assumes both sides agree on the source length,
//! symbol size and overhead out of band. When enabled, one fixed-layout
//! header record is sent as the first line instead, so the receiver plans
//! from data it actually received. Layout, all multi-byte fields
//! big-endian:
//!
//! ```text
//! magic "LCH1" (4) | tagging (1) | symbol_size u16 (2)
//!                  | overhead_bps u16 (2) | source_len u64 (8)
//! ```
//!
//! The 17-byte record can never be confused with a packet line: packet
//! lengths are `symbol_size` or `symbol_size + 4`, and the magic is
//! checked regardless.

use std::io::{BufRead, Write};

use crate::error::{DecodeError, HeaderError};
use crate::line;
use crate::packet::TaggingMode;
use crate::plan::CodingParameters;

/// Fixed header record length in bytes.
pub const HEADER_LEN: usize = 17;

const MAGIC: [u8; 4] = *b"LCH1";

const TAGGING_TAGGED: u8 = 0x00;
const TAGGING_UNTAGGED: u8 = 0x01;

/// The in-band coding parameters record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    /// Tagging mode of the packet lines that follow.
    pub tagging: TaggingMode,
    /// Bytes per symbol.
    pub symbol_size: u16,
    /// Repair overhead in basis points.
    pub overhead_bps: u16,
    /// Original byte length of the source data.
    pub source_len: u64,
}

impl StreamHeader {
    /// Build the header describing an encode run.
    pub fn new(params: &CodingParameters, tagging: TaggingMode) -> Self {
        Self {
            tagging,
            symbol_size: params.symbol_size,
            overhead_bps: params.overhead_bps,
            source_len: params.source_len,
        }
    }

    /// Serialize to the fixed wire layout.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[..4].copy_from_slice(&MAGIC);
        buf[4] = match self.tagging {
            TaggingMode::Tagged => TAGGING_TAGGED,
            TaggingMode::Untagged => TAGGING_UNTAGGED,
        };
        buf[5..7].copy_from_slice(&self.symbol_size.to_be_bytes());
        buf[7..9].copy_from_slice(&self.overhead_bps.to_be_bytes());
        buf[9..17].copy_from_slice(&self.source_len.to_be_bytes());
        buf
    }

    /// Parse the fixed wire layout.
    ///
    /// # Errors
    ///
    /// [`HeaderError::TooShort`], [`HeaderError::BadMagic`] or
    /// [`HeaderError::UnknownTagging`] when the record is malformed.
    pub fn parse(raw: &[u8]) -> Result<Self, HeaderError> {
        if raw.len() < HEADER_LEN {
            return Err(HeaderError::TooShort {
                expected: HEADER_LEN,
                actual: raw.len(),
            });
        }
        if raw[..4] != MAGIC {
            return Err(HeaderError::BadMagic);
        }
        let tagging = match raw[4] {
            TAGGING_TAGGED => TaggingMode::Tagged,
            TAGGING_UNTAGGED => TaggingMode::Untagged,
            other => return Err(HeaderError::UnknownTagging(other)),
        };
        Ok(Self {
            tagging,
            symbol_size: u16::from_be_bytes([raw[5], raw[6]]),
            overhead_bps: u16::from_be_bytes([raw[7], raw[8]]),
            source_len: u64::from_be_bytes([
                raw[9], raw[10], raw[11], raw[12], raw[13], raw[14], raw[15], raw[16],
            ]),
        })
    }

    /// Write the header as one transport line.
    pub fn write_line<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "{}", line::serialize(&self.to_bytes()))
    }

    /// Consume the first line of a stream and parse it as a header.
    ///
    /// # Errors
    ///
    /// [`DecodeError::MissingHeader`] when the stream is empty, a header
    /// or line error when the first line is not a valid header record.
    pub fn read_line<R: BufRead>(input: &mut R) -> Result<Self, DecodeError> {
        let mut first = String::new();
        let read = input.read_line(&mut first)?;
        if read == 0 {
            return Err(DecodeError::MissingHeader);
        }
        let trimmed = first.trim_end_matches(['\n', '\r']);
        let raw = line::parse(trimmed).map_err(|_| HeaderError::Unreadable)?;
        Ok(Self::parse(&raw)?)
    }
}

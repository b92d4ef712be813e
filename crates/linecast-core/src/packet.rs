//! Packet framing for encoded symbols.
//!
//! A packet is one symbol ready for the wire: either the payload alone, or
//! a 4-byte big-endian encoding symbol identifier followed by the payload.
//! Wire order carries no meaning for tagged packets; for untagged packets
//! it is the only identifier source the receiver has.

/// Encoding symbol identifier (ESI).
///
/// Source symbols occupy `0..block_size` in generation order; repair
/// symbols follow. Uniqueness is not enforced at this layer - duplicates
/// are legal and simply redundant.
pub type SymbolId = u32;

/// Length of the identifier prefix on tagged packets.
pub const ID_PREFIX_LEN: usize = 4;

/// Whether packets carry an explicit symbol identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaggingMode {
    /// 4-byte big-endian identifier prepended to each payload.
    #[default]
    Tagged,
    /// Payload only; the receiver assumes identifiers from line position.
    ///
    /// Only sound when the channel neither reorders nor drops packets
    /// before the final trailing loss. The receiver cannot detect a
    /// mid-stream loss in this mode.
    Untagged,
}

impl TaggingMode {
    /// Raw packet length for the given symbol size.
    pub fn packet_len(self, symbol_size: u16) -> usize {
        match self {
            Self::Tagged => ID_PREFIX_LEN + usize::from(symbol_size),
            Self::Untagged => usize::from(symbol_size),
        }
    }
}

/// A framed symbol ready for line serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    /// Identifier plus payload.
    Tagged {
        /// Encoding symbol identifier.
        id: SymbolId,
        /// Symbol payload, exactly `symbol_size` bytes.
        payload: Vec<u8>,
    },
    /// Payload only.
    Untagged {
        /// Symbol payload, exactly `symbol_size` bytes.
        payload: Vec<u8>,
    },
}

impl Packet {
    /// Frame a symbol under the given tagging mode.
    ///
    /// Untagged mode discards the identifier; the sender must preserve
    /// generation order on the wire to keep it recoverable.
    pub fn from_symbol(mode: TaggingMode, id: SymbolId, payload: Vec<u8>) -> Self {
        match mode {
            TaggingMode::Tagged => Self::Tagged { id, payload },
            TaggingMode::Untagged => Self::Untagged { payload },
        }
    }

    /// Raw wire bytes: big-endian identifier prefix for tagged packets,
    /// the bare payload otherwise.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Tagged { id, payload } => {
                let mut buf = Vec::with_capacity(ID_PREFIX_LEN + payload.len());
                buf.extend_from_slice(&id.to_be_bytes());
                buf.extend_from_slice(payload);
                buf
            }
            Self::Untagged { payload } => payload.clone(),
        }
    }

    /// Reconstruct a packet from raw wire bytes.
    ///
    /// Returns `None` when the length does not match the framed size for
    /// the mode - the caller reports the mismatch and skips the line.
    pub fn from_bytes(mode: TaggingMode, symbol_size: u16, raw: &[u8]) -> Option<Self> {
        if raw.len() != mode.packet_len(symbol_size) {
            return None;
        }
        match mode {
            TaggingMode::Tagged => {
                let id = SymbolId::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]);
                Some(Self::Tagged {
                    id,
                    payload: raw[ID_PREFIX_LEN..].to_vec(),
                })
            }
            TaggingMode::Untagged => Some(Self::Untagged {
                payload: raw.to_vec(),
            }),
        }
    }

    /// The symbol payload.
    pub fn payload(&self) -> &[u8] {
        match self {
            Self::Tagged { payload, .. } | Self::Untagged { payload } => payload,
        }
    }
}

//! Transport line codec.
//!
//! One printable Base64 line per packet, standard alphabet with padding.
//! `serialize` and `parse` are strict inverses; a line that is not valid
//! transport text surfaces as a [`LineError`] the read loop can skip.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::error::LineError;

/// Serialize raw packet bytes into one transport-safe line.
///
/// The line terminator is not included; the writer appends it.
pub fn serialize(raw: &[u8]) -> String {
    BASE64.encode(raw)
}

/// Parse one transport line back into raw packet bytes.
pub fn parse(line: &str) -> Result<Vec<u8>, LineError> {
    Ok(BASE64.decode(line)?)
}

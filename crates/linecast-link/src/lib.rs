//! # linecast link
//!
//! Point-to-point byte channel abstraction for moving already-framed
//! transport lines across a physical link (serial, radio, or an
//! in-memory loopback).
//!
//! The framing protocol never looks inside this layer: it hands over a
//! complete line and receives complete lines on the far side. A physical
//! serial/radio backend implements [`LineLink`] against its own device
//! handling; the [`LoopbackLink`] here is what the test suites drive.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::collections::VecDeque;

use thiserror::Error;
use tracing::trace;

/// Link layer errors.
#[derive(Debug, Error)]
pub enum LinkError {
    /// I/O error from the underlying device.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The link is closed; nothing more will be received.
    #[error("link is closed")]
    Closed,
}

/// Result type for link operations.
pub type LinkResult<T> = Result<T, LinkError>;

/// Synchronous point-to-point channel for framed lines.
///
/// One `transmit` hands over exactly one framed line (terminator
/// included); one `receive` yields exactly one framed line in arrival
/// order. The channel may lose frames; it must not split or merge them.
pub trait LineLink {
    /// Push one framed line across the channel.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// [`LinkError::Closed`] when the link was shut down, or an I/O error
    /// from the device.
    fn transmit(&mut self, frame: &[u8]) -> LinkResult<usize>;

    /// Pull the next framed line from the channel.
    ///
    /// # Errors
    ///
    /// [`LinkError::Closed`] once the link is drained and shut down.
    fn receive(&mut self) -> LinkResult<Vec<u8>>;
}

/// In-memory link: frames go out one end and come back in the other.
///
/// Frames are delivered in transmission order, which is exactly the
/// guarantee untagged transport relies on.
#[derive(Debug, Default)]
pub struct LoopbackLink {
    queue: VecDeque<Vec<u8>>,
    closed: bool,
}

impl LoopbackLink {
    /// A fresh, open loopback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the transmit side; pending frames stay receivable.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Frames currently in flight.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl LineLink for LoopbackLink {
    fn transmit(&mut self, frame: &[u8]) -> LinkResult<usize> {
        if self.closed {
            return Err(LinkError::Closed);
        }
        trace!(bytes = frame.len(), "loopback transmit");
        self.queue.push_back(frame.to_vec());
        Ok(frame.len())
    }

    fn receive(&mut self) -> LinkResult<Vec<u8>> {
        self.queue.pop_front().ok_or(LinkError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_come_back_in_order() {
        let mut link = LoopbackLink::new();
        link.transmit(b"one\n").unwrap();
        link.transmit(b"two\n").unwrap();
        assert_eq!(link.pending(), 2);

        assert_eq!(link.receive().unwrap(), b"one\n");
        assert_eq!(link.receive().unwrap(), b"two\n");
        assert!(matches!(link.receive(), Err(LinkError::Closed)));
    }

    #[test]
    fn closed_link_refuses_transmit() {
        let mut link = LoopbackLink::new();
        link.transmit(b"last\n").unwrap();
        link.close();

        assert!(matches!(link.transmit(b"x\n"), Err(LinkError::Closed)));
        // Pending frames still drain.
        assert_eq!(link.receive().unwrap(), b"last\n");
    }

    #[test]
    fn frames_are_not_split_or_merged() {
        let mut link = LoopbackLink::new();
        link.transmit(b"abc\n").unwrap();
        link.transmit(b"\n").unwrap();

        assert_eq!(link.receive().unwrap(), b"abc\n");
        assert_eq!(link.receive().unwrap(), b"\n");
    }
}

//! Reassembly of network-newline terminated lines from a byte stream.
//!
//! Reads from a stream socket arrive in arbitrary fragments: one read may
//! hold half a line, the terminator may be split between two reads, and a
//! single read may carry several lines. [`LineBuffer`] accumulates bytes for
//! one connection and hands back complete lines one at a time.

use thiserror::Error;

/// Failure to frame a line out of a connection's byte stream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// The connection filled its buffer without sending a network newline.
    #[error("line exceeds {capacity} byte buffer without a network newline")]
    Overflow { capacity: usize },
}

/// Per-connection accumulation buffer with a fixed capacity.
///
/// A line fits when its bytes plus the two terminator bytes fit in
/// `capacity`. Bytes after a terminator stay buffered as the start of the
/// next line.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    bytes: Vec<u8>,
    /// Offset up to which `bytes` is known to hold no terminator.
    scanned: usize,
    capacity: usize,
}

impl LineBuffer {
    /// Creates an empty buffer holding at most `capacity` bytes.
    ///
    /// The longest line it can deliver is `capacity - 2` bytes, since the
    /// terminator has to fit as well.
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            scanned: 0,
            capacity,
        }
    }

    /// Byte limit given at construction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of bytes waiting for a terminator.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Appends a freshly read chunk.
    pub fn push(&mut self, chunk: &[u8]) {
        self.bytes.extend_from_slice(chunk);
    }

    /// Extracts the first complete line, without its terminator.
    ///
    /// Returns `Ok(None)` when more data is needed. Invalid UTF-8 is replaced
    /// rather than rejected so that a garbled line still reaches validation
    /// and gets a protocol-level answer.
    pub fn next_line(&mut self) -> Result<Option<String>, FrameError> {
        match find_network_newline(&self.bytes, self.scanned) {
            Some(end) if end + 2 > self.capacity => Err(self.overflow()),
            Some(end) => {
                let line = String::from_utf8_lossy(&self.bytes[..end]).into_owned();
                self.bytes.drain(..end + 2);
                self.scanned = 0;
                Ok(Some(line))
            }
            None if self.bytes.len() >= self.capacity => Err(self.overflow()),
            None => {
                // A trailing '\r' may still pair with the next chunk's '\n'.
                self.scanned = self.bytes.len().saturating_sub(1);
                Ok(None)
            }
        }
    }

    /// Drops everything buffered.
    pub fn clear(&mut self) {
        self.bytes.clear();
        self.scanned = 0;
    }

    fn overflow(&mut self) -> FrameError {
        self.clear();
        FrameError::Overflow {
            capacity: self.capacity,
        }
    }
}

/// Index of the first `\r\n` at or after `from`.
fn find_network_newline(bytes: &[u8], from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(2)
        .position(|pair| pair == b"\r\n")
        .map(|offset| from + offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_complete_line() {
        let mut buffer = LineBuffer::new(64);
        buffer.push(b"Al\r\n");

        assert_eq!(buffer.next_line(), Ok(Some("Al".to_string())));
        assert!(buffer.is_empty());
        assert_eq!(buffer.next_line(), Ok(None));
    }

    #[test]
    fn test_fragmented_reads() {
        let mut buffer = LineBuffer::new(64);

        buffer.push(b"Bo");
        assert_eq!(buffer.next_line(), Ok(None));
        buffer.push(b"b");
        assert_eq!(buffer.next_line(), Ok(None));
        buffer.push(b"by\r\n");

        assert_eq!(buffer.next_line(), Ok(Some("Bobby".to_string())));
    }

    #[test]
    fn test_terminator_split_across_reads() {
        let mut buffer = LineBuffer::new(64);

        buffer.push(b"c\r");
        assert_eq!(buffer.next_line(), Ok(None));
        buffer.push(b"\n");

        assert_eq!(buffer.next_line(), Ok(Some("c".to_string())));
    }

    #[test]
    fn test_bytes_after_terminator_are_kept() {
        let mut buffer = LineBuffer::new(64);
        buffer.push(b"a\r\nb\r\nc");

        assert_eq!(buffer.next_line(), Ok(Some("a".to_string())));
        assert_eq!(buffer.next_line(), Ok(Some("b".to_string())));
        assert_eq!(buffer.next_line(), Ok(None));
        assert_eq!(buffer.len(), 1);

        buffer.push(b"\r\n");
        assert_eq!(buffer.next_line(), Ok(Some("c".to_string())));
    }

    #[test]
    fn test_empty_line() {
        let mut buffer = LineBuffer::new(64);
        buffer.push(b"\r\n");

        assert_eq!(buffer.next_line(), Ok(Some(String::new())));
    }

    #[test]
    fn test_bare_newline_is_not_a_terminator() {
        let mut buffer = LineBuffer::new(64);
        buffer.push(b"a\nb\r\n");

        assert_eq!(buffer.next_line(), Ok(Some("a\nb".to_string())));
    }

    #[test]
    fn test_overflow_without_terminator() {
        let mut buffer = LineBuffer::new(8);
        buffer.push(b"abcdefgh");

        assert_eq!(buffer.next_line(), Err(FrameError::Overflow { capacity: 8 }));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_line_that_just_fits() {
        let mut buffer = LineBuffer::new(8);
        buffer.push(b"abcdef\r\n");

        assert_eq!(buffer.next_line(), Ok(Some("abcdef".to_string())));
    }

    #[test]
    fn test_line_longer_than_capacity_in_one_chunk() {
        let mut buffer = LineBuffer::new(8);
        buffer.push(b"abcdefg\r\n");

        assert_eq!(buffer.next_line(), Err(FrameError::Overflow { capacity: 8 }));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut buffer = LineBuffer::new(64);
        buffer.push(&[0xff, b'a', b'\r', b'\n']);

        let line = buffer.next_line().unwrap().unwrap();
        assert!(line.ends_with('a'));
        assert_ne!(line, "a");
    }

    #[test]
    fn test_find_network_newline() {
        assert_eq!(find_network_newline(b"", 0), None);
        assert_eq!(find_network_newline(b"\r", 0), None);
        assert_eq!(find_network_newline(b"ab\r\n", 0), Some(2));
        assert_eq!(find_network_newline(b"ab\r\n", 2), Some(2));
        assert_eq!(find_network_newline(b"ab\r\n", 3), None);
        assert_eq!(find_network_newline(b"ab", 5), None);
    }
}

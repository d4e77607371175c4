//! Circular output sample buffer
//!
//! The synthesizer appends one unsigned 8-bit sample every 16 clocks; an
//! external audio sink drains the buffer at the native rate. The buffer wraps
//! silently when full - keeping up is the consumer's job, and access must be
//! strictly sequential with clocking (single writer, no internal locking).

use crate::{MockingboardError, Result};

/// Default buffer capacity in samples
pub const DEFAULT_CAPACITY: usize = 1024;

/// Upper bound on configurable capacity (1 MiB of samples)
const MAX_CAPACITY: usize = 1 << 20;

/// Fixed-capacity circular buffer of output samples with a write cursor
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    buf: Vec<u8>,
    cursor: usize,
    mask: usize,
}

impl SampleBuffer {
    /// Create a buffer with the default capacity
    pub fn new() -> Self {
        SampleBuffer {
            buf: vec![0; DEFAULT_CAPACITY],
            cursor: 0,
            mask: DEFAULT_CAPACITY - 1,
        }
    }

    /// Create a buffer with a custom capacity, rounded up to a power of two.
    ///
    /// # Errors
    ///
    /// Returns [`MockingboardError::ConfigError`] if the requested capacity
    /// is zero or exceeds the maximum safe size.
    pub fn with_capacity(requested: usize) -> Result<Self> {
        if requested == 0 {
            return Err(MockingboardError::ConfigError(
                "sample buffer capacity must be greater than 0".into(),
            ));
        }
        let capacity = requested.next_power_of_two();
        if capacity > MAX_CAPACITY {
            return Err(MockingboardError::ConfigError(format!(
                "sample buffer capacity {capacity} exceeds maximum {MAX_CAPACITY}"
            )));
        }
        Ok(SampleBuffer {
            buf: vec![0; capacity],
            cursor: 0,
            mask: capacity - 1,
        })
    }

    /// Append a sample, overwriting the oldest data once the buffer is full
    #[inline]
    pub fn push(&mut self, sample: u8) {
        self.buf[self.cursor] = sample;
        self.cursor = (self.cursor + 1) & self.mask;
    }

    /// Current write cursor (index of the next sample to be written)
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Buffer capacity in samples
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// The whole buffer contents, oldest and newest data interleaved at the
    /// cursor position
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// The most recently written sample
    #[inline]
    pub fn latest(&self) -> u8 {
        self.buf[(self.cursor + self.mask) & self.mask]
    }

    /// Zero all samples and rewind the cursor
    pub fn clear(&mut self) {
        self.buf.fill(0);
        self.cursor = 0;
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_advances_cursor() {
        let mut buf = SampleBuffer::new();
        buf.push(42);
        assert_eq!(buf.cursor(), 1);
        assert_eq!(buf.as_slice()[0], 42);
        assert_eq!(buf.latest(), 42);
    }

    #[test]
    fn test_wraps_silently() {
        let mut buf = SampleBuffer::with_capacity(8).unwrap();
        for i in 0..10u8 {
            buf.push(i);
        }
        // Oldest two samples overwritten
        assert_eq!(buf.cursor(), 2);
        assert_eq!(buf.as_slice(), &[8, 9, 2, 3, 4, 5, 6, 7]);
        assert_eq!(buf.latest(), 9);
    }

    #[test]
    fn test_capacity_rounded_to_power_of_two() {
        let buf = SampleBuffer::with_capacity(1000).unwrap();
        assert_eq!(buf.capacity(), 1024);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(SampleBuffer::with_capacity(0).is_err());
    }

    #[test]
    fn test_oversized_capacity_rejected() {
        assert!(SampleBuffer::with_capacity((1 << 20) + 1).is_err());
    }

    #[test]
    fn test_clear_rewinds() {
        let mut buf = SampleBuffer::with_capacity(8).unwrap();
        for i in 0..5u8 {
            buf.push(i + 1);
        }
        buf.clear();
        assert_eq!(buf.cursor(), 0);
        assert!(buf.as_slice().iter().all(|&s| s == 0));
    }
}

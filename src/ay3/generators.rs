//! Sound generators for the AY-3-8913 PSG
//!
//! This module contains the individual generator components:
//! - Tone generators (3 channels, square wave)
//! - Noise generator (single shared channel)
//! - The [`NoiseSource`] abstraction feeding the noise generator raw bits

/// Number of tone channels
pub const NUM_CHANNELS: usize = 3;

/// Maximum 12-bit tone period, loaded as the silent sentinel on reset
pub const MAX_TONE_PERIOD: u16 = 4095;

/// Maximum 5-bit noise period, loaded on reset
pub const MAX_NOISE_PERIOD: u16 = 31;

/// Source of raw bits for the noise generator.
///
/// The noise divider redraws one bit from this source on every reload. Tests
/// can supply a deterministic source to assert exact toggle timing; the
/// default [`Lfsr17`] gives a hardware-plausible pseudo-random stream.
pub trait NoiseSource {
    /// Produce the next raw bit (0 or 1).
    fn next_bit(&mut self) -> u8;
}

/// 17-bit Galois LFSR noise source with taps at bits 13 and 16, matching
/// real AY/YM hardware. Default bit source for [`NoiseGenerator`].
#[derive(Debug, Clone)]
pub struct Lfsr17 {
    state: u32,
}

impl Lfsr17 {
    /// Create a new LFSR. State must be non-zero.
    pub fn new() -> Self {
        Self { state: 1 }
    }
}

impl Default for Lfsr17 {
    fn default() -> Self {
        Self::new()
    }
}

impl NoiseSource for Lfsr17 {
    fn next_bit(&mut self) -> u8 {
        let lsb = self.state & 1;
        self.state >>= 1;
        if lsb != 0 {
            self.state ^= 0x12000; // taps at bits 13 (0x2000) and 16 (0x10000)
        }
        lsb as u8
    }
}

/// Tone generator for a single channel.
///
/// A 12-bit down-counter: on reaching zero it reloads from the programmed
/// period and inverts the binary output, producing a 50%-duty square wave.
#[derive(Debug, Clone)]
pub struct ToneGenerator {
    period: u16,
    counter: u16,
    signal: u8,
}

impl ToneGenerator {
    /// Create a new tone generator in its post-reset state
    pub fn new() -> Self {
        Self {
            period: MAX_TONE_PERIOD,
            counter: 1,
            signal: 0,
        }
    }

    /// Set the period and reload the counter.
    ///
    /// The counter reload means a period change takes effect immediately, as
    /// on the next divider reload of the real chip. Period 0 is treated as 1
    /// so the divider can never stall.
    #[inline]
    pub fn set_period(&mut self, period: u16) {
        self.period = period.max(1);
        self.counter = self.period;
    }

    /// Get the current period
    #[inline]
    pub fn period(&self) -> u16 {
        self.period
    }

    /// Current square-wave level (0 or 1)
    #[inline]
    pub fn signal(&self) -> u8 {
        self.signal
    }

    /// Advance by one synthesis step (one 16-clock unit)
    #[inline]
    pub fn tick(&mut self) {
        self.counter -= 1;
        if self.counter == 0 {
            self.counter = self.period;
            self.signal ^= 1;
        }
    }

    /// Reset to the silent sentinel state
    pub fn reset(&mut self) {
        self.period = MAX_TONE_PERIOD;
        self.counter = 1;
        self.signal = 0;
    }
}

impl Default for ToneGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Noise generator shared by all three channels.
///
/// Same down-counter scheme as the tone generators, but a reload redraws a
/// fresh bit from the injected [`NoiseSource`] instead of inverting.
#[derive(Debug, Clone)]
pub struct NoiseGenerator<S: NoiseSource = Lfsr17> {
    period: u16,
    counter: u16,
    signal: u8,
    source: S,
}

impl NoiseGenerator<Lfsr17> {
    /// Create a noise generator with the default LFSR bit source
    pub fn new() -> Self {
        Self::with_source(Lfsr17::new())
    }
}

impl Default for NoiseGenerator<Lfsr17> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: NoiseSource> NoiseGenerator<S> {
    /// Create a noise generator with a custom bit source
    pub fn with_source(source: S) -> Self {
        Self {
            period: MAX_NOISE_PERIOD,
            counter: 1,
            signal: 0,
            source,
        }
    }

    /// Set the 5-bit period and reload the counter. Period 0 is treated as 1.
    #[inline]
    pub fn set_period(&mut self, period: u16) {
        self.period = (period & MAX_NOISE_PERIOD).max(1);
        self.counter = self.period;
    }

    /// Get the current period
    #[inline]
    pub fn period(&self) -> u16 {
        self.period
    }

    /// Current noise level (0 or 1)
    #[inline]
    pub fn signal(&self) -> u8 {
        self.signal
    }

    /// Advance by one synthesis step
    #[inline]
    pub fn tick(&mut self) {
        self.counter -= 1;
        if self.counter == 0 {
            self.counter = self.period;
            self.signal = self.source.next_bit() & 1;
        }
    }

    /// Reset period, counter and output level
    pub fn reset(&mut self) {
        self.period = MAX_NOISE_PERIOD;
        self.counter = 1;
        self.signal = 0;
    }
}

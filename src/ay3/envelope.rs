//! AY-3-8913 envelope generator
//!
//! A 16-step amplitude-ramp state machine advancing at 1/16th the synthesis
//! rate (once per 256 chip clocks). Four shape bits in R13 select between the
//! 16 documented hardware shapes: a single ramp in the first period, then
//! silence, a held level, a repeated ramp or an alternating ramp.

use bitflags::bitflags;

bitflags! {
    /// Envelope shape control bits (R13 low nibble)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EnvelopeShape: u8 {
        /// Hold the final level after the first period
        const HOLD = 0x01;
        /// Invert the ramp direction on every period
        const ALTERNATE = 0x02;
        /// Ramp upward (downward when clear)
        const ATTACK = 0x04;
        /// Keep running after the first period (decay to 0 when clear)
        const CONTINUE = 0x08;
    }
}

impl EnvelopeShape {
    /// Decode shape bits from a raw R13 value (low 4 bits significant)
    pub fn from_register(value: u8) -> Self {
        EnvelopeShape::from_bits_truncate(value & 0x0F)
    }
}

/// Envelope generator state.
///
/// `remaining` counts down the envelope-rate cycles left in the current
/// period; `period_counter` counts completed periods (0 until the first
/// period starts, 1 throughout the first period).
#[derive(Debug, Clone)]
pub struct EnvelopeGenerator {
    remaining: u32,
    period_counter: u32,
    value: u8,
}

impl EnvelopeGenerator {
    /// Create a new envelope generator in its reset state
    pub fn new() -> Self {
        Self {
            remaining: 1,
            period_counter: 0,
            value: 0,
        }
    }

    /// Restart the envelope.
    ///
    /// Invoked on creation, on chip reset, and on every write to the shape
    /// register regardless of the written value.
    pub fn reset(&mut self) {
        self.remaining = 1;
        self.period_counter = 0;
        self.value = 0;
    }

    /// Last computed envelope level (0-15)
    #[inline]
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Number of completed envelope periods
    #[inline]
    pub fn period_counter(&self) -> u32 {
        self.period_counter
    }

    /// Advance by one envelope step and recompute the output level.
    ///
    /// `period` is the raw R11/R12 value; the internal period length is
    /// `period + 1` envelope steps, divided into 16 linear segments.
    pub fn advance(&mut self, period: u16, shape: EnvelopeShape) -> u8 {
        let length = period as u32 + 1;

        self.remaining -= 1;
        if self.remaining == 0 {
            self.remaining = length;
            self.period_counter += 1;
        }

        // A period rewrite can leave `remaining` above the new length; treat
        // that as the start of the ramp until the next reload.
        let step = (length.saturating_sub(self.remaining) * 16 / length) as u8;

        let attack = shape.contains(EnvelopeShape::ATTACK);
        let ramp = if attack { step } else { 15 - step };

        self.value = if self.period_counter <= 1 {
            // First period: a single ramp, direction set by attack
            ramp
        } else if !shape.contains(EnvelopeShape::CONTINUE) {
            // Decayed to silence
            0
        } else if shape.contains(EnvelopeShape::HOLD) {
            if shape.contains(EnvelopeShape::ALTERNATE) != attack {
                15
            } else {
                0
            }
        } else if !shape.contains(EnvelopeShape::ALTERNATE) {
            // Repeat the first-period ramp indefinitely
            ramp
        } else if (self.period_counter % 2 == 0) != attack {
            // Ramp direction flips each period, keyed off period parity
            step
        } else {
            15 - step
        };
        self.value
    }
}

impl Default for EnvelopeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

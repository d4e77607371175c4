//! AY-3-8913 register map
//!
//! The PSG has 16 addressable 8-bit registers. R14/R15 are the chip's own I/O
//! ports, which are not wired on this board but still occupy register slots.

/// Number of addressable PSG registers
pub const REG_COUNT: usize = 16;

/// AY-3-8913 register address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// Channel A tone period, fine byte - R0
    ToneAFine = 0x00,
    /// Channel A tone period, coarse nibble - R1
    ToneACoarse = 0x01,
    /// Channel B tone period, fine byte - R2
    ToneBFine = 0x02,
    /// Channel B tone period, coarse nibble - R3
    ToneBCoarse = 0x03,
    /// Channel C tone period, fine byte - R4
    ToneCFine = 0x04,
    /// Channel C tone period, coarse nibble - R5
    ToneCCoarse = 0x05,
    /// Noise period (5 bits) - R6
    NoisePeriod = 0x06,
    /// Mixer enable mask (active-low bits) - R7
    MixerControl = 0x07,
    /// Channel A amplitude / envelope mode - R8
    AmplitudeA = 0x08,
    /// Channel B amplitude / envelope mode - R9
    AmplitudeB = 0x09,
    /// Channel C amplitude / envelope mode - R10
    AmplitudeC = 0x0A,
    /// Envelope period, fine byte - R11
    EnvelopeFine = 0x0B,
    /// Envelope period, coarse byte - R12
    EnvelopeCoarse = 0x0C,
    /// Envelope shape (low 4 bits); any write restarts the envelope - R13
    EnvelopeShape = 0x0D,
    /// I/O port A data (unwired on this board) - R14
    PortA = 0x0E,
    /// I/O port B data (unwired on this board) - R15
    PortB = 0x0F,
}

impl Register {
    /// Convert a raw register number to a `Register`.
    ///
    /// Out-of-range addresses are masked to 0..=15; this is the crate-wide
    /// clamp policy for register indices.
    pub fn from_addr(addr: u8) -> Self {
        match addr & 0x0F {
            0x00 => Register::ToneAFine,
            0x01 => Register::ToneACoarse,
            0x02 => Register::ToneBFine,
            0x03 => Register::ToneBCoarse,
            0x04 => Register::ToneCFine,
            0x05 => Register::ToneCCoarse,
            0x06 => Register::NoisePeriod,
            0x07 => Register::MixerControl,
            0x08 => Register::AmplitudeA,
            0x09 => Register::AmplitudeB,
            0x0A => Register::AmplitudeC,
            0x0B => Register::EnvelopeFine,
            0x0C => Register::EnvelopeCoarse,
            0x0D => Register::EnvelopeShape,
            0x0E => Register::PortA,
            _ => Register::PortB,
        }
    }

    /// Get the register address value
    pub fn addr(&self) -> u8 {
        *self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_conversion() {
        assert_eq!(Register::from_addr(0x00), Register::ToneAFine);
        assert_eq!(Register::from_addr(0x0D), Register::EnvelopeShape);
        assert_eq!(Register::from_addr(0x0F), Register::PortB);
        // Out-of-range addresses wrap
        assert_eq!(Register::from_addr(0x10), Register::ToneAFine);
        assert_eq!(Register::from_addr(0xFF), Register::PortB);
    }

    #[test]
    fn test_register_addr_round_trip() {
        for addr in 0..REG_COUNT as u8 {
            assert_eq!(Register::from_addr(addr).addr(), addr);
        }
    }
}

//! AY-3-8913 output mixer
//!
//! Gates the three tone signals and the shared noise signal through the
//! mixer control register (R7), then combines the amplitude-scaled channels
//! into one 8-bit output sample.
//!
//! R7 bits are active-low enables, matching the hardware: a set bit
//! *disables* the corresponding source.

use bitflags::bitflags;

use super::generators::NUM_CHANNELS;

bitflags! {
    /// Mixer control register (R7) bitflags. 1 = disable, 0 = enable.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MixerFlags: u8 {
        /// Channel A tone disable
        const TONE_A = 0x01;
        /// Channel B tone disable
        const TONE_B = 0x02;
        /// Channel C tone disable
        const TONE_C = 0x04;
        /// Channel A noise disable
        const NOISE_A = 0x08;
        /// Channel B noise disable
        const NOISE_B = 0x10;
        /// Channel C noise disable
        const NOISE_C = 0x20;
    }
}

impl MixerFlags {
    /// Create mixer flags from a raw register value
    pub fn from_register(value: u8) -> Self {
        MixerFlags::from_bits_truncate(value)
    }

    /// Check if the tone gate for `channel` (0-2) is open
    pub fn tone_enabled(&self, channel: usize) -> bool {
        !self.contains(MixerFlags::from_bits_truncate(0x01 << channel))
    }

    /// Check if the noise gate for `channel` (0-2) is open
    pub fn noise_enabled(&self, channel: usize) -> bool {
        !self.contains(MixerFlags::from_bits_truncate(0x08 << channel))
    }
}

/// Audio mixer - gates and combines the three channels
#[derive(Debug, Clone)]
pub struct Mixer {
    flags: MixerFlags,
}

impl Mixer {
    /// Fixed output gain applied to the channel sum
    pub const OUTPUT_GAIN: u32 = 10;

    /// Create a new mixer with all gates open (register value 0)
    pub fn new() -> Self {
        Mixer {
            flags: MixerFlags::empty(),
        }
    }

    /// Set the mixer control register value
    pub fn set_control(&mut self, value: u8) {
        self.flags = MixerFlags::from_register(value);
    }

    /// Get the current mixer control value
    pub fn control(&self) -> u8 {
        self.flags.bits()
    }

    /// Gate the tone and noise signals per channel.
    ///
    /// Each channel yields `tone_gate * tone + noise_gate * noise`; with both
    /// gates open and both sources high this reaches 2. The raw sum is kept
    /// deliberately, the amplitude scaling and final truncation reproduce the
    /// reference arithmetic bit for bit.
    pub fn gate(&self, tones: [u8; NUM_CHANNELS], noise: u8) -> [u8; NUM_CHANNELS] {
        let mut gated = [0u8; NUM_CHANNELS];
        for (ch, out) in gated.iter_mut().enumerate() {
            let t = if self.flags.tone_enabled(ch) {
                tones[ch]
            } else {
                0
            };
            let n = if self.flags.noise_enabled(ch) { noise } else { 0 };
            *out = t + n;
        }
        gated
    }

    /// Combine three amplitude-scaled channels into one output sample.
    ///
    /// The sum is multiplied by [`Self::OUTPUT_GAIN`] and truncated to the
    /// 8-bit sample width; overflow wraps by design.
    pub fn combine(channels: [u8; NUM_CHANNELS]) -> u8 {
        let sum: u32 = channels.iter().map(|&c| c as u32).sum();
        (sum * Self::OUTPUT_GAIN) as u8
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixer_flags_all_enabled() {
        let flags = MixerFlags::from_register(0x00);
        for ch in 0..NUM_CHANNELS {
            assert!(flags.tone_enabled(ch));
            assert!(flags.noise_enabled(ch));
        }
    }

    #[test]
    fn test_mixer_flags_all_disabled() {
        let flags = MixerFlags::from_register(0x3F);
        for ch in 0..NUM_CHANNELS {
            assert!(!flags.tone_enabled(ch));
            assert!(!flags.noise_enabled(ch));
        }
    }

    #[test]
    fn test_disabled_channel_contributes_zero() {
        let mut mixer = Mixer::new();
        // Everything off except tone B
        mixer.set_control(0x3F & !0x02);
        let gated = mixer.gate([1, 1, 1], 1);
        assert_eq!(gated, [0, 1, 0]);
    }

    #[test]
    fn test_gate_sums_tone_and_noise() {
        let mixer = Mixer::new(); // all gates open
        let gated = mixer.gate([1, 0, 1], 1);
        assert_eq!(gated, [2, 1, 2]);
    }

    #[test]
    fn test_combine_applies_gain() {
        assert_eq!(Mixer::combine([15, 0, 0]), 150);
        assert_eq!(Mixer::combine([0, 0, 0]), 0);
    }

    #[test]
    fn test_combine_wraps_at_eight_bits() {
        // 90 * 10 = 900 -> 900 mod 256 = 132; the wrap is a fidelity
        // requirement, not an accident.
        assert_eq!(Mixer::combine([30, 30, 30]), 132);
    }
}

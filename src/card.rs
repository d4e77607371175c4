//! Sound card assembly
//!
//! Couples the VIA and the PSG the way the board wires them: VIA port A is
//! the PSG data bus, PB0/PB1/PB2 are BC1/BDIR/RESET. One [`SoundCard::clock`]
//! call advances the whole card by one emulated clock pulse in the fixed
//! order the hardware implies: VIA timers first, then the bus decode against
//! the VIA's current port state, then the synthesizer.

use crate::ay3::generators::{Lfsr17, NoiseSource};
use crate::ay3::{Ay38913, TICKS_PER_SAMPLE};
use crate::via::Via;

/// PSG master clock in Hz (the 6502 bus clock feeding the card)
pub const CLOCK_HZ: u32 = 1_020_500;

/// Native output sample rate: one sample every 16 clocks. An external sink
/// drains the output buffer at this rate and resamples as it sees fit.
pub const SAMPLE_RATE: u32 = CLOCK_HZ / TICKS_PER_SAMPLE;

/// The assembled sound card: one VIA driving one AY-3-8913
#[derive(Debug)]
pub struct SoundCard<S: NoiseSource = Lfsr17> {
    via: Via,
    psg: Ay38913<S>,
}

impl SoundCard<Lfsr17> {
    /// Create a card with the default LFSR noise source
    pub fn new() -> Self {
        Self::with_noise_source(Lfsr17::new())
    }
}

impl Default for SoundCard<Lfsr17> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: NoiseSource> SoundCard<S> {
    /// Create a card with a custom noise bit source for the PSG
    pub fn with_noise_source(source: S) -> Self {
        SoundCard {
            via: Via::new(),
            psg: Ay38913::with_noise_source(source),
        }
    }

    /// Advance the card by one emulated clock pulse.
    ///
    /// Register writes issued before this call are visible within the same
    /// pulse. A PSG register read drives the value back onto the VIA's
    /// port A lines.
    pub fn clock(&mut self) {
        self.via.clock();
        let mut port_a = self.via.port_a();
        self.psg.clock(self.via.port_b(), &mut port_a);
        self.via.drive_port_a(port_a);
    }

    /// The VIA (I/O-timer core)
    pub fn via(&self) -> &Via {
        &self.via
    }

    /// Mutable access to the VIA, the CPU-facing side of the card
    pub fn via_mut(&mut self) -> &mut Via {
        &mut self.via
    }

    /// The PSG (synthesizer core)
    pub fn psg(&self) -> &Ay38913<S> {
        &self.psg
    }

    /// Mutable access to the PSG, for direct register pokes in harnesses
    pub fn psg_mut(&mut self) -> &mut Ay38913<S> {
        &mut self.psg
    }
}

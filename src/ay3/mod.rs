//! AY-3-8913 PSG emulation
//!
//! The synthesizer core: 16 addressable registers, three tone generators,
//! one noise generator, one envelope generator, the mixer and the circular
//! output buffer. The chip is clocked once per emulated bus cycle; every
//! 16th clock it advances the generators and appends one sample, and every
//! 16th synthesis step (256 clocks) it advances the envelope.

pub mod envelope;
pub mod generators;
pub mod mixer;
pub mod output;
pub mod registers;

use crate::bus::{self, BusOp};
use envelope::{EnvelopeGenerator, EnvelopeShape};
use generators::{Lfsr17, NoiseGenerator, NoiseSource, ToneGenerator, NUM_CHANNELS};
use mixer::Mixer;
use output::SampleBuffer;
use registers::{Register, REG_COUNT};

/// Clocks per synthesis step (tone/noise/mix/output cadence)
pub const TICKS_PER_SAMPLE: u32 = 16;

/// Synthesis steps per envelope step (so 256 clocks per envelope step)
pub const STEPS_PER_ENV_TICK: u32 = 16;

/// AY-3-8913 PSG emulator
///
/// Generic over the [`NoiseSource`] feeding the noise generator so tests can
/// inject a deterministic bitstream; defaults to the hardware-style LFSR.
#[derive(Clone)]
pub struct Ay38913<S: NoiseSource = Lfsr17> {
    regs: [u8; REG_COUNT],
    selected: usize,
    tones: [ToneGenerator; NUM_CHANNELS],
    noise: NoiseGenerator<S>,
    envelope: EnvelopeGenerator,
    mixer: Mixer,
    output: SampleBuffer,
    clock_div: u32,
    env_div: u32,
}

impl Ay38913<Lfsr17> {
    /// Create a new chip with the default LFSR noise source
    pub fn new() -> Self {
        Self::with_noise_source(Lfsr17::new())
    }
}

impl Default for Ay38913<Lfsr17> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: NoiseSource> Ay38913<S> {
    /// Create a new chip with a custom noise bit source
    pub fn with_noise_source(source: S) -> Self {
        let mut chip = Self {
            regs: [0; REG_COUNT],
            selected: 0,
            tones: std::array::from_fn(|_| ToneGenerator::new()),
            noise: NoiseGenerator::with_source(source),
            envelope: EnvelopeGenerator::new(),
            mixer: Mixer::new(),
            output: SampleBuffer::new(),
            clock_div: 0,
            env_div: 0,
        };
        chip.reset();
        chip
    }

    /// Full chip reset, as driven by the bus RESET line.
    ///
    /// Clears the register file and the selected-register latch, loads the
    /// silent sentinel periods (tone 4095, noise 31) with all signals low,
    /// restarts the envelope, zeroes the output buffer and rewinds its
    /// cursor, and clears the clock dividers.
    pub fn reset(&mut self) {
        self.regs = [0; REG_COUNT];
        self.selected = 0;
        for tone in &mut self.tones {
            tone.reset();
        }
        self.noise.reset();
        self.envelope.reset();
        self.mixer.set_control(0);
        self.output.clear();
        self.clock_div = 0;
        self.env_div = 0;
    }

    /// Advance the chip by one clock pulse.
    ///
    /// `port_b` carries the BC1/BDIR/RESET control lines, `port_a` is the
    /// shared data bus: a write or latch consumes it, a read drives the
    /// selected register's value back onto it. While RESET is held low the
    /// chip re-enters its reset state every clock and nothing else runs
    /// (level-sensitive, as on the real line).
    pub fn clock(&mut self, port_b: u8, port_a: &mut u8) {
        match bus::decode(port_b) {
            BusOp::Reset => {
                self.reset();
                return;
            }
            BusOp::Inactive => {}
            BusOp::Read => *port_a = self.read_register(self.selected as u8),
            BusOp::Write => self.write_register(self.selected as u8, *port_a),
            BusOp::Latch => self.selected = (*port_a & 0x0F) as usize,
        }
        self.step();
    }

    /// Read a register value. Addresses are masked to 0..=15.
    pub fn read_register(&self, addr: u8) -> u8 {
        self.regs[(addr & 0x0F) as usize]
    }

    /// Write a register value and apply its side effects.
    ///
    /// Addresses are masked to 0..=15. Writes to R0-R5 recompute and reload
    /// the channel period, R6 the noise period, R7 the mixer gates; any write
    /// to R13 restarts the envelope, even when rewriting the same shape.
    pub fn write_register(&mut self, addr: u8, value: u8) {
        let reg = Register::from_addr(addr);
        self.regs[reg as usize] = value;
        match reg {
            Register::ToneAFine | Register::ToneACoarse => self.reload_tone_period(0),
            Register::ToneBFine | Register::ToneBCoarse => self.reload_tone_period(1),
            Register::ToneCFine | Register::ToneCCoarse => self.reload_tone_period(2),
            Register::NoisePeriod => self.noise.set_period((value & 0x1F) as u16),
            Register::MixerControl => self.mixer.set_control(value),
            Register::EnvelopeShape => self.envelope.reset(),
            _ => {}
        }
    }

    /// Currently latched register index
    pub fn selected_register(&self) -> u8 {
        self.selected as u8
    }

    /// Current envelope output level (0-15)
    pub fn envelope_level(&self) -> u8 {
        self.envelope.value()
    }

    /// The circular output buffer
    pub fn output(&self) -> &SampleBuffer {
        &self.output
    }

    fn reload_tone_period(&mut self, channel: usize) {
        let fine = self.regs[channel * 2] as u16;
        let coarse = (self.regs[channel * 2 + 1] & 0x0F) as u16;
        self.tones[channel].set_period(fine | (coarse << 8));
    }

    /// Synthesis pipeline, gated to every 16th clock: advance the tone and
    /// noise dividers, gate through the mixer, advance the envelope on every
    /// 16th step, scale by fixed or envelope amplitude and append the
    /// combined sample.
    fn step(&mut self) {
        self.clock_div += 1;
        if self.clock_div < TICKS_PER_SAMPLE {
            return;
        }
        self.clock_div = 0;

        for tone in &mut self.tones {
            tone.tick();
        }
        self.noise.tick();

        let signals = [
            self.tones[0].signal(),
            self.tones[1].signal(),
            self.tones[2].signal(),
        ];
        let gated = self.mixer.gate(signals, self.noise.signal());

        self.env_div += 1;
        if self.env_div == STEPS_PER_ENV_TICK {
            self.env_div = 0;
            let period = self.regs[Register::EnvelopeFine as usize] as u16
                | ((self.regs[Register::EnvelopeCoarse as usize] as u16) << 8);
            let shape = EnvelopeShape::from_register(self.regs[Register::EnvelopeShape as usize]);
            self.envelope.advance(period, shape);
        }

        let mut scaled = [0u8; NUM_CHANNELS];
        for (ch, out) in scaled.iter_mut().enumerate() {
            let amp = self.regs[Register::AmplitudeA as usize + ch];
            let level = if amp & 0x10 != 0 {
                self.envelope.value()
            } else {
                amp & 0x0F
            };
            *out = gated[ch] * level;
        }
        self.output.push(Mixer::combine(scaled));
    }
}

impl<S: NoiseSource> std::fmt::Debug for Ay38913<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ay38913")
            .field("regs", &self.regs)
            .field("selected", &self.selected)
            .field("cursor", &self.output.cursor())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{BC1, BDIR, RESET_B};

    const INACTIVE: u8 = RESET_B;

    fn idle_clocks<S: NoiseSource>(chip: &mut Ay38913<S>, n: usize) {
        let mut port_a = 0;
        for _ in 0..n {
            chip.clock(INACTIVE, &mut port_a);
        }
    }

    #[test]
    fn test_register_round_trip() {
        let mut chip = Ay38913::new();
        for reg in [6, 7, 8, 9, 10, 11, 12, 14, 15] {
            chip.write_register(reg, 0x5A);
            assert_eq!(chip.read_register(reg), 0x5A);
        }
    }

    #[test]
    fn test_out_of_range_address_masked() {
        let mut chip = Ay38913::new();
        chip.write_register(0x17, 0x2A);
        assert_eq!(chip.read_register(0x07), 0x2A);
    }

    #[test]
    fn test_sample_cadence() {
        let mut chip = Ay38913::new();
        idle_clocks(&mut chip, 15);
        assert_eq!(chip.output().cursor(), 0);
        idle_clocks(&mut chip, 1);
        assert_eq!(chip.output().cursor(), 1);
        idle_clocks(&mut chip, 160);
        assert_eq!(chip.output().cursor(), 11);
    }

    #[test]
    fn test_bus_latch_write_read() {
        let mut chip = Ay38913::new();

        let mut port_a = 0x07;
        chip.clock(RESET_B | BDIR | BC1, &mut port_a); // latch R7
        assert_eq!(chip.selected_register(), 7);

        port_a = 0x3E;
        chip.clock(RESET_B | BDIR, &mut port_a); // write
        assert_eq!(chip.read_register(7), 0x3E);

        port_a = 0x00;
        chip.clock(RESET_B | BC1, &mut port_a); // read drives the bus
        assert_eq!(port_a, 0x3E);
    }

    #[test]
    fn test_latch_value_masked() {
        let mut chip = Ay38913::new();
        let mut port_a = 0xF3;
        chip.clock(RESET_B | BDIR | BC1, &mut port_a);
        assert_eq!(chip.selected_register(), 3);
    }

    #[test]
    fn test_envelope_shape_write_restarts() {
        let mut chip = Ay38913::new();
        chip.write_register(11, 15); // envelope period 15 -> 16 steps/period
        chip.write_register(13, 0x00); // decay shape

        idle_clocks(&mut chip, 256);
        assert_eq!(chip.envelope_level(), 15);
        idle_clocks(&mut chip, 256);
        assert_eq!(chip.envelope_level(), 14);

        // Rewriting the same shape restarts the ramp from the top
        chip.write_register(13, 0x00);
        assert_eq!(chip.envelope_level(), 0);
        idle_clocks(&mut chip, 256);
        assert_eq!(chip.envelope_level(), 15);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut chip = Ay38913::new();
        chip.write_register(0, 64);
        chip.write_register(8, 0x0F);
        chip.write_register(7, 0x3E);
        idle_clocks(&mut chip, 16 * 40);
        assert_ne!(chip.output().cursor(), 0);

        let mut port_a = 0;
        chip.clock(0x00, &mut port_a); // RESET asserted
        assert_eq!(chip.read_register(0), 0);
        assert_eq!(chip.read_register(8), 0);
        assert_eq!(chip.output().cursor(), 0);
        assert!(chip.output().as_slice().iter().all(|&s| s == 0));
    }

    #[test]
    fn test_reset_is_level_sensitive() {
        let mut chip = Ay38913::new();
        let mut port_a = 0;
        // Holding RESET low keeps the chip pinned; no samples are produced.
        for _ in 0..100 {
            chip.clock(0x00, &mut port_a);
            assert_eq!(chip.output().cursor(), 0);
        }
    }

    #[test]
    fn test_fixed_amplitude_output_levels() {
        let mut chip = Ay38913::new();
        chip.write_register(7, 0x3E); // tone A only
        chip.write_register(8, 0x0F); // fixed amplitude 15
        chip.write_register(0, 2); // period 2
        chip.write_register(1, 0);

        // Counter loaded with 2: the signal flips on every 2nd step, so the
        // sample stream alternates in pairs starting one step in.
        let mut samples = Vec::new();
        for _ in 0..8 {
            idle_clocks(&mut chip, 16);
            samples.push(chip.output().latest());
        }
        assert_eq!(samples, vec![0, 150, 150, 0, 0, 150, 150, 0]);
    }
}

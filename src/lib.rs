//! Mockingboard sound card emulation
//!
//! A cycle-accurate emulator of the classic Apple II sound card add-on: a
//! General Instruments AY-3-8913 Programmable Sound Generator driven by a
//! WDC 6522 Versatile Interface Adapter. The two chips are wired the way the
//! board wires them: VIA port A is the PSG data bus, VIA port B carries the
//! BC1/BDIR control lines and the active-low reset line.
//!
//! # Features
//! - All 3 tone channels, noise and envelope generators, bit-exact register
//!   semantics and write side effects
//! - BDIR/BC1 bus protocol decoding with level-sensitive reset
//! - 6522 ports with per-pin direction control, dual 16-bit countdown timers
//!   (one-shot and continuous), interrupt flag/enable bookkeeping and an
//!   externally wired IRQ hook
//! - One output sample every 16 clocks into a circular buffer for an
//!   external audio sink to drain
//!
//! # Quick start
//! ```
//! use mockingboard::via::registers::{DDRA, DDRB, ORA, ORB};
//! use mockingboard::SoundCard;
//!
//! let mut card = SoundCard::new();
//! // All VIA pins drive the PSG bus.
//! card.via_mut().write_register(DDRA as u8, 0xFF);
//! card.via_mut().write_register(DDRB as u8, 0xFF);
//!
//! // Latch register 8 (channel A amplitude), then write 0x0F to it.
//! card.via_mut().write_register(ORA as u8, 0x08);
//! card.via_mut().write_register(ORB as u8, 0b111); // latch
//! card.clock();
//! card.via_mut().write_register(ORA as u8, 0x0F);
//! card.via_mut().write_register(ORB as u8, 0b110); // write
//! card.clock();
//! card.via_mut().write_register(ORB as u8, 0b100); // back to inactive
//!
//! for _ in 0..16 {
//!     card.clock(); // one output sample per 16 clocks
//! }
//! assert_eq!(card.psg().read_register(8), 0x0F);
//! ```

#![warn(missing_docs)]

pub mod ay3; // AY-3-8913 PSG emulation (core)
pub mod bus; // BDIR/BC1/RESET bus protocol decoding
pub mod card; // Sound card assembly (clock coupling)
pub mod via; // WDC 6522 VIA emulation

/// Error types for sound card emulator operations
///
/// The core clocking and register-access paths are pure state transitions and
/// never fail; errors only arise from invalid configuration.
#[derive(thiserror::Error, Debug)]
pub enum MockingboardError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for MockingboardError {
    /// Converts a String into `MockingboardError::Other`.
    ///
    /// Convenience conversion for generic string errors. Prefer the specific
    /// variant constructors where the error type is known.
    fn from(msg: String) -> Self {
        MockingboardError::Other(msg)
    }
}

impl From<&str> for MockingboardError {
    /// Converts a string slice into `MockingboardError::Other`.
    fn from(msg: &str) -> Self {
        MockingboardError::Other(msg.to_string())
    }
}

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, MockingboardError>;

// Public API exports
pub use ay3::generators::{Lfsr17, NoiseSource};
pub use ay3::Ay38913;
pub use bus::BusOp;
pub use card::SoundCard;
pub use via::Via;

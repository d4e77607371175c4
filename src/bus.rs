//! AY-3-8913 bus protocol decoding
//!
//! On the Mockingboard the PSG has no address pins of its own; the host talks
//! to it through the VIA's port B control lines:
//!
//! - PB0 -> BC1
//! - PB1 -> BDIR
//! - PB2 -> RESET (active low)
//! - remaining pins unused
//!
//! The BDIR/BC1 pair selects one of four bus states each clock. Reset is
//! level-sensitive and overrides everything else while asserted.

/// PB0: BC1 control line
pub const BC1: u8 = 0x01;
/// PB1: BDIR control line
pub const BDIR: u8 = 0x02;
/// PB2: RESET line, active low
pub const RESET_B: u8 = 0x04;

/// Decoded bus operation for one clock pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
    /// RESET line low: full chip reset, nothing else happens this clock
    Reset,
    /// No register access
    Inactive,
    /// Copy the selected register onto the data bus (port A)
    Read,
    /// Store the data bus value into the selected register
    Write,
    /// Store the data bus value as the selected register index
    Latch,
}

/// Decode the PSG bus operation from the VIA's current port B state.
///
/// Evaluated every clock pulse, even when the result is [`BusOp::Inactive`]:
/// the synthesis dividers advance regardless of bus activity.
pub fn decode(port_b: u8) -> BusOp {
    if port_b & RESET_B == 0 {
        return BusOp::Reset;
    }
    match (port_b & BDIR != 0, port_b & BC1 != 0) {
        (false, false) => BusOp::Inactive,
        (false, true) => BusOp::Read,
        (true, false) => BusOp::Write,
        (true, true) => BusOp::Latch,
    }
}

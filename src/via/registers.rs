//! WDC 6522 register map and control bits
//!
//! The VIA exposes 16 registers selected by RS0-RS3. Several addresses serve
//! double duty: register 0 is the port B output register on writes and the
//! port B input register on reads (likewise register 1 for port A), and the
//! timer 1 counter addresses redirect writes into the latches.

use bitflags::bitflags;

/// Output register B (writes to address 0)
pub const ORB: usize = 0;
/// Input register B (reads from address 0)
pub const IRB: usize = 0;
/// Output register A (writes to address 1)
pub const ORA: usize = 1;
/// Input register A (reads from address 1)
pub const IRA: usize = 1;
/// Data direction register B (1 = output pin)
pub const DDRB: usize = 2;
/// Data direction register A (1 = output pin)
pub const DDRA: usize = 3;
/// Timer 1 low-order counter (writes go to the latch)
pub const T1CL: usize = 4;
/// Timer 1 high-order counter (writes load latch, then counter)
pub const T1CH: usize = 5;
/// Timer 1 low-order latch
pub const T1LL: usize = 6;
/// Timer 1 high-order latch
pub const T1LH: usize = 7;
/// Timer 2 low-order counter
pub const T2CL: usize = 8;
/// Timer 2 high-order counter
pub const T2CH: usize = 9;
/// Shift register (unwired on this board)
pub const SR: usize = 10;
/// Auxiliary control register
pub const ACR: usize = 11;
/// Peripheral control register
pub const PCR: usize = 12;
/// Interrupt flag register
pub const IFR: usize = 13;
/// Interrupt enable register
pub const IER: usize = 14;
/// Output register A without handshake (writes to address 15)
pub const ORA2: usize = 15;
/// Input register A without handshake (reads from address 15)
pub const IRA2: usize = 15;

/// Number of addressable VIA registers
pub const REG_COUNT: usize = 16;

bitflags! {
    /// Interrupt bits, shared layout between IFR and IER.
    ///
    /// In the IFR, `ANY` (bit 7) summarizes "some enabled flag is pending".
    /// In the IER, bit 7 of a *written* value selects set-vs-clear semantics
    /// for the remaining bits; the stored value always holds the net enable
    /// mask. Only the timer bits are wired on this board.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Interrupts: u8 {
        /// Timer 2 expired
        const TIMER2 = 0x20;
        /// Timer 1 expired
        const TIMER1 = 0x40;
        /// Any-interrupt summary bit
        const ANY = 0x80;
    }
}

bitflags! {
    /// Auxiliary control register bits (timer control only; the shift
    /// register and PB7 output modes are unwired on this board)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AuxControl: u8 {
        /// Timer 1 free-run: reload from the latch on every expiry
        const T1_CONTINUOUS = 0x40;
    }
}

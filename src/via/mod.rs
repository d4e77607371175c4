//! WDC 6522 VIA emulation
//!
//! The I/O-timer core of the card: two 8-bit ports with per-pin direction
//! control, two 16-bit countdown timers with one-shot/continuous modes, and
//! the interrupt flag/enable bookkeeping. On this board port A is the PSG
//! data bus and port B's low three pins carry the PSG control lines.
//!
//! Unwired features of the real chip (shift register, CA/CB handshake lines,
//! timer 2 pulse-counting mode) are not modeled; their registers still exist
//! as plain storage.

pub mod registers;

use registers::{
    AuxControl, Interrupts, ACR, DDRA, DDRB, IER, IFR, IRA, IRA2, IRB, ORA, ORA2, ORB, REG_COUNT,
    T1CH, T1CL, T1LH, T1LL, T2CH, T2CL,
};

/// Merge a port write: only output-configured pins are driven, input pins
/// keep their externally-driven level.
#[inline]
fn write_port(direction: u8, value: u8, port: u8) -> u8 {
    (value & direction) | (port & !direction)
}

/// Merge a port read: input pins reflect the line level, output pins read
/// back the last written register value.
#[inline]
fn read_port(direction: u8, reg: u8, port: u8) -> u8 {
    (port & !direction) | (reg & direction)
}

/// WDC 6522 VIA emulator
pub struct Via {
    regs: [u8; REG_COUNT],
    port_a: u8,
    port_b: u8,
    irq: Option<Box<dyn FnMut() + Send>>,
}

impl Via {
    /// Create a new VIA in its power-on state: ports low, all interrupts
    /// disabled, no flags pending.
    pub fn new() -> Self {
        let mut regs = [0u8; REG_COUNT];
        regs[IER] = 0x80;
        Via {
            regs,
            port_a: 0,
            port_b: 0,
            irq: None,
        }
    }

    /// Install the host interrupt hook, called whenever the VIA asserts a
    /// newly enabled interrupt condition. Delivery is the host's business;
    /// without a hook the assertion is a no-op.
    pub fn set_irq_handler(&mut self, handler: impl FnMut() + Send + 'static) {
        self.irq = Some(Box::new(handler));
    }

    /// Current port A line state
    pub fn port_a(&self) -> u8 {
        self.port_a
    }

    /// Current port B line state
    pub fn port_b(&self) -> u8 {
        self.port_b
    }

    /// Drive the port A lines externally (peripheral side). Pins configured
    /// as outputs will be re-driven by the next ORA write; reads of
    /// input-configured pins see this level.
    pub fn drive_port_a(&mut self, lines: u8) {
        self.port_a = lines;
    }

    /// Drive the port B lines externally (peripheral side)
    pub fn drive_port_b(&mut self, lines: u8) {
        self.port_b = lines;
    }

    /// Advance the VIA by one clock: both timers count down as chained 8-bit
    /// bytes and expire when both bytes reach zero.
    pub fn clock(&mut self) {
        self.regs[T1CL] = self.regs[T1CL].wrapping_sub(1);
        if self.regs[T1CL] == 0xFF {
            self.regs[T1CH] = self.regs[T1CH].wrapping_sub(1);
        }
        if self.regs[T1CL] == 0 && self.regs[T1CH] == 0 {
            self.timer1_expire();
        }

        self.regs[T2CL] = self.regs[T2CL].wrapping_sub(1);
        if self.regs[T2CL] == 0xFF {
            self.regs[T2CH] = self.regs[T2CH].wrapping_sub(1);
        }
        if self.regs[T2CL] == 0 && self.regs[T2CH] == 0 {
            self.timer2_expire();
        }
    }

    /// Perform one chip-select bus access, the CPU-facing interface.
    ///
    /// The access happens only when CS1 is high and CS2B low. `write` selects
    /// a register write of `data`; otherwise the register is read and its
    /// value returned.
    pub fn bus_cycle(&mut self, cs1: bool, cs2b: bool, write: bool, rs: u8, data: u8) -> Option<u8> {
        if !cs1 || cs2b {
            return None;
        }
        if write {
            self.write_register(rs, data);
            None
        } else {
            Some(self.read_register(rs))
        }
    }

    /// Write a register and apply its side effects. Addresses are masked to
    /// 0..=15.
    pub fn write_register(&mut self, addr: u8, value: u8) {
        let reg = (addr & 0x0F) as usize;
        match reg {
            ORB => {
                self.regs[ORB] = value;
                self.port_b = write_port(self.regs[DDRB], value, self.port_b);
            }
            ORA | ORA2 => {
                self.regs[reg] = value;
                self.port_a = write_port(self.regs[DDRA], value, self.port_a);
            }
            // Timer 1 counter writes are redirected into the latches; the
            // high-byte write transfers both latch bytes to the live counter.
            T1CL => self.regs[T1LL] = value,
            T1CH => {
                self.regs[T1LH] = value;
                self.regs[T1CL] = self.regs[T1LL];
                self.regs[T1CH] = self.regs[T1LH];
                self.clear_interrupt(Interrupts::TIMER1);
            }
            T2CH => {
                self.regs[T2CH] = value;
                self.clear_interrupt(Interrupts::TIMER2);
            }
            IER => {
                // Bit 7 selects set-vs-clear for the remaining bits; the
                // stored byte always holds the net enable mask.
                self.regs[IER] = if value & 0x80 == 0 { !value } else { value };
            }
            _ => self.regs[reg] = value,
        }
    }

    /// Read a register and apply its side effects. Addresses are masked to
    /// 0..=15.
    ///
    /// Port reads recompute the input register from the current line state
    /// merged with the direction register; timer counter-low reads clear the
    /// corresponding interrupt flag.
    pub fn read_register(&mut self, addr: u8) -> u8 {
        let reg = (addr & 0x0F) as usize;
        match reg {
            IRB => self.regs[IRB] = read_port(self.regs[DDRB], self.regs[IRB], self.port_b),
            IRA | IRA2 => self.regs[reg] = read_port(self.regs[DDRA], self.regs[reg], self.port_a),
            T1CL => self.clear_interrupt(Interrupts::TIMER1),
            T2CL => self.clear_interrupt(Interrupts::TIMER2),
            _ => {}
        }
        self.regs[reg]
    }

    fn clear_interrupt(&mut self, flag: Interrupts) {
        self.regs[IFR] &= !flag.bits();
        // Drop the summary bit once no individual flag remains
        if self.regs[IFR] & 0x7F == 0 {
            self.regs[IFR] = 0;
        }
    }

    fn raise_interrupt(&mut self, flag: Interrupts) {
        self.regs[IFR] |= flag.bits() | Interrupts::ANY.bits();
        if self.regs[IER] & flag.bits() != 0 {
            if let Some(irq) = self.irq.as_mut() {
                irq();
            }
        }
    }

    fn timer1_expire(&mut self) {
        let continuous = self.regs[ACR] & AuxControl::T1_CONTINUOUS.bits() != 0;
        if continuous {
            self.regs[T1CL] = self.regs[T1LL];
            self.regs[T1CH] = self.regs[T1LH];
        }
        // Continuous mode flags every expiry; one-shot only while no T1
        // interrupt is already pending.
        if continuous || self.regs[IFR] & Interrupts::TIMER1.bits() == 0 {
            self.raise_interrupt(Interrupts::TIMER1);
        }
    }

    fn timer2_expire(&mut self) {
        // Pulse-counting mode needs PB6, which is not wired on this board;
        // timer 2 is one-shot only.
        if self.regs[IFR] & Interrupts::TIMER2.bits() == 0 {
            self.raise_interrupt(Interrupts::TIMER2);
        }
    }
}

impl Default for Via {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Via {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Via")
            .field("regs", &self.regs)
            .field("port_a", &self.port_a)
            .field("port_b", &self.port_b)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn irq_counter(via: &mut Via) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let hook = Arc::clone(&count);
        via.set_irq_handler(move || {
            hook.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    /// Load timer 1 via the latch protocol
    fn load_timer1(via: &mut Via, value: u16) {
        via.write_register(T1CL as u8, (value & 0xFF) as u8);
        via.write_register(T1CH as u8, (value >> 8) as u8);
    }

    #[test]
    fn test_port_b_write_respects_direction() {
        let mut via = Via::new();
        via.write_register(DDRB as u8, 0x0F); // low nibble output
        via.drive_port_b(0xA0); // external lines on the input pins
        via.write_register(ORB as u8, 0xFF);
        assert_eq!(via.port_b(), 0xAF);
    }

    #[test]
    fn test_port_read_merges_lines_and_register() {
        let mut via = Via::new();
        via.write_register(DDRA as u8, 0xF0);
        via.write_register(ORA as u8, 0x50);
        via.drive_port_a(0x5A);
        // Output pins read back the register, input pins the line level
        assert_eq!(via.read_register(IRA as u8), 0x5A);

        via.drive_port_a(0x0C);
        assert_eq!(via.read_register(IRA as u8), 0x5C);
    }

    #[test]
    fn test_port_a_no_handshake_alias() {
        let mut via = Via::new();
        via.write_register(DDRA as u8, 0xFF);
        via.write_register(ORA2 as u8, 0x42);
        assert_eq!(via.port_a(), 0x42);
    }

    #[test]
    fn test_ier_set_and_clear_semantics() {
        let mut via = Via::new();
        // Bit 7 set: store as-is (set these enables)
        via.write_register(IER as u8, 0xC0);
        assert_eq!(via.read_register(IER as u8), 0xC0);
        // Bit 7 clear: complement before storing (clear these enables)
        via.write_register(IER as u8, 0x40);
        assert_eq!(via.read_register(IER as u8), 0xBF);
    }

    #[test]
    fn test_timer1_counter_write_goes_to_latch() {
        let mut via = Via::new();
        via.write_register(T1CL as u8, 0x34);
        // Low-byte write lands in the latch, not the live counter
        assert_eq!(via.read_register(T1LL as u8), 0x34);
        assert_eq!(via.read_register(T1CL as u8), 0x00);

        via.write_register(T1CH as u8, 0x12);
        // High-byte write transfers latch -> counter
        assert_eq!(via.read_register(T1CL as u8), 0x34);
        assert_eq!(via.read_register(T1CH as u8), 0x12);
    }

    #[test]
    fn test_timer1_one_shot_flags_once() {
        let mut via = Via::new();
        let irqs = irq_counter(&mut via);
        via.write_register(IER as u8, 0xC0); // enable T1
        load_timer1(&mut via, 5);

        for _ in 0..5 {
            via.clock();
        }
        assert_eq!(
            via.read_register(IFR as u8),
            (Interrupts::TIMER1 | Interrupts::ANY).bits()
        );
        assert_eq!(irqs.load(Ordering::SeqCst), 1);

        // Counter free-runs and expires again after wrapping, but the
        // pending flag suppresses a second one-shot interrupt. (Timer 2
        // also wraps during this window; it is not enabled in the IER.)
        for _ in 0..0x10000 {
            via.clock();
        }
        assert_eq!(irqs.load(Ordering::SeqCst), 1);

        // Reading the low counter byte clears the timer 1 flag
        via.read_register(T1CL as u8);
        assert_eq!(
            via.read_register(IFR as u8) & Interrupts::TIMER1.bits(),
            0
        );
    }

    #[test]
    fn test_timer1_continuous_reloads_and_reflags() {
        let mut via = Via::new();
        let irqs = irq_counter(&mut via);
        via.write_register(IER as u8, 0xC0);
        via.write_register(ACR as u8, AuxControl::T1_CONTINUOUS.bits());
        load_timer1(&mut via, 16);

        for _ in 0..16 * 4 {
            via.clock();
        }
        assert_eq!(irqs.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_timer1_expiry_without_enable_sets_flag_only() {
        let mut via = Via::new();
        let irqs = irq_counter(&mut via);
        load_timer1(&mut via, 3);
        for _ in 0..3 {
            via.clock();
        }
        assert_eq!(
            via.read_register(IFR as u8),
            (Interrupts::TIMER1 | Interrupts::ANY).bits()
        );
        assert_eq!(irqs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_timer2_one_shot() {
        let mut via = Via::new();
        let irqs = irq_counter(&mut via);
        via.write_register(IER as u8, 0xA0); // enable T2
        via.write_register(T2CL as u8, 4);
        via.write_register(T2CH as u8, 0);

        for _ in 0..4 {
            via.clock();
        }
        assert_eq!(
            via.read_register(IFR as u8),
            (Interrupts::TIMER2 | Interrupts::ANY).bits()
        );
        assert_eq!(irqs.load(Ordering::SeqCst), 1);

        // High-byte write clears the flag
        via.write_register(T2CH as u8, 0x01);
        assert_eq!(via.read_register(IFR as u8), 0);
    }

    #[test]
    fn test_flag_clear_keeps_other_pending_flags() {
        let mut via = Via::new();
        load_timer1(&mut via, 2);
        via.write_register(T2CL as u8, 2);
        via.write_register(T2CH as u8, 0);
        for _ in 0..2 {
            via.clock();
        }
        // Both timers pending
        assert_eq!(via.read_register(IFR as u8), 0xE0);

        via.read_register(T1CL as u8);
        // T2 still pending, summary bit retained
        assert_eq!(
            via.read_register(IFR as u8),
            (Interrupts::TIMER2 | Interrupts::ANY).bits()
        );
    }

    #[test]
    fn test_bus_cycle_chip_select() {
        let mut via = Via::new();
        assert_eq!(via.bus_cycle(false, false, true, DDRA as u8, 0xFF), None);
        assert_eq!(via.read_register(DDRA as u8), 0);

        via.bus_cycle(true, false, true, DDRA as u8, 0xFF);
        assert_eq!(via.bus_cycle(true, false, false, DDRA as u8, 0), Some(0xFF));
    }
}

use std::{cell::RefCell, fmt, rc::Rc};

use derivative::Derivative;
use serde::{Deserialize, Serialize};

use crate::{error::BusError, fault, state::BusContext};

/// Size of the window the Z80 sees at $8000-$FFFF.
pub const BANK_WINDOW_SIZE: u32 = 0x8000;

/// Bank table entry holding the VDP ($C00000-$C0FFFF).
pub const VDP_BANK: u8 = 0xC0;

const BANK_MASK: u32 = 0xFF8000;
const BANK_SPAN: usize = 0x10000;

/// Upper 9 bits of the 68k address the Z80 bank window points at.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankRegister(u32);

impl BankRegister {
    pub fn new(value: u32) -> Result<Self, BusError> {
        if value & !BANK_MASK != 0 {
            return Err(BusError::MisalignedBank(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Serial write from $6000-$60FF: the new bit enters at A23.
    pub fn shift_in(&mut self, bit: u8) {
        self.0 = ((self.0 >> 1) | (((bit & 1) as u32) << 23)) & BANK_MASK;
        tracing::trace!("[BANK] Shifted in {} -> {:06X}", bit & 1, self.0);
    }

    /// 68k address for a Z80 access in the bank window.
    pub fn effective(&self, address: u16) -> u32 {
        self.0 | (address as u32 & (BANK_WINDOW_SIZE - 1))
    }
}

impl fmt::Display for BankRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${:06X}-${:06X}",
            self.0,
            self.0 + BANK_WINDOW_SIZE - 1
        )
    }
}

/// Memory-mapped device on the 68k bus, as seen through the Z80 bank.
pub trait BankHandler {
    fn read(&mut self, ctx: &mut BusContext, address: u32) -> u8;
    fn write(&mut self, ctx: &mut BusContext, address: u32, value: u8);
}

pub type SharedBuffer = Rc<RefCell<Vec<u8>>>;
pub type SharedHandler = Rc<RefCell<dyn BankHandler>>;
pub type SharedBankTable = Rc<RefCell<BankTable>>;

/// One 64K bank. Cloning only clones the handles, so an entry can be taken
/// out of the table and used after the table borrow is released.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub enum BankEntry {
    /// Plain memory: byte `offset + (address & 0xFFFF)` of `buffer`.
    Direct {
        #[derivative(Debug = "ignore")]
        buffer: SharedBuffer,
        offset: usize,
    },
    Delegate(#[derivative(Debug = "ignore")] SharedHandler),
}

impl BankEntry {
    pub fn read(&self, ctx: &mut BusContext, address: u32) -> u8 {
        match self {
            BankEntry::Delegate(handler) => handler.borrow_mut().read(ctx, address),
            BankEntry::Direct { buffer, offset } => buffer
                .borrow()
                .get(*offset + (address & 0xFFFF) as usize)
                .copied()
                .unwrap_or(0xFF),
        }
    }

    pub fn write(&self, ctx: &mut BusContext, address: u32, value: u8) {
        match self {
            BankEntry::Delegate(handler) => handler.borrow_mut().write(ctx, address, value),
            BankEntry::Direct { buffer, offset } => {
                if let Some(byte) = buffer
                    .borrow_mut()
                    .get_mut(*offset + (address & 0xFFFF) as usize)
                {
                    *byte = value;
                }
            }
        }
    }
}

/// 68k memory map split in 64K banks, indexed by address bits 23-16.
///
/// Owned by the 68k side; the Z80 bus only reads and writes through it.
/// Handlers may remap the table while they run (cartridge mappers do), so
/// the bus never holds a borrow of the table across a handler call.
#[derive(Debug)]
pub struct BankTable {
    entries: Vec<BankEntry>,
}

impl Default for BankTable {
    fn default() -> Self {
        Self::new()
    }
}

impl BankTable {
    pub fn new() -> Self {
        let unused: SharedHandler = Rc::new(RefCell::new(Unused));
        let entries = (0..256)
            .map(|_| BankEntry::Delegate(unused.clone()))
            .collect();
        Self { entries }
    }

    pub fn shared(self) -> SharedBankTable {
        Rc::new(RefCell::new(self))
    }

    pub fn entry(&self, index: u8) -> &BankEntry {
        &self.entries[index as usize]
    }

    pub fn map_handler<H: BankHandler + 'static>(&mut self, index: u8, handler: H) {
        self.map_shared(index, Rc::new(RefCell::new(handler)));
    }

    /// Maps a handler that is also reachable from elsewhere, or from several
    /// banks at once.
    pub fn map_shared(&mut self, index: u8, handler: SharedHandler) {
        self.entries[index as usize] = BankEntry::Delegate(handler);
    }

    pub fn map_direct(
        &mut self,
        index: u8,
        buffer: SharedBuffer,
        offset: usize,
    ) -> Result<(), BusError> {
        let len = buffer.borrow().len();
        if offset.saturating_add(BANK_SPAN) > len {
            return Err(BusError::BufferTooSmall { index, offset, len });
        }
        self.entries[index as usize] = BankEntry::Direct { buffer, offset };
        Ok(())
    }

    /// Maps consecutive banks `first..=last` onto consecutive 64K slices of
    /// `buffer`.
    pub fn map_buffer(&mut self, first: u8, last: u8, buffer: SharedBuffer) -> Result<(), BusError> {
        if last < first {
            return Err(BusError::EmptyBankRange { first, last });
        }
        for index in first..=last {
            let offset = (index - first) as usize * BANK_SPAN;
            self.map_direct(index, buffer.clone(), offset)?;
        }
        Ok(())
    }
}

/// Open bus on the 68k side.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unused;

impl BankHandler for Unused {
    fn read(&mut self, ctx: &mut BusContext, address: u32) -> u8 {
        fault::unused_read(ctx, address)
    }

    fn write(&mut self, ctx: &mut BusContext, address: u32, value: u8) {
        fault::unused_write(ctx, address, value);
    }
}

/// Areas that hang the Z80 when it reaches them, such as the VDP
/// mirrors past $C0001F or unmapped I/O space.
#[derive(Debug, Default, Clone, Copy)]
pub struct Lockup;

impl BankHandler for Lockup {
    fn read(&mut self, ctx: &mut BusContext, address: u32) -> u8 {
        fault::lockup_read(ctx, address)
    }

    fn write(&mut self, ctx: &mut BusContext, address: u32, value: u8) {
        fault::lockup_write(ctx, address, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_bank_register_alignment() {
        assert!(BankRegister::new(0xFF8000).is_ok());
        assert!(matches!(
            BankRegister::new(0x008001),
            Err(BusError::MisalignedBank(0x008001))
        ));
        assert!(BankRegister::new(0x1000000).is_err());
    }

    #[test]
    fn test_effective_address() {
        let bank = BankRegister::new(0x3F8000).unwrap();
        for offset in [0x0000u16, 0x1234, 0x7FFF] {
            let address = 0x8000 | offset;
            let effective = bank.effective(address);
            assert_eq!(effective, 0x3F8000 | offset as u32);
            assert_eq!(effective & 0x7FFF, offset as u32);
        }
    }

    #[test]
    fn test_shift_register_loads_nine_bits() {
        let mut bank = BankRegister::default();
        // $A10000 is bit pattern 1010 0001 0 in A23-A15, written A15 first
        let target = 0xA10000u32;
        for bit in 15..24 {
            bank.shift_in(((target >> bit) & 1) as u8);
        }
        assert_eq!(bank.value(), target);
        assert_eq!(bank.value() & 0x7FFF, 0);
    }

    #[test]
    fn test_direct_mapping_bounds() {
        let mut table = BankTable::new();
        let buffer = Rc::new(RefCell::new(vec![0u8; 0x18000]));

        assert!(table.map_direct(0x00, buffer.clone(), 0).is_ok());
        assert!(matches!(
            table.map_direct(0x01, buffer.clone(), 0x10000),
            Err(BusError::BufferTooSmall { index: 0x01, .. })
        ));
        assert!(table.map_buffer(0x20, 0x1F, buffer).is_err());
    }

    #[test]
    fn test_direct_entry_access() {
        let mut ctx = BusContext::new(Config::default());
        let mut table = BankTable::new();
        let buffer = Rc::new(RefCell::new(vec![0u8; 0x20000]));
        table.map_buffer(0x10, 0x11, buffer.clone()).unwrap();

        table.entry(0x11).write(&mut ctx, 0x11_0042, 0x5A);
        assert_eq!(buffer.borrow()[0x10042], 0x5A);
        assert_eq!(table.entry(0x11).read(&mut ctx, 0x11_0042), 0x5A);
        assert_eq!(table.entry(0x10).read(&mut ctx, 0x10_0042), 0x00);
    }

    #[test]
    fn test_default_entries_are_unused() {
        let mut ctx = BusContext::new(Config::default());
        let mut table = BankTable::new();
        assert_eq!(table.entry(0x55).read(&mut ctx, 0x55_0000), 0xFF);
        assert!(matches!(table.entry(0x55), BankEntry::Delegate(_)));
        assert!(!ctx.is_locked_up());
    }

    #[test]
    fn test_lockup_handler_halts_z80() {
        let mut ctx = BusContext::new(Config::default());
        let mut table = BankTable::new();
        table.map_handler(0xA1, Lockup);

        table.entry(0xA1).write(&mut ctx, 0xA1_2000, 0x00);
        assert!(ctx.is_locked_up());
        assert!(!ctx.run_state.is_running());
    }

    #[test]
    fn test_shared_handler_spans_banks() {
        let mut ctx = BusContext::new(Config::default());
        let mut table = BankTable::new();
        let lockup: SharedHandler = Rc::new(RefCell::new(Lockup));
        table.map_shared(0xC1, lockup.clone());
        table.map_shared(0xC2, lockup);

        let entry = table.entry(0xC2).clone();
        table.map_handler(0xC2, Unused);
        // the detached entry still reaches the old handler
        entry.read(&mut ctx, 0xC2_0000);
        assert!(ctx.is_locked_up());
        assert!(matches!(table.entry(0xC1), BankEntry::Delegate(_)));
    }
}

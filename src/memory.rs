use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

use crate::{
    arbiter,
    bank::{BankEntry, VDP_BANK},
    bus::Z80Bus,
    fault,
    utils::hexdump,
};

pub const RAM_SIZE: usize = 0x2000;

// +-------------+------------------------------------------+
// | Range       | Description                              |
// +-------------+------------------------------------------+
// | $0000-$3FFF | Z80 RAM, 8K mirrored                     |
// | $4000-$5FFF | YM2612, 4 registers mirrored             |
// | $6000-$60FF | Bank register (write only)               |
// | $6100-$7EFF | Unused                                   |
// | $7F00-$7FFF | VDP ($C00000 on the 68k bus)             |
// | $8000-$FFFF | 32K window on the 68k bus                |
// +-------------+------------------------------------------+

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Ram {
    #[serde(with = "BigArray")]
    data: [u8; RAM_SIZE],
}

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}

impl Ram {
    pub fn new() -> Self {
        Self {
            data: [0; RAM_SIZE],
        }
    }

    pub fn reset(&mut self) {
        self.data = [0; RAM_SIZE];
    }

    pub fn read(&self, address: u16) -> u8 {
        self.data[address as usize & (RAM_SIZE - 1)]
    }

    pub fn write(&mut self, address: u16, value: u8) {
        self.data[address as usize & (RAM_SIZE - 1)] = value;
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn dump(&self, start: u16, end: u16) -> String {
        hexdump(&self.data, start, end.min(RAM_SIZE as u16 - 1))
    }
}

impl Z80Bus {
    /// The table borrow ends here: a handler is free to remap banks.
    fn bank_entry(&self, index: u8) -> BankEntry {
        self.banks.borrow().entry(index).clone()
    }

    pub fn read_byte(&mut self, address: u16) -> u8 {
        match (address >> 13) & 7 {
            0 | 1 => self.ram.read(address),
            2 => self
                .devices
                .fm
                .read(self.ctx.z80.get(), (address & 3) as u8),
            3 => {
                if address >> 8 == 0x7F {
                    arbiter::request_bus_access(&mut self.ctx);
                    return self.bank_entry(VDP_BANK).read(&mut self.ctx, address as u32);
                }
                fault::unused_read(&self.ctx, address as u32)
            }
            _ => {
                arbiter::request_bus_access(&mut self.ctx);
                let address = self.ctx.bank.effective(address);
                self.bank_entry((address >> 16) as u8)
                    .read(&mut self.ctx, address)
            }
        }
    }

    pub fn write_byte(&mut self, address: u16, data: u8) {
        match (address >> 13) & 7 {
            0 | 1 => self.ram.write(address, data),
            2 => self
                .devices
                .fm
                .write(self.ctx.z80.get(), (address & 3) as u8, data),
            3 => match address >> 8 {
                0x60 => self.ctx.bank.shift_in(data & 1),
                0x7F => {
                    arbiter::request_bus_access(&mut self.ctx);
                    self.bank_entry(VDP_BANK)
                        .write(&mut self.ctx, address as u32, data);
                }
                _ => fault::unused_write(&self.ctx, address as u32, data),
            },
            _ => {
                arbiter::request_bus_access(&mut self.ctx);
                let address = self.ctx.bank.effective(address);
                self.bank_entry((address >> 16) as u8)
                    .write(&mut self.ctx, address, data);
            }
        }
    }
}

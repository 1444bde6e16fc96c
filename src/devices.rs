//! Chips the Z80 bus talks to. Only their register interfaces are modeled
//! here; the chips themselves live outside this crate.

use derivative::Derivative;

/// FM synthesis chip: the YM2612 on the Mega Drive, the YM2413 on the
/// Master System FM unit.
pub trait SoundChip {
    fn write(&mut self, cycle: u32, register: u8, value: u8);
    fn read(&mut self, cycle: u32, register: u8) -> u8;
}

/// SN76489 programmable sound generator.
pub trait SoundGenerator {
    fn write(&mut self, cycle: u32, value: u8);
    /// `mute_mask` is 0xFF with every channel audible, 0x00 with the PSG
    /// silenced.
    fn configure(&mut self, cycle: u32, amplifier_level: u32, mute_mask: u8);
}

/// Which control port decoder the VDP exposes to the Z80.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPort {
    /// 315-5313, Mega Drive VDP in Mode 4.
    MegaDrive,
    /// 315-5124 / 315-5246.
    MasterSystem,
    /// TMS9918 compatible register layout.
    Tms9918,
}

pub trait VideoPort {
    fn write_data(&mut self, value: u8);
    fn read_data(&mut self) -> u8;
    fn write_control(&mut self, port: ControlPort, value: u8);
    fn read_control(&mut self, cycle: u32) -> u8;
    fn hv_counter(&mut self, cycle: u32) -> u16;
}

/// Controller I/O chip.
pub trait ControllerPort {
    /// `parity` selects $3E/$3F. `cycle` is when the write reaches the chip.
    fn write(&mut self, parity: u8, value: u8, cycle: u32);
    /// `parity` selects $DC/$DD.
    fn read(&mut self, parity: u8) -> u8;

    /// Game Gear specific registers at ports $00-$06.
    fn handheld_read(&mut self, _port: u8) -> u8 {
        0xFF
    }

    fn handheld_write(&mut self, _port: u8, _value: u8) {}
}

/// Side-effect free view of the Z80 memory map, used to recover the value
/// left floating on the data bus.
pub trait ReadMap {
    fn peek(&self, address: u16) -> u8;
}

/// Stand-in for a chip that is not fitted. Reads float high.
#[derive(Debug, Default, Clone, Copy)]
pub struct Disconnected;

impl SoundChip for Disconnected {
    fn write(&mut self, _cycle: u32, _register: u8, _value: u8) {}

    fn read(&mut self, _cycle: u32, _register: u8) -> u8 {
        0xFF
    }
}

impl SoundGenerator for Disconnected {
    fn write(&mut self, _cycle: u32, _value: u8) {}

    fn configure(&mut self, _cycle: u32, _amplifier_level: u32, _mute_mask: u8) {}
}

impl VideoPort for Disconnected {
    fn write_data(&mut self, _value: u8) {}

    fn read_data(&mut self) -> u8 {
        0xFF
    }

    fn write_control(&mut self, _port: ControlPort, _value: u8) {}

    fn read_control(&mut self, _cycle: u32) -> u8 {
        0xFF
    }

    fn hv_counter(&mut self, _cycle: u32) -> u16 {
        0xFFFF
    }
}

impl ControllerPort for Disconnected {
    fn write(&mut self, _parity: u8, _value: u8, _cycle: u32) {}

    fn read(&mut self, _parity: u8) -> u8 {
        0xFF
    }
}

impl ReadMap for Disconnected {
    fn peek(&self, _address: u16) -> u8 {
        0xFF
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct Peripherals {
    #[derivative(Debug = "ignore")]
    pub vdp: Box<dyn VideoPort>,
    #[derivative(Debug = "ignore")]
    pub psg: Box<dyn SoundGenerator>,
    #[derivative(Debug = "ignore")]
    pub fm: Box<dyn SoundChip>,
    #[derivative(Debug = "ignore")]
    pub io: Box<dyn ControllerPort>,
    #[derivative(Debug = "ignore")]
    pub read_map: Box<dyn ReadMap>,
}

impl Default for Peripherals {
    fn default() -> Self {
        Self {
            vdp: Box::new(Disconnected),
            psg: Box::new(Disconnected),
            fm: Box::new(Disconnected),
            io: Box::new(Disconnected),
            read_map: Box::new(Disconnected),
        }
    }
}

#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use tracing_subscriber::fmt;
use z80bus::{
    ControlPort, ControllerPort, ConsoleModel, ReadMap, Region, SoundChip, SoundGenerator,
    VideoPort, Z80Bus, Z80BusBuilder,
};

#[ctor::ctor]
fn init() {
    let fmt_subscriber = fmt::Subscriber::builder()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .with_test_writer()
        .finish();
    tracing::subscriber::set_global_default(fmt_subscriber)
        .expect("Unable to set global tracing subscriber");
}

pub const FM_VALUE: u8 = 0x3C;
pub const VDP_DATA: u8 = 0x5A;
pub const VDP_STATUS: u8 = 0x9F;

pub fn io_value(parity: u8) -> u8 {
    0xD0 | parity
}

pub fn handheld_value(port: u8) -> u8 {
    0x60 | port
}

/// What the floating data bus shows for an opcode fetched at `address`.
pub fn opcode_at(address: u16) -> u8 {
    (address >> 8) as u8 ^ address as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    FmWrite { cycle: u32, register: u8, value: u8 },
    FmRead { cycle: u32, register: u8 },
    PsgWrite { cycle: u32, value: u8 },
    PsgConfigure { cycle: u32, level: u32, mute: u8 },
    VdpDataWrite(u8),
    VdpDataRead,
    VdpControlWrite(ControlPort, u8),
    VdpControlRead(u32),
    HvCounter(u32),
    IoWrite { parity: u8, value: u8, cycle: u32 },
    IoRead(u8),
    HandheldWrite(u8, u8),
    HandheldRead(u8),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

/// Every chip on the bus, logging each register access.
#[derive(Clone, Default)]
pub struct Recorder {
    pub log: Log,
}

impl Recorder {
    fn push(&self, event: Event) {
        self.log.borrow_mut().push(event);
    }
}

impl SoundChip for Recorder {
    fn write(&mut self, cycle: u32, register: u8, value: u8) {
        self.push(Event::FmWrite {
            cycle,
            register,
            value,
        });
    }

    fn read(&mut self, cycle: u32, register: u8) -> u8 {
        self.push(Event::FmRead { cycle, register });
        FM_VALUE
    }
}

impl SoundGenerator for Recorder {
    fn write(&mut self, cycle: u32, value: u8) {
        self.push(Event::PsgWrite { cycle, value });
    }

    fn configure(&mut self, cycle: u32, amplifier_level: u32, mute_mask: u8) {
        self.push(Event::PsgConfigure {
            cycle,
            level: amplifier_level,
            mute: mute_mask,
        });
    }
}

impl VideoPort for Recorder {
    fn write_data(&mut self, value: u8) {
        self.push(Event::VdpDataWrite(value));
    }

    fn read_data(&mut self) -> u8 {
        self.push(Event::VdpDataRead);
        VDP_DATA
    }

    fn write_control(&mut self, port: ControlPort, value: u8) {
        self.push(Event::VdpControlWrite(port, value));
    }

    fn read_control(&mut self, cycle: u32) -> u8 {
        self.push(Event::VdpControlRead(cycle));
        VDP_STATUS
    }

    fn hv_counter(&mut self, cycle: u32) -> u16 {
        self.push(Event::HvCounter(cycle));
        cycle as u16
    }
}

impl ControllerPort for Recorder {
    fn write(&mut self, parity: u8, value: u8, cycle: u32) {
        self.push(Event::IoWrite {
            parity,
            value,
            cycle,
        });
    }

    fn read(&mut self, parity: u8) -> u8 {
        self.push(Event::IoRead(parity));
        io_value(parity)
    }

    fn handheld_read(&mut self, port: u8) -> u8 {
        self.push(Event::HandheldRead(port));
        handheld_value(port)
    }

    fn handheld_write(&mut self, port: u8, value: u8) {
        self.push(Event::HandheldWrite(port, value));
    }
}

impl ReadMap for Recorder {
    fn peek(&self, address: u16) -> u8 {
        opcode_at(address)
    }
}

pub fn builder(recorder: &Recorder) -> Z80BusBuilder {
    let mut builder = Z80BusBuilder::new();
    builder
        .vdp(Box::new(recorder.clone()))
        .psg(Box::new(recorder.clone()))
        .fm(Box::new(recorder.clone()))
        .io(Box::new(recorder.clone()))
        .read_map(Box::new(recorder.clone()));
    builder
}

pub fn new_bus(console: ConsoleModel, region: Region, fm_enabled: bool) -> (Z80Bus, Log) {
    let recorder = Recorder::default();
    let bus = builder(&recorder)
        .console(console)
        .region(region)
        .fm_enabled(fm_enabled)
        .build();
    (bus, recorder.log)
}

pub fn take(log: &Log) -> Vec<Event> {
    std::mem::take(&mut *log.borrow_mut())
}

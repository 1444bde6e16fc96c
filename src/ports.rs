//! Z80 I/O port decoding.
//!
//! Every console decodes the port address with A7, A6 and A0 only
//! (`port & 0xC1`), which gives the usual layout:
//!
//! +-----------+----------------------------------------------+
//! | Bucket    | Description                                  |
//! +-----------+----------------------------------------------+
//! | $00-$3F   | Memory / I/O control (even / odd)            |
//! | $40-$7F   | V / H counter read, PSG write                |
//! | $80-$BF   | VDP data (even) and control (odd)            |
//! | $C0-$FF   | Controller ports, FM unit, console specific  |
//! +-----------+----------------------------------------------+
//!
//! Each I/O chip then refines that split in its own way, so there is one
//! decoder per hardware variant.

mod game_gear;
mod mark_iii;
mod master_system;
mod mega_drive;
mod sg1000;

pub use game_gear::GameGearPorts;
pub use mark_iii::MarkIiiPorts;
pub use master_system::MasterSystemPorts;
pub use mega_drive::MegaDrivePorts;
pub use sg1000::Sg1000Ports;

use crate::{config::HardwareVariant, devices::Peripherals, state::BusContext};

/// Delay, in master cycles, before an I/O control write reaches the Mega
/// Drive I/O chip through the power base converter.
pub const PBC_CYCLE_OFFSET: u32 = 560;

/// Same delay for the Master System and Game Gear I/O chips.
pub const SMS_CYCLE_OFFSET: u32 = 530;

mod private {
    pub trait Sealed {}
}

/// One port decoder. Implemented only by the decoders in this module.
pub trait PortHandler: private::Sealed {
    fn read(&self, ctx: &mut BusContext, devices: &mut Peripherals, port: u8) -> u8;
    fn write(&self, ctx: &mut BusContext, devices: &mut Peripherals, port: u8, data: u8);
}

/// The decoder picked for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortMap {
    PrimaryConsole(MegaDrivePorts),
    Handheld(GameGearPorts),
    StandardConsole(MasterSystemPorts),
    LegacyConsole(MarkIiiPorts),
    FirstGen(Sg1000Ports),
}

impl PortMap {
    pub fn new(variant: HardwareVariant) -> Self {
        match variant {
            HardwareVariant::PrimaryConsole => PortMap::PrimaryConsole(MegaDrivePorts),
            HardwareVariant::Handheld => PortMap::Handheld(GameGearPorts),
            HardwareVariant::StandardConsole => PortMap::StandardConsole(MasterSystemPorts),
            HardwareVariant::LegacyConsole => PortMap::LegacyConsole(MarkIiiPorts),
            HardwareVariant::FirstGen => PortMap::FirstGen(Sg1000Ports),
        }
    }

    pub fn variant(&self) -> HardwareVariant {
        match self {
            PortMap::PrimaryConsole(_) => HardwareVariant::PrimaryConsole,
            PortMap::Handheld(_) => HardwareVariant::Handheld,
            PortMap::StandardConsole(_) => HardwareVariant::StandardConsole,
            PortMap::LegacyConsole(_) => HardwareVariant::LegacyConsole,
            PortMap::FirstGen(_) => HardwareVariant::FirstGen,
        }
    }

    fn handler(&self) -> &dyn PortHandler {
        match self {
            PortMap::PrimaryConsole(ports) => ports,
            PortMap::Handheld(ports) => ports,
            PortMap::StandardConsole(ports) => ports,
            PortMap::LegacyConsole(ports) => ports,
            PortMap::FirstGen(ports) => ports,
        }
    }

    pub fn read(&self, ctx: &mut BusContext, devices: &mut Peripherals, port: u8) -> u8 {
        self.handler().read(ctx, devices, port)
    }

    pub fn write(&self, ctx: &mut BusContext, devices: &mut Peripherals, port: u8, data: u8) {
        self.handler().write(ctx, devices, port, data)
    }
}

/// Controller ports as decoded by I/O chips that look at the full address.
fn is_controller_port(port: u8) -> bool {
    matches!(port, 0xC0 | 0xC1 | 0xDC | 0xDD)
}

/// $40 returns the V counter, $41 the H counter.
fn hv_counter(devices: &mut Peripherals, port: u8, cycle: u32) -> u8 {
    let hvc = devices.vdp.hv_counter(cycle);
    if port & 1 == 0 {
        (hvc >> 8) as u8
    } else {
        (hvc & 0xFF) as u8
    }
}

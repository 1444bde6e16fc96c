use super::{private, PortHandler};
use crate::{
    devices::{ControlPort, Peripherals},
    fault,
    state::{BusContext, Z80_CLOCK_DIVIDER},
};

/// The SN76489AN holds READY low for 32 clocks after a write, and READY is
/// wired to the Z80 WAIT input.
pub const PSG_WRITE_STALL: u32 = 32 * Z80_CLOCK_DIVIDER;

/// SG-1000 / SG-1000 II.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Sg1000Ports;

impl private::Sealed for Sg1000Ports {}

impl PortHandler for Sg1000Ports {
    fn write(&self, ctx: &mut BusContext, devices: &mut Peripherals, port: u8, data: u8) {
        match port & 0xC1 {
            0x40 | 0x41 => {
                devices.psg.write(ctx.z80.get(), data);
                ctx.z80.add(PSG_WRITE_STALL);
            }
            0x80 => devices.vdp.write_data(data),
            0x81 => devices.vdp.write_control(ControlPort::Tms9918, data),
            _ => fault::unused_port_write(ctx, port, data),
        }
    }

    fn read(&self, ctx: &mut BusContext, devices: &mut Peripherals, port: u8) -> u8 {
        match port & 0xC1 {
            0x80 => devices.vdp.read_data(),
            0x81 => devices.vdp.read_control(ctx.z80.get()),
            0xC0 | 0xC1 => devices.io.read(port & 1),
            _ => fault::unused_port_read(ctx, devices.read_map.as_ref(), port),
        }
    }
}

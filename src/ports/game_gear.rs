use super::{hv_counter, is_controller_port, private, PortHandler, SMS_CYCLE_OFFSET};
use crate::{
    devices::{ControlPort, Peripherals},
    fault,
    state::BusContext,
};

/// Game Gear I/O chip. It decodes the full port address, including in
/// Master System mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GameGearPorts;

impl private::Sealed for GameGearPorts {}

impl PortHandler for GameGearPorts {
    fn write(&self, ctx: &mut BusContext, devices: &mut Peripherals, port: u8, data: u8) {
        let cycle = ctx.z80.get();
        match port & 0xC1 {
            0x00 | 0x01 => {
                if port < 0x07 {
                    if ctx.config().console.has_handheld_io() {
                        devices.io.handheld_write(port, data);
                        return;
                    }
                } else if port == 0x3E || port == 0x3F {
                    // decoded on every model, some games probe it (G-LOC)
                    devices
                        .io
                        .write(port & 1, data, cycle.saturating_add(SMS_CYCLE_OFFSET));
                    return;
                }
                fault::unused_port_write(ctx, port, data);
            }
            0x40 | 0x41 => devices.psg.write(cycle, data),
            0x80 => devices.vdp.write_data(data),
            0x81 => devices.vdp.write_control(ControlPort::MasterSystem, data),
            _ => fault::unused_port_write(ctx, port, data),
        }
    }

    fn read(&self, ctx: &mut BusContext, devices: &mut Peripherals, port: u8) -> u8 {
        let cycle = ctx.z80.get();
        match port & 0xC1 {
            0x00 | 0x01 => {
                if port < 0x07 && ctx.config().console.has_handheld_io() {
                    return devices.io.handheld_read(port);
                }
                fault::unused_port_read(ctx, devices.read_map.as_ref(), port)
            }
            0x40 | 0x41 => hv_counter(devices, port, cycle),
            0x80 => devices.vdp.read_data(),
            0x81 => devices.vdp.read_control(cycle),
            _ => {
                if is_controller_port(port) {
                    return devices.io.read(port & 1);
                }
                fault::unused_port_read(ctx, devices.read_map.as_ref(), port)
            }
        }
    }
}

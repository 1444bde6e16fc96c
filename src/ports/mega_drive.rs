use super::{hv_counter, is_controller_port, private, PortHandler, PBC_CYCLE_OFFSET};
use crate::{
    devices::{ControlPort, Peripherals},
    fault,
    state::{BusContext, Z80_CLOCK_DIVIDER},
};

/// Mega Drive running Master System software through the power base
/// converter.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MegaDrivePorts;

impl private::Sealed for MegaDrivePorts {}

impl PortHandler for MegaDrivePorts {
    fn write(&self, ctx: &mut BusContext, devices: &mut Peripherals, port: u8, data: u8) {
        let cycle = ctx.z80.get();
        match port & 0xC1 {
            0x01 => devices
                .io
                .write(1, data, cycle.saturating_add(PBC_CYCLE_OFFSET)),
            0x40 | 0x41 => devices.psg.write(cycle, data),
            0x80 => devices.vdp.write_data(data),
            0x81 => devices.vdp.write_control(ControlPort::MegaDrive, data),
            _ => {
                if port >= 0xF0 && ctx.config().fm_enabled {
                    devices.fm.write(cycle, port, data);
                    return;
                }
                fault::unused_port_write(ctx, port, data);
            }
        }
    }

    fn read(&self, ctx: &mut BusContext, devices: &mut Peripherals, port: u8) -> u8 {
        let cycle = ctx.z80.get();
        match port & 0xC1 {
            // the counter is latched one Z80 cycle before the end of the IN
            0x40 | 0x41 => hv_counter(devices, port, cycle.saturating_sub(Z80_CLOCK_DIVIDER)),
            0x80 => devices.vdp.read_data(),
            0x81 => devices.vdp.read_control(cycle),
            _ => {
                if is_controller_port(port) {
                    return devices.io.read(port & 1);
                }
                if port >= 0xF0 && ctx.config().fm_enabled {
                    return devices.fm.read(cycle, port);
                }
                fault::unused_port_read(ctx, devices.read_map.as_ref(), port)
            }
        }
    }
}

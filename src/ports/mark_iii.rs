use super::{hv_counter, private, PortHandler};
use crate::{
    devices::{ControlPort, Peripherals},
    fault,
    state::BusContext,
};

/// Mark III, optionally with the FM-70 sound unit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MarkIiiPorts;

impl private::Sealed for MarkIiiPorts {}

impl PortHandler for MarkIiiPorts {
    fn write(&self, ctx: &mut BusContext, devices: &mut Peripherals, port: u8, data: u8) {
        let cycle = ctx.z80.get();
        match port & 0xC1 {
            0x00 | 0x01 => fault::unused_port_write(ctx, port, data),
            0x40 | 0x41 => devices.psg.write(cycle, data),
            0x80 => devices.vdp.write_data(data),
            0x81 => devices.vdp.write_control(ControlPort::MasterSystem, data),
            _ => {
                if port & 0x04 == 0 && ctx.config().fm_enabled {
                    devices.fm.write(cycle, port, data);

                    // FM output control: the unit mutes the PSG while FM is on
                    if port & 0x02 != 0 {
                        let mute = if data & 0x01 != 0 { 0x00 } else { 0xFF };
                        ctx.psg_mute = mute;
                        devices
                            .psg
                            .configure(cycle, ctx.config().amplifier_level, mute);
                    }
                    return;
                }
                fault::unused_port_write(ctx, port, data);
            }
        }
    }

    fn read(&self, ctx: &mut BusContext, devices: &mut Peripherals, port: u8) -> u8 {
        let cycle = ctx.z80.get();
        match port & 0xC1 {
            0x00 | 0x01 => fault::unused_port_read(ctx, devices.read_map.as_ref(), port),
            0x40 | 0x41 => hv_counter(devices, port, cycle),
            0x80 => devices.vdp.read_data(),
            0x81 => devices.vdp.read_control(cycle),
            _ => {
                // the FM unit disconnects the controller ports when selected
                if port & 0x04 == 0 && ctx.config().fm_enabled {
                    return devices.fm.read(cycle, port);
                }
                devices.io.read(port & 1)
            }
        }
    }
}

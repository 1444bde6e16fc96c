use super::{hv_counter, is_controller_port, private, PortHandler, SMS_CYCLE_OFFSET};
use crate::{
    config::Region,
    devices::{ControlPort, Peripherals},
    fault,
    state::BusContext,
};

/// FM board audio control port.
const AUDIO_CONTROL_PORT: u8 = 0xF2;

/// Master System. The Japanese 315-5297 I/O chip decodes the full address
/// and carries the YM2413; export consoles use the 315-5216, which only
/// looks at A7, A6, A2 and A0, with the FM unit as an external board.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MasterSystemPorts;

impl private::Sealed for MasterSystemPorts {}

fn full_decode(ctx: &BusContext) -> bool {
    ctx.config().region == Region::JapanNtsc
}

impl PortHandler for MasterSystemPorts {
    fn write(&self, ctx: &mut BusContext, devices: &mut Peripherals, port: u8, data: u8) {
        let cycle = ctx.z80.get();
        match port & 0xC1 {
            0x00 | 0x01 => {
                if !full_decode(ctx) || port & 0xFE == 0x3E {
                    if port & 1 == 0 {
                        ctx.status.memory_control = data;
                    }
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
            _ => {
                if ctx.config().fm_enabled {
                    if full_decode(ctx) {
                        match port {
                            0xF0 | 0xF1 => {
                                devices.fm.write(cycle, port, data);
                                return;
                            }
                            AUDIO_CONTROL_PORT => {
                                // D1-D0: 00 PSG only, 01 FM only, 10 mute, 11 both
                                let mute = if data.wrapping_add(1) & 0x02 != 0 {
                                    0x00
                                } else {
                                    0xFF
                                };
                                ctx.psg_mute = mute;
                                devices
                                    .psg
                                    .configure(cycle, ctx.config().amplifier_level, mute);
                                devices.fm.write(cycle, 0x02, data);
                                ctx.status.audio_control = data;
                                return;
                            }
                            _ => {}
                        }
                    } else if port & 0x04 == 0 {
                        devices.fm.write(cycle, port, data);
                        return;
                    }
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
                if full_decode(ctx) {
                    if port == AUDIO_CONTROL_PORT {
                        // C-SYNC counter in D7-D5 is not emulated
                        return ctx.status.audio_control & 0x03;
                    }
                    if is_controller_port(port) && ctx.status.io_enabled() {
                        return devices.io.read(port & 1);
                    }
                    return fault::unused_port_read(ctx, devices.read_map.as_ref(), port);
                }

                // FM board and I/O chip both drive the bus
                let mut data = 0xFF;
                if port & 0x04 == 0 && ctx.config().fm_enabled {
                    data = devices.fm.read(cycle, port);
                }
                if ctx.status.io_enabled() {
                    data &= devices.io.read(port & 1);
                }
                data
            }
        }
    }
}

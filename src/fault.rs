//! Accesses that reach no device.
//!
//! None of these are errors: they reproduce what the hardware does when the
//! decoder selects nothing, including the bus lock that freezes the Z80.

use tracing::{debug, warn};

use crate::{
    devices::ReadMap,
    state::{BusContext, RunState},
};

pub fn unused_read(ctx: &BusContext, address: u32) -> u8 {
    debug!("[Z80] Unused read {:06X} (PC {:04X})", address, ctx.pc);
    0xFF
}

pub fn unused_write(ctx: &BusContext, address: u32, data: u8) {
    debug!(
        "[Z80] Unused write {:06X} = {:02X} (PC {:04X})",
        address, data, ctx.pc
    );
}

pub fn lockup_read(ctx: &mut BusContext, address: u32) -> u8 {
    warn!("[Z80] Lockup read {:06X} (PC {:04X})", address, ctx.pc);
    lock_up(ctx);
    0xFF
}

pub fn lockup_write(ctx: &mut BusContext, address: u32, data: u8) {
    warn!(
        "[Z80] Lockup write {:06X} = {:02X} (PC {:04X})",
        address, data, ctx.pc
    );
    lock_up(ctx);
}

fn lock_up(ctx: &mut BusContext) {
    if ctx.config().force_no_lockup {
        return;
    }
    ctx.z80.halt();
    ctx.run_state.remove(RunState::ENABLED);
}

/// Unmapped port read. On models with a floating data bus this returns the
/// opcode byte the Z80 fetched just before the IN instruction's port access.
pub fn unused_port_read(ctx: &BusContext, read_map: &dyn ReadMap, port: u8) -> u8 {
    debug!("[PORT] Unused read from port {:02X} (PC {:04X})", port, ctx.pc);
    if ctx.config().console.floating_port_bus() {
        return read_map.peek(ctx.pc.wrapping_sub(1));
    }
    0xFF
}

pub fn unused_port_write(ctx: &BusContext, port: u8, data: u8) {
    debug!(
        "[PORT] Unused write to port {:02X} = {:02X} (PC {:04X})",
        port, data, ctx.pc
    );
}

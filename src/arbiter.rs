//! Z80 access to the 68k bus.
//!
//! Every Z80 access to the VDP window or the bank window has to go through
//! the 68k bus arbiter. Both CPUs lose time: the Z80 waits for the bus (and
//! for any DMA holding it), the 68k is held off while the Z80 owns it.

use crate::state::{BusContext, RunState, Z80_CLOCK_DIVIDER};

/// Average Z80 wait on the 68k bus: 3 Z80 cycles.
pub const Z80_BUS_WAIT: u32 = 3 * Z80_CLOCK_DIVIDER;

/// 68k cycles lost to a Z80 bus access starting at `z80_cycles`.
///
/// Tuned against measured delays, not derived from the bus protocol. Changing
/// it breaks known-good titles.
pub fn m68k_wait_states(z80_cycles: u32) -> u32 {
    ((z80_cycles % 7) + 72) / 7 * 7
}

pub fn request_bus_access(ctx: &mut BusContext) {
    // 68k penalty is based on when the request was issued, not when it was granted
    let requested_at = ctx.z80.get();

    if ctx.dma.contends() && requested_at < ctx.dma.end_cycle {
        ctx.z80.advance_to(ctx.dma.end_cycle);

        if ctx.dma.remaining_length != 0 {
            ctx.run_state.insert(RunState::BUS_WAIT);
        }
        tracing::trace!(
            "[Z80] Waiting on DMA until {} ({} left)",
            ctx.dma.end_cycle,
            ctx.dma.remaining_length
        );
    }

    ctx.m68k.add(m68k_wait_states(requested_at));
    ctx.z80.add(Z80_BUS_WAIT);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        state::{DmaKind, DmaSnapshot},
    };

    fn context(z80: u32, dma: DmaSnapshot) -> BusContext {
        let mut ctx = BusContext::new(Config::default());
        ctx.z80.reset(z80);
        ctx.m68k.reset(1000);
        ctx.dma = dma;
        ctx
    }

    #[test]
    fn test_wait_state_table() {
        let waits: Vec<u32> = (0..7).map(m68k_wait_states).collect();
        assert_eq!(waits, vec![70, 70, 70, 70, 70, 77, 77]);
        assert_eq!(m68k_wait_states(7 * 1000 + 6), 77);
    }

    #[test]
    fn test_stall_behind_dma() {
        let mut ctx = context(
            100,
            DmaSnapshot {
                end_cycle: 500,
                remaining_length: 0,
                kind: DmaKind::MemoryToVram,
            },
        );

        request_bus_access(&mut ctx);

        assert_eq!(ctx.z80.get(), 500 + 45);
        assert_eq!(ctx.m68k.get(), 1000 + m68k_wait_states(100));
        assert!(!ctx.run_state.contains(RunState::BUS_WAIT));
    }

    #[test]
    fn test_unfinished_dma_sets_bus_wait() {
        let mut ctx = context(
            100,
            DmaSnapshot {
                end_cycle: 500,
                remaining_length: 0x200,
                kind: DmaKind::MemoryToCram,
            },
        );

        request_bus_access(&mut ctx);

        assert!(ctx.run_state.contains(RunState::BUS_WAIT));
        assert!(ctx.run_state.is_running());
    }

    #[test]
    fn test_no_stall_without_contention() {
        let mut ctx = context(
            100,
            DmaSnapshot {
                end_cycle: 500,
                remaining_length: 0x200,
                kind: DmaKind::Copy,
            },
        );

        request_bus_access(&mut ctx);

        assert_eq!(ctx.z80.get(), 145);
        assert_eq!(ctx.m68k.get(), 1070);
        assert!(!ctx.run_state.contains(RunState::BUS_WAIT));
    }

    #[test]
    fn test_no_stall_after_dma_finished() {
        let mut ctx = context(
            600,
            DmaSnapshot {
                end_cycle: 500,
                remaining_length: 0x200,
                kind: DmaKind::MemoryToVram,
            },
        );

        request_bus_access(&mut ctx);

        assert_eq!(ctx.z80.get(), 645);
        // 600 % 7 == 5
        assert_eq!(ctx.m68k.get(), 1077);
        assert!(!ctx.run_state.contains(RunState::BUS_WAIT));
    }
}

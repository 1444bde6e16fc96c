use serde::{Deserialize, Serialize};

use crate::{bank::BankRegister, config::Config};

/// Master clock cycles per Z80 cycle.
pub const Z80_CLOCK_DIVIDER: u32 = 15;

/// Per-frame cycle counter, in master clock cycles.
///
/// A halted counter reads as [`CycleCounter::NEVER`] and ignores further
/// charges until it is reset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleCounter {
    cycles: u32,
    halted: bool,
}

impl CycleCounter {
    /// Value seen by the scheduler once the CPU has locked up.
    pub const NEVER: u32 = u32::MAX;

    pub fn new(cycles: u32) -> Self {
        Self {
            cycles,
            halted: false,
        }
    }

    pub fn get(&self) -> u32 {
        if self.halted {
            Self::NEVER
        } else {
            self.cycles
        }
    }

    pub fn add(&mut self, cycles: u32) {
        if !self.halted {
            self.cycles = self.cycles.saturating_add(cycles);
        }
    }

    /// Stalls the counter until `target`. Never moves it backwards.
    pub fn advance_to(&mut self, target: u32) {
        if !self.halted && target > self.cycles {
            self.cycles = target;
        }
    }

    pub fn halt(&mut self) {
        self.halted = true;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// External reset. Clears a lockup.
    pub fn reset(&mut self, cycles: u32) {
        self.cycles = cycles;
        self.halted = false;
    }
}

/// Source/destination of a VDP DMA transfer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DmaKind {
    /// 68k bus to VRAM.
    MemoryToVram,
    /// 68k bus to CRAM or VSRAM.
    MemoryToCram,
    /// VRAM fill.
    #[default]
    Fill,
    /// VRAM to VRAM copy.
    Copy,
}

impl DmaKind {
    pub fn conflict_class(&self) -> u8 {
        match self {
            DmaKind::MemoryToVram => 0,
            DmaKind::MemoryToCram => 1,
            DmaKind::Fill => 2,
            DmaKind::Copy => 3,
        }
    }
}

/// Last DMA started by the VDP. Written by the VDP, read-only here.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmaSnapshot {
    pub end_cycle: u32,
    pub remaining_length: u32,
    pub kind: DmaKind,
}

impl DmaSnapshot {
    /// Only 68k bus sourced transfers hold the bus.
    pub fn contends(&self) -> bool {
        self.kind.conflict_class() < 2
    }
}

/// Z80 run state bits, polled by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState(u8);

impl RunState {
    /// Out of reset.
    pub const ENABLED: u8 = 0x01;
    /// 68k holds the Z80 bus ($A11100). Set by the scheduler.
    pub const BUS_REQUEST: u8 = 0x02;
    /// Still waiting on the 68k bus when the frame ends.
    pub const BUS_WAIT: u8 = 0x04;

    pub fn new(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, bits: u8) -> bool {
        self.0 & bits == bits
    }

    pub fn insert(&mut self, bits: u8) {
        self.0 |= bits;
    }

    pub fn remove(&mut self, bits: u8) {
        self.0 &= !bits;
    }

    /// The Z80 executes only out of reset and while it owns its bus.
    pub fn is_running(&self) -> bool {
        self.0 & (Self::ENABLED | Self::BUS_REQUEST) == Self::ENABLED
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self(Self::ENABLED)
    }
}

/// Registers shared between the Master System I/O chip and the FM board.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedStatusRegister {
    /// Last value written to the audio control port ($F2).
    pub audio_control: u8,
    /// Last value written to the memory control port ($3E).
    pub memory_control: u8,
}

impl SharedStatusRegister {
    /// Bit 2 of memory control disables the I/O chip.
    pub fn io_enabled(&self) -> bool {
        self.memory_control & 0x04 == 0
    }
}

/// Timing and configuration state consulted by every dispatch path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusContext {
    pub z80: CycleCounter,
    pub m68k: CycleCounter,
    pub dma: DmaSnapshot,
    pub run_state: RunState,
    pub bank: BankRegister,
    pub status: SharedStatusRegister,
    /// Z80 program counter, published by the scheduler before each step.
    pub pc: u16,
    /// PSG channel mask last sent with a configure call.
    pub psg_mute: u8,
    config: Config,
}

impl BusContext {
    pub fn new(config: Config) -> Self {
        Self {
            z80: CycleCounter::default(),
            m68k: CycleCounter::default(),
            dma: DmaSnapshot::default(),
            run_state: RunState::default(),
            bank: BankRegister::default(),
            status: SharedStatusRegister::default(),
            pc: 0,
            psg_mute: 0xFF,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn reset(&mut self) {
        self.z80.reset(0);
        self.m68k.reset(0);
        self.dma = DmaSnapshot::default();
        self.run_state = RunState::default();
        self.bank = BankRegister::default();
        self.status = SharedStatusRegister::default();
        self.pc = 0;
        self.psg_mute = 0xFF;
    }

    pub fn is_locked_up(&self) -> bool {
        self.z80.is_halted()
    }
}

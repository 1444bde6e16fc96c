pub mod arbiter;
pub mod bank;
pub mod bus;
pub mod config;
pub mod devices;
pub mod error;
pub mod fault;
pub mod memory;
pub mod ports;
pub mod state;
pub mod utils;

pub use bank::{
    BankEntry, BankHandler, BankRegister, BankTable, SharedBankTable, SharedBuffer, SharedHandler,
};
pub use bus::{CoprocessorIo, Z80Bus, Z80BusBuilder};
pub use config::{Config, ConsoleModel, HardwareVariant, Region};
pub use devices::{
    ControlPort, ControllerPort, Disconnected, Peripherals, ReadMap, SoundChip, SoundGenerator,
    VideoPort,
};
pub use error::BusError;
pub use state::{BusContext, CycleCounter, DmaKind, DmaSnapshot, RunState, SharedStatusRegister};
pub use utils::hexdump;

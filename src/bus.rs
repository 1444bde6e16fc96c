use derivative::Derivative;

use crate::{
    bank::{BankTable, SharedBankTable},
    config::{Config, ConsoleModel, HardwareVariant, Region},
    devices::{ControllerPort, Peripherals, ReadMap, SoundChip, SoundGenerator, VideoPort},
    memory::Ram,
    ports::PortMap,
    state::BusContext,
};

/// What a Z80 core needs from the system it runs in.
pub trait CoprocessorIo {
    fn read_byte(&mut self, address: u16) -> u8;
    fn write_byte(&mut self, address: u16, value: u8);
    fn port_in(&mut self, port: u16) -> u8;
    fn port_out(&mut self, port: u16, value: u8);
}

/// Z80 side of the system bus: its RAM, the 68k bank window and the I/O
/// port decoder for the selected console.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Z80Bus {
    pub ctx: BusContext,
    pub ram: Ram,
    pub devices: Peripherals,
    #[derivative(Debug = "ignore")]
    pub(crate) banks: SharedBankTable,
    ports: PortMap,
}

impl Z80Bus {
    pub fn new(config: Config, banks: SharedBankTable, devices: Peripherals) -> Self {
        tracing::info!(
            "[BUS] {} ({:?}), FM {}, port decoder {:?}",
            config.console,
            config.region,
            if config.fm_enabled { "on" } else { "off" },
            config.variant()
        );
        let ports = PortMap::new(config.variant());

        Self {
            ctx: BusContext::new(config),
            ram: Ram::new(),
            devices,
            banks,
            ports,
        }
    }

    pub fn builder() -> Z80BusBuilder {
        Z80BusBuilder::new()
    }

    pub fn config(&self) -> &Config {
        self.ctx.config()
    }

    pub fn variant(&self) -> HardwareVariant {
        self.ports.variant()
    }

    pub fn bank_table(&self) -> SharedBankTable {
        self.banks.clone()
    }

    pub fn reset(&mut self) {
        self.ram.reset();
        self.ctx.reset();
    }

    /// True once the Z80 has hit a bus lockup. Only a reset recovers.
    pub fn is_locked_up(&self) -> bool {
        self.ctx.is_locked_up()
    }

    pub fn port_in(&mut self, port: u8) -> u8 {
        self.ports.read(&mut self.ctx, &mut self.devices, port)
    }

    pub fn port_out(&mut self, port: u8, data: u8) {
        self.ports.write(&mut self.ctx, &mut self.devices, port, data);
    }

    pub fn set_fm_enabled(&mut self, enabled: bool) {
        tracing::info!("[BUS] FM {}", if enabled { "enabled" } else { "disabled" });
        self.ctx.config_mut().fm_enabled = enabled;
    }

    pub fn set_force_no_lockup(&mut self, force: bool) {
        self.ctx.config_mut().force_no_lockup = force;
    }

    /// Changes the PSG preamplifier, keeping the current channel mask.
    pub fn set_amplifier_level(&mut self, level: u32) {
        self.ctx.config_mut().amplifier_level = level;
        self.devices
            .psg
            .configure(self.ctx.z80.get(), level, self.ctx.psg_mute);
    }
}

impl CoprocessorIo for Z80Bus {
    fn read_byte(&mut self, address: u16) -> u8 {
        Z80Bus::read_byte(self, address)
    }

    fn write_byte(&mut self, address: u16, value: u8) {
        Z80Bus::write_byte(self, address, value)
    }

    fn port_in(&mut self, port: u16) -> u8 {
        Z80Bus::port_in(self, port as u8)
    }

    fn port_out(&mut self, port: u16, value: u8) {
        Z80Bus::port_out(self, port as u8, value)
    }
}

#[derive(Default)]
pub struct Z80BusBuilder {
    config: Config,
    banks: Option<SharedBankTable>,
    devices: Peripherals,
}

impl Z80BusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    pub fn console(&mut self, console: ConsoleModel) -> &mut Self {
        self.config.console = console;
        self
    }

    pub fn region(&mut self, region: Region) -> &mut Self {
        self.config.region = region;
        self
    }

    pub fn fm_enabled(&mut self, enabled: bool) -> &mut Self {
        self.config.fm_enabled = enabled;
        self
    }

    pub fn force_no_lockup(&mut self, force: bool) -> &mut Self {
        self.config.force_no_lockup = force;
        self
    }

    pub fn amplifier_level(&mut self, level: u32) -> &mut Self {
        self.config.amplifier_level = level;
        self
    }

    pub fn bank_table(&mut self, banks: SharedBankTable) -> &mut Self {
        self.banks = Some(banks);
        self
    }

    pub fn vdp(&mut self, vdp: Box<dyn VideoPort>) -> &mut Self {
        self.devices.vdp = vdp;
        self
    }

    pub fn psg(&mut self, psg: Box<dyn SoundGenerator>) -> &mut Self {
        self.devices.psg = psg;
        self
    }

    pub fn fm(&mut self, fm: Box<dyn SoundChip>) -> &mut Self {
        self.devices.fm = fm;
        self
    }

    pub fn io(&mut self, io: Box<dyn ControllerPort>) -> &mut Self {
        self.devices.io = io;
        self
    }

    pub fn read_map(&mut self, read_map: Box<dyn ReadMap>) -> &mut Self {
        self.devices.read_map = read_map;
        self
    }

    /// Devices are moved into the bus; the builder is left with
    /// disconnected ones.
    pub fn build(&mut self) -> Z80Bus {
        let banks = self
            .banks
            .clone()
            .unwrap_or_else(|| BankTable::new().shared());
        Z80Bus::new(
            self.config.clone(),
            banks,
            std::mem::take(&mut self.devices),
        )
    }
}

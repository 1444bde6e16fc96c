use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BusError;

/// Default PSG preamplifier level, in percent.
pub const DEFAULT_AMPLIFIER_LEVEL: u32 = 150;

/// The console the Z80 is wired into.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsoleModel {
    Sg1000,
    Sg1000II,
    MarkIII,
    #[default]
    MasterSystem,
    MasterSystem2,
    GameGear,
    /// Game Gear running in Master System compatibility mode.
    GameGearMs,
    /// Mega Drive with the Master System power base converter.
    MegaDrive,
}

impl ConsoleModel {
    /// Models whose I/O chip leaves the data bus floating on unmapped port
    /// reads, so the Z80 sees the last byte it fetched.
    pub fn floating_port_bus(&self) -> bool {
        matches!(self, ConsoleModel::MasterSystem | ConsoleModel::MarkIII)
    }

    /// True only for real Game Gear hardware with its extra I/O registers.
    pub fn has_handheld_io(&self) -> bool {
        *self == ConsoleModel::GameGear
    }
}

impl fmt::Display for ConsoleModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConsoleModel::Sg1000 => "SG-1000",
            ConsoleModel::Sg1000II => "SG-1000 II",
            ConsoleModel::MarkIII => "Mark III",
            ConsoleModel::MasterSystem => "Master System",
            ConsoleModel::MasterSystem2 => "Master System II",
            ConsoleModel::GameGear => "Game Gear",
            ConsoleModel::GameGearMs => "Game Gear (MS mode)",
            ConsoleModel::MegaDrive => "Mega Drive",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    JapanNtsc,
    JapanPal,
    #[default]
    Usa,
    Europe,
}

/// Port decoder selection. One per session, derived from the console model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HardwareVariant {
    /// Mega Drive I/O chip decoding Master System ports.
    PrimaryConsole,
    /// Game Gear I/O chip.
    Handheld,
    /// Master System 315-5216 / 315-5297 I/O chips.
    StandardConsole,
    /// Mark III with the optional FM sound unit.
    LegacyConsole,
    /// SG-1000 discrete decoding.
    FirstGen,
}

impl From<ConsoleModel> for HardwareVariant {
    fn from(model: ConsoleModel) -> Self {
        match model {
            ConsoleModel::Sg1000 | ConsoleModel::Sg1000II => HardwareVariant::FirstGen,
            ConsoleModel::MarkIII => HardwareVariant::LegacyConsole,
            ConsoleModel::MasterSystem | ConsoleModel::MasterSystem2 => {
                HardwareVariant::StandardConsole
            }
            ConsoleModel::GameGear | ConsoleModel::GameGearMs => HardwareVariant::Handheld,
            ConsoleModel::MegaDrive => HardwareVariant::PrimaryConsole,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub console: ConsoleModel,
    pub region: Region,
    /// Ignore accesses that lock up real hardware.
    pub force_no_lockup: bool,
    /// YM2413 / FM sound unit present.
    pub fm_enabled: bool,
    pub amplifier_level: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            console: ConsoleModel::default(),
            region: Region::default(),
            force_no_lockup: false,
            fm_enabled: false,
            amplifier_level: DEFAULT_AMPLIFIER_LEVEL,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, BusError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn variant(&self) -> HardwareVariant {
        HardwareVariant::from(self.console)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_selection() {
        assert_eq!(
            HardwareVariant::from(ConsoleModel::Sg1000II),
            HardwareVariant::FirstGen
        );
        assert_eq!(
            HardwareVariant::from(ConsoleModel::GameGearMs),
            HardwareVariant::Handheld
        );
        assert_eq!(
            HardwareVariant::from(ConsoleModel::MegaDrive),
            HardwareVariant::PrimaryConsole
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            Config::from_json(r#"{ "console": "MarkIII", "fm_enabled": true }"#).unwrap();

        assert_eq!(config.console, ConsoleModel::MarkIII);
        assert!(config.fm_enabled);
        assert!(!config.force_no_lockup);
        assert_eq!(config.region, Region::Usa);
        assert_eq!(config.amplifier_level, DEFAULT_AMPLIFIER_LEVEL);
        assert_eq!(config.variant(), HardwareVariant::LegacyConsole);
    }

    #[test]
    fn test_bad_json_is_rejected() {
        let err = Config::from_json(r#"{ "console": "Saturn" }"#).unwrap_err();
        assert!(matches!(err, BusError::Config(_)));
    }

    #[test]
    fn test_floating_bus_models() {
        assert!(ConsoleModel::MasterSystem.floating_port_bus());
        assert!(ConsoleModel::MarkIII.floating_port_bus());
        assert!(!ConsoleModel::MasterSystem2.floating_port_bus());
        assert!(!ConsoleModel::GameGear.floating_port_bus());
    }
}

//! Actuator command definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wire text the actuator receives when nothing matched.
pub const NONE_WIRE_NAME: &str = "none_for_now";

/// A discrete actuator instruction for the rover controller.
///
/// Declaration order is the classification priority: when phrases for two
/// commands both appear in an answer, the earlier variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    LightOn,
    LightOff,
    SeedSowOn,
    SeedSowOff,
    FertilizerOn,
    FertilizerOff,
    WaterPumpOn,
    WaterPumpOff,
    StartMeasuringSoilMoisture,
    StopMeasuringSoilMoisture,
    StartRover,
    StopRover,
    /// No phrase matched
    #[serde(rename = "none_for_now")]
    None,
}

impl Command {
    /// Every actionable command in priority order (the `None` sentinel is excluded).
    pub const PRIORITY: [Command; 12] = [
        Command::LightOn,
        Command::LightOff,
        Command::SeedSowOn,
        Command::SeedSowOff,
        Command::FertilizerOn,
        Command::FertilizerOff,
        Command::WaterPumpOn,
        Command::WaterPumpOff,
        Command::StartMeasuringSoilMoisture,
        Command::StopMeasuringSoilMoisture,
        Command::StartRover,
        Command::StopRover,
    ];

    /// Canonical name polled by the firmware.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Command::LightOn => "light_on",
            Command::LightOff => "light_off",
            Command::SeedSowOn => "seed_sow_on",
            Command::SeedSowOff => "seed_sow_off",
            Command::FertilizerOn => "fertilizer_on",
            Command::FertilizerOff => "fertilizer_off",
            Command::WaterPumpOn => "water_pump_on",
            Command::WaterPumpOff => "water_pump_off",
            Command::StartMeasuringSoilMoisture => "start_measuring_soil_moisture",
            Command::StopMeasuringSoilMoisture => "stop_measuring_soil_moisture",
            Command::StartRover => "start_rover",
            Command::StopRover => "stop_rover",
            Command::None => NONE_WIRE_NAME,
        }
    }

    /// Position in the priority list; `None` sorts last.
    pub fn priority(&self) -> usize {
        Self::PRIORITY
            .iter()
            .position(|c| c == self)
            .unwrap_or(Self::PRIORITY.len())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Error returned when a command name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown command: {0}")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == NONE_WIRE_NAME || s == "none" {
            return Ok(Command::None);
        }
        Self::PRIORITY
            .iter()
            .copied()
            .find(|c| c.wire_name() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

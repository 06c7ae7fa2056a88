//! In-memory climate state for one thermostat.

use comet_common::error::ValidationError;

/// Lowest temperature the model accepts, in °C.
pub const MIN_TEMPERATURE: f64 = 0.0;
/// Highest temperature the model accepts, in °C. The wire encoding is an
/// unsigned half-degree code, so everything a real device reports fits well
/// under this bound.
pub const MAX_TEMPERATURE: f64 = 100.0;

/// Operating mode. The Comet WiFi firmware only heats; no mode transitions
/// exist in this version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HvacMode {
    Heat,
}

/// Snapshot of a device's climate state, in °C at half-degree resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermostatState {
    pub current_temperature: f64,
    pub target_temperature: f64,
    pub mode: HvacMode,
}

impl Default for ThermostatState {
    fn default() -> Self {
        Self {
            current_temperature: 20.0,
            target_temperature: 20.0,
            mode: HvacMode::Heat,
        }
    }
}

/// Owns one device's state and enforces the update rules.
///
/// Each model belongs to exactly one [`crate::channel::DeviceStateChannel`];
/// nothing is shared across devices.
#[derive(Debug, Default)]
pub struct ThermostatModel {
    state: ThermostatState,
}

impl ThermostatModel {
    pub fn state(&self) -> ThermostatState {
        self.state
    }

    pub fn set_current_temperature(&mut self, value: f64) -> Result<(), ValidationError> {
        validate(value)?;
        self.state.current_temperature = value;
        Ok(())
    }

    pub fn set_target_temperature(&mut self, value: f64) -> Result<(), ValidationError> {
        validate(value)?;
        self.state.target_temperature = value;
        Ok(())
    }
}

fn validate(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite(value));
    }
    if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&value) {
        return Err(ValidationError::OutOfRange {
            value,
            min: MIN_TEMPERATURE,
            max: MAX_TEMPERATURE,
        });
    }
    Ok(())
}

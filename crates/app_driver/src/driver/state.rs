use std::fmt;

use tracing::debug;

use super::actuator::Actuator;
use super::actuator::ActuatorError;
use super::remap::MATTER_BRIGHTNESS;
use super::remap::to_device_level;

pub const DEFAULT_POWER: bool = false;
/// Mid-scale, in protocol units
pub const DEFAULT_BRIGHTNESS: u8 = 127;

/// What the device is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceState {
    pub power: bool,
    /// Protocol units, `0..=254`
    pub brightness: u8,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            power: DEFAULT_POWER,
            brightness: DEFAULT_BRIGHTNESS,
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "power={} brightness={}",
            if self.power { "on" } else { "off" },
            self.brightness
        )
    }
}

/// Current power/brightness in front of an actuator.
///
/// State is only recorded once the actuator has accepted the change.
pub struct DeviceStateModel {
    actuator: Box<dyn Actuator>,
    state: DeviceState,
}

impl DeviceStateModel {
    pub fn new(actuator: Box<dyn Actuator>) -> Self {
        Self {
            actuator,
            state: DeviceState::default(),
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn set_power(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.actuator.set_on_off(on)?;
        self.state.power = on;
        Ok(())
    }

    /// Apply a protocol level, clamped to `0..=254` and remapped to device units.
    pub fn set_brightness(&mut self, protocol_level: u8) -> Result<(), ActuatorError> {
        let protocol_level = protocol_level.min(MATTER_BRIGHTNESS);
        let device_level = to_device_level(protocol_level);
        debug!("Brightness {} -> device level {}", protocol_level, device_level);
        self.actuator.set_brightness(device_level)?;
        self.state.brightness = protocol_level;
        Ok(())
    }
}

impl fmt::Debug for DeviceStateModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceStateModel")
            .field("actuator", &"<actuator>")
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default, Clone)]
    struct Recorder {
        levels: Arc<Mutex<Vec<u8>>>,
        fail: bool,
    }

    impl Actuator for Recorder {
        fn set_on_off(&mut self, _on: bool) -> Result<(), ActuatorError> {
            if self.fail {
                return Err(ActuatorError::Rejected("power".to_string()));
            }
            Ok(())
        }

        fn set_brightness(&mut self, level: u8) -> Result<(), ActuatorError> {
            if self.fail {
                return Err(ActuatorError::Rejected("brightness".to_string()));
            }
            self.levels.lock().unwrap().push(level);
            Ok(())
        }
    }

    #[test]
    fn test_brightness_is_remapped_and_clamped() {
        let recorder = Recorder::default();
        let mut model = DeviceStateModel::new(Box::new(recorder.clone()));

        model.set_brightness(254).unwrap();
        model.set_brightness(255).unwrap();
        model.set_brightness(0).unwrap();

        assert_eq!(*recorder.levels.lock().unwrap(), vec![100, 100, 0]);
        assert_eq!(model.state().brightness, 0);
    }

    #[test]
    fn test_failed_actuator_keeps_state() {
        let recorder = Recorder {
            fail: true,
            ..Default::default()
        };
        let mut model = DeviceStateModel::new(Box::new(recorder));

        assert!(model.set_power(true).is_err());
        assert!(model.set_brightness(10).is_err());
        assert_eq!(model.state(), DeviceState::default());
    }

    #[test]
    fn test_display() {
        let state = DeviceState {
            power: true,
            brightness: 200,
        };
        insta::assert_snapshot!(state.to_string(), @"power=on brightness=200");
    }
}

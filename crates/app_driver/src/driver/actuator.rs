//! LED actuators.
//!
//! [`StubActuator`] is used on boards without an LED; [`SysfsLed`] drives a
//! Linux LED-class device through `/sys/class/leds/<name>`.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tracing::info;

use super::remap::STANDARD_BRIGHTNESS;
use super::remap::remap_to_range;

#[derive(Debug, thiserror::Error)]
pub enum ActuatorError {
    #[error("LED I/O failed on {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid max_brightness '{value}' in {path}")]
    InvalidMaxBrightness { path: PathBuf, value: String },

    #[error("LED driver rejected the request: {0}")]
    Rejected(String),
}

pub trait Actuator: Send {
    fn set_on_off(&mut self, on: bool) -> Result<(), ActuatorError>;

    /// `level` is in device units, `0..=100`.
    fn set_brightness(&mut self, level: u8) -> Result<(), ActuatorError>;
}

/// Accepts every request and only logs it.
#[derive(Debug, Default)]
pub struct StubActuator;

impl Actuator for StubActuator {
    fn set_on_off(&mut self, on: bool) -> Result<(), ActuatorError> {
        info!("LED set power: {} (no LED attached)", if on { "ON" } else { "OFF" });
        Ok(())
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), ActuatorError> {
        info!("LED set brightness: {} (no LED attached)", level);
        Ok(())
    }
}

/// LED-class device driven through sysfs.
///
/// The kernel only knows one brightness value, so on/off and level are folded
/// together: while off the LED is written 0, while on the level scaled to
/// `max_brightness`.
#[derive(Debug)]
pub struct SysfsLed {
    dir: PathBuf,
    max_brightness: u32,
    on: bool,
    level: u8,
}

impl SysfsLed {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ActuatorError> {
        let dir = dir.into();
        let max_path = dir.join("max_brightness");
        let raw = fs::read_to_string(&max_path).map_err(|e| ActuatorError::Io(max_path.clone(), e))?;
        let max_brightness = match raw.trim().parse::<u32>() {
            Ok(v) if v > 0 => v,
            _ => {
                return Err(ActuatorError::InvalidMaxBrightness {
                    path: max_path,
                    value: raw.trim().to_string(),
                });
            }
        };

        info!("Opened LED {} (max_brightness {})", dir.display(), max_brightness);
        Ok(Self {
            dir,
            max_brightness,
            on: false,
            level: STANDARD_BRIGHTNESS,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn raw_brightness(&self, on: bool, level: u8) -> u32 {
        if on {
            remap_to_range(level.into(), STANDARD_BRIGHTNESS.into(), self.max_brightness)
        } else {
            0
        }
    }

    /// Write the LED, then record `on` and `level` once the kernel took them.
    fn write(&mut self, on: bool, level: u8) -> Result<(), ActuatorError> {
        let path = self.dir.join("brightness");
        fs::write(&path, self.raw_brightness(on, level).to_string())
            .map_err(|e| ActuatorError::Io(path, e))?;
        self.on = on;
        self.level = level;
        Ok(())
    }
}

impl Actuator for SysfsLed {
    fn set_on_off(&mut self, on: bool) -> Result<(), ActuatorError> {
        info!("LED set power: {}", if on { "ON" } else { "OFF" });
        self.write(on, self.level)
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), ActuatorError> {
        info!("LED set brightness: {}", level);
        self.write(self.on, level.min(STANDARD_BRIGHTNESS))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn fake_led(max: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("max_brightness"), max).unwrap();
        fs::write(dir.path().join("brightness"), "0\n").unwrap();
        dir
    }

    fn brightness(dir: &TempDir) -> String {
        fs::read_to_string(dir.path().join("brightness")).unwrap()
    }

    #[test]
    fn test_sysfs_led_folds_power_and_level() {
        let dir = fake_led("255\n");
        let mut led = SysfsLed::open(dir.path()).unwrap();

        led.set_brightness(50).unwrap();
        assert_eq!(brightness(&dir), "0");

        led.set_on_off(true).unwrap();
        assert_eq!(brightness(&dir), "128");

        led.set_brightness(100).unwrap();
        assert_eq!(brightness(&dir), "255");

        led.set_on_off(false).unwrap();
        assert_eq!(brightness(&dir), "0");
    }

    #[test]
    fn test_failed_write_keeps_previous_state() {
        let dir = fake_led("255\n");
        let mut led = SysfsLed::open(dir.path()).unwrap();
        led.set_brightness(50).unwrap();

        let node = dir.path().join("brightness");
        fs::remove_file(&node).unwrap();
        fs::create_dir(&node).unwrap();
        assert!(matches!(led.set_on_off(true), Err(ActuatorError::Io(..))));
        assert!(matches!(led.set_brightness(80), Err(ActuatorError::Io(..))));

        fs::remove_dir(&node).unwrap();
        led.set_brightness(50).unwrap();
        assert_eq!(brightness(&dir), "0");
        assert!(!led.on);
        assert_eq!(led.level, 50);
    }

    #[test]
    fn test_sysfs_led_rejects_bad_max() {
        let dir = fake_led("zero");
        assert!(matches!(
            SysfsLed::open(dir.path()),
            Err(ActuatorError::InvalidMaxBrightness { .. })
        ));

        let dir = fake_led("0");
        assert!(SysfsLed::open(dir.path()).is_err());
    }

    #[test]
    fn test_sysfs_led_missing_device() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            SysfsLed::open(dir.path().join("nope")),
            Err(ActuatorError::Io(..))
        ));
    }

    #[test]
    fn test_stub_accepts_everything() {
        let mut stub = StubActuator;
        assert!(stub.set_on_off(true).is_ok());
        assert!(stub.set_brightness(100).is_ok());
    }
}

use tracing::debug;
use tracing::info;

use super::Flash;
use super::FlashHandle;
use super::OpenMode;
use super::StoreError;
use crate::driver::state::DEFAULT_BRIGHTNESS;
use crate::driver::state::DEFAULT_POWER;

pub const DEFAULT_NAMESPACE: &str = "light_config";

/// Records kept in the durable store, one byte each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum StateKey {
    Power,
    /// Protocol units, `0..=254`
    Brightness,
}

impl StateKey {
    pub const fn default_value(self) -> u8 {
        match self {
            StateKey::Power => DEFAULT_POWER as u8,
            StateKey::Brightness => DEFAULT_BRIGHTNESS,
        }
    }
}

/// Last-known power and brightness, kept across power cycles.
///
/// Every operation opens the namespace, does its work and closes it again;
/// nothing stays open between calls.
#[derive(Debug)]
pub struct DurableStateStore<F> {
    flash: F,
    namespace: String,
}

impl<F: Flash> DurableStateStore<F> {
    pub fn new(flash: F, namespace: impl Into<String>) -> Self {
        Self {
            flash,
            namespace: namespace.into(),
        }
    }

    pub fn flash(&self) -> &F {
        &self.flash
    }

    pub fn save(&self, key: StateKey, value: u8) -> Result<(), StoreError> {
        let mut handle = self.flash.open(&self.namespace, OpenMode::ReadWrite)?;
        handle.set_u8(key.as_ref(), value)?;
        handle.commit()?;
        debug!("Saved {}={} to '{}'", key, value, self.namespace);
        Ok(())
    }

    /// Read `key`, falling back to its default when nothing usable is stored.
    pub fn load(&self, key: StateKey) -> u8 {
        let handle = match self.flash.open(&self.namespace, OpenMode::ReadOnly) {
            Ok(handle) => handle,
            Err(e) => {
                info!("Opening '{}' failed ({}), using default {}", self.namespace, e, key);
                return key.default_value();
            }
        };

        match handle.get_u8(key.as_ref()) {
            Ok(Some(value)) => value,
            Ok(None) => {
                info!("No saved {}, using default", key);
                key.default_value()
            }
            Err(e) => {
                info!("Reading {} failed ({}), using default", key, e);
                key.default_value()
            }
        }
    }

    pub fn save_power(&self, on: bool) -> Result<(), StoreError> {
        self.save(StateKey::Power, u8::from(on))
    }

    pub fn load_power(&self) -> bool {
        self.load(StateKey::Power) != 0
    }

    pub fn save_brightness(&self, level: u8) -> Result<(), StoreError> {
        self.save(StateKey::Brightness, level)
    }

    pub fn load_brightness(&self) -> u8 {
        self.load(StateKey::Brightness)
    }
}

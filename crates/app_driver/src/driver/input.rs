use tracing::debug;
use tracing::info;
use tracing::warn;

use super::bridge::DeviceDriver;
use crate::data_model::AttrValue;
use crate::data_model::AttributePath;
use crate::data_model::AttributeStore;
use crate::storage::Flash;

/// Edge events reported by a button driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ButtonEvent {
    PressDown,
    PressUp,
    SingleClick,
    DoubleClick,
    LongPressStart,
}

impl<F: Flash> DeviceDriver<F> {
    /// Button callback. Only the press-down edge toggles the device.
    pub fn on_button_event(&self, event: ButtonEvent, attributes: &mut dyn AttributeStore) {
        match event {
            ButtonEvent::PressDown => self.on_button_pressed(attributes),
            other => debug!("Ignoring button event {}", other),
        }
    }

    /// Toggle the OnOff attribute through the attribute store.
    ///
    /// The device itself is not touched here; the update comes back through
    /// [`DeviceDriver::on_attribute_change`] once the stack dispatches it.
    pub fn on_button_pressed(&self, attributes: &mut dyn AttributeStore) {
        info!("Toggle button pressed");
        let path = AttributePath::on_off(self.endpoint_id());

        let current = match attributes.get_attribute_value(&path).map(|v| (v, v.as_bool())) {
            Some((_, Some(on))) => on,
            Some((value, None)) => {
                warn!("OnOff attribute {} holds {}, not a boolean", path, value);
                return;
            }
            None => {
                warn!("OnOff attribute {} not found", path);
                return;
            }
        };

        if let Err(e) = attributes.update_attribute_value(path, AttrValue::Bool(!current)) {
            warn!("Toggling {} failed: {}", path, e);
        }
    }
}

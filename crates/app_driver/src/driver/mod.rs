//! Application driver for OnOff plugs and dimmable lights.
//!
//! Protocol attribute writes flow through [`DeviceDriver::on_attribute_change`]
//! to the actuator and then to the durable store; button presses flow back out
//! through [`DeviceDriver::on_button_pressed`] as attribute updates.

pub mod actuator;
mod bridge;
mod input;
pub mod remap;
pub mod state;

use crate::data_model::AttrValue;
use crate::data_model::AttributePath;
use crate::storage::StoreError;

pub use actuator::Actuator;
pub use actuator::ActuatorError;
pub use actuator::StubActuator;
pub use actuator::SysfsLed;
pub use bridge::DeviceDriver;
pub use input::ButtonEvent;
pub use state::DeviceState;
pub use state::DeviceStateModel;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("actuator failed: {0}")]
    Actuator(#[from] ActuatorError),

    #[error("persisting state failed: {0}")]
    Store(#[from] StoreError),

    #[error("attribute {path} cannot take value {value}")]
    InvalidValue { path: AttributePath, value: AttrValue },

    #[error("attribute {0} is missing from the attribute store")]
    MissingAttribute(AttributePath),
}

impl DriverError {
    /// Whether the device already shows the new value despite the error.
    ///
    /// Only a store failure happens after the actuator accepted the change.
    pub fn is_applied(&self) -> bool {
        matches!(self, DriverError::Store(_))
    }
}

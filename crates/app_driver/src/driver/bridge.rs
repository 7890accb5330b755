use std::collections::HashMap;

use tracing::debug;
use tracing::info;
use tracing::warn;

use super::DriverError;
use super::actuator::Actuator;
use super::state::DeviceState;
use super::state::DeviceStateModel;
use crate::data_model::AttrValue;
use crate::data_model::AttributeChange;
use crate::data_model::AttributeId;
use crate::data_model::AttributePath;
use crate::data_model::AttributeStore;
use crate::data_model::ClusterId;
use crate::data_model::DeviceKind;
use crate::data_model::EndpointId;
use crate::data_model::cluster::level_control;
use crate::data_model::cluster::on_off;
use crate::storage::DurableStateStore;
use crate::storage::Flash;

/// What to do with a value written to one of our attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeHandler {
    Power,
    Brightness,
}

impl AttributeHandler {
    fn for_attribute(cluster_id: ClusterId, attribute_id: AttributeId) -> Option<Self> {
        match cluster_id {
            on_off::CLUSTER_ID if attribute_id == on_off::Attributes::OnOff.id() => {
                Some(AttributeHandler::Power)
            }
            level_control::CLUSTER_ID
                if attribute_id == level_control::Attributes::CurrentLevel.id() =>
            {
                Some(AttributeHandler::Brightness)
            }
            _ => None,
        }
    }
}

/// Application driver bound to one endpoint.
///
/// Owns the device state, the actuator behind it and the durable copy of the
/// state. All entry points are synchronous and expect to be called from a
/// single dispatch context.
#[derive(Debug)]
pub struct DeviceDriver<F> {
    endpoint_id: EndpointId,
    kind: DeviceKind,
    model: DeviceStateModel,
    store: DurableStateStore<F>,
    handlers: HashMap<(ClusterId, AttributeId), AttributeHandler>,
}

impl<F: Flash> DeviceDriver<F> {
    pub fn new(
        endpoint_id: EndpointId,
        kind: DeviceKind,
        actuator: Box<dyn Actuator>,
        store: DurableStateStore<F>,
    ) -> Self {
        let handlers = kind
            .owned_attributes()
            .iter()
            .filter_map(|&key| AttributeHandler::for_attribute(key.0, key.1).map(|h| (key, h)))
            .collect();

        Self {
            endpoint_id,
            kind,
            model: DeviceStateModel::new(actuator),
            store,
            handlers,
        }
    }

    pub fn endpoint_id(&self) -> EndpointId {
        self.endpoint_id
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn state(&self) -> DeviceState {
        self.model.state()
    }

    pub fn store(&self) -> &DurableStateStore<F> {
        &self.store
    }

    /// Apply a protocol attribute write and persist the result.
    ///
    /// Writes for other endpoints and attributes this device does not own are
    /// ignored. Nothing is persisted unless the actuator accepted the change.
    pub fn on_attribute_change(&mut self, change: &AttributeChange) -> Result<(), DriverError> {
        let path = change.path;
        if path.endpoint_id != self.endpoint_id {
            debug!("Ignoring change for endpoint {}", path.endpoint_id);
            return Ok(());
        }

        let Some(handler) = self.handlers.get(&(path.cluster_id, path.attribute_id)).copied()
        else {
            debug!("Ignoring change to unhandled attribute {}", path);
            return Ok(());
        };

        self.drive(handler, path, change.value)?;

        let state = self.model.state();
        match handler {
            AttributeHandler::Power => self.store.save_power(state.power)?,
            AttributeHandler::Brightness => self.store.save_brightness(state.brightness)?,
        }
        Ok(())
    }

    /// Push the attribute store's current values to the actuator.
    ///
    /// Brightness goes first so that the power attribute decides whether the
    /// light ends up on. Every attribute is attempted; the first error wins.
    pub fn apply_defaults(&mut self, attributes: &dyn AttributeStore) -> Result<(), DriverError> {
        let mut result = Ok(());
        for &(cluster_id, attribute_id) in self.kind.owned_attributes() {
            let Some(handler) = self.handlers.get(&(cluster_id, attribute_id)).copied() else {
                continue;
            };
            let path = AttributePath::new(self.endpoint_id, cluster_id, attribute_id);
            let outcome = match attributes.get_attribute_value(&path) {
                Some(value) => self.drive(handler, path, value),
                None => Err(DriverError::MissingAttribute(path)),
            };

            if let Err(e) = outcome {
                warn!("Applying default for {} failed: {}", path, e);
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }

        info!("Applied defaults on endpoint {}: {}", self.endpoint_id, self.model.state());
        result
    }

    /// Values recorded in the durable store for each attribute this device owns.
    ///
    /// The embedding stack seeds its attribute store with these before calling
    /// [`DeviceDriver::apply_defaults`].
    pub fn persisted_attributes(&self) -> Vec<(AttributePath, AttrValue)> {
        self.kind
            .owned_attributes()
            .iter()
            .filter_map(|&(cluster_id, attribute_id)| {
                let handler = self.handlers.get(&(cluster_id, attribute_id))?;
                let value = match handler {
                    AttributeHandler::Power => AttrValue::Bool(self.store.load_power()),
                    AttributeHandler::Brightness => AttrValue::U8(self.store.load_brightness()),
                };
                Some((AttributePath::new(self.endpoint_id, cluster_id, attribute_id), value))
            })
            .collect()
    }

    fn drive(
        &mut self,
        handler: AttributeHandler,
        path: AttributePath,
        value: AttrValue,
    ) -> Result<(), DriverError> {
        match handler {
            AttributeHandler::Power => {
                let on = value
                    .as_bool()
                    .ok_or(DriverError::InvalidValue { path, value })?;
                self.model.set_power(on)?;
            }
            AttributeHandler::Brightness => {
                let level = value
                    .as_level()
                    .ok_or(DriverError::InvalidValue { path, value })?;
                self.model.set_brightness(level)?;
            }
        }
        Ok(())
    }
}

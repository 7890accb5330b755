//! Protocol attribute store.
//!
//! The driver reads and updates attributes through [`AttributeStore`]; the
//! real Matter stack provides its own implementation. [`AttributeTable`] is the
//! in-memory one used by the node simulator and the tests.

use std::collections::BTreeMap;
use std::collections::VecDeque;

use super::AttrValue;
use super::AttributeChange;
use super::AttributePath;
use super::DeviceKind;
use super::EndpointId;
use crate::driver::DeviceState;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    #[error("attribute {0} does not exist")]
    UnknownAttribute(AttributePath),
}

pub trait AttributeStore {
    fn get_attribute_value(&self, path: &AttributePath) -> Option<AttrValue>;

    /// Store a new value and schedule a change notification for it.
    fn update_attribute_value(
        &mut self,
        path: AttributePath,
        value: AttrValue,
    ) -> Result<(), AttributeError>;
}

/// A change waiting to be delivered, with the value it replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingChange {
    pub change: AttributeChange,
    pub previous: AttrValue,
}

/// In-memory attribute store with a FIFO of undelivered change notifications.
///
/// Updates are visible to readers immediately; the notifications are handed
/// out by [`AttributeTable::take_pending`] so the dispatcher can deliver them
/// after the current callback returns.
#[derive(Debug, Default)]
pub struct AttributeTable {
    values: BTreeMap<AttributePath, AttrValue>,
    pending: VecDeque<PendingChange>,
}

impl AttributeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the attributes `kind` owns on `endpoint_id`, holding default values.
    pub fn for_device(endpoint_id: EndpointId, kind: DeviceKind) -> Self {
        let defaults = DeviceState::default();
        let mut table = Self::new();
        table.set(AttributePath::on_off(endpoint_id), AttrValue::Bool(defaults.power));
        if kind.supports_level() {
            table.set(
                AttributePath::current_level(endpoint_id),
                AttrValue::U8(defaults.brightness),
            );
        }
        table
    }

    /// Set a value without generating a change notification.
    pub fn set(&mut self, path: AttributePath, value: AttrValue) {
        self.values.insert(path, value);
    }

    pub fn take_pending(&mut self) -> Option<PendingChange> {
        self.pending.pop_front()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttributePath, &AttrValue)> {
        self.values.iter()
    }
}

impl AttributeStore for AttributeTable {
    fn get_attribute_value(&self, path: &AttributePath) -> Option<AttrValue> {
        self.values.get(path).copied()
    }

    fn update_attribute_value(
        &mut self,
        path: AttributePath,
        value: AttrValue,
    ) -> Result<(), AttributeError> {
        let slot = self
            .values
            .get_mut(&path)
            .ok_or(AttributeError::UnknownAttribute(path))?;
        let previous = std::mem::replace(slot, value);
        self.pending.push_back(PendingChange {
            change: AttributeChange::new(path, value),
            previous,
        });
        Ok(())
    }
}

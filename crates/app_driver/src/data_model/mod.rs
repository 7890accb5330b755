//! Defines the slice of the Matter data model the application drivers touch

pub mod attributes;
pub mod cluster;
pub mod device_type;

use std::fmt;

pub use attributes::AttributeError;
pub use attributes::AttributeStore;
pub use attributes::AttributeTable;
pub use attributes::PendingChange;
pub use device_type::DeviceKind;

pub type EndpointId = u16;
pub type ClusterId = u32;
pub type AttributeId = u32;

/// Fully qualified address of one attribute on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributePath {
    pub endpoint_id: EndpointId,
    pub cluster_id: ClusterId,
    pub attribute_id: AttributeId,
}

impl AttributePath {
    pub const fn new(
        endpoint_id: EndpointId,
        cluster_id: ClusterId,
        attribute_id: AttributeId,
    ) -> Self {
        Self {
            endpoint_id,
            cluster_id,
            attribute_id,
        }
    }

    /// The OnOff attribute of the OnOff cluster on `endpoint_id`
    pub const fn on_off(endpoint_id: EndpointId) -> Self {
        Self::new(
            endpoint_id,
            cluster::on_off::CLUSTER_ID,
            cluster::on_off::Attributes::OnOff.id(),
        )
    }

    /// The CurrentLevel attribute of the LevelControl cluster on `endpoint_id`
    pub const fn current_level(endpoint_id: EndpointId) -> Self {
        Self::new(
            endpoint_id,
            cluster::level_control::CLUSTER_ID,
            cluster::level_control::Attributes::CurrentLevel.id(),
        )
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/0x{:04X}/0x{:04X}",
            self.endpoint_id, self.cluster_id, self.attribute_id
        )
    }
}

/// Attribute values used by the OnOff and LevelControl clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    Null,
}

impl AttrValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Interpret the value as a protocol level, clamped into `0..=254`.
    ///
    /// Levels are `u8` on the wire, but writes coming from a console or a
    /// wider integer type are accepted and clamped rather than rejected.
    pub fn as_level(&self) -> Option<u8> {
        let raw: u32 = match self {
            AttrValue::U8(v) => (*v).into(),
            AttrValue::U16(v) => (*v).into(),
            AttrValue::U32(v) => *v,
            AttrValue::Bool(_) | AttrValue::Null => return None,
        };
        let max = u32::from(cluster::level_control::MAX_LEVEL);
        Some(raw.min(max) as u8)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::U8(v) => write!(f, "{}", v),
            AttrValue::U16(v) => write!(f, "{}", v),
            AttrValue::U32(v) => write!(f, "{}", v),
            AttrValue::Null => f.write_str("null"),
        }
    }
}

/// One protocol-level attribute write, delivered once to the attribute bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeChange {
    pub path: AttributePath,
    pub value: AttrValue,
}

impl AttributeChange {
    pub const fn new(path: AttributePath, value: AttrValue) -> Self {
        Self { path, value }
    }
}

use serde::Deserialize;
use serde::Serialize;

use super::AttributeId;
use super::ClusterId;
use super::cluster::level_control;
use super::cluster::on_off;

/// Device types an application driver can be built for.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceKind {
    /// Smart plug: OnOff only
    OnOffPlugInUnit,
    /// Light with OnOff and LevelControl
    #[default]
    DimmableLight,
}

const PLUG_ATTRIBUTES: &[(ClusterId, AttributeId)] =
    &[(on_off::CLUSTER_ID, on_off::Attributes::OnOff.id())];

// Brightness first so the power attribute decides the final on/off state.
const DIMMABLE_LIGHT_ATTRIBUTES: &[(ClusterId, AttributeId)] = &[
    (
        level_control::CLUSTER_ID,
        level_control::Attributes::CurrentLevel.id(),
    ),
    (on_off::CLUSTER_ID, on_off::Attributes::OnOff.id()),
];

impl DeviceKind {
    /// Matter device type identifier (Device Library 5.1, 4.1)
    pub const fn device_type_id(self) -> u32 {
        match self {
            DeviceKind::OnOffPlugInUnit => 0x010A,
            DeviceKind::DimmableLight => 0x0101,
        }
    }

    /// Attributes the driver reacts to, in the order they are applied at startup.
    pub const fn owned_attributes(self) -> &'static [(ClusterId, AttributeId)] {
        match self {
            DeviceKind::OnOffPlugInUnit => PLUG_ATTRIBUTES,
            DeviceKind::DimmableLight => DIMMABLE_LIGHT_ATTRIBUTES,
        }
    }

    pub fn supports_level(self) -> bool {
        matches!(self, DeviceKind::DimmableLight)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_dimmable_light_applies_level_before_power() {
        let attrs = DeviceKind::DimmableLight.owned_attributes();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].0, level_control::CLUSTER_ID);
        assert_eq!(attrs[1].0, on_off::CLUSTER_ID);
    }

    #[test]
    fn test_plug_owns_only_on_off() {
        assert_eq!(
            DeviceKind::OnOffPlugInUnit.owned_attributes(),
            &[(on_off::CLUSTER_ID, on_off::Attributes::OnOff.id())]
        );
        assert!(!DeviceKind::OnOffPlugInUnit.supports_level());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(DeviceKind::DimmableLight.to_string(), "dimmable_light");
        assert_eq!(
            DeviceKind::from_str("on_off_plug_in_unit").unwrap(),
            DeviceKind::OnOffPlugInUnit
        );
    }
}

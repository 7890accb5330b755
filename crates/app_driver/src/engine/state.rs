use std::fmt;

use crate::data_model::AttrValue;
use crate::data_model::AttributePath;
use crate::data_model::AttributeTable;
use crate::data_model::DeviceKind;
use crate::data_model::EndpointId;
use crate::driver::DeviceDriver;
use crate::driver::DeviceState;
use crate::storage::Flash;

/// Point-in-time view of the node, published after every message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSnapshot {
    pub endpoint_id: EndpointId,
    pub kind: DeviceKind,
    /// What the actuator was last told
    pub device: DeviceState,
    /// What the protocol side sees
    pub attributes: Vec<(AttributePath, AttrValue)>,
}

impl NodeSnapshot {
    pub fn capture<F: Flash>(driver: &DeviceDriver<F>, attributes: &AttributeTable) -> Self {
        Self {
            endpoint_id: driver.endpoint_id(),
            kind: driver.kind(),
            device: driver.state(),
            attributes: attributes.iter().map(|(p, v)| (*p, *v)).collect(),
        }
    }

    pub fn attribute(&self, path: &AttributePath) -> Option<AttrValue> {
        self.attributes
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, v)| *v)
    }
}

impl fmt::Display for NodeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} on endpoint {}: {}", self.kind, self.endpoint_id, self.device)?;
        for (path, value) in &self.attributes {
            writeln!(f, "  {} = {}", path, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let snapshot = NodeSnapshot {
            endpoint_id: 1,
            kind: DeviceKind::DimmableLight,
            device: DeviceState {
                power: true,
                brightness: 127,
            },
            attributes: vec![
                (AttributePath::on_off(1), AttrValue::Bool(true)),
                (AttributePath::current_level(1), AttrValue::U8(127)),
            ],
        };

        insta::assert_snapshot!(snapshot.to_string().trim_end(), @r"
        dimmable_light on endpoint 1: power=on brightness=127
          1/0x0006/0x0000 = true
          1/0x0008/0x0000 = 127
        ");
    }
}

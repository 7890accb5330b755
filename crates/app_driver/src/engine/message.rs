use crate::data_model::AttrValue;
use crate::data_model::AttributePath;
use crate::driver::ButtonEvent;

/// Messages delivered to the node's dispatch task.
///
/// Both kinds stand in for callbacks the Matter stack and the button driver
/// would make on a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeMessage {
    /// A controller wrote an attribute
    WriteAttribute { path: AttributePath, value: AttrValue },

    /// The physical button produced an edge
    Button(ButtonEvent),
}

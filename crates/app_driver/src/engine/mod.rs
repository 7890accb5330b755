mod engine;
mod message;
pub mod state;

pub use engine::Node;
pub use engine::NodeReceiver;
pub use engine::NodeSender;
pub use message::NodeMessage;
pub use state::NodeSnapshot;

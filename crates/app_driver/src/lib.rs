pub mod config;
pub mod console;
pub mod data_model;
pub mod driver;
mod engine;
pub mod storage;

pub use config::Config;
pub use config::LogLevel;
pub use driver::ButtonEvent;
pub use driver::DeviceDriver;
pub use driver::DriverError;
pub use engine::Node;
pub use engine::NodeMessage;
pub use engine::NodeReceiver;
pub use engine::NodeSender;
pub use engine::NodeSnapshot;

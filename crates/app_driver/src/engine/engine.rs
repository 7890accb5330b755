use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::mpsc;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::message::NodeMessage;
use super::state::NodeSnapshot;
use crate::data_model::AttributeStore;
use crate::data_model::AttributeTable;
use crate::driver::DeviceDriver;
use crate::driver::DriverError;
use crate::storage::Flash;

pub type NodeSender = mpsc::Sender<NodeMessage>;
pub type NodeReceiver = mpsc::Receiver<NodeMessage>;

/// Capacity for the message channel into the node
const NODE_CHANNEL_SIZE: usize = 64;

/// Host-side stand-in for the Matter node hosting one application driver.
///
/// Owns the protocol attribute table and delivers change notifications to the
/// driver one at a time, after the callback that produced them has returned.
/// This is the single dispatch context the driver relies on.
pub struct Node<F> {
    driver: DeviceDriver<F>,
    attributes: AttributeTable,

    /// Latest snapshot (readers load the Arc, the node stores a new one)
    snapshot: Arc<ArcSwap<NodeSnapshot>>,
}

impl<F: Flash> Node<F> {
    pub fn new(driver: DeviceDriver<F>, attributes: AttributeTable) -> Self {
        let snapshot = NodeSnapshot::capture(&driver, &attributes);
        Self {
            driver,
            attributes,
            snapshot: Arc::new(ArcSwap::from_pointee(snapshot)),
        }
    }

    pub fn channel() -> (NodeSender, NodeReceiver) {
        mpsc::channel(NODE_CHANNEL_SIZE)
    }

    pub fn driver(&self) -> &DeviceDriver<F> {
        &self.driver
    }

    pub fn attributes(&self) -> &AttributeTable {
        &self.attributes
    }

    /// Shared handle to the published snapshot, usable from other tasks.
    pub fn snapshots(&self) -> Arc<ArcSwap<NodeSnapshot>> {
        self.snapshot.clone()
    }

    pub fn snapshot(&self) -> Arc<NodeSnapshot> {
        self.snapshot.load_full()
    }

    /// Restore persisted values into the attribute table, then drive the
    /// device from the table.
    pub fn bootstrap(&mut self) -> Result<(), DriverError> {
        for (path, value) in self.driver.persisted_attributes() {
            debug!("Restoring {} = {}", path, value);
            self.attributes.set(path, value);
        }

        let result = self.driver.apply_defaults(&self.attributes);
        self.publish();
        result
    }

    /// Process one message and every change notification it caused.
    pub fn handle_message(&mut self, msg: NodeMessage) {
        match msg {
            NodeMessage::WriteAttribute { path, value } => {
                if let Err(e) = self.attributes.update_attribute_value(path, value) {
                    warn!("Rejected write of {}: {}", value, e);
                }
            }
            NodeMessage::Button(event) => {
                self.driver.on_button_event(event, &mut self.attributes);
            }
        }

        self.dispatch_pending();
        self.publish();
    }

    /// Run the dispatch loop until every sender is dropped.
    pub async fn run(mut self, mut rx: NodeReceiver) -> Self {
        info!("Node starting on endpoint {}", self.driver.endpoint_id());

        while let Some(msg) = rx.recv().await {
            debug!("Handling {:?}", msg);
            self.handle_message(msg);
        }

        info!("Node shutting down");
        self
    }

    fn dispatch_pending(&mut self) {
        while let Some(pending) = self.attributes.take_pending() {
            let change = pending.change;
            match self.driver.on_attribute_change(&change) {
                Ok(()) => debug!("Applied {} = {}", change.path, change.value),
                Err(e) if e.is_applied() => {
                    error!(
                        "Applied {} = {} but the durable store is now stale: {}",
                        change.path, change.value, e
                    );
                }
                Err(e) => {
                    // The write does not take effect; undo it on the protocol side too.
                    warn!("Write {} = {} failed: {}", change.path, change.value, e);
                    self.attributes.set(change.path, pending.previous);
                }
            }
        }
    }

    fn publish(&self) {
        self.snapshot
            .store(Arc::new(NodeSnapshot::capture(&self.driver, &self.attributes)));
    }
}

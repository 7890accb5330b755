use app_driver::ButtonEvent;
use app_driver::DeviceDriver;
use app_driver::Node;
use app_driver::NodeMessage;
use app_driver::data_model::AttrValue;
use app_driver::data_model::AttributePath;
use app_driver::data_model::AttributeTable;
use app_driver::data_model::DeviceKind;
use app_driver::driver::StubActuator;
use app_driver::driver::state::DeviceState;
use app_driver::storage::DEFAULT_NAMESPACE;
use app_driver::storage::DurableStateStore;
use app_driver::storage::FileFlash;
use app_driver::storage::Flash;
use app_driver::storage::MemoryFlash;
use tempfile::TempDir;

fn node<F: Flash>(kind: DeviceKind, flash: F) -> Node<F> {
    let driver = DeviceDriver::new(
        1,
        kind,
        Box::new(StubActuator),
        DurableStateStore::new(flash, DEFAULT_NAMESPACE),
    );
    Node::new(driver, AttributeTable::for_device(1, kind))
}

fn press() -> NodeMessage {
    NodeMessage::Button(ButtonEvent::PressDown)
}

#[test]
fn test_double_press_restores_state() {
    let flash = MemoryFlash::new();
    let mut node = node(DeviceKind::OnOffPlugInUnit, flash.clone());
    node.bootstrap().unwrap();

    node.handle_message(press());
    assert!(node.driver().state().power);
    assert_eq!(flash.peek(DEFAULT_NAMESPACE, "power"), Some(1));

    node.handle_message(press());
    assert!(!node.driver().state().power);
    assert_eq!(flash.peek(DEFAULT_NAMESPACE, "power"), Some(0));
    assert_eq!(
        node.snapshot().attribute(&AttributePath::on_off(1)),
        Some(AttrValue::Bool(false))
    );
}

#[test]
fn test_button_release_does_nothing() {
    let flash = MemoryFlash::new();
    let mut node = node(DeviceKind::OnOffPlugInUnit, flash.clone());
    node.bootstrap().unwrap();

    node.handle_message(NodeMessage::Button(ButtonEvent::PressUp));

    assert!(!node.driver().state().power);
    assert_eq!(flash.peek(DEFAULT_NAMESPACE, "power"), None);
}

#[test]
fn test_state_survives_restart() {
    let dir = TempDir::new().unwrap();

    let mut first = node(DeviceKind::DimmableLight, FileFlash::new(dir.path()));
    first.bootstrap().unwrap();
    first.handle_message(NodeMessage::WriteAttribute {
        path: AttributePath::current_level(1),
        value: AttrValue::U8(42),
    });
    first.handle_message(press());
    assert_eq!(
        first.driver().state(),
        DeviceState {
            power: true,
            brightness: 42
        }
    );
    drop(first);

    let mut second = node(DeviceKind::DimmableLight, FileFlash::new(dir.path()));
    second.bootstrap().unwrap();

    assert_eq!(
        second.driver().state(),
        DeviceState {
            power: true,
            brightness: 42
        }
    );
    assert_eq!(
        second.snapshot().attribute(&AttributePath::current_level(1)),
        Some(AttrValue::U8(42))
    );
}

#[test]
fn test_fresh_node_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let mut node = node(DeviceKind::DimmableLight, FileFlash::new(dir.path()));

    node.bootstrap().unwrap();

    assert_eq!(node.driver().state(), DeviceState::default());
    // Bootstrapping never writes the store
    assert!(!dir.path().join(format!("{}.json", DEFAULT_NAMESPACE)).exists());
}

#[tokio::test]
async fn test_node_task_processes_in_order() {
    let flash = MemoryFlash::new();
    let mut node = node(DeviceKind::DimmableLight, flash.clone());
    node.bootstrap().unwrap();
    let snapshots = node.snapshots();

    let (tx, rx) = Node::<MemoryFlash>::channel();
    let task = tokio::spawn(node.run(rx));

    for msg in [
        NodeMessage::WriteAttribute {
            path: AttributePath::on_off(1),
            value: AttrValue::Bool(true),
        },
        press(),
        press(),
        NodeMessage::WriteAttribute {
            path: AttributePath::current_level(1),
            value: AttrValue::U8(10),
        },
    ] {
        tx.send(msg).await.unwrap();
    }
    drop(tx);
    task.await.unwrap();

    let snapshot = snapshots.load();
    assert_eq!(
        snapshot.device,
        DeviceState {
            power: true,
            brightness: 10
        }
    );
    assert_eq!(flash.peek(DEFAULT_NAMESPACE, "power"), Some(1));
    assert_eq!(flash.peek(DEFAULT_NAMESPACE, "brightness"), Some(10));
}

#[test]
fn test_corrupt_state_file_recovers_on_save() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(format!("{}.json", DEFAULT_NAMESPACE)), "garbage").unwrap();
    let store = DurableStateStore::new(FileFlash::new(dir.path()), DEFAULT_NAMESPACE);

    assert!(!store.load_power());
    store.save_power(true).unwrap();
    store.save_brightness(30).unwrap();

    assert!(store.load_power());
    assert_eq!(store.load_brightness(), 30);
}

use std::path::PathBuf;

use anyhow::Context;
use app_driver::Config;
use app_driver::DeviceDriver;
use app_driver::LogLevel;
use app_driver::Node;
use app_driver::config::StorageBackend;
use app_driver::console;
use app_driver::console::Command;
use app_driver::data_model::AttributeTable;
use app_driver::driver::Actuator;
use app_driver::storage::DurableStateStore;
use app_driver::storage::FileFlash;
use app_driver::storage::Flash;
use app_driver::storage::MemoryFlash;
use clap::Parser;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tracing::error;
use tracing::info;
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Host node for the OnOff plug and dimmable light application drivers.
///
/// Reads commands from stdin, one per line. Logs go to stderr.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `logging.level` from the configuration
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(config.logging.filter())
        .init();

    info!("app_driver starting");
    if let Some(path) = &args.config {
        info!("Loaded config from: {}", path.display());
    }
    info!(
        "Device: {} on endpoint {}",
        config.device.kind, config.device.endpoint_id
    );

    let actuator = config
        .actuator
        .build()
        .context("Failed to set up the actuator")?;

    match config.storage.backend {
        StorageBackend::File => {
            info!("Persisting state under {}", config.storage.path.display());
            run_node(&config, actuator, FileFlash::new(&config.storage.path)).await
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage, state is lost on exit");
            run_node(&config, actuator, MemoryFlash::new()).await
        }
    }
}

async fn run_node<F>(config: &Config, actuator: Box<dyn Actuator>, flash: F) -> anyhow::Result<()>
where
    F: Flash + 'static,
{
    let endpoint_id = config.device.endpoint_id;
    let store = DurableStateStore::new(flash, config.storage.namespace.clone());
    let driver = DeviceDriver::new(endpoint_id, config.device.kind, actuator, store);
    let mut node = Node::new(
        driver,
        AttributeTable::for_device(endpoint_id, config.device.kind),
    );

    if let Err(e) = node.bootstrap() {
        warn!("Device did not take every restored value: {}", e);
    }
    println!("{}", node.snapshot());

    let snapshots = node.snapshots();
    let (tx, rx) = Node::<F>::channel();
    let task = tokio::spawn(node.run(rx));

    println!("Type 'help' for commands");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                match console::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => println!("{}", console::HELP),
                    Ok(Command::Show) => println!("{}", snapshots.load()),
                    Ok(command) => {
                        if let Some(msg) = command.to_message(endpoint_id) {
                            tx.send(msg).await.context("Node task stopped")?;
                        }
                    }
                    Err(e) => eprintln!("{}", e),
                }
            }
            result = tokio::signal::ctrl_c() => {
                match result {
                    Ok(()) => info!("Received shutdown signal"),
                    Err(e) => error!("Failed to listen for shutdown signal: {}", e),
                }
                break;
            }
        }
    }

    drop(tx);
    let node = task.await.context("Node task panicked")?;
    info!("app_driver shutdown complete: {}", node.driver().state());

    Ok(())
}

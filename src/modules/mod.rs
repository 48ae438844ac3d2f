pub mod catalog;

use std::sync::Arc;

use libris_db::SnapshotStore;
use libris_kernel::settings::Settings;
use libris_kernel::ModuleRegistry;

use catalog::{SnapshotBridge, SnapshotKeys};

/// Register all application modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    settings: &Settings,
    store: Arc<dyn SnapshotStore>,
) {
    let bridge = SnapshotBridge::new(store, SnapshotKeys::from(&settings.storage));
    registry.register(catalog::create_module(bridge));
}

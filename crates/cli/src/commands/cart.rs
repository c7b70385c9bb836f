//! Cart commands.
//!
//! # Environment Variables
//!
//! - `ROCKETSHOES_API_URL` - Inventory API base URL (required)
//! - `ROCKETSHOES_STORAGE_DIR` - Directory holding the persisted cart
//! - `ROCKETSHOES_STORAGE_KEY` - Storage slot holding the cart

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use rocketshoes_core::Cart;
use rocketshoes_storefront::config::{ConfigError, InventoryConfig, StorageConfig};
use rocketshoes_storefront::inventory::HttpInventoryApi;
use rocketshoes_storefront::notify::TracingNotifier;
use rocketshoes_storefront::services::CartStore;
use rocketshoes_storefront::storage::FileStorage;

/// Build the cart store the same way the server does.
///
/// `storage_dir` overrides `ROCKETSHOES_STORAGE_DIR`.
pub fn open_store(storage_dir: Option<PathBuf>) -> Result<CartStore, ConfigError> {
    let inventory = InventoryConfig::from_env()?;
    let mut storage = StorageConfig::from_env();
    if let Some(dir) = storage_dir {
        storage.dir = dir;
    }

    tracing::debug!(dir = %storage.dir.display(), key = %storage.key, "Opening cart");

    Ok(CartStore::load(
        Arc::new(HttpInventoryApi::new(&inventory)),
        Arc::new(FileStorage::new(storage.dir)),
        Arc::new(TracingNotifier),
        storage.key,
    ))
}

/// Write the cart to stdout as pretty JSON.
pub fn print(cart: &Cart) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, cart)?;
    writeln!(stdout)?;
    Ok(())
}

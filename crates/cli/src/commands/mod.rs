//! Subcommand implementations.

pub mod cart;
pub mod catalog;
pub mod session;

use serde::Serialize;
use tinycart_storefront::{FileStorage, SessionStore, StorageError, StorefrontConfig};

/// Pretty-print `value` as JSON on stdout.
#[allow(clippy::print_stdout)]
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Open the file-backed session under the configured storage directory.
fn open_session(config: &StorefrontConfig) -> Result<SessionStore<FileStorage>, StorageError> {
    let storage = FileStorage::open(&config.storage_dir)?;
    Ok(SessionStore::hydrate(storage))
}

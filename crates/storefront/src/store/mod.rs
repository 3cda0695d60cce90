//! Session state: the shopping cart and the logged-in user.
//!
//! [`SessionStore`] is constructed once from a [`LocalStorage`] backend and
//! passed by reference to whatever needs cart or user access. Every mutating
//! action writes the affected keys through to storage before returning.
//!
//! # Example
//!
//! ```rust,ignore
//! use tinycart_storefront::store::{FileStorage, SessionStore};
//!
//! let storage = FileStorage::open(&config.storage_dir)?;
//! let mut session = SessionStore::hydrate(storage);
//!
//! session.add_to_cart(&product);
//! println!("{} items, {}", session.cart_count(), session.cart_total());
//! ```
//!
//! The store never returns errors. Unreadable or malformed stored values are
//! replaced with defaults at hydration, failed writes are logged, and actions
//! on ids that are not in the cart do nothing.

pub mod storage;

pub use storage::{FileStorage, LocalStorage, MemoryStorage, StorageError};

use serde::de::DeserializeOwned;
use tinycart_core::{CartItem, Price, Product, ProductId, SessionToken, User};
use tracing::{debug, warn};

/// Storage keys for session data.
pub mod keys {
    /// JSON array of cart items.
    pub const CART: &str = "cart";

    /// JSON object of the logged-in user, or absent.
    pub const USER: &str = "user";

    /// Raw session token string (not JSON).
    pub const TOKEN: &str = "token";
}

/// Cart and login state mirrored to local storage.
#[derive(Debug)]
pub struct SessionStore<S: LocalStorage> {
    storage: S,
    cart: Vec<CartItem>,
    user: Option<User>,
}

impl<S: LocalStorage> SessionStore<S> {
    /// Build the session from whatever `storage` currently holds.
    ///
    /// Missing or malformed values fall back to an empty cart and no user.
    /// The user counts as logged in only when both the `user` and `token`
    /// keys hold usable values; the stored token wins over the one embedded
    /// in the user JSON.
    pub fn hydrate(storage: S) -> Self {
        let cart = read_json::<Vec<CartItem>, _>(&storage, keys::CART)
            .map(normalize_cart)
            .unwrap_or_default();

        let user = read_json::<Option<User>, _>(&storage, keys::USER).flatten();
        let token = read_raw(&storage, keys::TOKEN).filter(|t| !t.is_empty());

        let user = match (user, token) {
            (Some(mut user), Some(token)) => {
                user.token = SessionToken::new(token);
                Some(user)
            }
            (Some(_), None) => {
                debug!("Stored user has no token, starting logged out");
                None
            }
            (None, Some(_)) => {
                debug!("Stored token has no user, starting logged out");
                None
            }
            (None, None) => None,
        };

        debug!(
            items = cart.len(),
            authenticated = user.is_some(),
            "Session hydrated"
        );

        Self {
            storage,
            cart,
            user,
        }
    }

    // =========================================================================
    // Cart Actions
    // =========================================================================

    /// Add one unit of `product`.
    ///
    /// Increments the quantity if the product is already in the cart,
    /// otherwise appends a new line with quantity 1.
    pub fn add_to_cart(&mut self, product: &Product) {
        if let Some(item) = self.find_mut(product.id) {
            item.quantity = item.quantity.saturating_add(1);
            debug!(product_id = %product.id, quantity = item.quantity, "Incremented cart line");
        } else {
            self.cart.push(CartItem::new(product.clone()));
            debug!(product_id = %product.id, "Added cart line");
        }
        self.save_cart();
    }

    /// Remove the line for `product_id`. Does nothing (and writes nothing) if
    /// the product is not in the cart.
    pub fn remove_from_cart(&mut self, product_id: ProductId) {
        let Some(index) = self.cart.iter().position(|item| item.id() == product_id) else {
            return;
        };
        self.cart.remove(index);
        debug!(product_id = %product_id, "Removed cart line");
        self.save_cart();
    }

    /// Set the quantity for `product_id`.
    ///
    /// A quantity of zero or less removes the line. Does nothing if the
    /// product is not in the cart.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(product_id);
            return;
        }
        let Some(item) = self.find_mut(product_id) else {
            return;
        };
        item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        debug!(product_id = %product_id, quantity = item.quantity, "Updated cart line");
        self.save_cart();
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        debug!("Cleared cart");
        self.save_cart();
    }

    // =========================================================================
    // Auth Actions
    // =========================================================================

    /// Record `user` as logged in and persist the profile and token.
    pub fn login(&mut self, user: User) {
        match serde_json::to_string(&user) {
            Ok(json) => self.write(keys::USER, &json),
            Err(e) => warn!(error = %e, "Failed to encode user for storage"),
        }
        self.write(keys::TOKEN, user.token.expose());
        debug!(user_id = %user.id, "Logged in");
        self.user = Some(user);
    }

    /// Forget the logged-in user and erase the stored profile and token.
    pub fn logout(&mut self) {
        self.user = None;
        self.delete(keys::USER);
        self.delete(keys::TOKEN);
        debug!("Logged out");
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// Cart lines in the order they were first added.
    #[must_use]
    pub fn cart(&self) -> &[CartItem] {
        &self.cart
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn item(&self, product_id: ProductId) -> Option<&CartItem> {
        self.cart.iter().find(|item| item.id() == product_id)
    }

    /// Whether `product_id` is in the cart.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.item(product_id).is_some()
    }

    /// Sum of `price * quantity` over the cart.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.cart.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities over the cart.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.cart.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// The logged-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Whether a user is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the session, returning its storage backend.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn find_mut(&mut self, product_id: ProductId) -> Option<&mut CartItem> {
        self.cart.iter_mut().find(|item| item.id() == product_id)
    }

    fn save_cart(&mut self) {
        match serde_json::to_string(&self.cart) {
            Ok(json) => self.write(keys::CART, &json),
            Err(e) => warn!(error = %e, "Failed to encode cart for storage"),
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(e) = self.storage.set_item(key, value) {
            warn!(key, error = %e, "Failed to persist session state");
        }
    }

    fn delete(&mut self, key: &str) {
        if let Err(e) = self.storage.remove_item(key) {
            warn!(key, error = %e, "Failed to erase session state");
        }
    }
}

// =============================================================================
// Hydration Helpers
// =============================================================================

fn read_raw<S: LocalStorage>(storage: &S, key: &str) -> Option<String> {
    storage
        .get_item(key)
        .inspect_err(|e| warn!(key, error = %e, "Failed to read session state"))
        .ok()
        .flatten()
}

fn read_json<T: DeserializeOwned, S: LocalStorage>(storage: &S, key: &str) -> Option<T> {
    let raw = read_raw(storage, key)?;
    serde_json::from_str(&raw)
        .inspect_err(|e| warn!(key, error = %e, "Ignoring malformed session state"))
        .ok()
}

/// Drop zero-quantity lines and merge duplicate ids into their first line.
fn normalize_cart(items: Vec<CartItem>) -> Vec<CartItem> {
    let mut cart: Vec<CartItem> = Vec::with_capacity(items.len());
    for item in items {
        if item.quantity == 0 {
            continue;
        }
        if let Some(existing) = cart.iter_mut().find(|c| c.id() == item.id()) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            cart.push(item);
        }
    }
    cart
}

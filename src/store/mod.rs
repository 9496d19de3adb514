//! Persistence port for the storefront.
//!
//! Services talk to the database only through [`StorefrontStore`], so the
//! Postgres backend can be swapped for [`MemoryStore`] in tests.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Cart, CartLine, NewProduct, NewUser, Product, User},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Rejection for an add that would push a line past the largest storable quantity.
pub const QUANTITY_TOO_LARGE: &str = "quantity exceeds the maximum allowed";

/// Catalog filter plus the page window to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring matched against name or description.
    pub term: Option<String>,
    pub limit: u64,
    pub offset: u64,
}

/// Whether [`StorefrontStore::find_or_create_cart`] had to create the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartHandle {
    pub cart: Cart,
    pub created: bool,
}

#[async_trait]
pub trait StorefrontStore: Send + Sync {
    /// Page of products ordered newest first, plus the total matching count.
    async fn list_products(&self, filter: &ProductFilter) -> AppResult<(Vec<Product>, u64)>;

    async fn find_product(&self, id: &str) -> AppResult<Option<Product>>;

    async fn insert_product(&self, product: NewProduct) -> AppResult<Product>;

    /// Insert or refresh a user keyed by email.
    async fn upsert_user(&self, user: NewUser) -> AppResult<User>;

    /// Return the user's cart, creating it atomically on first access.
    /// The user must already have been mirrored with [`StorefrontStore::upsert_user`].
    async fn find_or_create_cart(&self, user_id: Uuid) -> AppResult<CartHandle>;

    /// All items of a cart joined with their products, oldest first.
    async fn list_cart_lines(&self, cart_id: Uuid) -> AppResult<Vec<CartLine>>;

    /// Add `quantity` to the (cart, product) line, creating it if missing.
    /// Fails with a validation error when the sum no longer fits.
    async fn increment_cart_item(
        &self,
        cart_id: Uuid,
        product_id: &str,
        quantity: i32,
    ) -> AppResult<()>;

    /// Overwrite the quantity of an existing line. Returns `false` when no line matched.
    async fn set_cart_item_quantity(
        &self,
        cart_id: Uuid,
        product_id: &str,
        quantity: i32,
    ) -> AppResult<bool>;

    /// Returns `false` when no line matched.
    async fn remove_cart_item(&self, cart_id: Uuid, product_id: &str) -> AppResult<bool>;

    async fn count_carts(&self) -> AppResult<u64>;
}

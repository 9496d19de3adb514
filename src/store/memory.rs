use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Cart, CartItem, CartLine, NewProduct, NewUser, Product, User},
    store::{CartHandle, ProductFilter, QUANTITY_TOO_LARGE, StorefrontStore},
};

#[derive(Default)]
struct Tables {
    products: Vec<Product>,
    users: Vec<User>,
    carts: Vec<Cart>,
    items: Vec<CartItem>,
}

/// In-process store. Every call holds the lock for its whole read-modify-write.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a fixed catalog; product ids are kept as given.
    pub fn with_catalog(products: Vec<Product>) -> Self {
        Self {
            tables: RwLock::new(Tables {
                products,
                ..Tables::default()
            }),
        }
    }

    pub async fn cart_item_count(&self) -> usize {
        self.tables.read().await.items.len()
    }
}

fn matches_term(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
}

#[async_trait]
impl StorefrontStore for MemoryStore {
    async fn list_products(&self, filter: &ProductFilter) -> AppResult<(Vec<Product>, u64)> {
        let tables = self.tables.read().await;
        let needle = filter
            .term
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);

        let mut matching: Vec<&Product> = tables
            .products
            .iter()
            .filter(|p| needle.as_deref().is_none_or(|n| matches_term(p, n)))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(usize::try_from(filter.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(filter.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn find_product(&self, id: &str) -> AppResult<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_product(&self, product: NewProduct) -> AppResult<Product> {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: product.name,
            description: product.description,
            price: product.price,
            image_url: product.image_url,
            created_at: Utc::now(),
        };
        self.tables.write().await.products.push(product.clone());
        Ok(product)
    }

    async fn upsert_user(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.users.iter_mut().find(|u| u.email == user.email) {
            existing.name = user.name;
            existing.image = user.image;
            return Ok(existing.clone());
        }
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            image: user.image,
            created_at: Utc::now(),
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn find_or_create_cart(&self, user_id: Uuid) -> AppResult<CartHandle> {
        let mut tables = self.tables.write().await;
        if let Some(cart) = tables.carts.iter().find(|c| c.user_id == user_id) {
            return Ok(CartHandle {
                cart: cart.clone(),
                created: false,
            });
        }
        // Mirrors the carts.user_id foreign key.
        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(AppError::Internal(anyhow::anyhow!(
                "cart requested for unknown user {user_id}"
            )));
        }
        let cart = Cart {
            id: Uuid::new_v4(),
            user_id,
            created_at: Utc::now(),
        };
        tables.carts.push(cart.clone());
        Ok(CartHandle {
            cart,
            created: true,
        })
    }

    async fn list_cart_lines(&self, cart_id: Uuid) -> AppResult<Vec<CartLine>> {
        let tables = self.tables.read().await;
        tables
            .items
            .iter()
            .filter(|item| item.cart_id == cart_id)
            .map(|item| {
                let product = tables
                    .products
                    .iter()
                    .find(|p| p.id == item.product_id)
                    .cloned()
                    .ok_or_else(|| {
                        AppError::Internal(anyhow::anyhow!(
                            "cart item {} references missing product {}",
                            item.id,
                            item.product_id
                        ))
                    })?;
                Ok(CartLine {
                    item: item.clone(),
                    product,
                })
            })
            .collect()
    }

    async fn increment_cart_item(
        &self,
        cart_id: Uuid,
        product_id: &str,
        quantity: i32,
    ) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(item) = tables
            .items
            .iter_mut()
            .find(|i| i.cart_id == cart_id && i.product_id == product_id)
        {
            item.quantity = item
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| AppError::Validation(QUANTITY_TOO_LARGE.to_string()))?;
            return Ok(());
        }
        tables.items.push(CartItem {
            id: Uuid::new_v4(),
            cart_id,
            product_id: product_id.to_owned(),
            quantity,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn set_cart_item_quantity(
        &self,
        cart_id: Uuid,
        product_id: &str,
        quantity: i32,
    ) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        match tables
            .items
            .iter_mut()
            .find(|i| i.cart_id == cart_id && i.product_id == product_id)
        {
            Some(item) => {
                item.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_cart_item(&self, cart_id: Uuid, product_id: &str) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.items.len();
        tables
            .items
            .retain(|i| !(i.cart_id == cart_id && i.product_id == product_id));
        Ok(tables.items.len() != before)
    }

    async fn count_carts(&self) -> AppResult<u64> {
        Ok(self.tables.read().await.carts.len() as u64)
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    db::{DbPool, OrmConn, orm_from_pool},
    entity::{
        CartItems, Carts, Products,
        cart_items,
        products::{self, ActiveModel as ProductActive, Model as ProductModel},
    },
    error::{AppError, AppResult},
    models::{Cart, CartItem, CartLine, NewProduct, NewUser, Product, User},
    store::{CartHandle, ProductFilter, QUANTITY_TOO_LARGE, StorefrontStore},
};

/// Postgres backend: SeaORM for reads and simple writes, raw sqlx for upserts.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
    orm: OrmConn,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        let orm = orm_from_pool(&pool);
        Self { pool, orm }
    }
}

#[derive(FromRow)]
struct CartRow {
    id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    inserted: bool,
}

#[async_trait]
impl StorefrontStore for PgStore {
    async fn list_products(&self, filter: &ProductFilter) -> AppResult<(Vec<Product>, u64)> {
        let mut finder = Products::find();

        if let Some(term) = filter.term.as_deref().filter(|t| !t.is_empty()) {
            let pattern = like_pattern(term);
            finder = finder.filter(
                Condition::any()
                    .add(Expr::col(products::Column::Name).ilike(pattern.clone()))
                    .add(Expr::col(products::Column::Description).ilike(pattern)),
            );
        }

        let total = finder.clone().count(&self.orm).await?;

        let items = finder
            .order_by_desc(products::Column::CreatedAt)
            .order_by_asc(products::Column::Id)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();

        Ok((items, total))
    }

    async fn find_product(&self, id: &str) -> AppResult<Option<Product>> {
        let product = Products::find_by_id(id.to_owned())
            .one(&self.orm)
            .await?
            .map(product_from_entity);
        Ok(product)
    }

    async fn insert_product(&self, product: NewProduct) -> AppResult<Product> {
        let active = ProductActive {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            image_url: Set(product.image_url),
            created_at: NotSet,
        };
        let model = active.insert(&self.orm).await?;
        Ok(product_from_entity(model))
    }

    async fn upsert_user(&self, user: NewUser) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, image)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE SET name = EXCLUDED.name, image = EXCLUDED.image
            RETURNING id, email, name, image, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.email)
        .bind(user.name)
        .bind(user.image)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_or_create_cart(&self, user_id: Uuid) -> AppResult<CartHandle> {
        // The no-op update makes RETURNING yield the existing row on conflict;
        // xmax is 0 only for a freshly inserted tuple.
        let row = sqlx::query_as::<_, CartRow>(
            r#"
            INSERT INTO carts (id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING id, user_id, created_at, (xmax = 0) AS inserted
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(CartHandle {
            cart: Cart {
                id: row.id,
                user_id: row.user_id,
                created_at: row.created_at,
            },
            created: row.inserted,
        })
    }

    async fn list_cart_lines(&self, cart_id: Uuid) -> AppResult<Vec<CartLine>> {
        let rows = CartItems::find()
            .filter(cart_items::Column::CartId.eq(cart_id))
            .order_by_asc(cart_items::Column::CreatedAt)
            .order_by_asc(cart_items::Column::Id)
            .find_also_related(Products)
            .all(&self.orm)
            .await?;

        rows.into_iter()
            .map(|(item, product)| {
                let product = product.ok_or_else(|| {
                    AppError::Internal(anyhow::anyhow!(
                        "cart item {} references missing product {}",
                        item.id,
                        item.product_id
                    ))
                })?;
                Ok(CartLine {
                    item: cart_item_from_entity(item),
                    product: product_from_entity(product),
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
        sqlx::query(
            r#"
            INSERT INTO cart_items (id, cart_id, product_id, quantity)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if is_out_of_range(&err) {
                AppError::Validation(QUANTITY_TOO_LARGE.to_string())
            } else {
                err.into()
            }
        })?;
        Ok(())
    }

    async fn set_cart_item_quantity(
        &self,
        cart_id: Uuid,
        product_id: &str,
        quantity: i32,
    ) -> AppResult<bool> {
        let result = CartItems::update_many()
            .col_expr(cart_items::Column::Quantity, Expr::value(quantity))
            .filter(cart_items::Column::CartId.eq(cart_id))
            .filter(cart_items::Column::ProductId.eq(product_id))
            .exec(&self.orm)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn remove_cart_item(&self, cart_id: Uuid, product_id: &str) -> AppResult<bool> {
        let result = CartItems::delete_many()
            .filter(cart_items::Column::CartId.eq(cart_id))
            .filter(cart_items::Column::ProductId.eq(product_id))
            .exec(&self.orm)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn count_carts(&self) -> AppResult<u64> {
        Ok(Carts::find().count(&self.orm).await?)
    }
}

/// Build an ILIKE pattern that matches `term` literally anywhere in the column.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// SQLSTATE 22003, raised when the summed quantity overflows INTEGER.
fn is_out_of_range(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("22003"))
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        image_url: model.image_url,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn cart_item_from_entity(model: cart_items::Model) -> CartItem {
    CartItem {
        id: model.id,
        cart_id: model.cart_id,
        product_id: model.product_id,
        quantity: model.quantity,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

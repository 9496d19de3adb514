use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{CartLine, Product},
};

/// Body of `POST` and `PUT /api/cart`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    pub product_id: String,
    pub quantity: i32,
}

impl CartItemRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.quantity <= 0 {
            return Err(AppError::Validation(
                "quantity must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

/// Body of `DELETE /api/cart`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub product_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: String,
    pub quantity: i32,
    pub product: Product,
}

impl From<CartLine> for CartItemDto {
    fn from(line: CartLine) -> Self {
        Self {
            id: line.item.id,
            cart_id: line.item.cart_id,
            product_id: line.item.product_id,
            quantity: line.item.quantity,
            product: line.product,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub item_count: u64,
    pub total_quantity: i64,
    #[schema(value_type = f64)]
    pub subtotal: Decimal,
}

impl CartSummary {
    pub fn from_lines(lines: &[CartLine]) -> Self {
        Self {
            item_count: lines.len() as u64,
            total_quantity: lines.iter().map(|l| i64::from(l.item.quantity)).sum(),
            subtotal: lines
                .iter()
                .map(|l| l.product.price * Decimal::from(l.item.quantity))
                .sum(),
        }
    }
}

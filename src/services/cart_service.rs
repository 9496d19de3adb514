//! Cart operations for the authenticated user.
//!
//! Every operation makes sure the cart exists and answers with the full,
//! freshly read item list so clients can replace their local copy.

use crate::{
    dto::cart::{CartItemDto, CartItemRequest, CartSummary, RemoveFromCartRequest},
    error::{AppError, AppResult},
    middleware::auth::CurrentUser,
    models::Cart,
    state::AppState,
};

pub async fn list_cart(state: &AppState, user: &CurrentUser) -> AppResult<Vec<CartItemDto>> {
    let cart = ensure_cart(state, user).await?;
    cart_items(state, &cart).await
}

pub async fn add_to_cart(
    state: &AppState,
    user: &CurrentUser,
    payload: CartItemRequest,
) -> AppResult<Vec<CartItemDto>> {
    payload.validate()?;

    if state.store.find_product(&payload.product_id).await?.is_none() {
        return Err(AppError::Validation("product not found".to_string()));
    }

    let cart = ensure_cart(state, user).await?;
    state
        .store
        .increment_cart_item(cart.id, &payload.product_id, payload.quantity)
        .await?;

    tracing::info!(
        user_id = %user.user_id,
        product_id = %payload.product_id,
        quantity = payload.quantity,
        "cart item added"
    );
    cart_items(state, &cart).await
}

pub async fn update_quantity(
    state: &AppState,
    user: &CurrentUser,
    payload: CartItemRequest,
) -> AppResult<Vec<CartItemDto>> {
    payload.validate()?;

    let cart = ensure_cart(state, user).await?;
    let updated = state
        .store
        .set_cart_item_quantity(cart.id, &payload.product_id, payload.quantity)
        .await?;

    // Updating a product that is not in the cart leaves the cart as it is.
    if updated {
        tracing::info!(
            user_id = %user.user_id,
            product_id = %payload.product_id,
            quantity = payload.quantity,
            "cart item quantity set"
        );
    } else {
        tracing::debug!(
            user_id = %user.user_id,
            product_id = %payload.product_id,
            "quantity update for product not in cart ignored"
        );
    }
    cart_items(state, &cart).await
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &CurrentUser,
    payload: RemoveFromCartRequest,
) -> AppResult<Vec<CartItemDto>> {
    let cart = ensure_cart(state, user).await?;
    let removed = state
        .store
        .remove_cart_item(cart.id, &payload.product_id)
        .await?;

    if removed {
        tracing::info!(
            user_id = %user.user_id,
            product_id = %payload.product_id,
            "cart item removed"
        );
    }
    cart_items(state, &cart).await
}

pub async fn cart_summary(state: &AppState, user: &CurrentUser) -> AppResult<CartSummary> {
    let cart = ensure_cart(state, user).await?;
    let lines = state.store.list_cart_lines(cart.id).await?;
    Ok(CartSummary::from_lines(&lines))
}

async fn ensure_cart(state: &AppState, user: &CurrentUser) -> AppResult<Cart> {
    let handle = state.store.find_or_create_cart(user.user_id).await?;
    if handle.created {
        tracing::debug!(user_id = %user.user_id, cart_id = %handle.cart.id, "cart created");
    }
    Ok(handle.cart)
}

async fn cart_items(state: &AppState, cart: &Cart) -> AppResult<Vec<CartItemDto>> {
    let lines = state.store.list_cart_lines(cart.id).await?;
    Ok(lines.into_iter().map(CartItemDto::from).collect())
}

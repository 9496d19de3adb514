use axum::{
    Json, Router,
    extract::State,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    dto::cart::{CartItemDto, CartItemRequest, CartSummary, RemoveFromCartRequest},
    error::AppResult,
    middleware::{auth::CurrentUser, json::ValidJson},
    response::{ApiResponse, Meta},
    services::cart_service,
    state::AppState,
};

/// Methods served by `/api/cart`.
pub const CART_ALLOW: &str = "GET, POST, PUT, DELETE";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(cart_list)
                .post(add_to_cart)
                .put(update_cart_item)
                .delete(remove_from_cart)
                .fallback(method_not_allowed),
        )
        .route("/summary", get(cart_summary))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Items in the current user's cart", body = Vec<CartItemDto>),
        (status = 401, description = "No valid session"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<CartItemDto>>> {
    let items = cart_service::list_cart(&state, &user).await?;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = CartItemRequest,
    responses(
        (status = 200, description = "Item added or its quantity increased", body = Vec<CartItemDto>),
        (status = 400, description = "Malformed body, non-positive quantity or unknown product"),
        (status = 401, description = "No valid session"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidJson(payload): ValidJson<CartItemRequest>,
) -> AppResult<Json<Vec<CartItemDto>>> {
    let items = cart_service::add_to_cart(&state, &user, payload).await?;
    Ok(Json(items))
}

#[utoipa::path(
    put,
    path = "/api/cart",
    request_body = CartItemRequest,
    responses(
        (status = 200, description = "Quantity replaced; products not in the cart are ignored", body = Vec<CartItemDto>),
        (status = 400, description = "Malformed body or non-positive quantity"),
        (status = 401, description = "No valid session"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidJson(payload): ValidJson<CartItemRequest>,
) -> AppResult<Json<Vec<CartItemDto>>> {
    let items = cart_service::update_quantity(&state, &user, payload).await?;
    Ok(Json(items))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    request_body = RemoveFromCartRequest,
    responses(
        (status = 200, description = "Item removed if present", body = Vec<CartItemDto>),
        (status = 400, description = "Malformed body"),
        (status = 401, description = "No valid session"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidJson(payload): ValidJson<RemoveFromCartRequest>,
) -> AppResult<Json<Vec<CartItemDto>>> {
    let items = cart_service::remove_from_cart(&state, &user, payload).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/cart/summary",
    responses(
        (status = 200, description = "Totals for the current user's cart", body = ApiResponse<CartSummary>),
        (status = 401, description = "No valid session"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart_summary(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<CartSummary>>> {
    let summary = cart_service::cart_summary(&state, &user).await?;
    Ok(Json(ApiResponse::success("OK", summary, None)))
}

async fn method_not_allowed(method: Method) -> Response {
    let body = ApiResponse::success(
        "Method Not Allowed",
        serde_json::json!({ "error": format!("Method {method} Not Allowed") }),
        Some(Meta::empty()),
    );
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, CART_ALLOW)],
        Json(body),
    )
        .into_response()
}

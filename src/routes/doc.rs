use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{CartItemDto, CartItemRequest, CartSummary, RemoveFromCartRequest},
        products::CatalogPage,
    },
    middleware::auth::SESSION_COOKIE,
    models::{Cart, CartItem, Product, User},
    response::{ApiResponse, Meta},
    routes::{cart, health, products},
};

struct SessionAddon;

impl Modify for SessionAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        cart::cart_list,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_from_cart,
        cart::cart_summary,
        products::list_products,
        products::get_product,
    ),
    components(
        schemas(
            User,
            Product,
            Cart,
            CartItem,
            CartItemDto,
            CartItemRequest,
            RemoveFromCartRequest,
            CartSummary,
            CatalogPage,
            Meta,
            ApiResponse<Product>,
            ApiResponse<CatalogPage>,
            ApiResponse<CartSummary>
        )
    ),
    modifiers(&SessionAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Catalog browsing and search"),
        (name = "Cart", description = "Per-user shopping cart"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

use crate::{
    dto::products::CatalogPage,
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{CatalogQuery, total_pages},
    state::AppState,
    store::ProductFilter,
};

pub async fn list_products(
    state: &AppState,
    query: CatalogQuery,
) -> AppResult<ApiResponse<CatalogPage>> {
    let (page, limit, offset) = query.normalize();
    let term = query.term();

    let filter = ProductFilter {
        term: (!term.is_empty()).then(|| term.to_owned()),
        limit,
        offset,
    };
    let (products, total) = state.store.list_products(&filter).await?;

    let data = CatalogPage {
        products,
        current_page: page,
        total_pages: total_pages(total, limit),
        search_term: query.q.unwrap_or_default(),
    };
    Ok(ApiResponse::success(
        "Products",
        data,
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_product(state: &AppState, id: &str) -> AppResult<ApiResponse<Product>> {
    let product = state
        .store
        .find_product(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Product", product, None))
}

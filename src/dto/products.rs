use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Product;

/// One page of the catalog, shaped for the listing page.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    pub products: Vec<Product>,
    pub current_page: u64,
    pub total_pages: u64,
    pub search_term: String,
}

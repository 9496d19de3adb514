use serde::Deserialize;
use utoipa::IntoParams;

/// Fixed number of products per catalog page.
pub const CATALOG_PAGE_SIZE: u64 = 12;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// Free-text search over name and description.
    pub q: Option<String>,
    /// 1-based page number, default 1. Anything that is not a positive integer reads as 1.
    #[param(value_type = Option<i64>)]
    pub page: Option<String>,
}

impl CatalogQuery {
    /// Search term with surrounding whitespace removed; empty means unfiltered.
    pub fn term(&self) -> &str {
        self.q.as_deref().map(str::trim).unwrap_or_default()
    }

    /// Returns `(page, limit, offset)` with the page clamped to at least 1.
    pub fn normalize(&self) -> (u64, u64, u64) {
        let page = self
            .page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(1)
            .max(1);
        // Offsets are bound as BIGINT.
        let offset = (page - 1)
            .saturating_mul(CATALOG_PAGE_SIZE)
            .min(i64::MAX as u64);
        (page, CATALOG_PAGE_SIZE, offset)
    }
}

pub fn total_pages(total: u64, per_page: u64) -> u64 {
    total.div_ceil(per_page)
}

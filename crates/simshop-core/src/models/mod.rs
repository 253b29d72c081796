//! Domain models and request payloads.
//!
//! JSON uses camelCase field names throughout.

pub mod category;
pub mod order;
pub mod product;
pub mod user;

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;

pub use category::{Category, CategoryUpdate, NewCategory};
pub use order::{
    items_total, NewOrder, NewOrderItem, Order, OrderItem, OrderItemView, OrderView, PaymentMethod,
    ShippingAddress,
};
pub use product::{
    NewProduct, Product, ProductFilter, ProductQuery, ProductSort, ProductSummary, ProductUpdate,
    DEFAULT_PAGE_SIZE,
};
pub use user::{
    normalize_email, AuthResponse, LoginRequest, RegisterRequest, Role, User, UserSummary,
    UserUpdate,
};

use crate::errors::{ShopError, ShopResult};

/// Paginated response
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

/// Current time at the microsecond precision timestamps are stored with.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Derive a URL slug from free text: lower-case ASCII alphanumerics joined by `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        let c = fold_accent(c);
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'Á' | 'À' | 'Ä' | 'Â' => 'a',
        'é' | 'è' | 'ë' | 'ê' | 'É' | 'È' | 'Ë' | 'Ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' | 'Í' | 'Ì' | 'Ï' | 'Î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'Ó' | 'Ò' | 'Ö' | 'Ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' | 'Ú' | 'Ù' | 'Ü' | 'Û' => 'u',
        'ñ' | 'Ñ' => 'n',
        'ç' | 'Ç' => 'c',
        other => other,
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> ShopResult<()> {
    if value.trim().is_empty() {
        return Err(ShopError::validation(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn require_amount(field: &str, value: f64) -> ShopResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ShopError::validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}

pub(crate) fn require_slug(slug: &str) -> ShopResult<()> {
    require_text("slug", slug)?;
    if slugify(slug) != slug {
        return Err(ShopError::validation(format!(
            "slug '{slug}' must be lower-case letters, digits and dashes"
        )));
    }
    Ok(())
}

//! Product model, write payloads and the catalog listing query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{require_amount, require_slug, require_text, slugify};
use crate::errors::{ShopError, ShopResult};

/// Product model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<u32>,
    /// Owning category id.
    pub category: Uuid,
    #[serde(default)]
    pub images: Vec<String>,
    pub stock: i64,
    pub sku: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_offer: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    fn validate(&self) -> ShopResult<()> {
        require_text("name", &self.name)?;
        require_slug(&self.slug)?;
        require_text("sku", &self.sku)?;
        require_amount("price", self.price)?;
        if let Some(original) = self.original_price {
            require_amount("originalPrice", original)?;
        }
        if matches!(self.discount, Some(d) if d > 100) {
            return Err(ShopError::validation("discount must be between 0 and 100"));
        }
        if self.stock < 0 {
            return Err(ShopError::validation("stock must be non-negative"));
        }
        Ok(())
    }

    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            price: self.price,
            images: self.images.clone(),
        }
    }
}

/// Product fields embedded in populated order items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub price: f64,
    pub images: Vec<String>,
}

/// Create product request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub discount: Option<u32>,
    pub category: Uuid,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub stock: i64,
    pub sku: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_offer: bool,
}

impl NewProduct {
    pub fn into_product(self, now: DateTime<Utc>) -> ShopResult<Product> {
        let slug = self.slug.unwrap_or_else(|| slugify(&self.name));
        let product = Product {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            slug,
            description: self.description,
            price: self.price,
            original_price: self.original_price,
            discount: self.discount,
            category: self.category,
            images: self.images,
            stock: self.stock,
            sku: self.sku.trim().to_string(),
            brand: self.brand,
            is_featured: self.is_featured,
            is_offer: self.is_offer,
            created_at: now,
            updated_at: now,
        };
        product.validate()?;
        Ok(product)
    }
}

/// Update product request. Absent fields are left untouched; the optional
/// attributes (`originalPrice`, `discount`, `brand`) are cleared by an
/// explicit `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_price: Option<Option<f64>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub discount: Option<Option<u32>>,
    pub category: Option<Uuid>,
    pub images: Option<Vec<String>>,
    pub stock: Option<i64>,
    pub sku: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub brand: Option<Option<String>>,
    pub is_featured: Option<bool>,
    pub is_offer: Option<bool>,
}

/// A field that is present deserializes to `Some`, even when it is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ProductUpdate {
    pub fn apply(self, product: &mut Product, now: DateTime<Utc>) -> ShopResult<()> {
        if let Some(name) = self.name {
            product.name = name.trim().to_string();
        }
        if let Some(slug) = self.slug {
            product.slug = slug;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(original_price) = self.original_price {
            product.original_price = original_price;
        }
        if let Some(discount) = self.discount {
            product.discount = discount;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(images) = self.images {
            product.images = images;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(sku) = self.sku {
            product.sku = sku.trim().to_string();
        }
        if let Some(brand) = self.brand {
            product.brand = brand;
        }
        if let Some(flag) = self.is_featured {
            product.is_featured = flag;
        }
        if let Some(flag) = self.is_offer {
            product.is_offer = flag;
        }
        product.updated_at = now;
        product.validate()
    }
}

/// Sort key for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

impl ProductSort {
    /// Unknown keys fall back to `Newest`.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            _ => Self::Newest,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }
}

/// Product query parameters, kept as raw strings so that malformed values
/// degrade to "no filter" instead of rejecting the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_offer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

/// Parsed, well-typed product filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category: Option<Uuid>,
    pub search: Option<String>,
    pub only_offers: bool,
    pub only_featured: bool,
    pub sort: ProductSort,
    /// `(limit, offset)` when the caller asked for a page.
    pub window: Option<(u32, u32)>,
}

pub const DEFAULT_PAGE_SIZE: u32 = 20;

impl ProductQuery {
    pub fn to_filter(&self, max_page_size: u32) -> ProductFilter {
        let page = parse_positive(self.page.as_deref());
        let limit = parse_positive(self.limit.as_deref());
        let window = match (page, limit) {
            (None, None) => None,
            (page, limit) => {
                let limit = limit
                    .unwrap_or(DEFAULT_PAGE_SIZE)
                    .min(max_page_size.max(1));
                let page = page.unwrap_or(1);
                Some((limit, (page - 1).saturating_mul(limit)))
            }
        };

        ProductFilter {
            category: self
                .category
                .as_deref()
                .and_then(|raw| Uuid::parse_str(raw.trim()).ok()),
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            only_offers: is_true(self.is_offer.as_deref()),
            only_featured: is_true(self.is_featured.as_deref()),
            sort: self
                .sort
                .as_deref()
                .map(ProductSort::parse_lenient)
                .unwrap_or_default(),
            window,
        }
    }

    /// Query-string pairs for HTTP clients.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let fields = [
            ("category", &self.category),
            ("search", &self.search),
            ("isOffer", &self.is_offer),
            ("isFeatured", &self.is_featured),
            ("sort", &self.sort),
            ("page", &self.page),
            ("limit", &self.limit),
        ];
        fields
            .into_iter()
            .filter_map(|(key, value)| value.clone().map(|v| (key, v)))
            .collect()
    }
}

fn is_true(raw: Option<&str>) -> bool {
    matches!(raw.map(str::trim), Some("true") | Some("1"))
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewProduct {
        NewProduct {
            name: "SIM Prepago Vodafone 10GB".into(),
            slug: Some("sim-vodafone-10gb".into()),
            description: String::new(),
            price: 15.99,
            original_price: Some(19.99),
            discount: Some(20),
            category: Uuid::new_v4(),
            images: vec![],
            stock: 100,
            sku: "SIM-VOD-10GB".into(),
            brand: Some("Vodafone".into()),
            is_featured: false,
            is_offer: true,
        }
    }

    #[test]
    fn negative_stock_rejected() {
        let mut p = sample();
        p.stock = -1;
        assert!(p.into_product(Utc::now()).is_err());
    }

    #[test]
    fn discount_over_hundred_rejected() {
        let mut p = sample();
        p.discount = Some(120);
        assert!(p.into_product(Utc::now()).is_err());
    }

    #[test]
    fn update_revalidates() {
        let mut product = sample().into_product(Utc::now()).unwrap();
        let update = ProductUpdate {
            price: Some(-3.0),
            ..Default::default()
        };
        assert!(update.apply(&mut product, Utc::now()).is_err());
    }

    #[test]
    fn explicit_null_clears_optional_attributes() {
        let mut product = sample().into_product(Utc::now()).unwrap();

        let update: ProductUpdate =
            serde_json::from_str(r#"{"discount": null, "brand": null, "price": 12.5}"#).unwrap();
        update.apply(&mut product, Utc::now()).unwrap();
        assert_eq!(product.discount, None);
        assert_eq!(product.brand, None);
        assert_eq!(product.original_price, Some(19.99));
        assert_eq!(product.price, 12.5);

        let update: ProductUpdate = serde_json::from_str(r#"{"originalPrice": null}"#).unwrap();
        update.apply(&mut product, Utc::now()).unwrap();
        assert_eq!(product.original_price, None);
    }

    #[test]
    fn serialized_update_only_sends_what_changes() {
        let keep = serde_json::to_value(ProductUpdate::default()).unwrap();
        assert!(keep.get("brand").is_none());

        let clear = ProductUpdate {
            brand: Some(None),
            ..Default::default()
        };
        let value = serde_json::to_value(&clear).unwrap();
        assert_eq!(value["brand"], serde_json::Value::Null);
        let back: ProductUpdate = serde_json::from_value(value).unwrap();
        assert_eq!(back.brand, Some(None));
        assert_eq!(back.discount, None);
    }

    #[test]
    fn malformed_filters_degrade() {
        let query = ProductQuery {
            category: Some("not-a-uuid".into()),
            is_offer: Some("maybe".into()),
            sort: Some("random".into()),
            page: Some("zero".into()),
            ..Default::default()
        };
        let filter = query.to_filter(100);
        assert_eq!(filter, ProductFilter::default());
    }

    #[test]
    fn paging_is_capped() {
        let query = ProductQuery {
            page: Some("3".into()),
            limit: Some("500".into()),
            ..Default::default()
        };
        assert_eq!(query.to_filter(50).window, Some((50, 100)));
    }

    #[test]
    fn offer_false_means_no_filter() {
        let query = ProductQuery {
            is_offer: Some("false".into()),
            ..Default::default()
        };
        assert!(!query.to_filter(100).only_offers);
    }
}

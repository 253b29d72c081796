use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{require_slug, require_text, slugify};
use crate::errors::ShopResult;

/// Catalog category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Create category request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewCategory {
    /// Validate and turn the request into a category with a fresh id.
    pub fn into_category(self, now: DateTime<Utc>) -> ShopResult<Category> {
        require_text("name", &self.name)?;
        let slug = self.slug.unwrap_or_else(|| slugify(&self.name));
        require_slug(&slug)?;

        Ok(Category {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            slug,
            description: self.description.unwrap_or_default(),
            created_at: now,
        })
    }
}

/// Update category request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

impl CategoryUpdate {
    pub fn apply(self, category: &mut Category) -> ShopResult<()> {
        if let Some(name) = self.name {
            require_text("name", &name)?;
            category.name = name.trim().to_string();
        }
        if let Some(slug) = self.slug {
            require_slug(&slug)?;
            category.slug = slug;
        }
        if let Some(description) = self.description {
            category.description = description;
        }
        Ok(())
    }
}

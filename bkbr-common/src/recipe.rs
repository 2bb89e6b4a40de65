//! Recipe data model
//!
//! One `Recipe` is both the scrape endpoint's response body and an entry of
//! the persisted recipe document. Scraper-sourced fields come first; `id`,
//! `tags` and `local_image` are filled in locally at import time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A scraped dish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Store-assigned identifier (max existing id + 1 at save time)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Derived from keywords, cuisine, category and cooking method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Filename of the cached hero image, relative to the images directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_image: Option<String>,

    // From scraper
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Minutes
    pub total_time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooking_method: Option<String>,
    pub yields: String,
    /// Remote hero image URL, kept after download
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrients: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub ingredients: Vec<String>,
    pub ingredient_groups: Vec<IngredientGroup>,
    pub instructions: String,
    pub instructions_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<Vec<String>>,
}

/// Ingredients under an optional heading ("For the sauce")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IngredientGroup {
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

impl Recipe {
    /// Populate `tags` from keywords, then cuisine, category and cooking
    /// method when not already present
    pub fn derive_tags(&mut self) {
        let mut tags = self.keywords.clone().unwrap_or_default();
        for extra in [&self.cuisine, &self.category, &self.cooking_method]
            .into_iter()
            .flatten()
        {
            if !tags.contains(extra) {
                tags.push(extra.clone());
            }
        }
        self.tags = Some(tags);
    }

    /// Tags, empty when none were derived
    pub fn tag_list(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    /// Case-insensitive exact tag match
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim().to_lowercase();
        self.tag_list().iter().any(|t| t.to_lowercase() == tag)
    }

    /// Case-insensitive substring search over title, tags, ingredients,
    /// cuisine, category and host. An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        let hit = |s: &str| s.to_lowercase().contains(&needle);

        hit(&self.title)
            || hit(&self.host)
            || self.tag_list().iter().any(|t| hit(t))
            || self.ingredients.iter().any(|i| hit(i))
            || self.cuisine.as_deref().is_some_and(hit)
            || self.category.as_deref().is_some_and(hit)
    }
}

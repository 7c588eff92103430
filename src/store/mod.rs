//! Backends holding the category catalog, the ingredient inventory and the
//! recipe tables that imported recipes are written to.

mod memory;
mod rest;

pub use memory::{MemoryStore, StoredRecipe};
pub use rest::RestStore;

use crate::error::StoreError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A recipe category row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCategory {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientKind {
    #[default]
    Main,
    Side,
    Seasoning,
    Fresh,
    Dry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Refrigerated,
    Frozen,
    #[default]
    Room,
}

/// A row of the user's ingredient inventory (the "fridge")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: IngredientKind,
    pub unit: String,
    pub quantity: f64,
    /// Restock when quantity drops to this level or below
    pub threshold: f64,
    #[serde(default)]
    pub storage: StorageKind,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub production_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewInventoryItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: IngredientKind,
    pub unit: String,
    pub quantity: f64,
    pub threshold: f64,
    pub storage: StorageKind,
    pub expiry_date: Option<NaiveDate>,
    pub production_date: Option<NaiveDate>,
}

/// Recipe row as written by the importer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRecipe {
    pub name: String,
    pub category_id: Option<String>,
    pub difficulty: u32,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub servings: u32,
}

/// Stored recipe as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<String>,
}

/// Ingredient line of a recipe. Linked rows carry `ingredient_id`, unlinked
/// rows carry the free-text `name` instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRecipeIngredient {
    pub ingredient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub quantity: f64,
    pub unit: String,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRecipeStep {
    /// 1-based
    pub step_number: u32,
    pub description: String,
    /// Seconds
    pub timer: Option<u32>,
}

/// Storage operations the importer needs
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Backend name used in log output
    fn backend_name(&self) -> &str;

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn create_category(&self, category: &NewCategory) -> Result<Category, StoreError>;

    async fn list_ingredients(&self) -> Result<Vec<InventoryItem>, StoreError>;

    async fn create_ingredient(
        &self,
        ingredient: &NewInventoryItem,
    ) -> Result<InventoryItem, StoreError>;

    /// Create the recipe row, then its ingredient and step rows.
    ///
    /// Not transactional: a failure after the recipe row is written leaves
    /// that row behind.
    async fn create_recipe(
        &self,
        recipe: &NewRecipe,
        ingredients: &[NewRecipeIngredient],
        steps: &[NewRecipeStep],
    ) -> Result<RecipeRow, StoreError>;
}

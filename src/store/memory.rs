use super::{
    Category, InventoryItem, NewCategory, NewInventoryItem, NewRecipe, NewRecipeIngredient,
    NewRecipeStep, RecipeRow, RecipeStore,
};
use crate::error::StoreError;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// A recipe written to a [`MemoryStore`], with its child rows
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecipe {
    pub id: String,
    pub recipe: NewRecipe,
    pub ingredients: Vec<NewRecipeIngredient>,
    pub steps: Vec<NewRecipeStep>,
}

#[derive(Debug, Default)]
struct Tables {
    next_id: u64,
    categories: Vec<Category>,
    ingredients: Vec<InventoryItem>,
    recipes: Vec<StoredRecipe>,
}

impl Tables {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

/// In-process store used for dry runs and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing category catalog and inventory
    pub fn with_catalog(categories: Vec<Category>, ingredients: Vec<InventoryItem>) -> Self {
        Self {
            tables: Mutex::new(Tables {
                next_id: 0,
                categories,
                ingredients,
                recipes: Vec::new(),
            }),
        }
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.tables.lock().await.categories.clone()
    }

    pub async fn ingredients(&self) -> Vec<InventoryItem> {
        self.tables.lock().await.ingredients.clone()
    }

    pub async fn recipes(&self) -> Vec<StoredRecipe> {
        self.tables.lock().await.recipes.clone()
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.categories().await)
    }

    async fn create_category(&self, category: &NewCategory) -> Result<Category, StoreError> {
        let mut tables = self.tables.lock().await;
        let created = Category {
            id: tables.id("cat"),
            name: category.name.clone(),
        };
        tables.categories.push(created.clone());
        Ok(created)
    }

    async fn list_ingredients(&self) -> Result<Vec<InventoryItem>, StoreError> {
        Ok(self.ingredients().await)
    }

    async fn create_ingredient(
        &self,
        ingredient: &NewInventoryItem,
    ) -> Result<InventoryItem, StoreError> {
        let mut tables = self.tables.lock().await;
        let created = InventoryItem {
            id: tables.id("ing"),
            name: ingredient.name.clone(),
            kind: ingredient.kind,
            unit: ingredient.unit.clone(),
            quantity: ingredient.quantity,
            threshold: ingredient.threshold,
            storage: ingredient.storage,
            expiry_date: ingredient.expiry_date,
            production_date: ingredient.production_date,
        };
        tables.ingredients.push(created.clone());
        Ok(created)
    }

    async fn create_recipe(
        &self,
        recipe: &NewRecipe,
        ingredients: &[NewRecipeIngredient],
        steps: &[NewRecipeStep],
    ) -> Result<RecipeRow, StoreError> {
        let mut tables = self.tables.lock().await;

        for ingredient in ingredients {
            if let Some(id) = &ingredient.ingredient_id {
                if !tables.ingredients.iter().any(|item| &item.id == id) {
                    return Err(StoreError::NotFound(format!("ingredient {}", id)));
                }
            }
        }

        let id = tables.id("rcp");
        tables.recipes.push(StoredRecipe {
            id: id.clone(),
            recipe: recipe.clone(),
            ingredients: ingredients.to_vec(),
            steps: steps.to_vec(),
        });

        Ok(RecipeRow {
            id,
            name: recipe.name.clone(),
            category_id: recipe.category_id.clone(),
        })
    }
}

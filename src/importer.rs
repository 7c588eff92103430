use crate::config::{ImportConfig, IngredientPolicy};
use crate::error::ImportError;
use crate::model::{ParsedIngredient, ParsedRecipe, ParsedStep};
use crate::store::{
    IngredientKind, NewCategory, NewInventoryItem, NewRecipe, NewRecipeIngredient,
    NewRecipeStep, RecipeStore, StorageKind,
};
use log::{error, info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Outcome of importing one recipe
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub success: bool,
    pub recipe_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Per-batch totals for reporting back to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<ImportResult>,
}

impl From<Vec<ImportResult>> for ImportSummary {
    fn from(results: Vec<ImportResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }
}

impl ImportSummary {
    pub fn is_complete_success(&self) -> bool {
        self.failed == 0
    }

    /// Warnings of every recipe, prefixed with the recipe name
    pub fn warnings(&self) -> Vec<String> {
        self.results
            .iter()
            .flat_map(|r| {
                r.warnings
                    .iter()
                    .map(move |w| format!("{}: {}", r.recipe_name, w))
            })
            .collect()
    }

    /// Errors of every failed recipe, prefixed with the recipe name
    pub fn errors(&self) -> Vec<String> {
        self.results
            .iter()
            .filter_map(|r| {
                r.error
                    .as_ref()
                    .map(|e| format!("{}: {}", r.recipe_name, e))
            })
            .collect()
    }
}

/// Writes parsed recipes into a [`RecipeStore`].
///
/// Every recipe is imported on its own: a failure is recorded in that
/// recipe's result and the batch moves on.
pub struct RecipeImportService {
    store: Arc<dyn RecipeStore>,
    options: ImportConfig,
}

impl RecipeImportService {
    pub fn new(store: Arc<dyn RecipeStore>, options: ImportConfig) -> Self {
        Self { store, options }
    }

    pub fn policy(&self) -> IngredientPolicy {
        self.options.ingredient_policy
    }

    /// Import a batch in order, one result per recipe
    pub async fn import_recipes(&self, recipes: &[ParsedRecipe]) -> Vec<ImportResult> {
        let mut results = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            results.push(self.import_recipe(recipe).await);
        }
        results
    }

    pub async fn import_recipe(&self, recipe: &ParsedRecipe) -> ImportResult {
        let mut warnings = Vec::new();

        match self.try_import(recipe, &mut warnings).await {
            Ok(()) => {
                info!(
                    "Imported recipe '{}' into {} store",
                    recipe.name,
                    self.store.backend_name()
                );
                ImportResult {
                    success: true,
                    recipe_name: recipe.name.clone(),
                    error: None,
                    warnings,
                }
            }
            Err(e) => {
                error!("Failed to import recipe '{}': {}", recipe.name, e);
                ImportResult {
                    success: false,
                    recipe_name: recipe.name.clone(),
                    error: Some(e.to_string()),
                    warnings,
                }
            }
        }
    }

    async fn try_import(
        &self,
        recipe: &ParsedRecipe,
        warnings: &mut Vec<String>,
    ) -> Result<(), ImportError> {
        validate(recipe)?;

        let category_id = self.resolve_category(&recipe.category, warnings).await?;

        let ingredients = match self.options.ingredient_policy {
            IngredientPolicy::Unlinked => recipe
                .ingredients
                .iter()
                .map(|ingredient| self.unlinked_row(ingredient))
                .collect(),
            IngredientPolicy::Linked => self.linked_rows(&recipe.ingredients, warnings).await?,
        };

        let steps = step_rows(&recipe.steps)?;

        let row = NewRecipe {
            name: recipe.name.clone(),
            category_id: Some(category_id),
            difficulty: recipe.difficulty,
            description: recipe.description.clone().filter(|d| !d.is_empty()),
            notes: recipe.notes.clone().filter(|n| !n.is_empty()),
            tags: if recipe.tags.is_empty() {
                None
            } else {
                Some(recipe.tags.clone())
            },
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            servings: recipe.servings.unwrap_or(self.options.default_servings),
        };

        self.store.create_recipe(&row, &ingredients, &steps).await?;
        Ok(())
    }

    /// Exact, case-sensitive match on the category name; created if absent
    async fn resolve_category(
        &self,
        name: &str,
        warnings: &mut Vec<String>,
    ) -> Result<String, ImportError> {
        let categories = self.store.list_categories().await?;
        if let Some(existing) = categories.into_iter().find(|c| c.name == name) {
            return Ok(existing.id);
        }

        let created = self
            .store
            .create_category(&NewCategory {
                name: name.to_string(),
            })
            .await?;
        warn!("Created new category '{}'", name);
        warnings.push(format!("created new category {}", name));
        Ok(created.id)
    }

    fn unit_for(&self, ingredient: &ParsedIngredient) -> String {
        if ingredient.unit.is_empty() {
            self.options.default_unit.clone()
        } else {
            ingredient.unit.clone()
        }
    }

    fn unlinked_row(&self, ingredient: &ParsedIngredient) -> NewRecipeIngredient {
        NewRecipeIngredient {
            ingredient_id: None,
            name: Some(ingredient.name.clone()),
            quantity: coerce_quantity(&ingredient.amount),
            unit: self.unit_for(ingredient),
            optional: ingredient.optional,
        }
    }

    /// Resolve each ingredient by exact name against the inventory, creating
    /// zero-stock rows for names the inventory does not know yet.
    async fn linked_rows(
        &self,
        ingredients: &[ParsedIngredient],
        warnings: &mut Vec<String>,
    ) -> Result<Vec<NewRecipeIngredient>, ImportError> {
        // Duplicate names link to the first inventory row
        let mut known: HashMap<String, String> = HashMap::new();
        for item in self.store.list_ingredients().await? {
            known.entry(item.name).or_insert(item.id);
        }

        let mut rows = Vec::with_capacity(ingredients.len());
        for ingredient in ingredients {
            let id = match known.get(&ingredient.name) {
                Some(id) => id.clone(),
                None => {
                    let created = self
                        .store
                        .create_ingredient(&NewInventoryItem {
                            name: ingredient.name.clone(),
                            kind: IngredientKind::Main,
                            unit: self.unit_for(ingredient),
                            quantity: 0.0,
                            threshold: 1.0,
                            storage: StorageKind::Room,
                            expiry_date: None,
                            production_date: None,
                        })
                        .await?;
                    warn!("Auto-created inventory ingredient '{}'", ingredient.name);
                    warnings.push(format!(
                        "auto-created ingredient {} with zero stock",
                        ingredient.name
                    ));
                    known.insert(created.name, created.id.clone());
                    created.id
                }
            };

            rows.push(NewRecipeIngredient {
                ingredient_id: Some(id),
                name: None,
                quantity: coerce_quantity(&ingredient.amount),
                unit: self.unit_for(ingredient),
                optional: ingredient.optional,
            });
        }

        Ok(rows)
    }
}

fn validate(recipe: &ParsedRecipe) -> Result<(), ImportError> {
    let problem = if recipe.name.trim().is_empty() {
        "recipe has no name"
    } else if recipe.category.trim().is_empty() {
        "recipe has no category"
    } else if recipe.ingredients.is_empty() {
        "recipe has no ingredients"
    } else if recipe.steps.is_empty() {
        "recipe has no steps"
    } else {
        return Ok(());
    };
    Err(ImportError::InvalidInput(problem.to_string()))
}

/// Numeric quantity for storage; anything non-numeric becomes 0.
pub fn coerce_quantity(amount: &str) -> f64 {
    amount
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|q| q.is_finite())
        .unwrap_or(0.0)
}

/// Timer seconds must fit in `u32`; a longer duration fails the recipe.
fn step_rows(steps: &[ParsedStep]) -> Result<Vec<NewRecipeStep>, ImportError> {
    steps
        .iter()
        .zip(1..)
        .map(|(step, number)| {
            let timer = match step.duration {
                Some(minutes) => Some(minutes.checked_mul(60).ok_or_else(|| {
                    ImportError::InvalidInput(format!(
                        "step {} duration of {} minutes is too long",
                        number, minutes
                    ))
                })?),
                None => None,
            };
            Ok(NewRecipeStep {
                step_number: number,
                description: step.description.clone(),
                timer,
            })
        })
        .collect()
}

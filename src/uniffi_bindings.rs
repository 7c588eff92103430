//! UniFFI bindings for kitchen-import
//!
//! This module provides FFI-compatible types and functions for the mobile
//! clients. It wraps the async Rust API with synchronous functions that
//! manage their own tokio runtime.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ImportConfig, TablesConfig};
use crate::{
    ImportError, ImportResult, IngredientPolicy, ParsedIngredient, ParsedRecipe, ParsedStep,
    RecipeImportService, RestStore,
};

// Re-export UniFFI macro
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible parsed ingredient
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiParsedIngredient {
    pub name: String,
    pub amount: String,
    pub unit: String,
    pub optional: bool,
}

/// FFI-compatible parsed step
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiParsedStep {
    pub description: String,
    /// Minutes
    pub duration: Option<u32>,
    pub is_timer_enabled: bool,
}

/// FFI-compatible parsed recipe
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiParsedRecipe {
    pub name: String,
    pub category: String,
    pub difficulty: u32,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    pub tags: Vec<String>,
    /// Empty string if none
    pub description: String,
    /// Empty string if none
    pub notes: String,
    pub ingredients: Vec<FfiParsedIngredient>,
    pub steps: Vec<FfiParsedStep>,
}

impl From<ParsedIngredient> for FfiParsedIngredient {
    fn from(ingredient: ParsedIngredient) -> Self {
        FfiParsedIngredient {
            name: ingredient.name,
            amount: ingredient.amount,
            unit: ingredient.unit,
            optional: ingredient.optional,
        }
    }
}

impl From<ParsedStep> for FfiParsedStep {
    fn from(step: ParsedStep) -> Self {
        FfiParsedStep {
            description: step.description,
            duration: step.duration,
            is_timer_enabled: step.is_timer_enabled,
        }
    }
}

impl From<ParsedRecipe> for FfiParsedRecipe {
    fn from(recipe: ParsedRecipe) -> Self {
        FfiParsedRecipe {
            name: recipe.name,
            category: recipe.category,
            difficulty: recipe.difficulty,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            servings: recipe.servings,
            tags: recipe.tags,
            description: recipe.description.unwrap_or_default(),
            notes: recipe.notes.unwrap_or_default(),
            ingredients: recipe.ingredients.into_iter().map(Into::into).collect(),
            steps: recipe.steps.into_iter().map(Into::into).collect(),
        }
    }
}

/// FFI-compatible per-recipe import result
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiImportResult {
    pub success: bool,
    pub recipe_name: String,
    pub error: Option<String>,
    pub warnings: Vec<String>,
}

impl From<ImportResult> for FfiImportResult {
    fn from(result: ImportResult) -> Self {
        FfiImportResult {
            success: result.success,
            recipe_name: result.recipe_name,
            error: result.error,
            warnings: result.warnings,
        }
    }
}

/// FFI-compatible error type
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum FfiImportError {
    /// Input text was empty or contained no valid recipe
    InvalidInput { message: String },
    /// Backend could not be reached or configured
    StoreError { message: String },
    /// Configuration error
    ConfigError { message: String },
    /// Runtime error (tokio)
    RuntimeError { message: String },
}

impl fmt::Display for FfiImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiImportError::InvalidInput { message } => write!(f, "Invalid input: {}", message),
            FfiImportError::StoreError { message } => write!(f, "Store error: {}", message),
            FfiImportError::ConfigError { message } => write!(f, "Config error: {}", message),
            FfiImportError::RuntimeError { message } => write!(f, "Runtime error: {}", message),
        }
    }
}

impl std::error::Error for FfiImportError {}

impl From<ImportError> for FfiImportError {
    fn from(err: ImportError) -> Self {
        let message = err.to_string();
        match err {
            ImportError::ParseError(_)
            | ImportError::NoRecipesFound
            | ImportError::InvalidInput(_)
            | ImportError::Io(_)
            | ImportError::Serialize(_) => FfiImportError::InvalidInput { message },
            ImportError::Store(_) => FfiImportError::StoreError { message },
            ImportError::BuilderError(_)
            | ImportError::MissingConfig(_)
            | ImportError::ConfigError(_) => FfiImportError::ConfigError { message },
        }
    }
}

/// Create a new tokio runtime for FFI calls
fn create_runtime() -> Result<tokio::runtime::Runtime, FfiImportError> {
    tokio::runtime::Runtime::new().map_err(|e| FfiImportError::RuntimeError {
        message: format!("Failed to create async runtime: {}", e),
    })
}

/// Parse import text into recipes
///
/// Never fails; text without a valid recipe yields an empty list.
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn parse_recipe_text(text: String) -> Vec<FfiParsedRecipe> {
    crate::parse_recipe_markdown(&text)
        .into_iter()
        .map(Into::into)
        .collect()
}

/// Parse import text and write the recipes to the REST backend
///
/// # Arguments
/// * `text` - Import text
/// * `base_url` - REST endpoint root of the backend
/// * `api_key` - Optional project API key
/// * `linked` - Create missing inventory ingredients and link to them
///
/// # Returns
/// One result per parsed recipe, in source order
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn import_recipe_text(
    text: String,
    base_url: String,
    api_key: Option<String>,
    linked: bool,
) -> Result<Vec<FfiImportResult>, FfiImportError> {
    let rt = create_runtime()?;
    rt.block_on(async { import_recipe_text_async(&text, base_url, api_key, linked).await })
}

async fn import_recipe_text_async(
    text: &str,
    base_url: String,
    api_key: Option<String>,
    linked: bool,
) -> Result<Vec<FfiImportResult>, FfiImportError> {
    let recipes = crate::parse_recipe_markdown(text);
    if recipes.is_empty() {
        return Err(ImportError::NoRecipesFound.into());
    }

    let store = RestStore::new(
        base_url,
        api_key,
        Some(Duration::from_secs(30)),
        TablesConfig::default(),
    )
    .map_err(ImportError::from)?;

    let options = ImportConfig {
        ingredient_policy: if linked {
            IngredientPolicy::Linked
        } else {
            IngredientPolicy::Unlinked
        },
        ..ImportConfig::default()
    };

    let service = RecipeImportService::new(Arc::new(store), options);
    let results = service.import_recipes(&recipes).await;
    Ok(results.into_iter().map(Into::into).collect())
}

/// Get the library version
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recipe_text_flattens_optionals() {
        let text = "## 凉拌黄瓜
**分类**: 凉菜
### 食材
- 黄瓜 2根
- 香菜 适量[可选]
### 步骤
1. 拍黄瓜(2 分钟)[计时]"
            .to_string();

        let recipes = parse_recipe_text(text);
        assert_eq!(recipes.len(), 1);
        let recipe = &recipes[0];
        assert_eq!(recipe.description, "");
        assert_eq!(recipe.notes, "");
        assert!(recipe.ingredients[1].optional);
        assert_eq!(recipe.steps[0].duration, Some(2));
        assert!(recipe.steps[0].is_timer_enabled);
    }

    #[test]
    fn test_import_without_recipes_is_invalid_input() {
        let result = import_recipe_text(
            "no recipe here".to_string(),
            "http://127.0.0.1:9".to_string(),
            None,
            false,
        );
        assert!(matches!(result, Err(FfiImportError::InvalidInput { .. })));
    }

    #[test]
    fn test_error_mapping() {
        let err: FfiImportError = ImportError::MissingConfig("store.base_url").into();
        assert!(matches!(err, FfiImportError::ConfigError { .. }));
        assert!(err.to_string().contains("store.base_url"));
    }

    #[test]
    fn test_get_version() {
        let version = get_version();
        assert!(!version.is_empty());
    }
}

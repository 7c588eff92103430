//! Import recipes written in the kitchen manager's markdown format and
//! persist them to the recipe, category and inventory tables.
//!
//! ```
//! let text = "## 番茄炒蛋
//! **分类**: 家常菜
//! #### 食材
//! - 鸡蛋 3个
//! #### 步骤
//! 1. 打散鸡蛋。";
//!
//! let recipes = kitchen_import::parse_recipe_markdown(text);
//! assert_eq!(recipes[0].ingredients[0].amount, "3");
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod importer;
pub mod model;
pub mod pantry;
pub mod parser;
pub mod store;
pub mod uniffi_bindings;

use std::sync::Arc;

// Re-export commonly used types
pub use builder::{ImportOutcome, InputSource, OutputMode, RecipeImporter, RecipeImporterBuilder};
pub use config::{IngredientPolicy, KitchenConfig};
pub use error::{ImportError, StoreError};
pub use importer::{ImportResult, ImportSummary, RecipeImportService};
pub use model::{ParsedIngredient, ParsedRecipe, ParsedStep};
pub use parser::parse_recipe_markdown;
pub use store::{MemoryStore, RecipeStore, RestStore};

/// Parse import text and write every valid recipe to `store`.
///
/// # Arguments
/// * `text` - Import text, possibly holding several `---`-separated recipes
/// * `store` - Destination backend
/// * `policy` - How ingredient names are resolved against the inventory
///
/// # Returns
/// One [`ImportResult`] per parsed recipe, in source order
pub async fn import_text(
    text: &str,
    store: Arc<dyn RecipeStore>,
    policy: IngredientPolicy,
) -> Result<Vec<ImportResult>, ImportError> {
    let outcome = RecipeImporter::builder()
        .text(text)
        .store(store)
        .policy(policy)
        .config(KitchenConfig::default())
        .build()
        .await?;

    match outcome {
        ImportOutcome::Imported(summary) => Ok(summary.results),
        ImportOutcome::Parsed(_) => Err(ImportError::BuilderError(
            "Unexpected parse-only result when importing".to_string(),
        )),
    }
}

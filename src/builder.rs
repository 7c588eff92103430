use std::path::PathBuf;
use std::sync::Arc;

use log::debug;

use crate::config::{IngredientPolicy, KitchenConfig};
use crate::importer::{ImportSummary, RecipeImportService};
use crate::model::ParsedRecipe;
use crate::parser::parse_recipe_markdown;
use crate::store::{RecipeStore, RestStore};
use crate::ImportError;

/// Represents the input source for an import
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Import text held in memory
    Text(String),
    /// Read import text from a file
    File(PathBuf),
}

/// Represents the desired output of the import
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputMode {
    /// Parse and write to the store (default)
    #[default]
    Import,
    /// Parse only, nothing is written
    Parse,
}

/// Result of a builder run
#[derive(Debug, Clone)]
pub enum ImportOutcome {
    /// Recipes parsed from the input, not persisted
    Parsed(Vec<ParsedRecipe>),
    /// Per-recipe results of a persisted import
    Imported(ImportSummary),
}

/// Builder for configuring and executing recipe imports
#[derive(Default)]
pub struct RecipeImporterBuilder {
    source: Option<InputSource>,
    mode: OutputMode,
    policy: Option<IngredientPolicy>,
    store: Option<Arc<dyn RecipeStore>>,
    config: Option<KitchenConfig>,
}

impl RecipeImporterBuilder {
    /// Set the input source to import text
    ///
    /// # Example
    /// ```
    /// use kitchen_import::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .text("## 番茄炒蛋\n**分类**: 家常菜");
    /// ```
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.source = Some(InputSource::Text(text.into()));
        self
    }

    /// Set the input source to a file on disk
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(InputSource::File(path.into()));
        self
    }

    /// Only parse; `build` returns [`ImportOutcome::Parsed`]
    pub fn parse_only(mut self) -> Self {
        self.mode = OutputMode::Parse;
        self
    }

    /// Override the configured ingredient policy
    ///
    /// # Example
    /// ```
    /// use kitchen_import::{IngredientPolicy, RecipeImporter};
    ///
    /// let builder = RecipeImporter::builder()
    ///     .text("...")
    ///     .policy(IngredientPolicy::Linked);
    /// ```
    pub fn policy(mut self, policy: IngredientPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Write to this store instead of the configured REST backend
    pub fn store(mut self, store: Arc<dyn RecipeStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use this configuration instead of loading `kitchen.toml` / `KITCHEN__*`
    pub fn config(mut self, config: KitchenConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build and execute the import
    ///
    /// # Errors
    /// Returns `ImportError` if:
    /// - No input source was specified
    /// - The input is empty or cannot be read
    /// - An import finds no valid recipe in the text
    /// - No store was given and the REST backend is not configured
    ///
    /// Failures of individual recipes are not errors; they are reported in
    /// the returned [`ImportSummary`].
    ///
    /// # Example
    /// ```no_run
    /// # use kitchen_import::{RecipeImporter, store::MemoryStore};
    /// # use std::sync::Arc;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let outcome = RecipeImporter::builder()
    ///     .file("recipes.md")
    ///     .store(Arc::new(MemoryStore::new()))
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<ImportOutcome, ImportError> {
        let source = self.source.ok_or_else(|| {
            ImportError::BuilderError(
                "No input source specified. Use .text() or .file()".to_string(),
            )
        })?;

        let text = match source {
            InputSource::Text(text) => text,
            InputSource::File(path) => {
                debug!("Reading import text from {}", path.display());
                tokio::fs::read_to_string(&path).await?
            }
        };

        if text.trim().is_empty() {
            return Err(ImportError::InvalidInput(
                "Recipe text cannot be empty".to_string(),
            ));
        }

        let recipes = parse_recipe_markdown(&text);
        debug!("Parsed {} recipe(s)", recipes.len());

        if let OutputMode::Parse = self.mode {
            return Ok(ImportOutcome::Parsed(recipes));
        }

        if recipes.is_empty() {
            return Err(ImportError::NoRecipesFound);
        }

        let config = match self.config {
            Some(config) => config,
            None => KitchenConfig::load()?,
        };

        let store: Arc<dyn RecipeStore> = match self.store {
            Some(store) => store,
            None => Arc::new(RestStore::from_config(&config)?),
        };

        let mut options = config.import;
        if let Some(policy) = self.policy {
            options.ingredient_policy = policy;
        }

        let service = RecipeImportService::new(store, options);
        let results = service.import_recipes(&recipes).await;
        Ok(ImportOutcome::Imported(ImportSummary::from(results)))
    }
}

/// Main entry point for the builder API
pub struct RecipeImporter;

impl RecipeImporter {
    /// Creates a new builder for importing recipes
    ///
    /// # Example
    /// ```
    /// use kitchen_import::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder();
    /// ```
    pub fn builder() -> RecipeImporterBuilder {
        RecipeImporterBuilder::default()
    }
}

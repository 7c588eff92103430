use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Main importer configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct KitchenConfig {
    /// Remote backend connection
    #[serde(default)]
    pub store: StoreConfig,
    /// Import behaviour
    #[serde(default)]
    pub import: ImportConfig,
    /// Table names on the backend
    #[serde(default)]
    pub tables: TablesConfig,
}

/// Connection settings for the hosted table backend
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// REST endpoint root, e.g. `https://project.example.co/rest/v1`
    pub base_url: Option<String>,
    /// Project API key, sent both as `apikey` and as bearer token
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout: default_timeout(),
        }
    }
}

/// How parsed ingredient names are resolved against the inventory
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IngredientPolicy {
    /// Find or create the inventory row (zero stock) and link to it
    Linked,
    /// Store name and unit on the recipe ingredient, inventory untouched
    #[default]
    Unlinked,
}

impl std::str::FromStr for IngredientPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linked" => Ok(IngredientPolicy::Linked),
            "unlinked" => Ok(IngredientPolicy::Unlinked),
            other => Err(format!("Unknown ingredient policy: {}", other)),
        }
    }
}

/// Settings applied while importing parsed recipes
#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    #[serde(default)]
    pub ingredient_policy: IngredientPolicy,
    /// Unit stored when a parsed ingredient has none
    #[serde(default = "default_unit")]
    pub default_unit: String,
    /// Servings stored when a recipe does not specify any
    #[serde(default = "default_servings")]
    pub default_servings: u32,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            ingredient_policy: IngredientPolicy::default(),
            default_unit: default_unit(),
            default_servings: default_servings(),
        }
    }
}

/// Backend table names
#[derive(Debug, Deserialize, Clone)]
pub struct TablesConfig {
    #[serde(default = "default_categories_table")]
    pub categories: String,
    #[serde(default = "default_ingredients_table")]
    pub ingredients: String,
    #[serde(default = "default_recipes_table")]
    pub recipes: String,
    #[serde(default = "default_recipe_ingredients_table")]
    pub recipe_ingredients: String,
    #[serde(default = "default_recipe_steps_table")]
    pub recipe_steps: String,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            categories: default_categories_table(),
            ingredients: default_ingredients_table(),
            recipes: default_recipes_table(),
            recipe_ingredients: default_recipe_ingredients_table(),
            recipe_steps: default_recipe_steps_table(),
        }
    }
}

// Default value functions
fn default_timeout() -> u64 {
    30
}

fn default_unit() -> String {
    crate::parser::DEFAULT_UNIT.to_string()
}

fn default_servings() -> u32 {
    1
}

fn default_categories_table() -> String {
    "kc_categories".to_string()
}

fn default_ingredients_table() -> String {
    "kc_ingredients".to_string()
}

fn default_recipes_table() -> String {
    "kc_recipes".to_string()
}

fn default_recipe_ingredients_table() -> String {
    "kc_recipe_ingredients".to_string()
}

fn default_recipe_steps_table() -> String {
    "kc_recipe_steps".to_string()
}

impl KitchenConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with KITCHEN__ prefix
    /// 2. kitchen.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: KITCHEN__STORE__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`KitchenConfig::load`] for the source priority.
pub fn load_config() -> Result<KitchenConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("kitchen").required(false))
        // Use double underscore for nested: KITCHEN__STORE__BASE_URL
        .add_source(
            Environment::with_prefix("KITCHEN")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

use super::{
    Category, InventoryItem, NewCategory, NewInventoryItem, NewRecipe, NewRecipeIngredient,
    NewRecipeStep, RecipeRow, RecipeStore,
};
use crate::config::{KitchenConfig, TablesConfig};
use crate::error::{ImportError, StoreError};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Store backed by a PostgREST-style HTTP table API (the hosted backend)
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    tables: TablesConfig,
}

/// Child row with the parent recipe id attached
#[derive(Serialize)]
struct WithRecipe<'a, T> {
    recipe_id: &'a str,
    #[serde(flatten)]
    row: &'a T,
}

impl RestStore {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Option<Duration>,
        tables: TablesConfig,
    ) -> Result<Self, StoreError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("kitchen-import/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            tables,
        })
    }

    /// Create a store from the `[store]` and `[tables]` configuration sections
    pub fn from_config(config: &KitchenConfig) -> Result<Self, ImportError> {
        let base_url = config
            .store
            .base_url
            .clone()
            .ok_or(ImportError::MissingConfig("store.base_url"))?;

        Ok(Self::new(
            base_url,
            config.store.api_key.clone(),
            Some(Duration::from_secs(config.store.timeout)),
            config.tables.clone(),
        )?)
    }

    fn url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }

    async fn select<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>, StoreError> {
        debug!("GET {}", table);
        let request = self
            .client
            .get(self.url(table))
            .query(&[("select", "*"), ("order", "name.asc")]);
        decode(self.authorize(request).send().await?).await
    }

    async fn insert<B, T>(&self, table: &str, body: &B) -> Result<Vec<T>, StoreError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!("POST {}", table);
        let request = self
            .client
            .post(self.url(table))
            .header("Prefer", "return=representation")
            .json(body);
        decode(self.authorize(request).send().await?).await
    }

    async fn insert_one<B, T>(&self, table: &str, body: &B) -> Result<T, StoreError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        self.insert(table, body)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Rejected(format!("insert into {} returned no row", table)))
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<Vec<T>, StoreError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(StoreError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl RecipeStore for RestStore {
    fn backend_name(&self) -> &str {
        "rest"
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.select(&self.tables.categories).await
    }

    async fn create_category(&self, category: &NewCategory) -> Result<Category, StoreError> {
        self.insert_one(&self.tables.categories, category).await
    }

    async fn list_ingredients(&self) -> Result<Vec<InventoryItem>, StoreError> {
        self.select(&self.tables.ingredients).await
    }

    async fn create_ingredient(
        &self,
        ingredient: &NewInventoryItem,
    ) -> Result<InventoryItem, StoreError> {
        self.insert_one(&self.tables.ingredients, ingredient).await
    }

    async fn create_recipe(
        &self,
        recipe: &NewRecipe,
        ingredients: &[NewRecipeIngredient],
        steps: &[NewRecipeStep],
    ) -> Result<RecipeRow, StoreError> {
        let created: RecipeRow = self.insert_one(&self.tables.recipes, recipe).await?;

        if !ingredients.is_empty() {
            let rows: Vec<_> = ingredients
                .iter()
                .map(|row| WithRecipe {
                    recipe_id: &created.id,
                    row,
                })
                .collect();
            let _: Vec<serde_json::Value> =
                self.insert(&self.tables.recipe_ingredients, &rows).await?;
        }

        if !steps.is_empty() {
            let rows: Vec<_> = steps
                .iter()
                .map(|row| WithRecipe {
                    recipe_id: &created.id,
                    row,
                })
                .collect();
            let _: Vec<serde_json::Value> = self.insert(&self.tables.recipe_steps, &rows).await?;
        }

        Ok(created)
    }
}

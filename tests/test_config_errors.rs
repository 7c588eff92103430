//! Runs in its own process: these tests change `KITCHEN__*` variables.

use kitchen_import::{ImportError, MemoryStore, RecipeImporter};
use std::sync::Arc;

const RECIPE: &str = "## 番茄炒蛋
**分类**: 家常菜
### 食材
- 鸡蛋 3个
### 步骤
1. 打散鸡蛋。";

/// A store override must not hide a broken configuration
#[tokio::test]
async fn test_malformed_env_config_fails_memory_import() {
    std::env::set_var("KITCHEN__STORE__TIMEOUT", "soon");

    let result = RecipeImporter::builder()
        .text(RECIPE)
        .store(Arc::new(MemoryStore::new()))
        .build()
        .await;

    std::env::remove_var("KITCHEN__STORE__TIMEOUT");

    assert!(matches!(result, Err(ImportError::ConfigError(_))));
}

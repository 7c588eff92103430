//! Matching recipes against the ingredient inventory: stock checks before
//! cooking, deduction after cooking, and recommendations by how much of a
//! recipe the fridge already covers.

use crate::store::InventoryItem;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

/// Number of recommendations returned when no limit is given
pub const DEFAULT_RECOMMENDATIONS: usize = 10;

/// Total prep + cook minutes for a recipe to count as quick
pub const QUICK_RECIPE_MINUTES: u32 = 30;

/// Amount of one inventory item a recipe needs
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    pub ingredient_id: String,
    pub amount: f64,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shortfall {
    pub name: String,
    pub needed: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StockCheck {
    pub missing: Vec<Shortfall>,
}

impl StockCheck {
    pub fn can_cook(&self) -> bool {
        self.missing.is_empty()
    }
}

pub fn is_low_stock(item: &InventoryItem) -> bool {
    item.quantity <= item.threshold
}

/// Items still in stock but at or below their restock threshold
pub fn low_stock(items: &[InventoryItem]) -> Vec<&InventoryItem> {
    items
        .iter()
        .filter(|item| item.quantity > 0.0 && is_low_stock(item))
        .collect()
}

/// In-stock items whose expiry date is at most `days` days after `today`
pub fn expiring_within(items: &[InventoryItem], today: NaiveDate, days: i64) -> Vec<&InventoryItem> {
    items
        .iter()
        .filter(|item| item.quantity > 0.0)
        .filter(|item| {
            item.expiry_date
                .map(|expiry| (expiry - today).num_days() <= days)
                .unwrap_or(false)
        })
        .collect()
}

/// Compare what a recipe needs with what the inventory holds.
///
/// Requirements pointing at unknown inventory ids are not counted as missing.
pub fn check_stock(requirements: &[Requirement], inventory: &[InventoryItem]) -> StockCheck {
    let missing = requirements
        .iter()
        .filter_map(|req| {
            let item = inventory.iter().find(|i| i.id == req.ingredient_id)?;
            (item.quantity < req.amount).then(|| Shortfall {
                name: item.name.clone(),
                needed: req.amount - item.quantity,
            })
        })
        .collect();

    StockCheck { missing }
}

/// Take a recipe's ingredients out of the inventory.
///
/// All or nothing: if anything is short the inventory is left untouched and
/// the shortfalls are returned.
pub fn deduct_stock(
    requirements: &[Requirement],
    inventory: &mut [InventoryItem],
) -> Result<(), StockCheck> {
    let check = check_stock(requirements, inventory);
    if !check.can_cook() {
        return Err(check);
    }

    for req in requirements {
        if let Some(item) = inventory.iter_mut().find(|i| i.id == req.ingredient_id) {
            item.quantity = (item.quantity - req.amount).max(0.0);
        }
    }
    Ok(())
}

/// Percentage (0-100) of required ingredients present in `available`.
/// Optional ingredients are left out; a recipe with no required ingredient
/// scores 0.
pub fn match_rate(requirements: &[Requirement], available: &HashSet<String>) -> f64 {
    let required: Vec<&Requirement> = requirements.iter().filter(|r| !r.optional).collect();
    if required.is_empty() {
        return 0.0;
    }

    let present = required
        .iter()
        .filter(|r| available.contains(&r.ingredient_id))
        .count();
    present as f64 / required.len() as f64 * 100.0
}

/// Recipe summary used for recommendations and quick-recipe listings
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeCandidate {
    pub id: String,
    pub name: String,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub requirements: Vec<Requirement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation<'a> {
    pub recipe: &'a RecipeCandidate,
    pub match_rate: f64,
}

/// Best-covered recipes first; ties keep their input order.
pub fn recommend<'a>(
    recipes: &'a [RecipeCandidate],
    available: &HashSet<String>,
    limit: Option<usize>,
) -> Vec<Recommendation<'a>> {
    let mut ranked: Vec<Recommendation<'a>> = recipes
        .iter()
        .map(|recipe| Recommendation {
            recipe,
            match_rate: match_rate(&recipe.requirements, available),
        })
        .collect();

    ranked.sort_by(|a, b| b.match_rate.total_cmp(&a.match_rate));
    ranked.truncate(limit.unwrap_or(DEFAULT_RECOMMENDATIONS));
    ranked
}

/// Recipes whose prep plus cook time fits in `max_minutes`
pub fn quick_recipes(recipes: &[RecipeCandidate], max_minutes: u32) -> Vec<&RecipeCandidate> {
    recipes
        .iter()
        .filter(|r| {
            r.prep_time
                .unwrap_or(0)
                .saturating_add(r.cook_time.unwrap_or(0))
                <= max_minutes
        })
        .collect()
}

/// Ids of inventory items that are currently in stock
pub fn available_ids(inventory: &[InventoryItem]) -> HashSet<String> {
    inventory
        .iter()
        .filter(|item| item.quantity > 0.0)
        .map(|item| item.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{IngredientKind, StorageKind};

    fn item(id: &str, name: &str, quantity: f64, threshold: f64) -> InventoryItem {
        InventoryItem {
            id: id.to_string(),
            name: name.to_string(),
            kind: IngredientKind::Fresh,
            unit: "个".to_string(),
            quantity,
            threshold,
            storage: StorageKind::Refrigerated,
            expiry_date: None,
            production_date: None,
        }
    }

    fn req(id: &str, amount: f64) -> Requirement {
        Requirement {
            ingredient_id: id.to_string(),
            amount,
            optional: false,
        }
    }

    fn fridge() -> Vec<InventoryItem> {
        vec![
            item("i1", "鸡蛋", 10.0, 2.0),
            item("i2", "西红柿", 1.0, 2.0),
            item("i3", "大米", 5000.0, 500.0),
            item("i4", "酱油", 0.0, 50.0),
        ]
    }

    #[test]
    fn test_low_stock_excludes_empty_items() {
        let items = fridge();
        let low: Vec<&str> = low_stock(&items).iter().map(|i| i.name.as_str()).collect();
        assert_eq!(low, vec!["西红柿"]);
        assert!(is_low_stock(&items[3]));
    }

    #[test]
    fn test_expiring_within() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut items = fridge();
        items[0].expiry_date = NaiveDate::from_ymd_opt(2024, 5, 3);
        items[1].expiry_date = NaiveDate::from_ymd_opt(2024, 5, 10);
        items[3].expiry_date = NaiveDate::from_ymd_opt(2024, 4, 30);

        let expiring: Vec<&str> = expiring_within(&items, today, 3)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(expiring, vec!["i1"]);
    }

    #[test]
    fn test_check_stock_reports_shortfall() {
        let check = check_stock(&[req("i1", 3.0), req("i2", 2.0), req("unknown", 9.0)], &fridge());
        assert!(!check.can_cook());
        assert_eq!(
            check.missing,
            vec![Shortfall {
                name: "西红柿".to_string(),
                needed: 1.0
            }]
        );
    }

    #[test]
    fn test_deduct_stock_all_or_nothing() {
        let mut items = fridge();
        let result = deduct_stock(&[req("i1", 3.0), req("i2", 2.0)], &mut items);
        assert!(result.is_err());
        assert_eq!(items[0].quantity, 10.0);

        deduct_stock(&[req("i1", 3.0), req("i2", 1.0)], &mut items).unwrap();
        assert_eq!(items[0].quantity, 7.0);
        assert_eq!(items[1].quantity, 0.0);
    }

    #[test]
    fn test_match_rate_ignores_optional() {
        let available = available_ids(&fridge());
        let mut reqs = vec![req("i1", 1.0), req("i4", 1.0)];
        assert_eq!(match_rate(&reqs, &available), 50.0);

        reqs[1].optional = true;
        assert_eq!(match_rate(&reqs, &available), 100.0);
        assert_eq!(match_rate(&[], &available), 0.0);
    }

    #[test]
    fn test_recommend_orders_by_rate_and_limits() {
        let candidate = |id: &str, reqs: Vec<Requirement>| RecipeCandidate {
            id: id.to_string(),
            name: id.to_string(),
            prep_time: None,
            cook_time: None,
            requirements: reqs,
        };
        let recipes = vec![
            candidate("none", vec![req("i4", 1.0)]),
            candidate("half", vec![req("i1", 1.0), req("i4", 1.0)]),
            candidate("full", vec![req("i1", 1.0), req("i2", 1.0)]),
            candidate("full2", vec![req("i3", 1.0)]),
        ];
        let available = available_ids(&fridge());

        let ranked = recommend(&recipes, &available, Some(3));
        let ids: Vec<&str> = ranked.iter().map(|r| r.recipe.id.as_str()).collect();
        assert_eq!(ids, vec!["full", "full2", "half"]);
    }

    #[test]
    fn test_quick_recipes() {
        let recipes = vec![
            RecipeCandidate {
                id: "a".into(),
                name: "a".into(),
                prep_time: Some(10),
                cook_time: Some(20),
                requirements: vec![],
            },
            RecipeCandidate {
                id: "b".into(),
                name: "b".into(),
                prep_time: Some(10),
                cook_time: Some(25),
                requirements: vec![],
            },
            RecipeCandidate {
                id: "c".into(),
                name: "c".into(),
                prep_time: None,
                cook_time: None,
                requirements: vec![],
            },
        ];
        let quick: Vec<&str> = quick_recipes(&recipes, QUICK_RECIPE_MINUTES)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(quick, vec!["a", "c"]);
    }

    #[test]
    fn test_quick_recipes_with_huge_times() {
        let recipe = crate::parse_recipe_markdown(
            "## 腊肉
**分类**: 腌制
**准备时间**: 4000000000
**烹饪时间**: 1000000000
### 食材
- 五花肉 1000g
### 步骤
1. 风干。",
        )
        .remove(0);

        let recipes = vec![RecipeCandidate {
            id: "slow".into(),
            name: recipe.name,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            requirements: vec![],
        }];
        assert!(quick_recipes(&recipes, QUICK_RECIPE_MINUTES).is_empty());
        assert_eq!(quick_recipes(&recipes, u32::MAX).len(), 1);
    }
}

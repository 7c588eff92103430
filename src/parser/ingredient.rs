use crate::model::ParsedIngredient;
use regex::Regex;
use std::sync::LazyLock;

/// Unit used when a numeric amount carries no unit of its own
pub const DEFAULT_UNIT: &str = "个";

static OPTIONAL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[(?:可选|optional)\]").unwrap());

/// Weight/volume annotations such as `(约200g)` or `（300ml）`
static ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(（][^)）]*[)）]").unwrap());

static AMOUNT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+(?:\.[0-9]+)?|\.[0-9]+)(.*)$").unwrap());

/// Parse a bullet line (marker already stripped) into an ingredient.
///
/// Format: `<name> <amount><unit> (annotation) [可选]`. Lines with fewer than
/// two whitespace-separated tokens are skipped.
pub fn parse_ingredient(text: &str) -> Option<ParsedIngredient> {
    let optional = OPTIONAL_MARKER.is_match(text);
    let text = OPTIONAL_MARKER.replace_all(text, "");
    let text = ANNOTATION.replace_all(&text, "");

    let mut parts = text.split_whitespace();
    let name = parts.next()?;
    let amount_with_unit: String = parts.collect();
    if amount_with_unit.is_empty() {
        return None;
    }

    let numeric = AMOUNT_PREFIX
        .captures(&amount_with_unit)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()));

    let (amount, unit) = match numeric {
        Some((amount, unit)) if unit.is_empty() => (amount, DEFAULT_UNIT.to_string()),
        Some((amount, unit)) => (amount, unit),
        None => (amount_with_unit, String::new()),
    };

    Some(ParsedIngredient {
        name: name.to_string(),
        amount,
        unit,
        optional,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(name: &str, amount: &str, unit: &str, optional: bool) -> ParsedIngredient {
        ParsedIngredient {
            name: name.to_string(),
            amount: amount.to_string(),
            unit: unit.to_string(),
            optional,
        }
    }

    #[test]
    fn test_amount_and_unit() {
        assert_eq!(
            parse_ingredient("鸡蛋 3个"),
            Some(ingredient("鸡蛋", "3", "个", false))
        );
    }

    #[test]
    fn test_amount_tokens_are_concatenated() {
        assert_eq!(
            parse_ingredient("盐 1 小勺"),
            Some(ingredient("盐", "1", "小勺", false))
        );
    }

    #[test]
    fn test_decimal_amount() {
        assert_eq!(
            parse_ingredient("面粉 1.5kg"),
            Some(ingredient("面粉", "1.5", "kg", false))
        );
    }

    #[test]
    fn test_bare_number_gets_default_unit() {
        assert_eq!(
            parse_ingredient("土豆 2"),
            Some(ingredient("土豆", "2", DEFAULT_UNIT, false))
        );
    }

    #[test]
    fn test_non_numeric_amount_kept_verbatim() {
        assert_eq!(
            parse_ingredient("香菜 适量[可选]"),
            Some(ingredient("香菜", "适量", "", true))
        );
        assert_eq!(
            parse_ingredient("salt to taste"),
            Some(ingredient("salt", "totaste", "", false))
        );
    }

    #[test]
    fn test_optional_marker_anywhere_any_case() {
        assert_eq!(
            parse_ingredient("[Optional] 葱 1根"),
            Some(ingredient("葱", "1", "根", true))
        );
        assert_eq!(
            parse_ingredient("葱 1根 [OPTIONAL]"),
            Some(ingredient("葱", "1", "根", true))
        );
    }

    #[test]
    fn test_annotation_removed() {
        assert_eq!(
            parse_ingredient("五花肉 1块 (约500g)"),
            Some(ingredient("五花肉", "1", "块", false))
        );
        assert_eq!(
            parse_ingredient("牛奶 1杯（250ml）"),
            Some(ingredient("牛奶", "1", "杯", false))
        );
    }

    #[test]
    fn test_single_token_is_skipped() {
        assert_eq!(parse_ingredient("鸡蛋"), None);
        assert_eq!(parse_ingredient("鸡蛋 (3个)"), None);
        assert_eq!(parse_ingredient(""), None);
        assert_eq!(parse_ingredient("[可选]"), None);
    }
}

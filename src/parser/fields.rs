//! Recognizers for the bold-labelled metadata lines of a recipe block,
//! e.g. `**分类**: 家常菜` or `**Cook time**：20 min`.

use regex::Regex;
use std::sync::LazyLock;

static FIRST_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Metadata fields that can appear as `**<label>**: <value>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Category,
    Difficulty,
    PrepTime,
    CookTime,
    Servings,
    Tags,
    Description,
    Notes,
}

/// Chinese label (matched exactly) and English label (matched ignoring ASCII case)
const LABELS: &[(Field, &str, &str)] = &[
    (Field::Category, "分类", "category"),
    (Field::Difficulty, "难度", "difficulty"),
    (Field::PrepTime, "准备时间", "prep time"),
    (Field::CookTime, "烹饪时间", "cook time"),
    (Field::Servings, "份数", "servings"),
    (Field::Tags, "标签", "tags"),
    (Field::Description, "简介", "description"),
    (Field::Notes, "小贴士", "notes"),
];

/// Match a field line, returning the field and its trimmed value.
///
/// The value is everything after the first colon, so it may be empty when
/// the content continues on the following lines.
pub fn match_field(line: &str) -> Option<(Field, &str)> {
    let rest = line.strip_prefix("**")?;
    let close = rest.find("**")?;
    let label = rest[..close].trim();
    let after = &rest[close + 2..];
    let value = after
        .strip_prefix(':')
        .or_else(|| after.strip_prefix('：'))?;

    LABELS
        .iter()
        .find(|(_, zh, en)| label == *zh || label.eq_ignore_ascii_case(en))
        .map(|(field, _, _)| (*field, value.trim()))
}

/// True for any line that opens with a bold label, known or not.
pub fn is_bold_label(line: &str) -> bool {
    line.starts_with("**")
}

/// Parse the leading integer of a value, the way a lenient form field would:
/// `"3"` and `"3 星"` give 3, `"三"` gives nothing. Digits beyond `u32`
/// saturate to `u32::MAX`.
pub fn leading_int(value: &str) -> Option<u32> {
    let value = value.trim_start();
    let end = value
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(value.len());
    let digits = &value[..end];
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse().unwrap_or(u32::MAX))
}

/// Minutes from a free-form time value: the first run of digits anywhere.
pub fn parse_minutes(value: &str) -> Option<u32> {
    FIRST_NUMBER
        .find(value)
        .and_then(|m| m.as_str().parse().ok())
}

/// Difficulty never fails a recipe; anything unreadable becomes 1.
pub fn parse_difficulty(value: &str) -> u32 {
    match leading_int(value) {
        Some(0) | None => 1,
        Some(level) => level,
    }
}

/// Servings present but unreadable default to 1.
pub fn parse_servings(value: &str) -> u32 {
    match leading_int(value) {
        Some(0) | None => 1,
        Some(servings) => servings,
    }
}

/// `#快手 #下饭 plain` gives `["快手", "下饭"]`; tokens without `#` are dropped.
pub fn parse_tags(value: &str) -> Vec<String> {
    value
        .split_whitespace()
        .filter_map(|token| token.strip_prefix('#'))
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_field_ascii_colon() {
        assert_eq!(
            match_field("**分类**: 家常菜"),
            Some((Field::Category, "家常菜"))
        );
    }

    #[test]
    fn test_match_field_fullwidth_colon() {
        assert_eq!(
            match_field("**难度**：3"),
            Some((Field::Difficulty, "3"))
        );
    }

    #[test]
    fn test_match_field_english_case_insensitive() {
        assert_eq!(
            match_field("**Prep Time**: 10 min"),
            Some((Field::PrepTime, "10 min"))
        );
        assert_eq!(
            match_field("**TAGS**: #quick"),
            Some((Field::Tags, "#quick"))
        );
    }

    #[test]
    fn test_match_field_keeps_later_colons() {
        assert_eq!(
            match_field("**简介**: 口感：外酥里嫩"),
            Some((Field::Description, "口感：外酥里嫩"))
        );
    }

    #[test]
    fn test_match_field_empty_value() {
        assert_eq!(match_field("**小贴士**:"), Some((Field::Notes, "")));
    }

    #[test]
    fn test_match_field_rejects_unknown_or_malformed() {
        assert_eq!(match_field("**作者**: 某人"), None);
        assert_eq!(match_field("**分类** 家常菜"), None);
        assert_eq!(match_field("分类: 家常菜"), None);
        assert_eq!(match_field("**分类"), None);
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("3"), Some(3));
        assert_eq!(leading_int(" 4 人份"), Some(4));
        assert_eq!(leading_int("两人"), None);
        assert_eq!(leading_int(""), None);
    }

    #[test]
    fn test_parse_minutes_finds_first_number() {
        assert_eq!(parse_minutes("15分钟"), Some(15));
        assert_eq!(parse_minutes("about 20 min, 5 rest"), Some(20));
        assert_eq!(parse_minutes("半小时"), None);
    }

    #[test]
    fn test_difficulty_and_servings_fallbacks() {
        assert_eq!(parse_difficulty("5"), 5);
        assert_eq!(parse_difficulty("简单"), 1);
        assert_eq!(parse_difficulty("0"), 1);
        assert_eq!(parse_servings("2人份"), 2);
        assert_eq!(parse_servings("若干"), 1);
    }

    #[test]
    fn test_parse_tags_keeps_order() {
        assert_eq!(
            parse_tags("#快手 #下饭 #素食"),
            vec!["快手", "下饭", "素食"]
        );
        assert_eq!(parse_tags("#a plain # #b"), vec!["a", "b"]);
    }

    #[test]
    fn test_oversized_numbers_saturate() {
        assert_eq!(leading_int("99999999999999"), Some(u32::MAX));
        assert_eq!(parse_difficulty("99999999999999"), u32::MAX);
        assert_eq!(parse_servings("99999999999999 人份"), u32::MAX);
        assert_eq!(leading_int("星"), None);
    }
}

//! Parser for the markdown-like recipe import format.
//!
//! A document holds one or more recipe blocks separated by a line of three or
//! more hyphens. Each block is read line by line against an ordered list of
//! rules; the first rule that accepts a line consumes it and lines no rule
//! accepts are ignored. Parsing never fails: blocks that end up without a
//! name, category, ingredient or step are dropped.

pub mod fields;
pub mod ingredient;
pub mod step;

use crate::model::{ParsedIngredient, ParsedRecipe, ParsedStep};
use fields::Field;
use log::{debug, trace};

pub use ingredient::{parse_ingredient, DEFAULT_UNIT};
pub use step::parse_step;

/// Which list bullet and numbered lines currently feed into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Section {
    #[default]
    None,
    Ingredients,
    Steps,
}

/// Fields collected so far for one block
#[derive(Debug, Default)]
struct Draft {
    section: Section,
    name: String,
    category: String,
    difficulty: Option<u32>,
    prep_time: Option<u32>,
    cook_time: Option<u32>,
    servings: Option<u32>,
    tags: Vec<String>,
    description: Option<String>,
    notes: Option<String>,
    ingredients: Vec<ParsedIngredient>,
    steps: Vec<ParsedStep>,
}

/// A rule inspects `lines[index]` and returns true if it consumed the line.
type Rule = fn(&mut Draft, &[&str], usize) -> bool;

/// Evaluated in this order for every line; first match wins.
const RULES: &[Rule] = &[
    recipe_name,
    field_line,
    section_heading,
    ingredient_line,
    step_line,
];

/// Parse a whole import document into recipes, in source order.
///
/// Invalid blocks are skipped without affecting the others.
pub fn parse_recipe_markdown(markdown: &str) -> Vec<ParsedRecipe> {
    split_blocks(markdown)
        .into_iter()
        .filter_map(|block| parse_recipe_block(&block))
        .collect()
}

/// Split a document on horizontal-rule lines, dropping blank blocks.
pub fn split_blocks(markdown: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in markdown.lines() {
        if is_delimiter(line) {
            blocks.push(current.join("\n"));
            current.clear();
        } else {
            current.push(line);
        }
    }
    blocks.push(current.join("\n"));

    blocks.retain(|block| !block.trim().is_empty());
    blocks
}

fn is_delimiter(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 3 && line.chars().all(|c| c == '-')
}

/// Parse a single recipe block. Returns `None` if the block is incomplete.
pub fn parse_recipe_block(block: &str) -> Option<ParsedRecipe> {
    let lines: Vec<&str> = block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut draft = Draft::default();
    for index in 0..lines.len() {
        if !RULES.iter().any(|rule| rule(&mut draft, &lines, index)) {
            trace!("Ignoring line {:?}", lines[index]);
        }
    }

    draft.finish()
}

impl Draft {
    fn finish(self) -> Option<ParsedRecipe> {
        let missing = if self.name.is_empty() {
            Some("name")
        } else if self.category.is_empty() {
            Some("category")
        } else if self.ingredients.is_empty() {
            Some("ingredients")
        } else if self.steps.is_empty() {
            Some("steps")
        } else {
            None
        };

        if let Some(field) = missing {
            debug!(
                "Dropping recipe block {:?}: missing {}",
                if self.name.is_empty() { "<untitled>" } else { &self.name },
                field
            );
            return None;
        }

        Some(ParsedRecipe {
            name: self.name,
            category: self.category,
            difficulty: self.difficulty.unwrap_or(1),
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            servings: self.servings,
            tags: self.tags,
            description: self.description,
            notes: self.notes,
            ingredients: self.ingredients,
            steps: self.steps,
        })
    }
}

fn recipe_name(draft: &mut Draft, lines: &[&str], index: usize) -> bool {
    match lines[index].strip_prefix("## ") {
        Some(name) => {
            draft.name = name.trim().to_string();
            true
        }
        None => false,
    }
}

fn field_line(draft: &mut Draft, lines: &[&str], index: usize) -> bool {
    let Some((field, value)) = fields::match_field(lines[index]) else {
        return false;
    };

    match field {
        Field::Category => draft.category = value.to_string(),
        Field::Difficulty => draft.difficulty = Some(fields::parse_difficulty(value)),
        Field::PrepTime => draft.prep_time = fields::parse_minutes(value),
        Field::CookTime => draft.cook_time = fields::parse_minutes(value),
        Field::Servings => draft.servings = Some(fields::parse_servings(value)),
        Field::Tags => draft.tags = fields::parse_tags(value),
        Field::Description => {
            let description = if value.is_empty() {
                lines.get(index + 1).copied().unwrap_or_default()
            } else {
                value
            };
            draft.description = non_empty(description.to_string());
        }
        Field::Notes => {
            let notes = if value.is_empty() {
                continuation(&lines[index + 1..]).join("\n")
            } else {
                value.to_string()
            };
            draft.notes = non_empty(notes);
        }
    }
    true
}

/// Lines following an empty notes label, up to the next structural line.
fn continuation<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    lines
        .iter()
        .take_while(|line| {
            !(line.starts_with("##")
                || fields::is_bold_label(line)
                || line.starts_with('-')
                || step::is_numbered(line))
        })
        .copied()
        .collect()
}

fn section_heading(draft: &mut Draft, lines: &[&str], index: usize) -> bool {
    let Some(title) = lines[index].strip_prefix("###") else {
        return false;
    };
    let title = title.trim_start_matches('#').trim();
    let lower = title.to_ascii_lowercase();

    if title.starts_with("食材") || lower.starts_with("ingredients") {
        draft.section = Section::Ingredients;
        true
    } else if title.starts_with("步骤") || lower.starts_with("steps") {
        draft.section = Section::Steps;
        true
    } else {
        false
    }
}

fn ingredient_line(draft: &mut Draft, lines: &[&str], index: usize) -> bool {
    if draft.section != Section::Ingredients {
        return false;
    }
    let Some(item) = lines[index].strip_prefix('-') else {
        return false;
    };

    match parse_ingredient(item.trim()) {
        Some(ingredient) => draft.ingredients.push(ingredient),
        None => debug!("Skipping ingredient line {:?}", lines[index]),
    }
    true
}

fn step_line(draft: &mut Draft, lines: &[&str], index: usize) -> bool {
    if draft.section != Section::Steps || !step::is_numbered(lines[index]) {
        return false;
    }

    match parse_step(lines[index]) {
        Some(step) => draft.steps.push(step),
        None => debug!("Skipping step line {:?}", lines[index]),
    }
    true
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "## 番茄炒蛋
**分类**: 家常菜
**难度**: 1
### 食材
- 鸡蛋 3个
- 西红柿 2个
### 步骤
1. 打散鸡蛋。
2. 炒熟出锅。";

    #[test]
    fn test_split_without_delimiter_is_one_block() {
        assert_eq!(split_blocks(MINIMAL).len(), 1);
    }

    #[test]
    fn test_split_drops_blank_blocks() {
        let doc = format!("---\n\n{}\n\n-----\n\n   \n---\n", MINIMAL);
        let blocks = split_blocks(&doc);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].contains("番茄炒蛋"));
    }

    #[test]
    fn test_bullet_lines_are_not_delimiters() {
        assert!(!is_delimiter("- 鸡蛋 3个"));
        assert!(!is_delimiter("--"));
        assert!(is_delimiter("  ---  "));
        assert!(is_delimiter("----------"));
    }

    #[test]
    fn test_section_state_follows_headings() {
        let block = "## 测试
**分类**: 测试
### 步骤
- 不是食材 1个
1. 第一步
### 食材
1. 不是步骤
- 盐 1克";
        let recipe = parse_recipe_block(block).unwrap();
        assert_eq!(recipe.ingredients.len(), 1);
        assert_eq!(recipe.ingredients[0].name, "盐");
        assert_eq!(recipe.steps.len(), 1);
        assert_eq!(recipe.steps[0].description, "第一步");
    }

    #[test]
    fn test_lines_before_any_section_are_ignored() {
        let block = format!("- 孤立 1个\n1. 孤立步骤\n{}", MINIMAL);
        let recipe = parse_recipe_block(&block).unwrap();
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.steps.len(), 2);
    }

    #[test]
    fn test_english_headings() {
        let block = "## Pancakes
**Category**: Breakfast
### Ingredients
- flour 200g
### Steps
1. Mix and fry";
        let recipe = parse_recipe_block(block).unwrap();
        assert_eq!(recipe.category, "Breakfast");
        assert_eq!(recipe.ingredients[0].unit, "g");
        assert_eq!(recipe.steps[0].description, "Mix and fry");
    }

    #[test]
    fn test_description_on_next_line() {
        let block = format!("{}\n**简介**:\n经典家常菜", MINIMAL);
        let recipe = parse_recipe_block(&block).unwrap();
        assert_eq!(recipe.description.as_deref(), Some("经典家常菜"));
    }

    #[test]
    fn test_multiline_notes_stop_at_structure() {
        let block = "## 测试
**分类**: 测试
**小贴士**:
火候要小
盐最后放
### 食材
- 盐 1克
### 步骤
1. 做";
        let recipe = parse_recipe_block(block).unwrap();
        assert_eq!(recipe.notes.as_deref(), Some("火候要小\n盐最后放"));
    }

    #[test]
    fn test_empty_notes_at_end_is_none() {
        let block = format!("{}\n**小贴士**:", MINIMAL);
        let recipe = parse_recipe_block(&block).unwrap();
        assert_eq!(recipe.notes, None);
        assert_eq!(recipe.description, None);
    }

    #[test]
    fn test_unparsable_difficulty_defaults() {
        let block = MINIMAL.replace("**难度**: 1", "**难度**: 很难");
        assert_eq!(parse_recipe_block(&block).unwrap().difficulty, 1);
    }

    #[test]
    fn test_missing_difficulty_defaults() {
        let block = MINIMAL.replace("**难度**: 1\n", "");
        assert_eq!(parse_recipe_block(&block).unwrap().difficulty, 1);
    }

    #[test]
    fn test_missing_category_rejected() {
        let block = MINIMAL.replace("**分类**: 家常菜\n", "");
        assert!(parse_recipe_block(&block).is_none());
    }

    #[test]
    fn test_missing_name_rejected() {
        let block = MINIMAL.replace("## 番茄炒蛋\n", "");
        assert!(parse_recipe_block(&block).is_none());
    }

    #[test]
    fn test_steps_that_all_fail_reject_recipe() {
        let block = MINIMAL
            .replace("1. 打散鸡蛋。", "1. [计时]")
            .replace("2. 炒熟出锅。", "2.");
        assert!(parse_recipe_block(&block).is_none());
    }

    #[test]
    fn test_markdown_rendering_reparses_equal() {
        let block = "## 红烧肉
**分类**: 硬菜
**难度**: 3
**准备时间**: 15分钟
**烹饪时间**: 60 分钟
**份数**: 4
**标签**: #下饭 #宴客
**简介**: 肥而不腻
### 食材
- 五花肉 500g (约一斤)
- 冰糖 30克
- 桂皮 适量 [可选]
### 步骤
1. 焯水(5 分钟)
2. 炒糖色 [计时]
3. 小火炖煮(45 分钟)[计时]
**小贴士**:
糖色别炒糊
收汁要快";
        let original = parse_recipe_block(block).unwrap();
        let rendered = original.to_markdown();
        let reparsed = parse_recipe_markdown(&rendered);
        assert_eq!(reparsed, vec![original]);
    }
}

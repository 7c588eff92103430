use serde::{Deserialize, Serialize};

/// A recipe extracted from one block of import text.
///
/// Records are created fresh by every parse call and handed once to the
/// importer. A value of this type always has a non-empty name, category,
/// ingredient list and step list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRecipe {
    pub name: String,
    pub category: String,
    pub difficulty: u32,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    /// In order of appearance on the tag line
    pub tags: Vec<String>,
    pub description: Option<String>,
    /// May span several lines, joined with `\n`
    pub notes: Option<String>,
    pub ingredients: Vec<ParsedIngredient>,
    pub steps: Vec<ParsedStep>,
}

/// One bullet line of an ingredient section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIngredient {
    pub name: String,
    /// Literal quantity text such as `"3"`, `"0.5"` or `"适量"`.
    ///
    /// Numeric coercion happens in the importer, never here.
    pub amount: String,
    pub unit: String,
    pub optional: bool,
}

/// One numbered line of a step section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedStep {
    pub description: String,
    /// Minutes
    pub duration: Option<u32>,
    pub is_timer_enabled: bool,
}

impl ParsedRecipe {
    /// Render the recipe back into the import text format.
    ///
    /// Parsing the output yields a record equal to `self`.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("## {}\n", self.name));
        out.push_str(&format!("**分类**: {}\n", self.category));
        out.push_str(&format!("**难度**: {}\n", self.difficulty));
        if let Some(prep) = self.prep_time {
            out.push_str(&format!("**准备时间**: {} 分钟\n", prep));
        }
        if let Some(cook) = self.cook_time {
            out.push_str(&format!("**烹饪时间**: {} 分钟\n", cook));
        }
        if let Some(servings) = self.servings {
            out.push_str(&format!("**份数**: {}\n", servings));
        }
        if !self.tags.is_empty() {
            let tags: Vec<String> = self.tags.iter().map(|t| format!("#{}", t)).collect();
            out.push_str(&format!("**标签**: {}\n", tags.join(" ")));
        }
        if let Some(description) = &self.description {
            out.push_str(&format!("**简介**: {}\n", description));
        }

        out.push_str("\n### 食材\n");
        for ingredient in &self.ingredients {
            out.push_str(&format!("- {}\n", ingredient.to_line()));
        }

        out.push_str("\n### 步骤\n");
        for (index, step) in self.steps.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", index + 1, step.to_line()));
        }

        if let Some(notes) = &self.notes {
            out.push_str("\n**小贴士**:\n");
            out.push_str(notes);
            out.push('\n');
        }

        out
    }
}

impl ParsedIngredient {
    fn to_line(&self) -> String {
        let mut line = format!("{} {}{}", self.name, self.amount, self.unit);
        if self.optional {
            line.push_str(" [可选]");
        }
        line
    }
}

impl ParsedStep {
    fn to_line(&self) -> String {
        let mut line = self.description.clone();
        if let Some(minutes) = self.duration {
            line.push_str(&format!("({} 分钟)", minutes));
        }
        if self.is_timer_enabled {
            line.push_str("[计时]");
        }
        line
    }
}

use crate::model::ParsedStep;
use regex::Regex;
use std::sync::LazyLock;

static STEP_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+\.\s*").unwrap());

static TIMER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[(?:计时|timer)\]").unwrap());

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[(（]\s*([0-9]+)\s*(?:分钟|minutes?|mins?)\s*[)）]").unwrap()
});

/// True for lines that open with `<integer>.`
pub fn is_numbered(line: &str) -> bool {
    STEP_NUMBER.is_match(line)
}

/// Parse a numbered line into a step.
///
/// Format: `<n>. <description> (<minutes> 分钟) [计时]`. Duration and timer
/// are independent. Returns `None` when nothing but markers remain.
pub fn parse_step(line: &str) -> Option<ParsedStep> {
    let text = STEP_NUMBER.replace(line.trim(), "").into_owned();

    let is_timer_enabled = TIMER_MARKER.is_match(&text);
    let mut text = TIMER_MARKER.replace_all(&text, "").into_owned();

    let duration = DURATION
        .captures(&text)
        .and_then(|caps| caps[1].parse().ok());
    if duration.is_some() {
        text = DURATION.replace(&text, "").into_owned();
    }

    let description = text.trim();
    if description.is_empty() {
        return None;
    }

    Some(ParsedStep {
        description: description.to_string(),
        duration,
        is_timer_enabled,
    })
}

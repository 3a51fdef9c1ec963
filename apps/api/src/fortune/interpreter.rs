//! Fortune response interpreter — turns one opaque text blob from the
//! generator into a score table plus a sectioned narrative.
//!
//! Interpretation is a pure function of its input. Malformed or partial
//! input degrades to empty/placeholder results — it never errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Opening marker of the machine-readable score region.
pub const SCORE_BLOCK_OPEN: &str = "[SCORES]";
/// Closing marker of the machine-readable score region.
pub const SCORE_BLOCK_CLOSE: &str = "[/SCORES]";

/// Shown for a category whose section is absent from the narrative.
///
/// This is the product's loading fallback, not an error — callers display it
/// verbatim whenever a requested section cannot be found.
pub const SECTION_PLACEHOLDER: &str = "운세 정보를 불러오는 중입니다...";

/// The four fixed category tabs, in display order.
pub const CATEGORY_LABELS: [&str; 4] = ["총운", "애정운", "금전운", "학업운"];

/// Category label → integer score. The generator is instructed to stay in
/// 0–100, but out-of-range values pass through unclamped.
pub type ScoreTable = BTreeMap<String, i64>;

/// A fully interpreted fortune: the narrative with the score block removed,
/// plus whatever scores the block yielded (empty when no block was found).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FortuneDocument {
    pub narrative: String,
    pub scores: ScoreTable,
}

/// One narrative section keyed by its category tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySection {
    pub category: String,
    pub text: String,
}

/// Interprets one raw generator response into a `FortuneDocument`.
pub fn interpret(raw: &str) -> FortuneDocument {
    match extract_score_block(raw) {
        Some((region, narrative)) => FortuneDocument {
            scores: parse_score_lines(&region),
            narrative,
        },
        None => FortuneDocument {
            narrative: raw.to_string(),
            scores: ScoreTable::new(),
        },
    }
}

/// Returns the first blank-line-separated narrative block containing `label`,
/// or the loading placeholder when no block matches.
pub fn section<'a>(narrative: &'a str, label: &str) -> &'a str {
    narrative
        .split("\n\n")
        .find(|block| block.contains(label))
        .unwrap_or(SECTION_PLACEHOLDER)
}

/// Section lookup for each fixed category tab, in display order.
pub fn category_sections(narrative: &str) -> Vec<CategorySection> {
    CATEGORY_LABELS
        .iter()
        .map(|label| CategorySection {
            category: (*label).to_string(),
            text: section(narrative, label).to_string(),
        })
        .collect()
}

/// Splits the raw text into the score region and the remaining narrative.
/// Returns `None` unless both delimiters are present, in order.
fn extract_score_block(raw: &str) -> Option<(String, String)> {
    let open = raw.find(SCORE_BLOCK_OPEN)?;
    let after_open = open + SCORE_BLOCK_OPEN.len();
    let close = after_open + raw[after_open..].find(SCORE_BLOCK_CLOSE)?;

    let region = raw[after_open..close].to_string();

    let before = &raw[..open];
    // The block and its immediately trailing blank lines vanish from the narrative.
    let after = raw[close + SCORE_BLOCK_CLOSE.len()..].trim_start_matches(['\r', '\n']);
    Some((region, format!("{before}{after}")))
}

/// Builds the score table from the extracted region: one `label ":" digits`
/// entry per line, in line order, so duplicate labels resolve last-write-wins.
fn parse_score_lines(region: &str) -> ScoreTable {
    let mut scores = ScoreTable::new();
    for line in region.lines() {
        if let Some((label, value)) = parse_score_line(line) {
            scores.insert(label.to_string(), value);
        }
    }
    scores
}

/// Matches `label ":" whitespace* digits`. The label is one or more
/// non-whitespace characters of any script. Anything else is no match —
/// the line is silently skipped.
fn parse_score_line(line: &str) -> Option<(&str, i64)> {
    let (label, rest) = line.split_once(':')?;
    if label.is_empty() || label.contains(char::is_whitespace) {
        return None;
    }
    let digits = rest.trim();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i64>().ok().map(|value| (label, value))
}

//! Post-processing of raw model output into a caption the platform accepts.

use crate::platform::Platform;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalCaption {
    pub text: String,
    pub hashtags: Vec<String>,
}

impl fmt::Display for FinalCaption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Split hashtags from the body, clean the body for the platform, keep the first
/// `hashtag_limit` hashtags and reassemble as `body\n\nhashtags`.
///
/// Never fails. Output longer than the platform limit is cut at a word boundary.
pub fn normalize_caption(raw: &str, platform: impl Into<Platform>) -> FinalCaption {
    let platform = platform.into();

    let (hashtags, body_tokens) = split_hashtags(raw, platform);
    let body = collapse_whitespace(&body_tokens.join(" "));
    let hashtags: Vec<String> = hashtags
        .into_iter()
        .take(platform.hashtag_limit())
        .collect();

    let (body, hashtags) = fit_to_length(body, hashtags, platform.max_length());
    FinalCaption {
        text: assemble(&body, &hashtags),
        hashtags,
    }
}

/// Partition tokens into hashtags and cleaned body tokens, both in input order.
///
/// Cleanup runs per token before the hashtag check, so a hashtag glued to a stripped
/// emoji ("\u{1F680}#launch") lands with the hashtags instead of in the body.
fn split_hashtags(raw: &str, platform: Platform) -> (Vec<String>, Vec<String>) {
    let mut hashtags = Vec::new();
    let mut body = Vec::new();
    for token in raw.split_whitespace() {
        if token.starts_with('#') {
            hashtags.push(token.to_string());
            continue;
        }
        let cleaned = platform.clean_body(token);
        if cleaned.starts_with('#') {
            hashtags.push(cleaned);
        } else if !cleaned.trim().is_empty() {
            body.push(cleaned);
        }
    }
    (hashtags, body)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn assemble(body: &str, hashtags: &[String]) -> String {
    let tags = hashtags.join(" ");
    format!("{body}\n\n{tags}").trim().to_string()
}

fn fit_to_length(
    body: String,
    mut hashtags: Vec<String>,
    max_length: usize,
) -> (String, Vec<String>) {
    if assemble(&body, &hashtags).chars().count() <= max_length {
        return (body, hashtags);
    }

    // The hashtag block plus its blank-line separator must leave room in the limit.
    while !hashtags.is_empty() && tag_block_len(&hashtags) + 2 > max_length {
        hashtags.pop();
    }
    let budget = if hashtags.is_empty() {
        max_length
    } else {
        max_length - tag_block_len(&hashtags) - 2
    };

    (truncate_at_word(&body, budget), hashtags)
}

fn tag_block_len(hashtags: &[String]) -> usize {
    hashtags.iter().map(|t| t.chars().count()).sum::<usize>() + hashtags.len().saturating_sub(1)
}

fn truncate_at_word(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }

    let cut = text
        .char_indices()
        .nth(budget)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let prefix = &text[..cut];

    if text[cut..].starts_with(char::is_whitespace) {
        return prefix.trim_end().to_string();
    }
    match prefix.rfind(char::is_whitespace) {
        Some(i) => prefix[..i].trim_end().to_string(),
        // A single word longer than the budget is cut hard.
        None => prefix.to_string(),
    }
}

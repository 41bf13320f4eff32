//! Webpage summaries. The front-end sends the page text it already has; the model
//! answers in JSON.

use crate::completion::{CompletionError, CompletionService, ResponseFormat};
use serde::{Deserialize, Serialize};

pub const MAX_CONTENT_CHARS: usize = 12_000;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

pub fn build_summary_prompt(page: &PageContent) -> String {
    let content: String = page.content.trim().chars().take(MAX_CONTENT_CHARS).collect();
    let mut source = String::new();
    if let Some(title) = page.title.as_deref().filter(|t| !t.trim().is_empty()) {
        source.push_str(&format!("Title: {}\n", title.trim()));
    }
    if let Some(url) = page.url.as_deref().filter(|u| !u.trim().is_empty()) {
        source.push_str(&format!("URL: {}\n", url.trim()));
    }

    format!(
        "Summarize the following webpage for a marketing team.\n\n\
{source}\
Content:\n{content}\n\n\
Respond with JSON only, using exactly this shape:\n\
{{\"summary\": \"2-3 sentence summary\", \"keyPoints\": [\"point\", \"point\", \"point\"]}}"
    )
}

pub async fn summarize_page(
    service: &dyn CompletionService,
    page: &PageContent,
) -> Result<PageSummary, CompletionError> {
    let prompt = build_summary_prompt(page);
    tracing::info!(
        url = page.url.as_deref().unwrap_or("-"),
        content_chars = page.content.chars().count(),
        "summarizing page"
    );
    let raw = service.complete_text(&prompt, ResponseFormat::Json).await?;
    parse_summary(&raw)
}

pub fn parse_summary(raw: &str) -> Result<PageSummary, CompletionError> {
    let json = strip_code_fence(raw);
    let mut summary: PageSummary = serde_json::from_str(json)
        .map_err(|e| CompletionError::MalformedCompletion(format!("summary is not valid JSON: {e}")))?;

    summary.summary = summary.summary.trim().to_string();
    if summary.summary.is_empty() {
        return Err(CompletionError::MalformedCompletion("summary is empty".into()));
    }
    summary.key_points = summary
        .key_points
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    Ok(summary)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence.
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json() {
        let s = parse_summary(r#"{"summary":" A page. ","keyPoints":["one"," ","two"]}"#).unwrap();
        assert_eq!(s.summary, "A page.");
        assert_eq!(s.key_points, vec!["one", "two"]);
    }

    #[test]
    fn parses_fenced_json() {
        let raw = "```json\n{\"summary\":\"Fenced\"}\n```";
        let s = parse_summary(raw).unwrap();
        assert_eq!(s.summary, "Fenced");
        assert!(s.key_points.is_empty());
    }

    #[test]
    fn rejects_non_json_and_empty_summary() {
        assert!(matches!(
            parse_summary("Here is your summary"),
            Err(CompletionError::MalformedCompletion(_))
        ));
        assert!(matches!(
            parse_summary(r#"{"summary":""}"#),
            Err(CompletionError::MalformedCompletion(_))
        ));
    }

    #[test]
    fn prompt_includes_metadata_and_caps_content() {
        let page = PageContent {
            url: Some("https://example.com".into()),
            title: Some("Example".into()),
            content: "x".repeat(MAX_CONTENT_CHARS + 500),
        };
        let prompt = build_summary_prompt(&page);
        assert!(prompt.contains("Title: Example"));
        assert!(prompt.contains("URL: https://example.com"));
        assert!(!prompt.contains(&"x".repeat(MAX_CONTENT_CHARS + 1)));
        assert!(prompt.contains("keyPoints"));
    }
}

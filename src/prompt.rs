use crate::platform::{Platform, TemplateVars};
use serde::{Deserialize, Serialize};

pub const DEFAULT_COMPANY_CONTEXT: &str = "a business";

/// A caption request as sent by the front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionRequest {
    pub platform: String,
    pub topic: String,
    #[serde(default)]
    pub company_context: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
}

impl CaptionRequest {
    pub fn platform(&self) -> Platform {
        Platform::from_name(&self.platform)
    }

    pub fn build_prompt(&self) -> BuiltPrompt {
        build_prompt(
            self.platform(),
            &self.topic,
            self.company_context.as_deref(),
            self.tone.as_deref(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltPrompt {
    pub platform: Platform,
    pub prompt: String,
    pub max_length: usize,
}

/// Render the model prompt for `platform`. Always succeeds; unknown platforms use the
/// generic rule. Blank context or tone count as absent.
pub fn build_prompt(
    platform: impl Into<Platform>,
    topic: &str,
    company_context: Option<&str>,
    tone: Option<&str>,
) -> BuiltPrompt {
    let platform = platform.into();
    let rule = platform.rule();

    let vars = TemplateVars {
        topic: topic.trim(),
        company_context: non_blank(company_context).unwrap_or(DEFAULT_COMPANY_CONTEXT),
        tone: non_blank(tone).unwrap_or(rule.default_tone),
    };

    BuiltPrompt {
        platform,
        prompt: (rule.template)(&vars),
        max_length: rule.max_length,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

//! Target platforms and their caption rules.
//!
//! Platform names coming from the UI are free text ("LinkedIn", "Twitter/X", "X (Twitter)").
//! They are resolved once into [`Platform`] and every other decision looks at the rule table.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    LinkedIn,
    Twitter,
    Instagram,
    Facebook,
    Generic,
}

/// Values handed to a platform template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateVars<'a> {
    pub topic: &'a str,
    pub company_context: &'a str,
    pub tone: &'a str,
}

/// A `(pattern -> replacement)` text rewrite applied to the caption body.
pub struct CleanupRule {
    pub pattern: &'static str,
    pub replacement: &'static str,
}

pub struct PlatformRule {
    pub platform: Platform,
    /// Matched anywhere in the lowercased name.
    pub names: &'static [&'static str],
    /// Short forms, matched only as a whole token.
    pub aliases: &'static [&'static str],
    pub max_length: usize,
    pub hashtag_limit: usize,
    pub default_tone: &'static str,
    pub template: fn(&TemplateVars<'_>) -> String,
    pub cleanup: &'static [CleanupRule],
}

// Emoji that read as unprofessional in a LinkedIn post.
const LINKEDIN_EMOJI: &str = "[\u{1F680}\u{1F525}\u{1F4AF}\u{1F389}\u{1F38A}\u{2728}\u{1F31F}\u{2B50}\u{1F4A5}\u{1F44D}\u{1F44F}\u{1F64C}\u{1F4AA}\u{1F449}\u{1F447}\u{1F60A}\u{1F600}\u{1F601}\u{1F602}\u{1F923}\u{1F60D}\u{1F929}\u{1F60E}\u{2764}\u{FE0F}]";

static LINKEDIN_CLEANUP: [CleanupRule; 2] = [
    CleanupRule { pattern: LINKEDIN_EMOJI, replacement: "" },
    CleanupRule { pattern: "!+", replacement: "." },
];

/// Rules in match priority order. `Generic` is last and matches anything.
pub static RULES: [PlatformRule; 5] = [
    PlatformRule {
        platform: Platform::LinkedIn,
        names: &["linkedin"],
        aliases: &[],
        max_length: 3000,
        hashtag_limit: 5,
        default_tone: "Professional, insightful",
        template: linkedin_template,
        cleanup: &LINKEDIN_CLEANUP,
    },
    PlatformRule {
        platform: Platform::Twitter,
        names: &["twitter"],
        aliases: &["x", "tweet"],
        max_length: 280,
        hashtag_limit: 2,
        default_tone: "Conversational, punchy",
        template: twitter_template,
        cleanup: &[],
    },
    PlatformRule {
        platform: Platform::Instagram,
        names: &["instagram"],
        aliases: &["ig", "insta"],
        max_length: 2200,
        hashtag_limit: 30,
        default_tone: "Authentic, relatable",
        template: instagram_template,
        cleanup: &[],
    },
    PlatformRule {
        platform: Platform::Facebook,
        names: &["facebook"],
        aliases: &["fb"],
        max_length: 500,
        hashtag_limit: 3,
        default_tone: "Friendly, engaging",
        template: facebook_template,
        cleanup: &[],
    },
    PlatformRule {
        platform: Platform::Generic,
        names: &[],
        aliases: &[],
        max_length: 300,
        hashtag_limit: 5,
        default_tone: "Engaging",
        template: generic_template,
        cleanup: &[],
    },
];

static COMPILED_CLEANUP: Lazy<Vec<Vec<(Regex, &'static str)>>> = Lazy::new(|| {
    RULES
        .iter()
        .map(|rule| {
            rule.cleanup
                .iter()
                .map(|c| {
                    let re = Regex::new(c.pattern).expect("cleanup patterns are static and valid");
                    (re, c.replacement)
                })
                .collect()
        })
        .collect()
});

impl Platform {
    /// Resolve a free-form platform name. Never fails: unknown names map to `Generic`.
    ///
    /// Full platform names match anywhere in the name ("MyLinkedIn", "twitterads"). Short
    /// aliases must be a whole token, so "Twitter/X" is Twitter while "Vox" is not.
    pub fn from_name(name: &str) -> Self {
        let lowered = name.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();

        RULES
            .iter()
            .find(|rule| {
                rule.names.iter().any(|n| lowered.contains(*n))
                    || rule.aliases.iter().any(|alias| tokens.contains(alias))
            })
            .map(|rule| rule.platform)
            .unwrap_or(Platform::Generic)
    }

    pub fn rule(self) -> &'static PlatformRule {
        &RULES[self.index()]
    }

    pub fn max_length(self) -> usize {
        self.rule().max_length
    }

    pub fn hashtag_limit(self) -> usize {
        self.rule().hashtag_limit
    }

    /// Apply this platform's cleanup rules in order.
    pub fn clean_body(self, body: &str) -> String {
        COMPILED_CLEANUP[self.index()]
            .iter()
            .fold(body.to_string(), |text, (re, replacement)| {
                re.replace_all(&text, *replacement).into_owned()
            })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::LinkedIn => "LinkedIn",
            Platform::Twitter => "Twitter",
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::Generic => "Generic",
        }
    }

    fn index(self) -> usize {
        match self {
            Platform::LinkedIn => 0,
            Platform::Twitter => 1,
            Platform::Instagram => 2,
            Platform::Facebook => 3,
            Platform::Generic => 4,
        }
    }
}

impl From<&str> for Platform {
    fn from(name: &str) -> Self {
        Platform::from_name(name)
    }
}

impl From<&String> for Platform {
    fn from(name: &String) -> Self {
        Platform::from_name(name)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -------------------------------------------------------------------
// Templates

fn linkedin_template(v: &TemplateVars<'_>) -> String {
    format!(
        "Write a LinkedIn post for {company} about: {topic}\n\n\
Tone: {tone}\n\n\
Requirements:\n\
- Open with a strong hook in the first line\n\
- 3 to 5 short paragraphs separated by blank lines\n\
- Share a concrete insight or lesson, not generic advice\n\
- End with a question or call to action that invites comments\n\
- No emoji and no exclamation marks\n\
- Add 3 to 5 relevant hashtags on the last line\n\
- Stay under 3000 characters\n\n\
Return only the post text.",
        company = v.company_context,
        topic = v.topic,
        tone = v.tone,
    )
}

fn twitter_template(v: &TemplateVars<'_>) -> String {
    format!(
        "Write a single tweet for {company} about: {topic}\n\n\
Tone: {tone}\n\n\
Requirements:\n\
- Maximum 280 characters including hashtags\n\
- One clear message, no thread\n\
- At most 2 hashtags, placed at the end\n\n\
Return only the tweet text.",
        company = v.company_context,
        topic = v.topic,
        tone = v.tone,
    )
}

fn instagram_template(v: &TemplateVars<'_>) -> String {
    format!(
        "Write an Instagram caption for {company} about: {topic}\n\n\
Tone: {tone}\n\n\
Requirements:\n\
- Start with an attention-grabbing first line\n\
- Short, scannable lines; emoji are welcome\n\
- Include a call to action (save, share or comment)\n\
- Finish with 10 to 15 relevant hashtags\n\
- Stay under 2200 characters\n\n\
Return only the caption text.",
        company = v.company_context,
        topic = v.topic,
        tone = v.tone,
    )
}

fn facebook_template(v: &TemplateVars<'_>) -> String {
    format!(
        "Write a Facebook post for {company} about: {topic}\n\n\
Tone: {tone}\n\n\
Requirements:\n\
- Conversational and community focused\n\
- 2 or 3 short paragraphs\n\
- Ask the audience a question to start a discussion\n\
- At most 3 hashtags\n\
- Stay under 500 characters\n\n\
Return only the post text.",
        company = v.company_context,
        topic = v.topic,
        tone = v.tone,
    )
}

fn generic_template(v: &TemplateVars<'_>) -> String {
    format!(
        "Write a short social media caption for {company} about: {topic}\n\
Tone: {tone}\n\
Keep it under 300 characters. Return only the caption text.",
        company = v.company_context,
        topic = v.topic,
        tone = v.tone,
    )
}

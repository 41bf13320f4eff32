//! Platform-aware social caption generation on top of the Gemini API.
//!
//! [`prompt::build_prompt`] turns a topic into a platform-specific prompt,
//! [`completion::CompletionService`] sends it upstream and
//! [`caption::normalize_caption`] shapes the reply to fit the platform.

pub mod api;
pub mod caption;
pub mod completion;
pub mod config;
pub mod pipeline;
pub mod platform;
pub mod prompt;
pub mod summary;

pub use caption::{normalize_caption, FinalCaption};
pub use completion::{CompletionError, CompletionService, GeminiClient, ResponseFormat};
pub use platform::Platform;
pub use prompt::{build_prompt, BuiltPrompt, CaptionRequest};

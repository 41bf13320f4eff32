use crate::caption::{normalize_caption, FinalCaption};
use crate::completion::{CompletionError, CompletionService, ResponseFormat};
use crate::platform::Platform;
use crate::prompt::CaptionRequest;

#[derive(Debug, Clone)]
pub struct GeneratedCaption {
    pub platform: Platform,
    pub caption: FinalCaption,
    pub max_length: usize,
}

/// Prompt the completion service for a caption and post-process the reply.
pub async fn generate_caption(
    service: &dyn CompletionService,
    request: &CaptionRequest,
) -> Result<GeneratedCaption, CompletionError> {
    let built = request.build_prompt();
    tracing::info!(
        platform = %built.platform,
        prompt_chars = built.prompt.chars().count(),
        "generating caption"
    );

    let raw = service
        .complete_text(&built.prompt, ResponseFormat::Text)
        .await?;
    let caption = normalize_caption(&raw, built.platform);

    tracing::debug!(
        platform = %built.platform,
        raw_chars = raw.chars().count(),
        caption_chars = caption.text.chars().count(),
        hashtags = caption.hashtags.len(),
        "caption normalized"
    );
    Ok(GeneratedCaption {
        platform: built.platform,
        caption,
        max_length: built.max_length,
    })
}

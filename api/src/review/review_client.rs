use ai_llm_service::{
    AiLlmError, ChatMessage, GenerateOptions, LlmModelConfig, OpenAiService,
};
use tracing::{info, warn};

/// Result of one generation attempt.
///
/// Generation never aborts a webhook: a failure only changes the text that
/// ends up in the comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewText {
    /// Text produced by the model, already trimmed.
    Generated(String),
    /// The provider call failed; holds the raw error text.
    Failed(String),
}

/// Review-generation client: one `generate` for every event kind.
#[derive(Debug, Clone)]
pub struct ReviewClient {
    llm: OpenAiService,
    options: GenerateOptions,
}

impl ReviewClient {
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let options = GenerateOptions::from_cfg(&cfg);
        Ok(Self {
            llm: OpenAiService::new(cfg)?,
            options,
        })
    }

    /// Sends `messages` to the completion endpoint and absorbs any failure.
    pub async fn generate(&self, messages: &[ChatMessage]) -> ReviewText {
        info!(
            model = %self.llm.config().model,
            messages = messages.len(),
            "requesting review generation"
        );
        match self.llm.generate(messages, &self.options).await {
            Ok(completion) => {
                info!(chars = completion.text.len(), "review generated");
                ReviewText::Generated(completion.text)
            }
            Err(e) => {
                warn!(error = %e, "review generation failed; falling back");
                ReviewText::Failed(e.to_string())
            }
        }
    }
}

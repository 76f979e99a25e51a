/// Represents the provider (backend) used for chat completion requests.
///
/// Both variants speak the same OpenAI chat-completions protocol; they only
/// differ in how the request URL is addressed and how the key is sent.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_provider::LlmProvider;
///
/// fn describe(provider: LlmProvider) -> &'static str {
///     match provider {
///         LlmProvider::OpenAI => "Bearer auth, {base}/chat/completions",
///         LlmProvider::AzureOpenAI => "api-key header, deployment-scoped URL",
///     }
/// }
/// assert_eq!(describe(LlmProvider::OpenAI), "Bearer auth, {base}/chat/completions");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// OpenAI or any OpenAI-compatible API (Groq, vLLM, LiteLLM, ...).
    OpenAI,
    /// Azure OpenAI deployment addressed by `api-version`.
    AzureOpenAI,
}

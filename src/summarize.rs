use log::debug;

use crate::error::{Error, Result};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

const CONCISE_PROMPT: &str = "You are an assistant that provides a concise summary of a YouTube video's captions. \
Try to provide takeaway points on what the video discusses rather than a general explanation of what it is about";

const STRUCTURED_PROMPT: &str = "You are an assistant that summarizes a YouTube video's captions. \
Respond with a one-paragraph overview of the video, followed by a blank line, followed by up to five key points. \
Each key point is a single sentence prefixed with a hyphen and terminated with a period, \
and each is separated from the next by a blank line.";

/// Instruction mode for the generation backend. Selected by the caller,
/// never inferred from the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryMode {
    Concise,
    Structured,
}

impl SummaryMode {
    pub fn system_prompt(&self) -> &'static str {
        match self {
            SummaryMode::Concise => CONCISE_PROMPT,
            SummaryMode::Structured => STRUCTURED_PROMPT,
        }
    }

    /// Response token budget
    pub fn max_tokens(&self) -> u32 {
        match self {
            SummaryMode::Concise => 500,
            SummaryMode::Structured => 1000,
        }
    }
}

/// Completion text returned by the backend, trimmed but otherwise passed
/// through as-is. In Structured mode the accessors split the block into its
/// overview and key points; the block itself is never validated or rewritten.
#[derive(Debug, Clone)]
pub struct Summary {
    text: String,
}

impl Summary {
    pub fn new(text: String) -> Self {
        Self { text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// First block of text, up to the first blank line
    pub fn overview(&self) -> String {
        self.text
            .lines()
            .take_while(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Hyphen-prefixed key-point lines, in order
    pub fn key_points(&self) -> Vec<&str> {
        self.text
            .lines()
            .filter_map(|line| line.trim().strip_prefix("- "))
            .collect()
    }
}

/// Generation-backend capability: given a system instruction, user content
/// and a token budget, return a single completion string. Any backend
/// satisfying this is substitutable, which keeps tests deterministic.
#[allow(async_fn_in_trait)]
pub trait Complete {
    async fn complete(&self, system: &str, user: &str, max_tokens: u32) -> Result<String>;
}

/// OpenAI chat-completions backend. Credentials come from the process
/// environment, read once per request by the caller.
#[derive(Debug)]
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_key: String,
    project_id: Option<String>,
    model: String,
}

impl OpenAiBackend {
    pub fn new(client: reqwest::Client, api_key: String, project_id: Option<String>, model: String) -> Self {
        Self {
            client,
            api_key,
            project_id,
            model,
        }
    }

    pub fn from_env(client: reqwest::Client, model: &str) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| Error::Summarization("OPENAI_API_KEY environment variable not set".to_string()))?;
        let project_id = std::env::var("OPENAI_PROJECT_ID").ok();
        Ok(Self::new(client, api_key, project_id, model.to_string()))
    }
}

impl Complete for OpenAiBackend {
    async fn complete(&self, system: &str, user: &str, max_tokens: u32) -> Result<String> {
        debug!("Requesting completion from {} (max_tokens={max_tokens})", self.model);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "max_tokens": max_tokens,
        });

        let mut request = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json");
        if let Some(ref project) = self.project_id {
            request = request.header("OpenAI-Project", project);
        }

        let resp = request
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Summarization(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Summarization(format!("backend returned {status}: {body}")));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| Error::Summarization(e.to_string()))?;
        Ok(extract_completion(&json))
    }
}

/// Unwrap the completion text from a chat response. A response with no
/// content is an empty string, not an error.
fn extract_completion(json: &serde_json::Value) -> String {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Summarize a transcript via the generation backend. The transcript is sent
/// verbatim as the user message; no chunking or truncation happens here.
pub async fn summarize<B: Complete>(backend: &B, transcript: &str, mode: SummaryMode) -> Result<Summary> {
    debug!("Summarizing {} chars in {mode:?} mode", transcript.len());
    let text = backend
        .complete(mode.system_prompt(), transcript, mode.max_tokens())
        .await?;
    Ok(Summary::new(text.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubBackend {
        reply: &'static str,
    }

    impl Complete for StubBackend {
        async fn complete(&self, _system: &str, _user: &str, _max_tokens: u32) -> Result<String> {
            Ok(self.reply.to_string())
        }
    }

    #[test]
    fn test_mode_budgets() {
        assert_eq!(SummaryMode::Concise.max_tokens(), 500);
        assert_eq!(SummaryMode::Structured.max_tokens(), 1000);
    }

    #[test]
    fn test_mode_prompts_differ() {
        assert_ne!(SummaryMode::Concise.system_prompt(), SummaryMode::Structured.system_prompt());
        assert!(SummaryMode::Structured.system_prompt().contains("five key points"));
    }

    #[test]
    fn test_extract_completion() {
        let json = serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "Summary of the video." } }
            ]
        });
        assert_eq!(extract_completion(&json), "Summary of the video.");
    }

    #[test]
    fn test_extract_completion_empty_choices() {
        let json = serde_json::json!({ "choices": [] });
        assert_eq!(extract_completion(&json), "");
    }

    #[test]
    fn test_extract_completion_null_content() {
        let json = serde_json::json!({
            "choices": [ { "message": { "role": "assistant", "content": null } } ]
        });
        assert_eq!(extract_completion(&json), "");
    }

    #[tokio::test]
    async fn test_summarize_trims_whitespace() {
        let backend = StubBackend { reply: "  the summary  \n" };
        let summary = summarize(&backend, "transcript", SummaryMode::Concise).await.unwrap();
        assert_eq!(summary.text(), "the summary");
    }

    #[tokio::test]
    async fn test_summarize_empty_completion_is_not_an_error() {
        let backend = StubBackend { reply: "" };
        let summary = summarize(&backend, "transcript", SummaryMode::Structured).await.unwrap();
        assert_eq!(summary.text(), "");
    }

    #[test]
    fn test_from_env_missing_key_is_summarization_error() {
        // Removing the key makes construction fail the same way a backend
        // call would, so the caller's two-state collapse applies to it
        unsafe { std::env::remove_var("OPENAI_API_KEY") };
        let err = OpenAiBackend::from_env(reqwest::Client::new(), DEFAULT_MODEL).unwrap_err();
        assert!(matches!(err, Error::Summarization(_)));
    }

    #[test]
    fn test_summary_accessors() {
        let summary = Summary::new(
            "An overview paragraph.\n\n- First point.\n\n- Second point.".to_string(),
        );
        assert_eq!(summary.overview(), "An overview paragraph.");
        assert_eq!(summary.key_points(), vec!["First point.", "Second point."]);
    }

    #[test]
    fn test_summary_accessors_crlf() {
        let summary = Summary::new(
            "An overview paragraph.\r\n\r\n- First point.\r\n\r\n- Second point.".to_string(),
        );
        assert_eq!(summary.overview(), "An overview paragraph.");
        assert_eq!(summary.key_points(), vec!["First point.", "Second point."]);
    }

    #[test]
    fn test_summary_accessors_freeform() {
        let summary = Summary::new("Just a takeaway blob.".to_string());
        assert_eq!(summary.overview(), "Just a takeaway blob.");
        assert!(summary.key_points().is_empty());
    }
}

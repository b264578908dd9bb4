// [libs/infra/backend-client/src/request.rs]
//! Wire types for the loopback call to a supervised backend's native
//! completion endpoint (llama.cpp's `llama-server` `/completion` shape, not
//! the OpenAI-compatible surface — that adaptation lives in the out-of-scope
//! HTTP handlers per §1).

use serde::{Deserialize, Serialize};

/// A single inference call against one already-running backend.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    /// Sorted or unsorted caller params (`temperature`, `top_p`, ...); the
    /// client only interprets the handful it forwards by name below.
    pub params: Vec<(String, String)>,
    pub max_tokens: u32,
    pub stream: bool,
}

impl CompletionRequest {
    fn param(&self, key: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub(crate) fn temperature(&self) -> f32 {
        self.param("temperature").and_then(|v| v.parse().ok()).unwrap_or(0.8)
    }

    pub(crate) fn top_p(&self) -> f32 {
        self.param("top_p").and_then(|v| v.parse().ok()).unwrap_or(0.95)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct WireRequest<'a> {
    pub prompt: &'a str,
    pub n_predict: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub stream: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    pub fn total(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self { prompt_tokens, completion_tokens, total_tokens: prompt_tokens + completion_tokens }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireTimings {
    #[serde(default)]
    pub prompt_n: u32,
    #[serde(default)]
    pub predicted_n: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireResponse {
    pub content: String,
    #[serde(default)]
    pub timings: Option<WireTimings>,
    #[serde(default)]
    pub tokens_predicted: Option<u32>,
    #[serde(default)]
    pub tokens_evaluated: Option<u32>,
}

impl WireResponse {
    pub fn usage(&self) -> Usage {
        if let Some(timings) = &self.timings {
            return Usage::total(timings.prompt_n, timings.predicted_n);
        }
        Usage::total(self.tokens_evaluated.unwrap_or(0), self.tokens_predicted.unwrap_or(0))
    }
}

#[derive(Debug, Clone)]
pub struct CompletionResult {
    pub text: String,
    pub usage: Usage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_and_top_p_fall_back_to_defaults() {
        let req = CompletionRequest { prompt: "hi".into(), params: vec![], max_tokens: 16, stream: false };
        assert_eq!(req.temperature(), 0.8);
        assert_eq!(req.top_p(), 0.95);
    }

    #[test]
    fn explicit_params_override_defaults() {
        let req = CompletionRequest {
            prompt: "hi".into(),
            params: vec![("temperature".to_string(), "0".to_string()), ("top_p".to_string(), "0.5".to_string())],
            max_tokens: 16,
            stream: false,
        };
        assert_eq!(req.temperature(), 0.0);
        assert_eq!(req.top_p(), 0.5);
    }

    #[test]
    fn usage_prefers_timings_over_top_level_token_counts() {
        let response = WireResponse {
            content: "hello".into(),
            timings: Some(WireTimings { prompt_n: 10, predicted_n: 5 }),
            tokens_predicted: Some(999),
            tokens_evaluated: Some(999),
        };
        let usage = response.usage();
        assert_eq!(usage, Usage::total(10, 5));
    }

    #[test]
    fn usage_falls_back_to_top_level_counts_without_timings() {
        let response = WireResponse { content: "hello".into(), timings: None, tokens_predicted: Some(7), tokens_evaluated: Some(3) };
        assert_eq!(response.usage(), Usage::total(3, 7));
    }
}

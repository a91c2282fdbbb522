use crate::foundation::error::{YardError, YardResult};

/// Environment variables checked for an API key, in order.
pub const API_KEY_VARS: [&str; 4] = [
    "API_KEY",
    "OPENAI_API_KEY",
    "ANTHROPIC_API_KEY",
    "GEMINI_API_KEY",
];

/// Vision model vendor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Anthropic,
    #[default]
    Gemini,
}

impl Provider {
    pub fn name(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
        }
    }

    /// Known model names; the first is the default.
    pub fn models(self) -> &'static [&'static str] {
        match self {
            Self::OpenAi => &["gpt-5", "gpt-5-mini", "gpt-5-nano"],
            Self::Anthropic => &["claude-3.7-sonnet", "claude-3.7"],
            Self::Gemini => &["gemini-2.5-pro", "gemini-1.5-pro", "gemini-1.5-flash"],
        }
    }

    pub fn default_model(self) -> &'static str {
        self.models()[0]
    }
}

/// First non-empty key among [`API_KEY_VARS`], looked up through `lookup`.
pub fn resolve_api_key(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|var| lookup(var))
        .find(|v| !v.trim().is_empty())
}

/// A request for model-based plant identification.
#[derive(Clone, Debug)]
pub struct VisionRequest {
    pub provider: Provider,
    pub model: String,
    pub api_key: Option<String>,
}

impl VisionRequest {
    /// Request for `provider`, using `model` when given and the key from the environment.
    pub fn from_env(provider: Provider, model: Option<String>) -> Self {
        let model = model
            .map(|m| m.trim().to_owned())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| provider.default_model().to_owned());
        Self {
            provider,
            model,
            api_key: resolve_api_key(|k| std::env::var(k).ok()),
        }
    }
}

/// Model-based identification. No vendor client is wired in, so this always fails.
pub fn identify(req: &VisionRequest) -> YardResult<String> {
    tracing::debug!(
        provider = req.provider.name(),
        model = %req.model,
        has_key = req.api_key.is_some(),
        "vision request"
    );
    Err(YardError::validation(format!(
        "API mode is not available ({} / {}); pass items with --items or --items-json",
        req.provider.name(),
        req.model
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_lookup_order() {
        let env = |k: &str| match k {
            "API_KEY" => Some("  ".to_owned()),
            "ANTHROPIC_API_KEY" => Some("a-key".to_owned()),
            "GEMINI_API_KEY" => Some("g-key".to_owned()),
            _ => None,
        };
        assert_eq!(resolve_api_key(env).as_deref(), Some("a-key"));
        assert_eq!(resolve_api_key(|_| None), None);
    }

    #[test]
    fn api_mode_reports_unavailable() {
        let req = VisionRequest {
            provider: Provider::OpenAi,
            model: Provider::OpenAi.default_model().to_owned(),
            api_key: Some("k".into()),
        };
        let err = identify(&req).unwrap_err().to_string();
        assert!(err.contains("not available"), "{err}");
        assert!(err.contains("gpt-5"));
    }
}

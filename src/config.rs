// src/config.rs
//
// Model, sampling and persona values are deployment policy, not mechanism.
// Each adapter endpoint picks one named profile; env vars override the
// defaults per profile.

const STANDARD_SYSTEM_PROMPT: &str = "You are Mira, a friendly and helpful support assistant for Brightdesk, \
a company that helps small businesses automate repetitive work such as invoicing, emails and data entry.\n\
\n\
Your personality:\n\
- Friendly, professional, and empathetic\n\
- Focused on helping small businesses\n\
- Keep responses concise; admit it when you don't know something and offer to connect the visitor with a human\n\
\n\
Response guidelines:\n\
- Answer questions about business automation and how Brightdesk can help\n\
- Offer to schedule a consultation for detailed discussions\n\
- Keep responses under 3 paragraphs and use bullet points when helpful\n\
\n\
If asked about pricing, say: \"Pricing varies based on your specific needs. \
I'd be happy to schedule a free consultation to discuss your requirements and provide accurate pricing.\"\n\
\n\
End every response with: \"Is there anything specific about your business automation needs you'd like to discuss?\"";

const LITE_SYSTEM_PROMPT: &str = "You are Mira, a friendly support assistant for Brightdesk. \
Explain business automation simply. Focus on repetitive tasks like emails and invoices. \
Keep answers short.";

/// One named gateway configuration: which model to call and how.
#[derive(Debug, Clone)]
pub struct ChatProfile {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: String,
}

impl ChatProfile {
    pub fn standard() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 500,
            system_prompt: STANDARD_SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn lite() -> Self {
        Self {
            model: "gpt-5-nano".to_string(),
            temperature: 0.4,
            max_tokens: 150,
            system_prompt: LITE_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Apply `<PREFIX>_MODEL`, `<PREFIX>_TEMPERATURE`, `<PREFIX>_MAX_TOKENS`
    /// and `<PREFIX>_SYSTEM_PROMPT` overrides from the environment.
    fn with_env_overrides(mut self, prefix: &str) -> Self {
        if let Ok(model) = std::env::var(format!("{prefix}_MODEL")) {
            if !model.trim().is_empty() {
                self.model = model;
            }
        }
        if let Some(temperature) = env_parsed(&format!("{prefix}_TEMPERATURE")) {
            self.temperature = temperature;
        }
        if let Some(max_tokens) = env_parsed(&format!("{prefix}_MAX_TOKENS")) {
            self.max_tokens = max_tokens;
        }
        if let Ok(prompt) = std::env::var(format!("{prefix}_SYSTEM_PROMPT")) {
            if !prompt.trim().is_empty() {
                self.system_prompt = prompt;
            }
        }
        self
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(%key, %raw, "ignoring unparseable configuration override");
            None
        }
    }
}

/// The profiles served by this deployment, one per adapter endpoint.
#[derive(Debug, Clone)]
pub struct ChatProfiles {
    pub standard: ChatProfile,
    pub lite: ChatProfile,
}

impl ChatProfiles {
    pub fn from_env() -> Self {
        Self {
            standard: ChatProfile::standard().with_env_overrides("CHAT"),
            lite: ChatProfile::lite().with_env_overrides("CHAT_LITE"),
        }
    }
}

impl Default for ChatProfiles {
    fn default() -> Self {
        Self {
            standard: ChatProfile::standard(),
            lite: ChatProfile::lite(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_differ_in_policy_only() {
        let profiles = ChatProfiles::default();
        assert_ne!(profiles.standard.model, profiles.lite.model);
        assert!(profiles.standard.max_tokens > profiles.lite.max_tokens);
        assert!(profiles.standard.system_prompt.contains("pricing"));
    }
}

use serde::{Deserialize, Serialize};

/// A chat message on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
        }
    }
}

/// Request body for POST /v1/chat/completions.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_unset_sampling_fields() {
        let request = ChatRequest {
            model: "gpt-5-mini".to_string(),
            messages: vec![ChatMessage::user("hi")],
            temperature: None,
            max_completion_tokens: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("temperature").is_none());
        assert!(json.get("max_completion_tokens").is_none());
    }

    #[test]
    fn response_content_is_optional() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let resp: ChatResponse = serde_json::from_str(body).unwrap();
        assert!(resp.choices[0].message.content.is_none());
    }
}

/// Request and response types for the Claude Messages API
use serde::{Deserialize, Serialize};

/// Message request to send to Claude API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRequest {
    /// Model identifier (e.g., "claude-haiku-4-5-20251001")
    pub model: String,

    /// Array of messages in the conversation
    pub messages: Vec<Message>,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// System prompt (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Temperature for sampling (0.0-1.0, optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl MessageRequest {
    /// Single user turn, no system prompt
    pub fn simple_message(model: String, prompt: String, max_tokens: u32) -> Self {
        Self {
            model,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt,
            }],
            max_tokens,
            system: None,
            temperature: None,
        }
    }
}

/// A single message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: String,

    /// Text content of the message
    pub content: String,
}

/// Content block in a response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    /// Any block type the tuner does not use (tool use, thinking, ...)
    #[serde(other)]
    Other,
}

/// Response from Claude API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Unique message ID
    pub id: String,

    /// Role of the responder (always "assistant")
    #[serde(default)]
    pub role: String,

    /// Array of content blocks in the response
    pub content: Vec<ContentBlock>,

    /// Model that generated the response
    #[serde(default)]
    pub model: String,

    /// Reason for stopping generation ("end_turn", "max_tokens", ...)
    #[serde(default)]
    pub stop_reason: Option<String>,

    /// Token usage statistics
    pub usage: Usage,
}

impl MessageResponse {
    /// Text of the first text block, if any
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            ContentBlock::Other => None,
        })
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    /// Number of input tokens
    pub input_tokens: u32,

    /// Number of output tokens
    pub output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_request_serialization() {
        let request = MessageRequest::simple_message(
            "claude-haiku-4-5-20251001".to_string(),
            "Hello".to_string(),
            100,
        );

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("claude-haiku-4-5-20251001"));
        assert!(json.contains(r#""role":"user""#));
        assert!(!json.contains("system"));
        assert!(!json.contains("temperature"));
    }

    #[test]
    fn test_response_first_text_skips_other_blocks() {
        let json = r#"{
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "thinking", "thinking": "hmm"},
                {"type": "text", "text": "{\"converged\": false}"}
            ],
            "model": "claude-haiku-4-5-20251001",
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }"#;

        let response: MessageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.first_text(), Some("{\"converged\": false}"));
    }
}

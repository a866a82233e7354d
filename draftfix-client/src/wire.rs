//! JSON bodies exchanged with the Messages endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct MessagesRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub system: Vec<SystemBlock<'a>>,
    pub messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SystemBlock<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: &'a str,
    pub cache_control: CacheControl,
}

impl<'a> SystemBlock<'a> {
    pub fn cached(text: &'a str) -> Self {
        Self {
            kind: "text",
            text,
            cache_control: CacheControl {
                kind: "ephemeral",
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CacheControl {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct Message<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> Message<'a> {
    pub fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl MessagesResponse {
    /// Text of the first content block, if that block is text.
    pub fn first_text(self) -> Option<String> {
        let first = self.content.into_iter().next()?;
        if first.kind == "text" { first.text } else { None }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn request_marks_system_prompt_cacheable() {
        let req = MessagesRequest {
            model: "m",
            max_tokens: 10,
            system: vec![SystemBlock::cached("be factual")],
            messages: vec![Message::user("hi")],
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "model": "m",
                "max_tokens": 10,
                "system": [{
                    "type": "text",
                    "text": "be factual",
                    "cache_control": {"type": "ephemeral"}
                }],
                "messages": [{"role": "user", "content": "hi"}]
            })
        );
    }

    #[test]
    fn first_text_ignores_later_blocks() {
        let resp: MessagesResponse = serde_json::from_value(json!({
            "content": [
                {"type": "text", "text": "first"},
                {"type": "text", "text": "second"}
            ]
        }))
        .unwrap();
        assert_eq!(resp.first_text().as_deref(), Some("first"));
    }

    #[test]
    fn first_text_requires_text_block() {
        let resp: MessagesResponse = serde_json::from_value(json!({
            "content": [{"type": "tool_use", "id": "x"}]
        }))
        .unwrap();
        assert!(resp.first_text().is_none());

        let empty: MessagesResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.first_text().is_none());
    }
}

//! The completion seam shared by every backend.

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One message of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A chat-style model that answers a system prompt plus one user message.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Return the assistant's text for one exchange.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;

    /// Return the assistant's text for a whole conversation.
    ///
    /// Backends without native multi-message support get the conversation
    /// folded into a single exchange (see [`fold_messages`]).
    async fn chat(&self, messages: &[Message]) -> Result<String> {
        let (system, user) = fold_messages(messages);
        self.complete(&system, &user).await
    }

    /// Provider label, e.g. "deepseek".
    fn provider_name(&self) -> &str;

    /// Model identifier sent to the provider.
    fn model_name(&self) -> &str;
}

/// Join system messages into one system prompt and user messages into one
/// user turn, each separated by a blank line.
pub fn fold_messages(messages: &[Message]) -> (String, String) {
    let join = |role: Role| {
        messages
            .iter()
            .filter(|message| message.role == role)
            .map(|message| message.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    };
    (join(Role::System), join(Role::User))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_keeps_message_order_per_role() {
        let messages = [
            Message::system("rules"),
            Message::user("task"),
            Message::user("chunk 1"),
            Message::system("more rules"),
        ];
        let (system, user) = fold_messages(&messages);
        assert_eq!(system, "rules\n\nmore rules");
        assert_eq!(user, "task\n\nchunk 1");
    }

    #[test]
    fn test_roles_serialize_lowercase() {
        let value = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(value, serde_json::json!({"role": "user", "content": "hi"}));
    }
}

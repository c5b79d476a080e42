use serde::{Deserialize, Serialize};

/// An input item in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InputItem {
    /// A message with role and content
    Message(Message),
}

/// A message with role and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl InputItem {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        InputItem::Message(Message::system(content))
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        InputItem::Message(Message::user(content))
    }

    /// Get the role of this item.
    pub fn role(&self) -> Role {
        match self {
            InputItem::Message(msg) => msg.role,
        }
    }

    /// Get the text content of this item (if any).
    pub fn content(&self) -> Option<String> {
        match self {
            InputItem::Message(msg) => msg.content(),
        }
    }
}

impl Message {
    /// Create a new message with role and text content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Message {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Get the text content of this message (if any).
    pub fn content(&self) -> Option<String> {
        if self.content.is_empty() {
            None
        } else {
            Some(self.content.clone())
        }
    }
}

/// Role of a message participant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
        }
    }
}

/// Reason why generation finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
}

impl FinishReason {
    /// Map a chat-completion `finish_reason` string.
    pub fn from_api(reason: &str) -> Self {
        match reason {
            "length" => FinishReason::Length,
            "content_filter" => FinishReason::ContentFilter,
            _ => FinishReason::Stop,
        }
    }
}

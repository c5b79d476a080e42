use super::message::InputItem;

/// A structured prompt containing a sequence of input items.
#[derive(Debug, Clone)]
pub struct Prompt {
    items: Vec<InputItem>,
}

impl Prompt {
    /// Create a prompt with a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            items: vec![InputItem::system(content)],
        }
    }

    /// Add a user message.
    pub fn with_user(mut self, content: impl Into<String>) -> Self {
        self.items.push(InputItem::user(content));
        self
    }

    /// Get the input items.
    pub fn items(&self) -> &[InputItem] {
        &self.items
    }
}

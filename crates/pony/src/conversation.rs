//! Conversation bookkeeping for a session
//!
//! Keeps the bounded message history sent to the text-generation client and
//! formats its responses for the session terminal.

use textwrap::{Options, WrapAlgorithm};

/// Messages kept per session, system prompt included
pub const DEFAULT_MAX_MESSAGES: usize = 20;

/// Columns reserved around a formatted response
const RESPONSE_MARGIN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Bounded message history.
///
/// The first message is the system prompt and is never evicted. Beyond
/// `max_messages`, the oldest message after it is dropped.
#[derive(Debug, Clone)]
pub struct History {
    messages: Vec<Message>,
    max_messages: usize,
}

impl History {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self::with_limit(system_prompt, DEFAULT_MAX_MESSAGES)
    }

    /// `max_messages` is raised to 2 so one exchange always fits
    pub fn with_limit(system_prompt: impl Into<String>, max_messages: usize) -> Self {
        Self {
            messages: vec![Message::new(Role::System, system_prompt)],
            max_messages: max_messages.max(2),
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        if self.messages.len() > self.max_messages {
            let evicted = self.messages.remove(1);
            tracing::trace!(role = ?evicted.role, "evicted oldest message from history");
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Wrap a response for a terminal `width` columns wide.
///
/// Lines are wrapped at `width - 4`, indented by one space, and the block is
/// surrounded by blank lines.
pub fn format_response(response: &str, width: u16) -> String {
    let wrap_width = (width as usize).saturating_sub(RESPONSE_MARGIN).max(1);
    let options = Options::new(wrap_width).wrap_algorithm(WrapAlgorithm::FirstFit);

    let mut output = String::from("\n");
    for line in textwrap::wrap(response, options) {
        output.push(' ');
        output.push_str(&line);
        output.push('\n');
    }
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_history_keeps_system_prompt() {
        let mut history = History::with_limit("be a pony", 3);
        for i in 0..5 {
            history.push(Message::new(Role::User, format!("message {i}")));
        }

        let messages = history.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], Message::new(Role::System, "be a pony"));
        assert_eq!(messages[1].content, "message 3");
        assert_eq!(messages[2].content, "message 4");
    }

    #[test]
    fn test_default_limit() {
        let mut history = History::new("prompt");
        for i in 0..50 {
            history.push(Message::new(Role::Assistant, i.to_string()));
        }

        assert_eq!(history.len(), DEFAULT_MAX_MESSAGES);
        assert_eq!(history.messages()[0].role, Role::System);
    }

    #[test]
    fn test_tiny_limit_is_raised() {
        let mut history = History::with_limit("prompt", 0);
        history.push(Message::new(Role::User, "hi"));

        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_format_wraps_and_indents() {
        let formatted = format_response("hay there everypony how are you", 14);

        assert_eq!(formatted, "\n hay there\n everypony\n how are\n you\n\n");
    }

    #[test]
    fn test_format_keeps_paragraphs() {
        let formatted = format_response("one\n\ntwo", 80);

        assert_eq!(formatted, "\n one\n \n two\n\n");
    }

    #[test]
    fn test_format_narrow_terminal() {
        let formatted = format_response("ab", 2);

        assert_eq!(formatted, "\n a\n b\n\n");
    }
}

//! Conversation message types.
//!
//! A conversation is an ordered sequence of role-tagged turns. Assistant
//! turns are a refined variant carrying the post-processed answer fields
//! alongside the raw model output.

use docent_llm::{ChatMessage, Role};
use docent_retrieval::Document;
use serde::{Deserialize, Serialize};

/// A single turn in a conversation.
///
/// Role-specific behavior (e.g., rendering an assistant turn with its
/// citations) pattern-matches on the variant; there is no open-ended
/// message hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System { content: String },
    User { content: String },
    Assistant(AssistantReply),
}

/// An assistant turn with derived answer fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantReply {
    /// Raw model output with citation/follow-up markup intact.
    ///
    /// Kept verbatim for auditability; never re-derived or mutated after
    /// assembly.
    pub content: String,

    /// Answer text with follow-ups removed and citation markers renumbered
    /// to sequential integers.
    pub formatted_content: String,

    /// Follow-up questions in order of appearance in the raw output.
    pub follow_ups: Vec<String>,

    /// Documents actually cited in the answer, in first-appearance order.
    pub citations: Vec<Document>,
}

impl Message {
    /// Create a system turn.
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    /// Role of this turn.
    pub fn role(&self) -> Role {
        match self {
            Message::System { .. } => Role::System,
            Message::User { .. } => Role::User,
            Message::Assistant(_) => Role::Assistant,
        }
    }

    /// Text content of this turn.
    ///
    /// Assistant turns expose their raw content; display layers wanting
    /// clean text should use `AssistantReply::formatted_content`.
    pub fn content(&self) -> &str {
        match self {
            Message::System { content } => content,
            Message::User { content } => content,
            Message::Assistant(reply) => &reply.content,
        }
    }

    /// Convert to the wire form sent to the language model.
    ///
    /// Assistant history goes out with the raw content so the model sees
    /// its own citation and follow-up markup from earlier turns.
    pub fn to_chat_message(&self) -> ChatMessage {
        ChatMessage {
            role: self.role(),
            content: self.content().to_string(),
        }
    }
}

impl From<AssistantReply> for Message {
    fn from(reply: AssistantReply) -> Self {
        Message::Assistant(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_reply() -> AssistantReply {
        AssistantReply {
            content: "Answer.[a.md]\n<<Q?>>".to_string(),
            formatted_content: "Answer.[1]".to_string(),
            follow_ups: vec!["Q?".to_string()],
            citations: vec![Document::new("a.md", "chunk")],
        }
    }

    #[test]
    fn test_roles_and_content() {
        assert_eq!(Message::system("rules").role(), Role::System);
        assert_eq!(Message::user("hi").content(), "hi");

        let message: Message = sample_reply().into();
        assert_eq!(message.role(), Role::Assistant);
        assert_eq!(message.content(), "Answer.[a.md]\n<<Q?>>");
    }

    #[test]
    fn test_to_chat_message_uses_raw_content() {
        let message: Message = sample_reply().into();
        let chat = message.to_chat_message();
        assert_eq!(chat.role, Role::Assistant);
        assert_eq!(chat.content, "Answer.[a.md]\n<<Q?>>");
    }

    #[test]
    fn test_serde_tagged_by_role() {
        let json = serde_json::to_value(Message::user("hello")).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");

        let assistant = serde_json::to_value(Message::from(sample_reply())).unwrap();
        assert_eq!(assistant["role"], "assistant");
        assert_eq!(assistant["follow_ups"][0], "Q?");

        let back: Message = serde_json::from_value(assistant).unwrap();
        assert_eq!(back.role(), Role::Assistant);
    }
}

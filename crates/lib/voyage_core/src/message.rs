//! Role-tagged chat messages and the fixed system instruction.

use serde::{Deserialize, Serialize};

/// Instruction prepended to outbound transcripts that carry no system message.
pub const SYSTEM_INSTRUCTION: &str =
    "Tu es un expert en voyages. Réponds de manière concise et utile en français.";

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Build the outbound transcript for a completion call.
///
/// Prepends [`SYSTEM_INSTRUCTION`] when no message has the `system` role.
/// Existing system messages are left where they are and never duplicated.
/// The caller's transcript is borrowed, never modified.
pub fn with_system_instruction(messages: &[Message]) -> Vec<Message> {
    if messages.iter().any(|m| m.role == Role::System) {
        return messages.to_vec();
    }
    let mut outbound = Vec::with_capacity(messages.len() + 1);
    outbound.push(Message::system(SYSTEM_INSTRUCTION));
    outbound.extend_from_slice(messages);
    outbound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_instruction_when_missing() {
        let messages = vec![Message::user("Bonjour")];
        let outbound = with_system_instruction(&messages);
        assert_eq!(outbound.len(), 2);
        assert_eq!(outbound[0], Message::system(SYSTEM_INSTRUCTION));
        assert_eq!(outbound[1], Message::user("Bonjour"));
    }

    #[test]
    fn keeps_existing_system_message_in_place() {
        let messages = vec![
            Message::user("Salut"),
            Message::system("Sois bref."),
            Message::assistant("D'accord."),
        ];
        let outbound = with_system_instruction(&messages);
        assert_eq!(outbound, messages);
        assert_eq!(
            outbound.iter().filter(|m| m.role == Role::System).count(),
            1
        );
    }

    #[test]
    fn empty_transcript_gets_only_the_instruction() {
        let outbound = with_system_instruction(&[]);
        assert_eq!(outbound, vec![Message::system(SYSTEM_INSTRUCTION)]);
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_string(&Message::assistant("ok")).expect("serialize");
        assert_eq!(json, r#"{"role":"assistant","content":"ok"}"#);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let parsed = serde_json::from_str::<Message>(r#"{"role":"tool","content":"x"}"#);
        assert!(parsed.is_err());
    }
}

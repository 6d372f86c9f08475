use std::fmt;

use snafu::ensure;
use uuid::Uuid;

use crate::error::{ChatResult, EmptyTextSnafu};

/// Opaque identity of one message.
///
/// Backed by a UUIDv7 so ids minted in one session are unique and sort in
/// creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new_v7() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Chat speaker role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// Core immutable message model.
///
/// Text is kept verbatim; only the emptiness check looks at the trimmed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: MessageId,
    role: Role,
    text: String,
}

impl Message {
    /// Creates a message with a fresh id, rejecting text that trims to empty.
    pub fn new(role: Role, text: impl Into<String>) -> ChatResult<Self> {
        let text = text.into();
        ensure!(
            !text.trim().is_empty(),
            EmptyTextSnafu {
                stage: "create-message",
            }
        );

        Ok(Self {
            id: MessageId::new_v7(),
            role,
            text,
        })
    }

    pub fn user(text: impl Into<String>) -> ChatResult<Self> {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> ChatResult<Self> {
        Self::new(Role::Assistant, text)
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::error::ChatError;

    #[test]
    fn role_labels_are_lowercase_names() {
        assert_eq!(Role::User.label(), "user");
        assert_eq!(Role::Assistant.label(), "assistant");
    }

    #[test]
    fn keeps_text_verbatim() {
        let message = Message::user("  padded text \t").unwrap();

        assert_eq!(message.text(), "  padded text \t");
        assert_eq!(message.role(), Role::User);
    }

    #[test]
    fn rejects_blank_text() {
        for blank in ["", " ", "   ", "\t", "\n \r\n"] {
            let error = Message::assistant(blank).unwrap_err();
            assert!(matches!(error, ChatError::EmptyText { .. }), "{blank:?}");
        }
    }

    #[test]
    fn ids_are_pairwise_distinct() {
        let ids = (0..1_000)
            .map(|index| Message::user(format!("message {index}")).unwrap().id())
            .collect::<HashSet<_>>();

        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn identical_text_still_gets_distinct_ids() {
        let first = Message::user("same").unwrap();
        let second = Message::user("same").unwrap();

        assert_ne!(first.id(), second.id());
        assert_ne!(first, second);
    }

    #[test]
    fn id_display_is_the_uuid() {
        let message = Message::user("hi").unwrap();

        assert_eq!(
            message.id().to_string(),
            message.id().as_uuid().hyphenated().to_string()
        );
    }
}

//! A [`prompt::Message`] and its [`Role`]. The provider answers with the same
//! shape inside each [`response::Choice`].
//!
//! [`prompt::Message`]: crate::prompt::Message
//! [`response::Choice`]: crate::response::Choice

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role of the [`Message`] author.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Instructions for the model.
    System,
    /// From the user.
    User,
    /// From the AI.
    Assistant,
}

/// A single turn in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message<'a> {
    /// Who is the message from.
    pub role: Role,
    /// Text of the message.
    pub content: Cow<'a, str>,
}

impl<'a, T> From<(Role, T)> for Message<'a>
where
    T: Into<Cow<'a, str>>,
{
    fn from((role, content): (Role, T)) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            r#""assistant""#
        );
        let role: Role = serde_json::from_str(r#""system""#).unwrap();
        assert_eq!(role, Role::System);
    }

    #[test]
    fn test_message_from_role_str() {
        let message: Message = (Role::User, "Hello, world!").into();
        assert_eq!(message.role, Role::User);
        assert!(matches!(message.content, Cow::Borrowed("Hello, world!")));
    }
}

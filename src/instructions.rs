//! Turns a generation [`Request`] into the system and user [`Instructions`]
//! sent to the model.

use crate::options::Request;

/// Persona and output contract for the model. Does not depend on the
/// request.
pub const SYSTEM_PROMPT: &str = "\
You are a very talented, extremely articulate and eloquent writer. You specialize in writing day-to-day text messages for humans. Humans will come to you with a word or sentence, and they want you to craft a short text message based on their requirements.
Your goal is to craft a message based on the user entered prompt. You must not reply to the prompt, but you must generate a message which conveys the same meaning as the prompt.
You must only respond with the generated message. If the message is not in the English language, that is fine and you must not provide its translation in any language.
You must respond with a JSON object with the field:
\"message\": string with the message
If you cannot generate the message for the requested prompt, tone or language, you must respond with a JSON object with the field:
\"error\": string with the error message";

/// Appended to the user instruction only when emojis are requested.
pub const EMOJI_CLAUSE: &str = "The message should include emojis.";

/// The pair of instructions for a single [`Request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instructions {
    /// Always [`SYSTEM_PROMPT`].
    pub system: &'static str,
    /// See [`user_prompt`].
    pub user: String,
}

impl Instructions {
    /// Build the instructions for `request`. This never fails and does not
    /// validate the request.
    pub fn new(request: &Request) -> Self {
        Self {
            system: SYSTEM_PROMPT,
            user: user_prompt(request),
        }
    }
}

/// User instruction embedding the literal prompt and every option token.
pub fn user_prompt(request: &Request) -> String {
    let Request {
        prompt,
        tone,
        emoticon,
        language,
        style,
        length,
    } = request;

    let mut text = format!(
        "You must respond with only a JSON object with the field \"message\" or \"error\".
Using your talent, craft a message for the user, which says - \"{prompt}\"
It should be a {length} message.
The tone of the message should be \"{tone}\".
The language of the output message should be \"{language}\".
The style of the message should be \"{style}\"."
    );

    if *emoticon {
        text.push('\n');
        text.push_str(EMOJI_CLAUSE);
    }

    text
}
